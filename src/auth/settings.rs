//! Per-call grant settings and token request form assembly.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, RealmName},
	token::TokenSecret,
};

/// OAuth 2.0 grant types understood by the token lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Resource Owner Password grant for user credentials.
	Password,
	/// Client Credentials grant for app-only tokens.
	ClientCredentials,
	/// Refresh Token grant for renewing cached sessions.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::Password => "password",
			GrantType::ClientCredentials => "client_credentials",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Caller-supplied parameters for one grant, immutable per call.
///
/// The realm is concrete from construction onward—omitting it yields the `master`
/// realm—so cache keys derived from two logically identical settings always match.
/// Every populated field is passed through verbatim to the token request; fields the
/// lifecycle has no name for travel in [`extra`](Self::extra).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
	/// Realm under which the client is registered; defaults to `master`.
	pub realm: RealmName,
	/// Grant used when authenticating from scratch.
	pub grant_type: GrantType,
	/// OAuth 2.0 client identifier sent with every request.
	pub client_id: ClientId,
	/// Resource owner username for the password grant.
	pub username: Option<String>,
	/// Resource owner password for the password grant.
	pub password: Option<TokenSecret>,
	/// Client secret for confidential clients.
	pub client_secret: Option<TokenSecret>,
	/// Requested scope string, forwarded verbatim.
	pub scope: Option<String>,
	/// Additional grant-specific form fields, forwarded verbatim.
	pub extra: BTreeMap<String, String>,
}
impl TokenSettings {
	/// Creates settings for the provided grant and client, scoped to the `master` realm.
	pub fn new(grant_type: GrantType, client_id: ClientId) -> Self {
		Self {
			realm: RealmName::default(),
			grant_type,
			client_id,
			username: None,
			password: None,
			client_secret: None,
			scope: None,
			extra: BTreeMap::new(),
		}
	}

	/// Overrides the realm.
	pub fn with_realm(mut self, realm: RealmName) -> Self {
		self.realm = realm;

		self
	}

	/// Sets the resource owner username.
	pub fn with_username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());

		self
	}

	/// Sets the resource owner password.
	pub fn with_password(mut self, password: impl Into<String>) -> Self {
		self.password = Some(TokenSecret::new(password));

		self
	}

	/// Sets the confidential client secret.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Sets the requested scope string.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());

		self
	}

	/// Adds a grant-specific form field forwarded verbatim to the endpoint.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.extra.insert(key.into(), value.into());

		self
	}

	/// Assembles the form field set for the configured grant.
	pub(crate) fn grant_form(&self) -> BTreeMap<String, String> {
		let mut form = self.extra.clone();

		form.insert("grant_type".into(), self.grant_type.as_str().into());
		form.insert("client_id".into(), self.client_id.to_string());

		if let Some(username) = &self.username {
			form.insert("username".into(), username.clone());
		}
		if let Some(password) = &self.password {
			form.insert("password".into(), password.expose().into());
		}
		if let Some(secret) = &self.client_secret {
			form.insert("client_secret".into(), secret.expose().into());
		}
		if let Some(scope) = &self.scope {
			form.insert("scope".into(), scope.clone());
		}

		form
	}

	/// Assembles the refresh form: the grant form merged with the refresh grant override
	/// and the stored refresh token.
	pub(crate) fn refresh_form(&self, refresh_token: &str) -> BTreeMap<String, String> {
		let mut form = self.grant_form();

		form.insert("grant_type".into(), GrantType::RefreshToken.as_str().into());
		form.insert("refresh_token".into(), refresh_token.into());

		form
	}
}
