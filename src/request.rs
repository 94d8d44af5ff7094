//! Token request construction: realm endpoint joining and form encoding.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, auth::RealmName, error::TransportError};

/// Fixed content type declared on every token request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A fully prepared token endpoint request.
#[derive(Clone, Debug)]
pub struct TokenRequest {
	/// Resolved token endpoint URL.
	pub url: Url,
	/// Form-urlencoded request body.
	pub body: String,
	/// Content type header value, always [`FORM_CONTENT_TYPE`].
	pub content_type: &'static str,
}

/// Resolves the token endpoint for a realm under the provided base address.
///
/// The base address is taken as-is apart from trailing-slash normalization, so
/// servers mounted under a path prefix (`https://host/auth`) keep that prefix.
pub fn token_endpoint(base_url: &Url, realm: &RealmName) -> Result<Url, TransportError> {
	let raw = format!(
		"{}/realms/{realm}/protocol/openid-connect/token",
		base_url.as_str().trim_end_matches('/'),
	);

	Url::parse(&raw).map_err(|source| TransportError::Endpoint { source })
}

/// Builds the POST request for a token grant: endpoint URL, encoded body, and headers.
///
/// Field insertion order is irrelevant to the endpoint; the map's sorted iteration
/// merely makes the encoding deterministic.
pub fn build_token_request(
	base_url: &Url,
	realm: &RealmName,
	form: &BTreeMap<String, String>,
) -> Result<TokenRequest, TransportError> {
	let url = token_endpoint(base_url, realm)?;
	let mut serializer = form_urlencoded::Serializer::new(String::new());

	for (key, value) in form {
		serializer.append_pair(key, value);
	}

	Ok(TokenRequest { url, body: serializer.finish(), content_type: FORM_CONTENT_TYPE })
}
