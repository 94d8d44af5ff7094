//! Transport primitives for token endpoint exchanges.
//!
//! [`TokenTransport`] is the crate's only dependency on an HTTP stack: it performs a
//! single POST and hands back the raw status and fully-streamed body. Everything
//! above the wire—success parsing and the 404/non-200 failure classification—lives
//! in [`decode_token_response`] so custom transports inherit identical semantics.

// std
use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	error::{ParseError, ServiceBody, TransportError},
	request::TokenRequest,
};

/// Boxed future returned by [`TokenTransport`] implementations.
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing token endpoint requests.
///
/// Implementations perform exactly one attempt per invocation: no retries, no
/// internal timeouts. The URL scheme selects the secure or plain channel; the
/// response body must be streamed to completion before it is returned so
/// classification never observes a partial payload.
pub trait TokenTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the prepared POST request and returns the raw outcome.
	fn execute(&self, request: TokenRequest) -> TransportFuture<'_, RawResponse>;
}

/// Raw token endpoint outcome prior to classification.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code returned by the endpoint.
	pub status: u16,
	/// Complete response body text.
	pub body: String,
}

/// Success payload returned by the token endpoint.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
	/// Opaque bearer token string.
	pub access_token: String,
	/// Token type reported by the server, typically `Bearer`.
	pub token_type: Option<String>,
	/// Access token lifetime in seconds.
	pub expires_in: u64,
	/// Refresh token lifetime in seconds, when a refresh token is issued.
	pub refresh_expires_in: Option<u64>,
	/// Refresh token, present only if the server issues one.
	pub refresh_token: Option<String>,
	/// Scope granted by the server.
	pub scope: Option<String>,
	/// Server-side session identifier.
	pub session_state: Option<String>,
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_in", &self.expires_in)
			.field("refresh_expires_in", &self.refresh_expires_in)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("scope", &self.scope)
			.field("session_state", &self.session_state)
			.finish()
	}
}

/// Classifies a raw token endpoint outcome.
///
/// - `200` parses the body as a [`TokenResponse`].
/// - `404` carries the body verbatim—unknown realms and paths answer with HTML or
///   plain text, so no JSON parse is attempted.
/// - Every other status parses the body as JSON and surfaces it inside
///   [`Error::Service`].
///
/// A body that fails to parse where JSON is expected becomes [`Error::Parse`],
/// distinguishable from the endpoint-rejected case.
pub fn decode_token_response(raw: RawResponse) -> Result<TokenResponse> {
	match raw.status {
		200 => Ok(parse_json(&raw.body, 200)?),
		404 => Err(Error::Service { status: 404, body: ServiceBody::Text(raw.body) }),
		status => {
			let value: Value = parse_json(&raw.body, status)?;

			Err(Error::Service { status, body: ServiceBody::Json(value) })
		},
	}
}

fn parse_json<T>(body: &str, status: u16) -> Result<T, ParseError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ParseError { source, status: Some(status) })
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects; configure any custom client
/// accordingly before wrapping it. Callers impose timeouts the same way—through the
/// client they hand to [`with_client`](Self::with_client).
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenTransport for ReqwestTransport {
	fn execute(&self, request: TokenRequest) -> TransportFuture<'_, RawResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(request.url)
				.header(CONTENT_TYPE, request.content_type)
				.body(request.body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(RawResponse { status, body })
		})
	}
}
