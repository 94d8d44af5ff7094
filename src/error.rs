//! Error taxonomy shared across the request builder, transport, and lifecycle layers.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// The three variants are discriminated explicitly so callers can pattern-match on
/// the failure class instead of probing dynamic fields: the endpoint answered with a
/// non-success status ([`Service`](Self::Service)), the request never completed
/// ([`Transport`](Self::Transport)), or a body that was expected to be JSON was not
/// ([`Parse`](Self::Parse)).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token endpoint responded with a non-success status.
	#[error("Failed to get token: the endpoint returned status {status}.")]
	Service {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Server-provided body, raw text for 404 responses and parsed JSON otherwise.
		body: ServiceBody,
	},
	/// Connection-level failure (DNS, refusal, reset), propagated unwrapped.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body was not valid JSON where parsing was expected.
	#[error(transparent)]
	Parse(#[from] ParseError),
}
impl Error {
	/// Returns the HTTP status associated with the failure, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Service { status, .. } => Some(*status),
			Self::Parse(parse) => parse.status,
			Self::Transport(_) => None,
		}
	}
}

/// Body captured from a non-success token endpoint response.
///
/// Unknown realms and paths typically answer 404 with HTML or plain text, so that
/// status carries the body verbatim; every other non-success status is required to
/// produce structured JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceBody {
	/// Parsed JSON payload returned by non-404 error statuses.
	Json(Value),
	/// Raw body text returned by 404 responses.
	Text(String),
}
impl ServiceBody {
	/// Returns the raw text body, if this is a 404-style payload.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::Json(_) => None,
		}
	}

	/// Returns the parsed JSON payload, if the endpoint produced one.
	pub fn as_json(&self) -> Option<&Value> {
		match self {
			Self::Json(value) => Some(value),
			Self::Text(_) => None,
		}
	}
}
impl Display for ServiceBody {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Json(value) => Display::fmt(value, f),
			Self::Text(text) => f.write_str(text),
		}
	}
}

/// Transport-level failures raised before a response could be classified.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint URL could not be constructed from the base address and realm.
	#[error("Token endpoint URL could not be constructed.")]
	Endpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Structured JSON parse failure, distinguishable from [`Error::Service`].
#[derive(Debug, ThisError)]
#[error("Token endpoint returned a malformed body.")]
pub struct ParseError {
	/// Structured parsing failure with the path that failed to deserialize.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code of the response whose body failed to parse.
	pub status: Option<u16>,
}
