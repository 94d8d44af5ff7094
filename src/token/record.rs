//! Cached token records and the per-call lifecycle state derivation.

// self
use crate::{_prelude::*, http::TokenResponse, token::secret::TokenSecret};

/// Lifecycle state of a cached record at a given instant.
///
/// The state is never stored; it is derived fresh for every lookup from the record's
/// expiry instants, so a stale cache entry can never be served by mistake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenState {
	/// The access token is still valid and may be reused as-is.
	Fresh,
	/// The access token lapsed but the refresh token is still usable.
	Refreshable,
	/// Both windows elapsed (or no refresh data exists); full re-authentication is required.
	Expired,
}

/// Result of a token request or refresh, augmented with absolute expiry instants.
///
/// `expires_in`/`refresh_expires_in` are kept verbatim as received; the absolute
/// instants are derived once, at cache-write time, from the response arrival clock.
/// Declared lifetimes are interpreted as seconds (RFC 6749 §5.1).
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret, if the server issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Access token lifetime in seconds, as received.
	pub expires_in: u64,
	/// Refresh token lifetime in seconds, as received.
	pub refresh_expires_in: Option<u64>,
	/// Instant the response was recorded.
	pub issued_at: OffsetDateTime,
	/// Instant after which the access token must not be reused.
	pub expires_at: OffsetDateTime,
	/// Instant after which the refresh token must not be used.
	pub refresh_expires_at: Option<OffsetDateTime>,
}
impl TokenRecord {
	/// Builds a record from a token endpoint response, deriving the absolute expiry
	/// instants from `issued_at`.
	pub fn from_response(response: TokenResponse, issued_at: OffsetDateTime) -> Self {
		let expires_at = issued_at + clamped_seconds(response.expires_in);
		let refresh_expires_at =
			response.refresh_expires_in.map(|secs| issued_at + clamped_seconds(secs));

		Self {
			access_token: TokenSecret::new(response.access_token),
			refresh_token: response.refresh_token.map(TokenSecret::new),
			expires_in: response.expires_in,
			refresh_expires_in: response.refresh_expires_in,
			issued_at,
			expires_at,
			refresh_expires_at,
		}
	}

	/// Derives the lifecycle state at the provided instant.
	pub fn state_at(&self, now: OffsetDateTime) -> TokenState {
		if now < self.expires_at {
			return TokenState::Fresh;
		}
		if self.refresh_token.is_some()
			&& self.refresh_expires_at.is_some_and(|instant| now < instant)
		{
			return TokenState::Refreshable;
		}

		TokenState::Expired
	}

	/// Returns `true` if the access token may be reused at the provided instant.
	pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
		matches!(self.state_at(now), TokenState::Fresh)
	}

	/// Returns `true` if the record is eligible for a refresh grant at the provided instant.
	pub fn is_refreshable_at(&self, now: OffsetDateTime) -> bool {
		matches!(self.state_at(now), TokenState::Refreshable)
	}

	/// Returns `true` if both windows have elapsed at the provided instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		matches!(self.state_at(now), TokenState::Expired)
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("expires_in", &self.expires_in)
			.field("refresh_expires_in", &self.refresh_expires_in)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.field("refresh_expires_at", &self.refresh_expires_at)
			.finish()
	}
}

fn clamped_seconds(secs: u64) -> Duration {
	Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX))
}
