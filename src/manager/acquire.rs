//! The token acquisition state machine.
//!
//! [`TokenManager::acquire_token`] is the single public entry point: it derives one
//! of three decisions—reuse the cached access token, spend the cached refresh token,
//! or authenticate from scratch—freshly on every call, then updates the cache only
//! when the endpoint answered successfully. Failures propagate unmodified and leave
//! the prior cache entry in place.
//!
//! There is deliberately no lock around the cache: two concurrent callers that both
//! observe a stale record both hit the endpoint, and the last response to complete
//! wins the cached value.

// self
use crate::{
	_prelude::*,
	auth::TokenSettings,
	http::{self, TokenTransport},
	manager::TokenManager,
	obs::{self, AcquireOutcome, AcquireSpan},
	request,
	store::CacheKey,
	token::{TokenRecord, TokenState},
};

/// Per-call decision derived from the cached record and the current instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquireDecision {
	/// The cached access token is still fresh; no network call is needed.
	Reuse {
		/// Access token to hand back to the caller.
		access_token: String,
	},
	/// The access token lapsed but the refresh window is open; spend the refresh token.
	Refresh {
		/// Refresh token to send with the `refresh_token` grant.
		refresh_token: String,
	},
	/// No usable record exists; authenticate with the original grant.
	Authenticate,
}
impl AcquireDecision {
	/// Evaluates the decision for a cache lookup result at the provided instant.
	pub fn evaluate(record: Option<&TokenRecord>, now: OffsetDateTime) -> Self {
		let Some(record) = record else {
			return Self::Authenticate;
		};

		match record.state_at(now) {
			TokenState::Fresh =>
				Self::Reuse { access_token: record.access_token.expose().to_owned() },
			TokenState::Refreshable => match &record.refresh_token {
				Some(secret) => Self::Refresh { refresh_token: secret.expose().to_owned() },
				None => Self::Authenticate,
			},
			TokenState::Expired => Self::Authenticate,
		}
	}
}

impl<T> TokenManager<T>
where
	T: ?Sized + TokenTransport,
{
	/// Returns a bearer token for the provided endpoint and settings.
	///
	/// The cached record for the exact `{base_url, settings}` pair is consulted
	/// first: a fresh record is returned without any network traffic, a refreshable
	/// one is renewed via the `refresh_token` grant (the stored refresh token merged
	/// over the original settings), and anything else triggers the configured grant
	/// from scratch. Successful responses overwrite the cache entry with expiry
	/// instants derived from the response arrival clock.
	///
	/// Every failure—endpoint rejection, transport, or parse—propagates to the
	/// caller unmodified and leaves the cache untouched.
	pub async fn acquire_token(&self, base_url: &Url, settings: &TokenSettings) -> Result<String> {
		let span = AcquireSpan::new(settings.grant_type, "acquire_token");

		obs::record_acquire_outcome(settings.grant_type, AcquireOutcome::Attempt);

		let result = span
			.instrument(async move {
				let key = CacheKey::new(base_url, settings);
				let now = OffsetDateTime::now_utc();
				let cached = self.store.fetch(&key);
				let form = match AcquireDecision::evaluate(cached.as_ref(), now) {
					AcquireDecision::Reuse { access_token } => return Ok(access_token),
					AcquireDecision::Refresh { refresh_token } =>
						settings.refresh_form(&refresh_token),
					AcquireDecision::Authenticate => settings.grant_form(),
				};
				let token_request = request::build_token_request(base_url, &settings.realm, &form)?;
				let raw = self.transport.execute(token_request).await?;
				let response = http::decode_token_response(raw)?;
				let issued_at = OffsetDateTime::now_utc();
				let record = TokenRecord::from_response(response, issued_at);
				let access_token = record.access_token.expose().to_owned();

				self.store.save(key, record);

				Ok(access_token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_acquire_outcome(settings.grant_type, AcquireOutcome::Success),
			Err(_) => obs::record_acquire_outcome(settings.grant_type, AcquireOutcome::Failure),
		}

		result
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::http::TokenResponse;

	fn record(expires_in: u64, refresh: Option<(&str, u64)>) -> TokenRecord {
		let response = TokenResponse {
			access_token: "cached-access".into(),
			token_type: None,
			expires_in,
			refresh_expires_in: refresh.map(|(_, secs)| secs),
			refresh_token: refresh.map(|(token, _)| token.into()),
			scope: None,
			session_state: None,
		};

		TokenRecord::from_response(response, macros::datetime!(2026-01-01 00:00 UTC))
	}

	#[test]
	fn absent_record_authenticates() {
		let now = macros::datetime!(2026-01-01 00:00 UTC);

		assert_eq!(AcquireDecision::evaluate(None, now), AcquireDecision::Authenticate);
	}

	#[test]
	fn fresh_record_reuses_access_token() {
		let record = record(300, Some(("cached-refresh", 1800)));
		let now = macros::datetime!(2026-01-01 00:01 UTC);

		assert_eq!(
			AcquireDecision::evaluate(Some(&record), now),
			AcquireDecision::Reuse { access_token: "cached-access".into() },
		);
	}

	#[test]
	fn lapsed_record_spends_refresh_token() {
		let record = record(300, Some(("cached-refresh", 1800)));
		let now = macros::datetime!(2026-01-01 00:10 UTC);

		assert_eq!(
			AcquireDecision::evaluate(Some(&record), now),
			AcquireDecision::Refresh { refresh_token: "cached-refresh".into() },
		);
	}

	#[test]
	fn fully_expired_record_authenticates() {
		let record = record(300, Some(("cached-refresh", 1800)));
		let now = macros::datetime!(2026-01-01 01:00 UTC);

		assert_eq!(AcquireDecision::evaluate(Some(&record), now), AcquireDecision::Authenticate);
	}

	#[test]
	fn lapsed_record_without_refresh_token_authenticates() {
		let record = record(300, None);
		let now = macros::datetime!(2026-01-01 00:10 UTC);

		assert_eq!(AcquireDecision::evaluate(Some(&record), now), AcquireDecision::Authenticate);
	}
}
