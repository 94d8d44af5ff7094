// self
use crate::{auth::GrantType, obs::AcquireOutcome};

/// Records an acquisition outcome via the global metrics recorder (when enabled).
pub fn record_acquire_outcome(grant: GrantType, outcome: AcquireOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"keycloak_token_client_acquire_total",
			"grant" => grant.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (grant, outcome);
	}
}
