//! Optional observability helpers for token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `keycloak_token_client.acquire` with the
//!   `grant` and `stage` fields.
//! - Enable `metrics` to increment the `keycloak_token_client_acquire_total` counter for every
//!   attempt/success/failure, labeled by `grant` + `outcome`.
//!
//! With both features off the core performs no logging side effects at all.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each acquisition attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquireOutcome {
	/// Entry to the lifecycle.
	Attempt,
	/// Token returned to the caller, from cache or from the endpoint.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl AcquireOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AcquireOutcome::Attempt => "attempt",
			AcquireOutcome::Success => "success",
			AcquireOutcome::Failure => "failure",
		}
	}
}
impl Display for AcquireOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
