// self
use crate::{_prelude::*, auth::GrantType};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedAcquire<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedAcquire<F> = F;

/// A span builder used by the token lifecycle.
#[derive(Clone, Debug)]
pub struct AcquireSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl AcquireSpan {
	/// Creates a new span tagged with the provided grant + stage.
	pub fn new(grant: GrantType, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("keycloak_token_client.acquire", grant = grant.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (grant, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedAcquire<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
