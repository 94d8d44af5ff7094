//! Token lifecycle management over a cache and a transport.

pub mod acquire;

pub use acquire::*;

// self
use crate::{_prelude::*, http::TokenTransport, store::TokenStore};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Manager specialized for the crate's default reqwest transport.
pub type ReqwestTokenManager = TokenManager<ReqwestTransport>;

/// Decides per call whether to reuse, refresh, or re-authenticate, and keeps the
/// caller-owned token cache up to date.
///
/// The manager owns its collaborators behind `Arc` so handles stay cheap to clone
/// and multiple independent lifecycles can coexist in one process, each with its own
/// store. It holds no state of its own—every decision is derived fresh from the
/// cache and the clock.
#[derive(Clone)]
pub struct TokenManager<T>
where
	T: ?Sized + TokenTransport,
{
	/// Transport used for every outbound token request.
	pub transport: Arc<T>,
	/// Cache backend holding the most recent record per cache key.
	pub store: Arc<dyn TokenStore>,
}
impl<T> TokenManager<T>
where
	T: ?Sized + TokenTransport,
{
	/// Creates a manager that reuses the caller-provided transport.
	pub fn with_transport(store: Arc<dyn TokenStore>, transport: impl Into<Arc<T>>) -> Self {
		Self { transport: transport.into(), store }
	}
}
#[cfg(feature = "reqwest")]
impl TokenManager<ReqwestTransport> {
	/// Creates a manager with a default reqwest-backed transport.
	///
	/// Use [`TokenManager::with_transport`] together with
	/// [`ReqwestTransport::with_client`] to supply a pre-configured client (custom
	/// TLS, timeouts, proxies).
	pub fn new(store: Arc<dyn TokenStore>) -> Self {
		Self::with_transport(store, ReqwestTransport::default())
	}
}
impl<T> Debug for TokenManager<T>
where
	T: ?Sized + TokenTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager").finish_non_exhaustive()
	}
}
