//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	store::{CacheKey, TokenStore},
	token::TokenRecord,
};

type StoreMap = Arc<RwLock<HashMap<CacheKey, TokenRecord>>>;

/// In-process cache keeping one record per cache key for the process's lifetime.
///
/// Clones share the same underlying map, so a handle can be passed to a manager and
/// kept around for inspection. Growth is unbounded across distinct keys; processes
/// that churn through many settings can run [`purge_expired`](Self::purge_expired)
/// on their own schedule—the lifecycle never does.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of cached records, including expired ones.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if no records are cached.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Removes every record whose access and refresh windows have both elapsed at
	/// `now`, returning how many were dropped.
	pub fn purge_expired(&self, now: OffsetDateTime) -> usize {
		let mut guard = self.0.write();
		let before = guard.len();

		guard.retain(|_, record| !record.is_expired_at(now));

		before - guard.len()
	}
}
impl TokenStore for MemoryStore {
	fn fetch(&self, key: &CacheKey) -> Option<TokenRecord> {
		self.0.read().get(key).cloned()
	}

	fn save(&self, key: CacheKey, record: TokenRecord) {
		self.0.write().insert(key, record);
	}
}
