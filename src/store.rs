//! Cache contracts and the canonical cache key for token records.

pub mod memory;

pub use memory::MemoryStore;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::TokenSettings, token::TokenRecord};

/// Cache backend contract implemented by token stores.
///
/// The contract is deliberately small and synchronous: a pure in-process map with
/// last-write-wins semantics. Expired entries are retained—the lifecycle checks the
/// record's instants before ever serving one—and no sweep is run on the store's
/// behalf. Stores are caller-owned; a process that wants a singleton composes one
/// at its own root.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the record cached under `key`, if any.
	fn fetch(&self, key: &CacheKey) -> Option<TokenRecord>;

	/// Persists or replaces the record cached under `key`.
	fn save(&self, key: CacheKey, record: TokenRecord);
}

/// Canonical key identifying one logical token session.
///
/// The key is a pure function of the base address and the defaulted settings: the
/// SHA-256 digest (base64, no padding) over the base URL, the realm, and the sorted
/// grant form. Identical logical requests always map to the same key, and secrets
/// feed the digest without being recoverable from it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);
impl CacheKey {
	/// Derives the key for the provided base address and settings.
	pub fn new(base_url: &Url, settings: &TokenSettings) -> Self {
		let mut hasher = Sha256::new();

		hasher.update(base_url.as_str().as_bytes());
		hasher.update([b'\n']);
		hasher.update(settings.realm.as_bytes());
		hasher.update([b'\n']);

		for (key, value) in settings.grant_form() {
			hasher.update(key.as_bytes());
			hasher.update([b'=']);
			hasher.update(value.as_bytes());
			hasher.update([b'\n']);
		}

		Self(STANDARD_NO_PAD.encode(hasher.finalize()))
	}

	/// Returns the key's fingerprint string.
	pub fn fingerprint(&self) -> &str {
		&self.0
	}
}
impl Debug for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CacheKey").field(&self.0).finish()
	}
}
