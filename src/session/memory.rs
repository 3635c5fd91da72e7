//! Thread-safe in-memory [`SessionStore`] for single-session apps, demos, and tests.

// self
use crate::{_prelude::*, session::SessionStore};

type SessionMap = Arc<RwLock<HashMap<String, String>>>;

/// Session backend that keeps values in-process.
///
/// Clones share the same map, so one handle can be given to providers and another kept by the
/// request handler.
#[derive(Clone, Debug, Default)]
pub struct MemorySession(SessionMap);
impl MemorySession {
	/// Removes the value under `key`, returning it.
	pub fn remove(&self, key: &str) -> Option<String> {
		self.0.write().remove(key)
	}

	/// Removes every stored value.
	pub fn clear(&self) {
		self.0.write().clear();
	}
}
impl SessionStore for MemorySession {
	fn get(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	fn put(&self, key: &str, value: String) {
		self.0.write().insert(key.to_owned(), value);
	}
}
