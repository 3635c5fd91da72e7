//! Session contract used to persist the CSRF state between redirect and callback.
//!
//! The store is keyed globally per end-user session: every provider writes the same
//! [`STATE_KEY`] slot, so two providers started in one session overwrite each other's state.

pub mod memory;

pub use memory::MemorySession;

// self
use crate::_prelude::*;

/// Session key holding the CSRF state issued by the latest redirect.
pub const STATE_KEY: &str = "state";

/// Key/value capability backed by the caller's session or cookie layer.
///
/// Implementations only need read-after-write consistency within one end-user session.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn get(&self, key: &str) -> Option<String>;

	/// Stores or replaces the value under `key`.
	fn put(&self, key: &str, value: String);
}
impl<S> SessionStore for Arc<S>
where
	S: ?Sized + SessionStore,
{
	fn get(&self, key: &str) -> Option<String> {
		(**self).get(key)
	}

	fn put(&self, key: &str, value: String) {
		(**self).put(key, value)
	}
}
