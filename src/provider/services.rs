//! Collaborators shared by every provider a manager builds.

// self
use crate::{_prelude::*, http::HttpTransport, session::SessionStore};

/// Collaborators injected into every provider a manager builds.
#[derive(Clone)]
pub struct ProviderServices {
	/// Transport used for token and profile calls.
	pub http_client: Arc<dyn HttpTransport>,
	/// Session slot holding the CSRF state.
	pub session: Arc<dyn SessionStore>,
}
impl ProviderServices {
	/// Bundles a transport and a session store.
	pub fn new(http_client: Arc<dyn HttpTransport>, session: Arc<dyn SessionStore>) -> Self {
		Self { http_client, session }
	}

	/// Replaces the session store, keeping the transport.
	pub fn with_session(mut self, session: Arc<dyn SessionStore>) -> Self {
		self.session = session;

		self
	}
}
#[cfg(feature = "reqwest")]
impl ProviderServices {
	/// Redirect-free reqwest transport plus an in-memory session.
	pub fn reqwest() -> Result<Self, crate::error::ConfigError> {
		Ok(Self::new(
			Arc::new(crate::http::ReqwestHttpClient::new()?),
			Arc::new(crate::session::MemorySession::default()),
		))
	}
}
#[cfg(feature = "reqwest")]
impl Default for ProviderServices {
	/// Reqwest's default client, which follows redirects, plus an in-memory session.
	fn default() -> Self {
		Self::new(
			Arc::new(crate::http::ReqwestHttpClient::default()),
			Arc::new(crate::session::MemorySession::default()),
		)
	}
}
impl Debug for ProviderServices {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderServices").finish_non_exhaustive()
	}
}
