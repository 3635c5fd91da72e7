//! Multi-provider OAuth 2.0 social login: build authorization redirects, exchange codes, and
//! normalize every provider's profile into one user shape behind a cached driver registry.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod callback;
pub mod config;
pub mod error;
pub mod http;
pub mod manager;
pub mod obs;
pub mod provider;
pub mod providers;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and in-process test doubles; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use oauth2::http::{HeaderMap, Method, StatusCode, Uri};
	// self
	use crate::{
		http::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
		provider::ProviderServices,
		session::{MemorySession, SessionStore},
	};

	/// Request captured by [`StubTransport`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// HTTP method.
		pub method: Method,
		/// Full request URI.
		pub uri: Uri,
		/// Request headers.
		pub headers: HeaderMap,
		/// Raw request body.
		pub body: Vec<u8>,
	}
	impl RecordedRequest {
		/// Request path without the query string.
		pub fn path(&self) -> &str {
			self.uri.path()
		}

		/// Decoded query pairs.
		pub fn query_pairs(&self) -> HashMap<String, String> {
			url::form_urlencoded::parse(self.uri.query().unwrap_or_default().as_bytes())
				.into_owned()
				.collect()
		}

		/// Decoded form body pairs.
		pub fn form_pairs(&self) -> HashMap<String, String> {
			url::form_urlencoded::parse(&self.body).into_owned().collect()
		}

		/// Header value as text, when present and valid UTF-8.
		pub fn header(&self, name: &str) -> Option<&str> {
			self.headers.get(name).and_then(|value| value.to_str().ok())
		}
	}

	/// In-process transport answering canned bodies by request path.
	///
	/// Unknown paths answer `404` with an empty JSON object so providers see an ordinary body.
	#[derive(Clone, Debug, Default)]
	pub struct StubTransport {
		routes: Arc<Mutex<HashMap<String, String>>>,
		requests: Arc<Mutex<Vec<RecordedRequest>>>,
	}
	impl StubTransport {
		/// Registers the body returned for `path`.
		pub fn respond(self, path: &str, body: impl Into<String>) -> Self {
			self.routes.lock().insert(path.to_owned(), body.into());

			self
		}

		/// Every request dispatched so far, oldest first.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}

		/// Requests dispatched to `path`.
		pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
			self.requests.lock().iter().filter(|request| request.path() == path).cloned().collect()
		}
	}
	impl HttpTransport for StubTransport {
		fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
			let (parts, body) = request.into_parts();
			let recorded =
				RecordedRequest { method: parts.method, uri: parts.uri, headers: parts.headers, body };
			let route = self.routes.lock().get(recorded.path()).cloned();

			self.requests.lock().push(recorded);

			Box::pin(async move {
				let (status, body) = match route {
					Some(body) => (StatusCode::OK, body),
					None => (StatusCode::NOT_FOUND, "{}".to_owned()),
				};
				let mut response = HttpResponse::new(body.into_bytes());

				*response.status_mut() = status;

				Ok(response)
			})
		}
	}

	/// Builds provider services around a stub transport and a fresh in-memory session.
	pub fn stub_services(transport: &StubTransport) -> (ProviderServices, Arc<MemorySession>) {
		let session = Arc::new(MemorySession::default());
		let session_store: Arc<dyn SessionStore> = session.clone();
		let http_client: Arc<dyn HttpTransport> = Arc::new(transport.clone());

		(ProviderServices::new(http_client, session_store), session)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use oauth2;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
