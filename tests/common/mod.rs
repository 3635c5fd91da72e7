#![allow(dead_code)]

// std
use std::sync::Arc;
// self
use oauth2_socialite::{
	config::{Config, ProviderConfig},
	error::TransportError,
	http::{HttpRequest, HttpTransport, ReqwestHttpClient, TransportFuture},
	manager::Manager,
	oauth2::http::Uri,
	provider::ProviderServices,
	session::{MemorySession, SessionStore},
};

pub const REDIRECT_URI: &str = "https://app.example.com/callback";

/// Redirect-free reqwest transport that keeps path + query but sends every request to a mock
/// server.
#[derive(Clone, Debug)]
pub struct ReroutingHttpClient {
	base: String,
	inner: ReqwestHttpClient,
}
impl ReroutingHttpClient {
	pub fn new(base: &str) -> Self {
		Self { base: base.trim_end_matches('/').to_owned(), inner: ReqwestHttpClient::new().expect("Reqwest client should build.") }
	}
}
impl HttpTransport for ReroutingHttpClient {
	fn execute(&self, mut request: HttpRequest) -> TransportFuture<'_> {
		let path_and_query =
			request.uri().path_and_query().map(|value| value.as_str()).unwrap_or("/");

		match format!("{}{path_and_query}", self.base).parse::<Uri>() {
			Ok(uri) => *request.uri_mut() = uri,
			Err(e) => return Box::pin(async move { Err(TransportError::network(e)) }),
		}

		self.inner.execute(request)
	}
}

/// Provider services talking to `base` through reqwest, plus the session they share.
pub fn mock_services(base: &str) -> (ProviderServices, Arc<MemorySession>) {
	let session = Arc::new(MemorySession::default());
	let session_store: Arc<dyn SessionStore> = session.clone();
	let http_client: Arc<dyn HttpTransport> = Arc::new(ReroutingHttpClient::new(base));

	(ProviderServices::new(http_client, session_store), session)
}

/// Manager with every built-in driver configured against the mock server at `base`.
pub fn mock_manager(base: &str) -> (Manager, Arc<MemorySession>) {
	let config = ["github", "wechat", "douban", "wework", "outlook", "douyin", "tiktok"]
		.into_iter()
		.fold(Config::default(), |config, driver| {
			config.with_provider(
				driver,
				ProviderConfig::new(format!("{driver}-id"), format!("{driver}-secret"), REDIRECT_URI),
			)
		});
	let (services, session) = mock_services(base);

	(Manager::with_services(config, services), session)
}

/// Value of `key` in the query of `url`.
pub fn query_value(url: &oauth2_socialite::url::Url, key: &str) -> Option<String> {
	url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
}
