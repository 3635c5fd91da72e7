//! Transport primitives for provider API calls.
//!
//! The module exposes [`HttpTransport`], the crate's only dependency on an HTTP stack, plus
//! request builders and a JSON decoder shared by every provider. Requests and responses are the
//! `http`-crate types re-exported by [`oauth2`], so any client that already speaks those types can
//! be plugged in. Providers only read response bodies; status codes are left to the transport.

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE, HeaderName},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

pub use oauth2::{HttpRequest, HttpResponse};

/// Future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Content type used for form-encoded token requests.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Abstraction over HTTP transports capable of executing provider requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared across every
/// provider a manager builds. Failures at the network layer surface as [`TransportError`] and are
/// passed through to callers untouched; non-2xx responses are returned as ordinary responses.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Dispatches `request` and resolves with the full response.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints answer directly and must not hand the code off to another URI.
/// [`new`](Self::new) builds a client that never follows redirects; `Default` and
/// [`with_client`](Self::with_client) keep the wrapped client's policy, so configure custom
/// clients the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client that returns redirect responses as-is.
	///
	/// Fails with [`ConfigError::HttpClientBuild`] when reqwest cannot initialize its TLS backend.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Builds a GET request with `query` appended to `url`.
pub fn get(url: &Url, query: &[(&str, &str)], headers: &[(HeaderName, &str)]) -> Result<HttpRequest> {
	let mut url = url.clone();

	if !query.is_empty() {
		url.query_pairs_mut().extend_pairs(query);
	}

	build(Method::GET, &url, headers, Vec::new())
}

/// Builds a POST request whose body is `form`, `application/x-www-form-urlencoded` encoded.
pub fn post_form(
	url: &Url,
	form: &BTreeMap<String, String>,
	headers: &[(HeaderName, &str)],
) -> Result<HttpRequest> {
	let body = encode_form(form);
	let mut all_headers = Vec::with_capacity(headers.len() + 1);

	all_headers.push((CONTENT_TYPE, FORM_CONTENT_TYPE));
	all_headers.extend(headers.iter().map(|(name, value)| (name.clone(), *value)));

	build(Method::POST, url, &all_headers, body.into_bytes())
}

/// Encodes key/value pairs with RFC 1738 rules (`+` for spaces).
pub fn encode_form(form: &BTreeMap<String, String>) -> String {
	url::form_urlencoded::Serializer::new(String::new()).extend_pairs(form).finish()
}

/// Header pair asking for a JSON response.
pub fn accept_json() -> (HeaderName, &'static str) {
	(ACCEPT, "application/json")
}

/// Sends `request` through `transport` and returns the response body.
pub async fn send(transport: &dyn HttpTransport, request: HttpRequest) -> Result<Vec<u8>> {
	crate::obs::trace_request(request.method(), request.uri());

	let response = transport.execute(request).await?;

	Ok(response.into_body())
}

/// Decodes a JSON body into `T`, reporting the failing path on error.
pub fn decode_json<T>(body: &[u8]) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| Error::ResponseParse { source })
}

/// Decodes a JSON body leniently: anything that is not JSON becomes a JSON string.
///
/// Token endpoints that answer with HTML or plain text still yield a value the caller can attach
/// to diagnostics.
pub fn decode_lenient(body: &[u8]) -> Value {
	serde_json::from_slice(body)
		.unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Parses a URL, tagging failures with the offending text.
pub fn parse_url(raw: &str) -> Result<Url> {
	Url::parse(raw).map_err(|source| ConfigError::invalid_url(raw, source).into())
}

fn build(
	method: Method,
	url: &Url,
	headers: &[(HeaderName, &str)],
	body: Vec<u8>,
) -> Result<HttpRequest> {
	let mut builder = Request::builder().method(method).uri(url.as_str());

	for (name, value) in headers {
		builder = builder.header(name, *value);
	}

	builder.body(body).map_err(|e| ConfigError::from(e).into())
}
