//! Per-instance request configuration embedded by every provider.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ScopeList},
	http::HttpTransport,
	provider::{Credentials, ProviderQuirks, ProviderServices},
	session::SessionStore,
};

/// Per-instance request configuration embedded by every provider.
///
/// Scopes, parameters, the stateless flag, and the redirect URI are mutable between calls; the
/// fluent setters on [`ProviderExt`](crate::provider::ProviderExt) write here.
#[derive(Clone, Debug)]
pub struct ProviderCore {
	/// Driver name reported on normalized users.
	pub name: String,
	/// Client credentials; `redirect_uri` may be replaced per request.
	pub credentials: Credentials,
	/// Requested scopes in insertion order.
	pub scopes: ScopeList,
	/// Extra authorization query parameters.
	pub parameters: BTreeMap<String, String>,
	/// Disables CSRF state issuance and verification.
	pub stateless: bool,
	/// Wire-format differences honored by the shared steps.
	pub quirks: ProviderQuirks,
	/// Injected transport and session.
	pub services: ProviderServices,
	/// Token used instead of a code exchange.
	pub access_token: Option<AccessToken>,
}
impl ProviderCore {
	/// Creates a stateful core without scopes.
	pub fn new(name: impl Into<String>, credentials: Credentials, services: ProviderServices) -> Self {
		Self {
			name: name.into(),
			credentials,
			scopes: ScopeList::default(),
			parameters: BTreeMap::new(),
			stateless: false,
			quirks: ProviderQuirks::default(),
			services,
			access_token: None,
		}
	}

	/// Sets the default scopes.
	pub fn with_scopes(mut self, scopes: ScopeList) -> Self {
		self.scopes = scopes;

		self
	}

	/// Sets the wire-format quirks.
	pub fn with_quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Sets the initial stateless flag.
	pub fn with_stateless(mut self, stateless: bool) -> Self {
		self.stateless = stateless;

		self
	}

	/// Client identifier.
	pub fn client_id(&self) -> &str {
		&self.credentials.client_id
	}

	/// Client secret.
	pub fn client_secret(&self) -> &str {
		self.credentials.client_secret.expose()
	}

	/// Current redirect URI.
	pub fn redirect_uri(&self) -> &str {
		&self.credentials.redirect_uri
	}

	/// Scopes joined with the provider's separator.
	pub fn scope_string(&self) -> String {
		self.scopes.join(self.quirks.scope_separator.encode_utf8(&mut [0; 4]))
	}

	/// Returns true when `scope` is requested.
	pub fn has_scope(&self, scope: &str) -> bool {
		self.scopes.contains(scope)
	}

	/// Extra parameter value, if set.
	pub fn parameter(&self, key: &str) -> Option<&str> {
		self.parameters.get(key).map(String::as_str)
	}

	/// Standard authorization query fields.
	///
	/// `client_id`, `redirect_uri`, `scope`, and `response_type=code`, overlaid by the extra
	/// parameters, plus `state` when one was issued.
	pub fn code_fields(&self, state: Option<&str>) -> BTreeMap<String, String> {
		let mut fields = BTreeMap::from([
			("client_id".to_owned(), self.client_id().to_owned()),
			("redirect_uri".to_owned(), self.redirect_uri().to_owned()),
			("scope".to_owned(), self.scope_string()),
			("response_type".to_owned(), "code".to_owned()),
		]);

		fields.extend(self.parameters.clone());

		if let Some(state) = state {
			fields.insert("state".to_owned(), state.to_owned());
		}

		fields
	}

	/// Standard token request fields.
	pub fn token_fields(&self, code: &str) -> BTreeMap<String, String> {
		BTreeMap::from([
			("client_id".to_owned(), self.client_id().to_owned()),
			("client_secret".to_owned(), self.client_secret().to_owned()),
			("code".to_owned(), code.to_owned()),
			("redirect_uri".to_owned(), self.redirect_uri().to_owned()),
		])
	}

	/// Shared transport.
	pub fn http_client(&self) -> &dyn HttpTransport {
		&*self.services.http_client
	}

	/// Shared session store.
	pub fn session(&self) -> &dyn SessionStore {
		&*self.services.session
	}
}
