//! Provider contract and the shared authorization-code workflow.
//!
//! Each identity source implements [`Provider`] by supplying four hooks (authorization URL, token
//! URL, raw profile fetch, and profile mapping) and inherits the rest: CSRF state handling, the
//! code exchange, and normalization. Shared steps are default methods so a provider overrides only
//! the step whose wire format differs (WeChat's GET token request, DouYin's `data` envelope).
//!
//! [`ProviderCore`] carries the per-instance request configuration and [`ProviderExt`] exposes the
//! fluent setters on both concrete providers and `dyn Provider`.

pub mod base;
pub mod credentials;
pub mod quirks;
pub mod services;
pub mod state;

pub use base::*;
pub use credentials::*;
pub use quirks::*;
pub use services::*;

// std
use std::any::Any;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, NormalizedUser, ScopeList, UserProfile},
	callback::Callback,
	http,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Boxed future returned by provider network steps.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// An identity source speaking the authorization-code flow.
///
/// Implementors must be `Send + Sync + 'static` so managers can share them behind an async mutex
/// and hand them out as `Box<dyn Provider>`.
pub trait Provider
where
	Self: 'static + Any + Send + Sync + Debug,
{
	/// Embedded request configuration.
	fn core(&self) -> &ProviderCore;

	/// Mutable access to the embedded request configuration.
	fn core_mut(&mut self) -> &mut ProviderCore;

	/// Builds the authorization URL for `state` (`None` when stateless).
	fn auth_url(&self, state: Option<&str>) -> Result<Url>;

	/// Token endpoint, or `None` when the provider cannot exchange codes.
	fn token_url(&self) -> Option<String>;

	/// Fetches the raw profile payload for `token`.
	///
	/// `callback` is present for callback-driven calls; WeWork reads the code from it.
	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		callback: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes>;

	/// Maps a raw profile payload into normalized fields. Must not fail on missing keys.
	fn map_user(&self, raw: &Attributes) -> UserProfile;

	/// Driver name.
	fn name(&self) -> &str {
		&self.core().name
	}

	/// Query fields of the authorization URL.
	fn code_fields(&self, state: Option<&str>) -> BTreeMap<String, String> {
		self.core().code_fields(state)
	}

	/// Appends [`code_fields`](Self::code_fields) to `base`.
	fn build_auth_url_from_base(&self, base: &str, state: Option<&str>) -> Result<Url> {
		let mut url = http::parse_url(base)?;

		url.query_pairs_mut().extend_pairs(self.code_fields(state));

		Ok(url)
	}

	/// Fields sent to the token endpoint.
	fn token_fields(&self, code: &str) -> BTreeMap<String, String> {
		self.core().token_fields(code)
	}

	/// Exchanges `code` at `token_url` using the provider's token method.
	fn exchange_code<'a>(&'a self, token_url: Url, code: &'a str) -> ProviderFuture<'a, AccessToken> {
		Box::pin(async move {
			let fields = self.token_fields(code);
			let request = match self.core().quirks.token_method {
				TokenMethod::Post => http::post_form(&token_url, &fields, &[http::accept_json()])?,
				TokenMethod::Get => {
					let query = fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>();

					http::get(&token_url, &query, &[http::accept_json()])?
				},
			};

			let body = http::send(self.core().http_client(), request).await?;

			self.parse_access_token(&body)
		})
	}

	/// Turns a token endpoint body into an [`AccessToken`].
	fn parse_access_token(&self, body: &[u8]) -> Result<AccessToken> {
		AccessToken::from_response(Attributes::new(http::decode_lenient(body)))
	}

	/// Produces the authorization URL, issuing a CSRF state unless stateless.
	///
	/// An override replaces the stored redirect URI. No network I/O happens here.
	fn redirect(&mut self, redirect_uri: Option<&str>) -> Result<Url> {
		let state = (!self.core().stateless).then(state::generate);

		authorize(self, redirect_uri, state)
	}

	/// Produces the authorization URL carrying a caller-chosen `state`.
	///
	/// The value is stored for callback verification unless the provider is stateless, in which
	/// case it is only sent. An empty `state` can never verify.
	fn redirect_with_state(&mut self, redirect_uri: Option<&str>, state: &str) -> Result<Url> {
		authorize(self, redirect_uri, Some(state.to_owned()))
	}

	/// Completes the flow from the inbound callback.
	///
	/// Verifies the state (unless stateless), obtains a token (preset or exchanged), fetches the
	/// profile, and normalizes it.
	fn user<'a>(&'a self, callback: &'a Callback) -> ProviderFuture<'a, NormalizedUser> {
		Box::pin(async move {
			let core = self.core();

			if !core.stateless {
				state::verify(core.session(), callback)
					.inspect_err(|_| obs::record_state_rejection(self.name()))?;
			}

			let token = obtain_token(self, callback).await?;

			normalize(self, token, Some(callback)).await
		})
	}

	/// Fetches and normalizes the profile for an already-issued token.
	fn user_from_token<'a>(&'a self, token: AccessToken) -> ProviderFuture<'a, NormalizedUser> {
		Box::pin(normalize(self, token, None))
	}
}
impl dyn Provider {
	/// Returns the concrete provider when it is a `P`.
	pub fn downcast_ref<P>(&self) -> Option<&P>
	where
		P: Provider,
	{
		(self as &dyn Any).downcast_ref()
	}

	/// Returns the concrete provider mutably when it is a `P`.
	pub fn downcast_mut<P>(&mut self) -> Option<&mut P>
	where
		P: Provider,
	{
		(self as &mut dyn Any).downcast_mut()
	}
}

/// Fluent request configuration shared by every provider.
pub trait ProviderExt {
	/// Replaces the requested scopes.
	fn with_scopes(&mut self, scopes: ScopeList) -> &mut Self;

	/// Replaces the extra authorization parameters.
	fn with_parameters(&mut self, parameters: BTreeMap<String, String>) -> &mut Self;

	/// Disables CSRF state issuance and verification.
	fn stateless(&mut self) -> &mut Self;

	/// Replaces the redirect URI.
	fn with_redirect_uri(&mut self, redirect_uri: impl Into<String>) -> &mut Self;

	/// Presets the access token so the code exchange is skipped.
	fn with_access_token(&mut self, token: AccessToken) -> &mut Self;
}
impl<P> ProviderExt for P
where
	P: ?Sized + Provider,
{
	fn with_scopes(&mut self, scopes: ScopeList) -> &mut Self {
		self.core_mut().scopes = scopes;

		self
	}

	fn with_parameters(&mut self, parameters: BTreeMap<String, String>) -> &mut Self {
		self.core_mut().parameters = parameters;

		self
	}

	fn stateless(&mut self) -> &mut Self {
		self.core_mut().stateless = true;

		self
	}

	fn with_redirect_uri(&mut self, redirect_uri: impl Into<String>) -> &mut Self {
		self.core_mut().credentials.redirect_uri = redirect_uri.into();

		self
	}

	fn with_access_token(&mut self, token: AccessToken) -> &mut Self {
		self.core_mut().access_token = Some(token);

		self
	}
}

fn authorize<P>(provider: &mut P, redirect_uri: Option<&str>, state: Option<String>) -> Result<Url>
where
	P: ?Sized + Provider,
{
	let _guard = FlowSpan::new(FlowKind::Redirect, provider.name(), "redirect").entered();

	obs::record_flow_outcome(FlowKind::Redirect, provider.name(), FlowOutcome::Attempt);

	if let Some(uri) = redirect_uri {
		provider.core_mut().credentials.redirect_uri = uri.to_owned();
	}

	let core = provider.core();

	if let Some(state) = &state {
		if !core.stateless {
			state::store(core.session(), state);
		}
	}

	obs::observe(FlowKind::Redirect, provider.name(), provider.auth_url(state.as_deref()))
}

async fn obtain_token<P>(provider: &P, callback: &Callback) -> Result<AccessToken>
where
	P: ?Sized + Provider,
{
	if let Some(token) = &provider.core().access_token {
		return Ok(token.to_owned());
	}

	let code = callback
		.code()
		.ok_or_else(|| Error::invalid_argument("callback carries no authorization code"))?;
	let token_url = provider.token_url().ok_or_else(|| {
		Error::invalid_argument(format!(
			"driver `{}` has no token endpoint and needs a preset access token",
			provider.name()
		))
	})?;
	let token_url = http::parse_url(&token_url)?;
	let span = FlowSpan::new(FlowKind::TokenExchange, provider.name(), "obtain_token");

	obs::record_flow_outcome(FlowKind::TokenExchange, provider.name(), FlowOutcome::Attempt);

	let result = span.instrument(provider.exchange_code(token_url, code)).await;

	obs::observe(FlowKind::TokenExchange, provider.name(), result)
}

async fn normalize<P>(
	provider: &P,
	token: AccessToken,
	callback: Option<&Callback>,
) -> Result<NormalizedUser>
where
	P: ?Sized + Provider,
{
	let span = FlowSpan::new(FlowKind::FetchUser, provider.name(), "normalize");

	obs::record_flow_outcome(FlowKind::FetchUser, provider.name(), FlowOutcome::Attempt);

	let raw = span.instrument(provider.fetch_raw_user(&token, callback)).await;
	let raw = obs::observe(FlowKind::FetchUser, provider.name(), raw)?;
	let profile = provider.map_user(&raw);

	Ok(NormalizedUser::new(profile, raw, token, provider.name()))
}
