//! WeChat open-platform website login, including third-party components.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, ScopeList, TokenSecret, UserProfile},
	callback::Callback,
	http,
	provider::{
		Credentials, Provider, ProviderCore, ProviderFuture, ProviderQuirks, ProviderServices,
		TokenMethod, state,
	},
};

const CONNECT_BASE: &str = "https://open.weixin.qq.com/connect";
const API_BASE: &str = "https://api.weixin.qq.com/sns";
const LOGIN_SCOPE: &str = "snsapi_login";
const BASE_SCOPE: &str = "snsapi_base";
const FRAGMENT: &str = "wechat_redirect";
const DEFAULT_LANG: &str = "zh_CN";

/// Third-party platform component acting on behalf of an official account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeChatComponent {
	/// Component `appid`.
	pub app_id: String,
	/// Component access token.
	pub access_token: TokenSecret,
}
impl WeChatComponent {
	/// Creates a component descriptor.
	pub fn new(app_id: impl Into<String>, access_token: impl Into<String>) -> Self {
		Self { app_id: app_id.into(), access_token: TokenSecret::new(access_token) }
	}
}

/// WeChat provider.
///
/// Stateless by default: WeChat echoes whatever `state` it receives, so a random value is sent
/// when no CSRF state was issued. Token requests use GET.
#[derive(Debug)]
pub struct WeChat {
	core: ProviderCore,
	component: Option<WeChatComponent>,
	with_country_code: bool,
}
impl WeChat {
	/// Driver name.
	pub const NAME: &'static str = "wechat";

	/// Creates the provider with the QR-code login scope.
	pub fn new(credentials: Credentials, services: ProviderServices) -> Self {
		let core = ProviderCore::new(Self::NAME, credentials, services)
			.with_scopes(ScopeList::from_static(&[LOGIN_SCOPE]))
			.with_quirks(ProviderQuirks::default().with_token_method(TokenMethod::Get))
			.with_stateless(true);

		Self { core, component: None, with_country_code: false }
	}

	/// Acts through a third-party component; switches the scopes to `snsapi_base`.
	pub fn with_component(&mut self, component: WeChatComponent) -> &mut Self {
		self.core.scopes = ScopeList::from_static(&[BASE_SCOPE]);
		self.component = Some(component);

		self
	}

	/// Asks the profile endpoint for country codes instead of localized names.
	pub fn with_country_code(&mut self) -> &mut Self {
		self.with_country_code = true;

		self
	}

	/// Configured component, if any.
	pub fn component(&self) -> Option<&WeChatComponent> {
		self.component.as_ref()
	}
}
impl Provider for WeChat {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut ProviderCore {
		&mut self.core
	}

	fn auth_url(&self, state: Option<&str>) -> Result<Url> {
		let path = if self.core.has_scope(LOGIN_SCOPE) { "qrconnect" } else { "oauth2/authorize" };

		self.build_auth_url_from_base(&format!("{CONNECT_BASE}/{path}"), state)
	}

	fn code_fields(&self, state: Option<&str>) -> BTreeMap<String, String> {
		let mut fields = BTreeMap::from([
			("appid".to_owned(), self.core.client_id().to_owned()),
			("redirect_uri".to_owned(), self.core.redirect_uri().to_owned()),
			("response_type".to_owned(), "code".to_owned()),
			("scope".to_owned(), self.core.scope_string()),
			("state".to_owned(), state.map_or_else(state::generate, ToOwned::to_owned)),
			("connect_redirect".to_owned(), "1".to_owned()),
		]);

		if let Some(component) = &self.component {
			fields.insert("component_appid".to_owned(), component.app_id.clone());
		}

		fields.extend(self.core.parameters.clone());

		fields
	}

	fn build_auth_url_from_base(&self, base: &str, state: Option<&str>) -> Result<Url> {
		let mut url = http::parse_url(base)?;

		url.query_pairs_mut().extend_pairs(self.code_fields(state));
		url.set_fragment(Some(FRAGMENT));

		Ok(url)
	}

	fn token_url(&self) -> Option<String> {
		Some(match self.component {
			Some(_) => format!("{API_BASE}/oauth2/component/access_token"),
			None => format!("{API_BASE}/oauth2/access_token"),
		})
	}

	fn token_fields(&self, code: &str) -> BTreeMap<String, String> {
		let mut fields = BTreeMap::from([
			("appid".to_owned(), self.core.client_id().to_owned()),
			("code".to_owned(), code.to_owned()),
			("grant_type".to_owned(), "authorization_code".to_owned()),
		]);

		if !self.core.credentials.client_secret.is_empty() {
			fields.insert("secret".to_owned(), self.core.client_secret().to_owned());
		}
		if let Some(component) = &self.component {
			fields.insert("component_appid".to_owned(), component.app_id.clone());
			fields.insert(
				"component_access_token".to_owned(),
				component.access_token.expose().to_owned(),
			);
		}

		fields
	}

	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		_: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes> {
		Box::pin(async move {
			let granted = token.attribute_string("scope").unwrap_or_default();

			if granted.split(',').any(|scope| scope == BASE_SCOPE) {
				return Ok(token.attributes().clone());
			}

			let openid = token
				.attribute_string("openid")
				.filter(|openid| !openid.is_empty())
				.ok_or_else(|| Error::invalid_argument("openid of the access token is required"))?;
			let lang = (!self.with_country_code)
				.then(|| self.core.parameter("lang").unwrap_or(DEFAULT_LANG));
			let mut query = vec![("access_token", token.secret()), ("openid", openid.as_str())];

			if let Some(lang) = lang {
				query.push(("lang", lang));
			}

			let url = http::parse_url(&format!("{API_BASE}/userinfo"))?;
			let request = http::get(&url, &query, &[])?;
			let body = http::send(self.core.http_client(), request).await?;

			http::decode_json(&body)
		})
	}

	fn map_user(&self, raw: &Attributes) -> UserProfile {
		UserProfile {
			id: raw.get_string("openid"),
			nickname: raw.get_string("nickname"),
			name: raw.get_string("nickname"),
			avatar: raw.get_string("headimgurl"),
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		provider::ProviderExt,
		session::{STATE_KEY, SessionStore},
	};

	fn wechat(transport: &StubTransport) -> (WeChat, Arc<crate::session::MemorySession>) {
		let (services, session) = stub_services(transport);

		(WeChat::new(Credentials::new("wx-app", "wx-secret", "https://app.example.com/cb"), services), session)
	}

	#[test]
	fn qr_login_url_carries_random_state_and_fragment() {
		let (mut provider, session) = wechat(&StubTransport::default());
		let url = provider.redirect(None).expect("Authorization URL should build.");
		let query = url.query_pairs().into_owned().collect::<HashMap<_, _>>();

		assert_eq!(url.path(), "/connect/qrconnect");
		assert_eq!(url.fragment(), Some("wechat_redirect"));
		assert_eq!(query["appid"], "wx-app");
		assert_eq!(query["scope"], "snsapi_login");
		assert_eq!(query["connect_redirect"], "1");
		assert_eq!(query["state"].len(), 43);
		assert!(session.get(STATE_KEY).is_none());
	}

	#[test]
	fn component_switches_scope_and_token_url() {
		let (mut provider, _) = wechat(&StubTransport::default());

		provider.with_component(WeChatComponent::new("comp-app", "comp-token"));

		let url = provider
			.with_parameters(BTreeMap::from([("lang".to_owned(), "en".to_owned())]))
			.redirect(None)
			.expect("Authorization URL should build.");
		let query = url.query_pairs().into_owned().collect::<HashMap<_, _>>();

		assert_eq!(url.path(), "/connect/oauth2/authorize");
		assert_eq!(query["scope"], "snsapi_base");
		assert_eq!(query["component_appid"], "comp-app");
		assert_eq!(query["lang"], "en");
		assert_eq!(
			provider.token_url().as_deref(),
			Some("https://api.weixin.qq.com/sns/oauth2/component/access_token")
		);
		assert_eq!(provider.token_fields("c")["component_access_token"], "comp-token");
	}

	#[tokio::test]
	async fn code_exchange_uses_get_and_fetches_userinfo() {
		let transport = StubTransport::default()
			.respond(
				"/sns/oauth2/access_token",
				r#"{"access_token":"wx-t","openid":"oid-1","scope":"snsapi_login"}"#,
			)
			.respond("/sns/userinfo", r#"{"openid":"oid-1","nickname":"小明","headimgurl":"https://h/1"}"#);
		let (provider, _) = wechat(&transport);
		let user = provider
			.user(&Callback::new(Some("wx-code"), None::<String>))
			.await
			.expect("Flow should complete.");
		let exchange = &transport.requests_to("/sns/oauth2/access_token")[0];
		let userinfo = transport.requests_to("/sns/userinfo")[0].query_pairs();

		assert_eq!(exchange.method, oauth2::http::Method::GET);
		assert_eq!(exchange.query_pairs()["secret"], "wx-secret");
		assert_eq!(exchange.query_pairs()["grant_type"], "authorization_code");
		assert_eq!(userinfo["openid"], "oid-1");
		assert_eq!(userinfo["lang"], "zh_CN");
		assert_eq!(user.id(), Some("oid-1"));
		assert_eq!(user.nickname(), Some("小明"));
		assert_eq!(user.avatar(), Some("https://h/1"));
	}

	#[tokio::test]
	async fn base_scope_and_missing_openid() {
		let transport = StubTransport::default();
		let (mut provider, _) = wechat(&transport);
		let token = AccessToken::new("t").with_attribute("openid", json!("oid-2")).with_attribute(
			"scope",
			json!("snsapi_base"),
		);
		let user = provider.user_from_token(token).await.expect("Base scope needs no profile call.");

		assert_eq!(user.id(), Some("oid-2"));
		assert!(transport.requests().is_empty());

		let err = provider
			.with_country_code()
			.user_from_token(AccessToken::new("t"))
			.await
			.expect_err("Tokens without openid must be rejected.");

		assert!(matches!(err, Error::InvalidArgument { .. }));
	}
}
