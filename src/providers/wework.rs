//! WeWork (WeChat Work) web authorization and QR-code SSO.
//!
//! WeWork has no code exchange: the caller obtains a corp access token out of band and presets it
//! with [`ProviderExt::with_access_token`](crate::provider::ProviderExt::with_access_token). The
//! callback code is then resolved to a member through `getuserinfo`.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, UserProfile},
	callback::Callback,
	http,
	provider::{Credentials, Provider, ProviderCore, ProviderFuture, ProviderServices},
};

const OAUTH_URL: &str = "https://open.weixin.qq.com/connect/oauth2/authorize";
const QR_CONNECT_URL: &str = "https://open.work.weixin.qq.com/wwopen/sso/qrConnect";
const USER_INFO_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin/user/getuserinfo";
const USER_DETAIL_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin/user/getuserdetail";

/// WeWork provider.
#[derive(Debug)]
pub struct WeWork {
	core: ProviderCore,
	agent_id: Option<String>,
	detailed: bool,
}
impl WeWork {
	/// Driver name.
	pub const NAME: &'static str = "wework";

	/// Creates the provider. Without scopes it produces the QR-code SSO URL.
	pub fn new(credentials: Credentials, services: ProviderServices) -> Self {
		Self { core: ProviderCore::new(Self::NAME, credentials, services), agent_id: None, detailed: false }
	}

	/// Sets the application `agentid`.
	pub fn agent(&mut self, agent_id: impl Into<String>) -> &mut Self {
		self.agent_id = Some(agent_id.into());

		self
	}

	/// Fetches the member detail when the basic lookup returns a `user_ticket`.
	pub fn detailed(&mut self) -> &mut Self {
		self.detailed = true;

		self
	}

	/// Configured `agentid`, if any.
	pub fn agent_id(&self) -> Option<&str> {
		self.agent_id.as_deref()
	}

	fn oauth_url(&self, state: Option<&str>) -> Result<Url> {
		let mut pairs = vec![
			("appid".to_owned(), self.core.client_id().to_owned()),
			("redirect_uri".to_owned(), self.core.redirect_uri().to_owned()),
			("response_type".to_owned(), "code".to_owned()),
			("scope".to_owned(), self.core.scope_string()),
		];

		if let Some(agent_id) = &self.agent_id {
			pairs.push(("agentid".to_owned(), agent_id.clone()));
		}

		let mut url = self.url_with(OAUTH_URL, pairs, state)?;

		url.set_fragment(Some("wechat_redirect"));

		Ok(url)
	}

	fn qr_connect_url(&self, state: Option<&str>) -> Result<Url> {
		let mut pairs = vec![("appid".to_owned(), self.core.client_id().to_owned())];

		if let Some(agent_id) = &self.agent_id {
			pairs.push(("agentid".to_owned(), agent_id.clone()));
		}

		pairs.push(("redirect_uri".to_owned(), self.core.redirect_uri().to_owned()));

		self.url_with(QR_CONNECT_URL, pairs, state)
	}

	// Caller parameters are merged before `state`, which always comes last.
	fn url_with(
		&self,
		base: &str,
		mut pairs: Vec<(String, String)>,
		state: Option<&str>,
	) -> Result<Url> {
		let mut url = http::parse_url(base)?;

		super::merge_parameters(&mut pairs, &self.core);

		if let Some(state) = state {
			pairs.push(("state".to_owned(), state.to_owned()));
		}

		url.query_pairs_mut().extend_pairs(pairs);

		Ok(url)
	}

	async fn user_detail(&self, token: &AccessToken, ticket: &str) -> Result<Attributes> {
		let mut url = http::parse_url(USER_DETAIL_URL)?;

		url.query_pairs_mut().append_pair("access_token", token.secret());

		let form = BTreeMap::from([("user_ticket".to_owned(), ticket.to_owned())]);
		let request = http::post_form(&url, &form, &[http::accept_json()])?;
		let body = http::send(self.core.http_client(), request).await?;

		http::decode_json(&body)
	}
}
impl Provider for WeWork {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut ProviderCore {
		&mut self.core
	}

	fn auth_url(&self, state: Option<&str>) -> Result<Url> {
		if self.core.scopes.is_empty() { self.qr_connect_url(state) } else { self.oauth_url(state) }
	}

	fn token_url(&self) -> Option<String> {
		None
	}

	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		callback: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes> {
		Box::pin(async move {
			let url = http::parse_url(USER_INFO_URL)?;
			let mut query = vec![("access_token", token.secret())];

			if let Some(code) = callback.and_then(Callback::code) {
				query.push(("code", code));
			}

			let request = http::get(&url, &query, &[])?;
			let body = http::send(self.core.http_client(), request).await?;
			let info: Attributes = http::decode_json(&body)?;

			match info.get_string("user_ticket") {
				Some(ticket) if self.detailed => self.user_detail(token, &ticket).await,
				_ => Ok(info),
			}
		})
	}

	fn map_user(&self, raw: &Attributes) -> UserProfile {
		if self.detailed && raw.contains("userid") {
			return UserProfile {
				id: raw.get_string("userid"),
				name: raw.get_string("name"),
				avatar: raw.get_string("avatar"),
				email: raw.get_string("email"),
				..Default::default()
			};
		}

		let user_id = raw.get_string("UserId").filter(|id| !id.is_empty());
		let open_id = raw.get_string("OpenId").filter(|id| !id.is_empty());

		UserProfile { id: user_id.clone().or_else(|| open_id.clone()), ..Default::default() }
			.with_extra("userId", user_id)
			.with_extra("openid", open_id)
			.with_extra("deviceId", raw.get_string("DeviceId").filter(|id| !id.is_empty()))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, auth::ScopeList, provider::ProviderExt};

	fn wework(transport: &StubTransport) -> WeWork {
		let (services, _) = stub_services(transport);

		WeWork::new(Credentials::new("corp-1", "corp-secret", "https://app.example.com/cb"), services)
	}

	#[test]
	fn scopes_choose_between_oauth_and_qr_connect() {
		let mut provider = wework(&StubTransport::default());

		provider.agent("1000002").stateless();

		let qr = provider.redirect(None).expect("QR URL should build.");

		assert_eq!(
			qr.as_str(),
			"https://open.work.weixin.qq.com/wwopen/sso/qrConnect?appid=corp-1&agentid=1000002&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb"
		);

		let oauth = provider
			.with_scopes(ScopeList::from_static(&["snsapi_privateinfo"]))
			.redirect(None)
			.expect("OAuth URL should build.");

		assert!(oauth.as_str().starts_with(OAUTH_URL));
		assert!(oauth.as_str().contains("agentid=1000002"));
		assert_eq!(oauth.fragment(), Some("wechat_redirect"));
	}

	#[test]
	fn caller_parameters_reach_both_urls() {
		let mut provider = wework(&StubTransport::default());

		provider
			.agent("1000002")
			.with_parameters(BTreeMap::from([
				("lang".to_owned(), "en".to_owned()),
				("agentid".to_owned(), "1000003".to_owned()),
			]));

		let qr = provider.redirect(None).expect("QR URL should build.");
		let last_key = qr.query_pairs().last().map(|(k, _)| k.into_owned());

		assert_eq!(
			qr.query_pairs().find(|(k, _)| k == "lang").map(|(_, v)| v.into_owned()).as_deref(),
			Some("en")
		);
		assert_eq!(qr.query_pairs().filter(|(k, _)| k == "agentid").count(), 1);
		assert!(qr.as_str().contains("agentid=1000003"));
		assert_eq!(last_key.as_deref(), Some("state"));

		let oauth = provider
			.stateless()
			.with_scopes(ScopeList::from_static(&["snsapi_base"]))
			.redirect(None)
			.expect("OAuth URL should build.");

		assert!(oauth.as_str().contains("lang=en"));
		assert_eq!(oauth.fragment(), Some("wechat_redirect"));
	}

	#[tokio::test]
	async fn missing_corp_token_fails_without_http() {
		let transport = StubTransport::default();
		let mut provider = wework(&transport);
		let err = provider
			.stateless()
			.user(&Callback::new(Some("ww-code"), None::<String>))
			.await
			.expect_err("WeWork cannot exchange codes.");

		assert!(matches!(err, Error::InvalidArgument { .. }));
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn basic_lookup_maps_member_ids() {
		let transport = StubTransport::default().respond(
			"/cgi-bin/user/getuserinfo",
			r#"{"errcode":0,"UserId":"zhangsan","DeviceId":"dev-1","user_ticket":"tk"}"#,
		);
		let mut provider = wework(&transport);
		let user = provider
			.stateless()
			.with_access_token(AccessToken::new("corp-t"))
			.user(&Callback::new(Some("ww-code"), None::<String>))
			.await
			.expect("Flow should complete.");
		let query = transport.requests_to("/cgi-bin/user/getuserinfo")[0].query_pairs();

		assert_eq!(query["access_token"], "corp-t");
		assert_eq!(query["code"], "ww-code");
		assert_eq!(user.id(), Some("zhangsan"));
		assert_eq!(user.extra("userId"), Some(&Value::String("zhangsan".into())));
		assert_eq!(user.extra("deviceId"), Some(&Value::String("dev-1".into())));
		assert_eq!(user.extra("openid"), None);
		assert!(transport.requests_to("/cgi-bin/user/getuserdetail").is_empty());
	}

	#[tokio::test]
	async fn detailed_lookup_follows_the_ticket() {
		let transport = StubTransport::default()
			.respond("/cgi-bin/user/getuserinfo", r#"{"UserId":"zhangsan","user_ticket":"tk-1"}"#)
			.respond(
				"/cgi-bin/user/getuserdetail",
				r#"{"userid":"zhangsan","name":"张三","avatar":"https://w/a.png","email":"zs@corp.cn"}"#,
			);
		let mut provider = wework(&transport);

		provider.detailed().stateless().with_access_token(AccessToken::new("corp-t"));

		let user = provider
			.user(&Callback::new(Some("ww-code"), None::<String>))
			.await
			.expect("Flow should complete.");
		let detail = &transport.requests_to("/cgi-bin/user/getuserdetail")[0];

		assert_eq!(detail.query_pairs()["access_token"], "corp-t");
		assert_eq!(detail.form_pairs()["user_ticket"], "tk-1");
		assert_eq!(user.id(), Some("zhangsan"));
		assert_eq!(user.name(), Some("张三"));
		assert_eq!(user.email(), Some("zs@corp.cn"));
	}

	#[tokio::test]
	async fn detailed_without_ticket_uses_basic_mapping() {
		let transport = StubTransport::default()
			.respond("/cgi-bin/user/getuserinfo", r#"{"OpenId":"outsider","DeviceId":""}"#);
		let mut provider = wework(&transport);

		provider.detailed().stateless().with_access_token(AccessToken::new("corp-t"));

		let user = provider
			.user(&Callback::new(Some("ww-code"), None::<String>))
			.await
			.expect("Flow should complete.");

		assert_eq!(user.id(), Some("outsider"));
		assert_eq!(user.extra("openid"), Some(&Value::String("outsider".into())));
		assert_eq!(user.extra("deviceId"), None);
	}
}
