//! Douban.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, UserProfile},
	callback::Callback,
	provider::{Credentials, Provider, ProviderCore, ProviderFuture, ProviderServices},
	providers,
};

const AUTHORIZE_URL: &str = "https://www.douban.com/service/auth2/auth";
const TOKEN_URL: &str = "https://www.douban.com/service/auth2/token";
const USER_URL: &str = "https://api.douban.com/v2/user/~me";

/// Douban provider; requests no scopes by default.
#[derive(Debug)]
pub struct Douban {
	core: ProviderCore,
}
impl Douban {
	/// Driver name.
	pub const NAME: &'static str = "douban";

	/// Creates the provider.
	pub fn new(credentials: Credentials, services: ProviderServices) -> Self {
		Self { core: ProviderCore::new(Self::NAME, credentials, services) }
	}
}
impl Provider for Douban {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut ProviderCore {
		&mut self.core
	}

	fn auth_url(&self, state: Option<&str>) -> Result<Url> {
		self.build_auth_url_from_base(AUTHORIZE_URL, state)
	}

	fn token_url(&self) -> Option<String> {
		Some(TOKEN_URL.into())
	}

	fn token_fields(&self, code: &str) -> BTreeMap<String, String> {
		providers::with_grant_type(self.core.token_fields(code))
	}

	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		_: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes> {
		Box::pin(providers::fetch_bearer_json(&self.core, USER_URL, token))
	}

	fn map_user(&self, raw: &Attributes) -> UserProfile {
		UserProfile {
			id: raw.get_string("id"),
			nickname: raw.get_string("name"),
			name: raw.get_string("name"),
			avatar: raw.get_string("large_avatar"),
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::*;

	#[tokio::test]
	async fn exchange_adds_grant_type_and_profile_uses_bearer() {
		let transport = StubTransport::default()
			.respond("/service/auth2/token", r#"{"access_token":"db-t","douban_user_id":"42"}"#)
			.respond("/v2/user/~me", r#"{"id":"42","name":"阿北","large_avatar":"https://img/42.jpg"}"#);
		let (services, session) = stub_services(&transport);
		let mut provider =
			Douban::new(Credentials::new("db-id", "db-secret", "https://app.example.com/cb"), services);
		let url = provider.redirect(None).expect("Authorization URL should build.");

		assert!(url.as_str().starts_with(AUTHORIZE_URL));
		assert!(url.as_str().contains("scope=&"));

		let state = crate::session::SessionStore::get(&session, crate::session::STATE_KEY);
		let user = provider
			.user(&Callback::new(Some("db-code"), state))
			.await
			.expect("Flow should complete.");

		assert_eq!(transport.requests_to("/service/auth2/token")[0].form_pairs()["grant_type"], "authorization_code");
		assert_eq!(transport.requests_to("/v2/user/~me")[0].header("authorization"), Some("Bearer db-t"));
		assert_eq!(user.id(), Some("42"));
		assert_eq!(user.name(), Some("阿北"));
		assert_eq!(user.avatar(), Some("https://img/42.jpg"));
		assert_eq!(user.email(), None);
	}
}
