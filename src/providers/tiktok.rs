//! TikTok Login Kit (v2 API).

// crates.io
use oauth2::http::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, ScopeList, UserProfile},
	callback::Callback,
	http,
	provider::{Credentials, Provider, ProviderCore, ProviderFuture, ProviderServices},
	providers,
};

const AUTHORIZE_URL: &str = "https://www.tiktok.com/v2/auth/authorize/";
const TOKEN_URL: &str = "https://open.tiktokapis.com/v2/oauth/token/";
const USER_URL: &str = "https://open.tiktokapis.com/v2/user/info/";
const USER_FIELDS: &str = "open_id,union_id,avatar_url,display_name";

/// TikTok provider; the profile payload is nested under `data.user`.
#[derive(Debug)]
pub struct TikTok {
	core: ProviderCore,
}
impl TikTok {
	/// Driver name.
	pub const NAME: &'static str = "tiktok";

	/// Creates the provider requesting `user.info.basic`.
	pub fn new(credentials: Credentials, services: ProviderServices) -> Self {
		Self {
			core: ProviderCore::new(Self::NAME, credentials, services)
				.with_scopes(ScopeList::from_static(&["user.info.basic"])),
		}
	}
}
impl Provider for TikTok {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut ProviderCore {
		&mut self.core
	}

	fn auth_url(&self, state: Option<&str>) -> Result<Url> {
		self.build_auth_url_from_base(AUTHORIZE_URL, state)
	}

	fn code_fields(&self, state: Option<&str>) -> BTreeMap<String, String> {
		providers::client_key_code_fields(&self.core, state)
	}

	fn token_url(&self) -> Option<String> {
		Some(TOKEN_URL.into())
	}

	fn token_fields(&self, code: &str) -> BTreeMap<String, String> {
		BTreeMap::from([
			("client_key".to_owned(), self.core.client_id().to_owned()),
			("client_secret".to_owned(), self.core.client_secret().to_owned()),
			("code".to_owned(), code.to_owned()),
			("grant_type".to_owned(), "authorization_code".to_owned()),
			("redirect_uri".to_owned(), self.core.redirect_uri().to_owned()),
		])
	}

	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		_: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes> {
		Box::pin(async move {
			let url = http::parse_url(USER_URL)?;
			let bearer = format!("Bearer {}", token.secret());
			let request = http::get(
				&url,
				&[("fields", USER_FIELDS)],
				&[(AUTHORIZATION, bearer.as_str()), http::accept_json()],
			)?;
			let body = http::send(self.core.http_client(), request).await?;

			http::decode_json(&body)
		})
	}

	fn map_user(&self, raw: &Attributes) -> UserProfile {
		let user = raw.get_nested("data.user");

		UserProfile {
			id: user.get_string("open_id"),
			username: user.get_string("display_name"),
			nickname: user.get_string("display_name"),
			avatar: user.get_string("avatar_url"),
			..Default::default()
		}
	}
}
