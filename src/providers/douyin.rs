//! DouYin open platform.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, ScopeList, UserProfile},
	callback::Callback,
	http,
	provider::{
		Credentials, Provider, ProviderCore, ProviderFuture, ProviderQuirks, ProviderServices,
		TokenMethod,
	},
	providers,
};

const BASE_URL: &str = "https://open.douyin.com";

/// DouYin provider.
///
/// Identifies the client as `client_key` and wraps token responses in a `data` envelope.
#[derive(Debug)]
pub struct DouYin {
	core: ProviderCore,
}
impl DouYin {
	/// Driver name.
	pub const NAME: &'static str = "douyin";

	/// Creates the provider requesting `user_info`.
	pub fn new(credentials: Credentials, services: ProviderServices) -> Self {
		Self {
			core: ProviderCore::new(Self::NAME, credentials, services)
				.with_scopes(ScopeList::from_static(&["user_info"]))
				.with_quirks(ProviderQuirks::default().with_token_method(TokenMethod::Get)),
		}
	}
}
impl Provider for DouYin {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut ProviderCore {
		&mut self.core
	}

	fn auth_url(&self, state: Option<&str>) -> Result<Url> {
		self.build_auth_url_from_base(&format!("{BASE_URL}/platform/oauth/connect"), state)
	}

	fn code_fields(&self, state: Option<&str>) -> BTreeMap<String, String> {
		providers::client_key_code_fields(&self.core, state)
	}

	fn token_url(&self) -> Option<String> {
		Some(format!("{BASE_URL}/oauth/access_token"))
	}

	fn token_fields(&self, code: &str) -> BTreeMap<String, String> {
		BTreeMap::from([
			("client_key".to_owned(), self.core.client_id().to_owned()),
			("client_secret".to_owned(), self.core.client_secret().to_owned()),
			("code".to_owned(), code.to_owned()),
			("grant_type".to_owned(), "authorization_code".to_owned()),
		])
	}

	fn parse_access_token(&self, body: &[u8]) -> Result<AccessToken> {
		let response = Attributes::new(http::decode_lenient(body));
		let data = response.get_nested("data");

		if data.get_string(AccessToken::TOKEN_FIELD).is_none_or(|token| token.is_empty()) {
			return Err(Error::AuthorizationFailed { body: response.into_value() });
		}

		AccessToken::from_response(data)
	}

	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		_: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes> {
		Box::pin(async move {
			let open_id = token
				.attribute_string("open_id")
				.filter(|open_id| !open_id.is_empty())
				.ok_or_else(|| Error::invalid_argument("open_id of the access token is required"))?;
			let url = http::parse_url(&format!("{BASE_URL}/oauth/userinfo/"))?;
			let request =
				http::get(&url, &[("access_token", token.secret()), ("open_id", open_id.as_str())], &[])?;
			let body = http::send(self.core.http_client(), request).await?;

			http::decode_json(&body)
		})
	}

	fn map_user(&self, raw: &Attributes) -> UserProfile {
		UserProfile {
			id: raw.get_string("open_id"),
			username: raw.get_string("nickname"),
			nickname: raw.get_string("nickname"),
			avatar: raw.get_string("avatar"),
			..Default::default()
		}
	}
}
