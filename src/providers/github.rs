//! GitHub OAuth apps.

// crates.io
use oauth2::http::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, ScopeList, UserProfile},
	callback::Callback,
	http,
	provider::{Credentials, Provider, ProviderCore, ProviderFuture, ProviderServices},
};

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const EMAILS_URL: &str = "https://api.github.com/user/emails";
const EMAIL_SCOPE: &str = "user:email";
const API_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// GitHub provider; requests `user:email` by default.
#[derive(Debug)]
pub struct GitHub {
	core: ProviderCore,
}
impl GitHub {
	/// Driver name.
	pub const NAME: &'static str = "github";

	/// Creates the provider with default scopes.
	pub fn new(credentials: Credentials, services: ProviderServices) -> Self {
		Self {
			core: ProviderCore::new(Self::NAME, credentials, services)
				.with_scopes(ScopeList::from_static(&[EMAIL_SCOPE])),
		}
	}

	async fn get(&self, url: &str, token: &AccessToken) -> Result<Vec<u8>> {
		let url = http::parse_url(url)?;
		let authorization = format!("token {}", token.secret());
		let request = http::get(
			&url,
			&[],
			&[
				(ACCEPT, API_MEDIA_TYPE),
				(AUTHORIZATION, authorization.as_str()),
				(USER_AGENT, env!("CARGO_PKG_NAME")),
			],
		)?;

		http::send(self.core.http_client(), request).await
	}

	/// First primary and verified address; any failure yields `None`.
	async fn primary_email(&self, token: &AccessToken) -> Option<String> {
		#[derive(Deserialize)]
		struct Email {
			#[serde(default)]
			email: Option<String>,
			#[serde(default)]
			primary: bool,
			#[serde(default)]
			verified: bool,
		}

		let body = self.get(EMAILS_URL, token).await.ok()?;
		let emails = http::decode_json::<Vec<Email>>(&body).ok()?;

		emails.into_iter().find(|e| e.primary && e.verified).and_then(|e| e.email)
	}
}
impl Provider for GitHub {
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

	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		_: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes> {
		Box::pin(async move {
			let body = self.get(USER_URL, token).await?;
			let mut user: Attributes = http::decode_json(&body)?;

			if self.core.has_scope(EMAIL_SCOPE) {
				let email = self.primary_email(token).await;

				user.insert("email", email.map(Value::String).unwrap_or(Value::Null));
			}

			Ok(user)
		})
	}

	fn map_user(&self, raw: &Attributes) -> UserProfile {
		UserProfile {
			id: raw.get_string("id"),
			username: raw.get_string("login"),
			nickname: raw.get_string("login"),
			name: raw.get_string("name"),
			email: raw.get_string("email"),
			avatar: raw.get_string("avatar_url"),
			..Default::default()
		}
	}
}
