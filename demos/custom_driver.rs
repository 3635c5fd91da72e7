//! Registers a provider the crate does not ship and resolves it through the manager.

// std
use std::collections::BTreeMap;
// crates.io
use color_eyre::Result;
// self
use oauth2_socialite::{
	auth::{AccessToken, Attributes, ScopeList, UserProfile},
	callback::Callback,
	config::Config,
	error::{ConfigError, Result as DriverResult},
	http,
	manager::Manager,
	oauth2::http::header::AUTHORIZATION,
	provider::{Credentials, Provider, ProviderCore, ProviderFuture},
	url::Url,
};

/// Gitea instance speaking standard OAuth 2.0.
#[derive(Debug)]
struct Gitea {
	core: ProviderCore,
	base: String,
}
impl Provider for Gitea {
	fn core(&self) -> &ProviderCore {
		&self.core
	}

	fn core_mut(&mut self) -> &mut ProviderCore {
		&mut self.core
	}

	fn auth_url(&self, state: Option<&str>) -> DriverResult<Url> {
		self.build_auth_url_from_base(&format!("{}/login/oauth/authorize", self.base), state)
	}

	fn token_url(&self) -> Option<String> {
		Some(format!("{}/login/oauth/access_token", self.base))
	}

	fn token_fields(&self, code: &str) -> BTreeMap<String, String> {
		let mut fields = self.core.token_fields(code);

		fields.insert("grant_type".into(), "authorization_code".into());

		fields
	}

	fn fetch_raw_user<'a>(
		&'a self,
		token: &'a AccessToken,
		_: Option<&'a Callback>,
	) -> ProviderFuture<'a, Attributes> {
		Box::pin(async move {
			let url = http::parse_url(&format!("{}/api/v1/user", self.base))?;
			let bearer = format!("Bearer {}", token.secret());
			let request = http::get(&url, &[], &[(AUTHORIZATION, bearer.as_str())])?;
			let body = http::send(self.core.http_client(), request).await?;

			http::decode_json(&body)
		})
	}

	fn map_user(&self, raw: &Attributes) -> UserProfile {
		UserProfile {
			id: raw.get_string("id"),
			username: raw.get_string("login"),
			nickname: raw.get_string("login"),
			name: raw.get_string("full_name"),
			email: raw.get_string("email"),
			avatar: raw.get_string("avatar_url"),
			..Default::default()
		}
	}
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = Config::from_json_str(
		r#"{
			"gitea": {
				"client_id": "demo-client",
				"client_secret": "demo-secret",
				"redirect": "https://app.example.com/oauth/gitea/callback",
				"base_url": "https://gitea.example.com"
			}
		}"#,
	)?;
	let manager = Manager::new(config);

	manager.extend("gitea", |config, services| {
		let section = config.get("gitea").cloned().unwrap_or_default();
		let credentials = Credentials::from_config("gitea", &section)?;
		let base = section.extra_string("base_url").unwrap_or_else(|| "https://gitea.com".into());
		let scopes = ScopeList::new(["read:user"]).map_err(ConfigError::from)?;
		let core = ProviderCore::new("gitea", credentials, services.clone()).with_scopes(scopes);

		Ok(Box::new(Gitea { core, base }))
	});

	let gitea = manager.driver("gitea")?;
	let authorize_url = gitea.lock_blocking().redirect(None)?;

	println!("Send your user to {authorize_url}.");
	println!("Resolved drivers: {:?}.", manager.drivers().keys().collect::<Vec<_>>());

	Ok(())
}
