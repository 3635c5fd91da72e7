//! Microsoft identity platform (personal and work accounts) through Microsoft Graph.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes, ScopeList, UserProfile},
	callback::Callback,
	provider::{Credentials, Provider, ProviderCore, ProviderFuture, ProviderQuirks, ProviderServices},
	providers,
};

const AUTHORIZE_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";
const TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";
const USER_URL: &str = "https://graph.microsoft.com/v1.0/me";

/// Outlook provider; scopes are space-separated.
#[derive(Debug)]
pub struct Outlook {
	core: ProviderCore,
}
impl Outlook {
	/// Driver name.
	pub const NAME: &'static str = "outlook";

	/// Creates the provider requesting `User.Read`.
	pub fn new(credentials: Credentials, services: ProviderServices) -> Self {
		Self {
			core: ProviderCore::new(Self::NAME, credentials, services)
				.with_scopes(ScopeList::from_static(&["User.Read"]))
				.with_quirks(ProviderQuirks::default().with_scope_separator(' ')),
		}
	}
}
impl Provider for Outlook {
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
			name: raw.get_string("displayName"),
			email: raw.get_string("userPrincipalName"),
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, provider::ProviderExt};

	#[tokio::test]
	async fn scopes_are_space_joined_and_graph_profile_maps() {
		let transport = StubTransport::default()
			.respond("/v1.0/me", r#"{"id":"ms-1","displayName":"Ada L","userPrincipalName":"ada@contoso.com"}"#);
		let (services, _) = stub_services(&transport);
		let mut provider =
			Outlook::new(Credentials::new("ms-id", "ms-secret", "https://app.example.com/cb"), services);
		let scopes = "User.Read offline_access".parse().expect("Scopes should parse.");
		let url = provider.with_scopes(scopes).stateless().redirect(None).expect("URL should build.");

		assert!(url.as_str().contains("scope=User.Read+offline_access"));
		assert_eq!(provider.token_fields("c")["grant_type"], "authorization_code");

		let user = provider
			.user_from_token(AccessToken::new("ms-t"))
			.await
			.expect("Profile should be fetched.");

		assert_eq!(user.id(), Some("ms-1"));
		assert_eq!(user.name(), Some("Ada L"));
		assert_eq!(user.email(), Some("ada@contoso.com"));
		assert_eq!(user.nickname(), None);
	}
}
