//! Client credentials and their validation from configuration.

// self
use crate::{_prelude::*, auth::TokenSecret, config::ProviderConfig, error::ConfigError};

/// Client credentials issued by a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Client identifier (`appid`, `client_key`, or `corpid` for some providers).
	pub client_id: String,
	/// Client secret; redacted when formatted.
	pub client_secret: TokenSecret,
	/// Redirect URI registered with the provider.
	pub redirect_uri: String,
}
impl Credentials {
	/// Creates credentials from explicit values.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			redirect_uri: redirect_uri.into(),
		}
	}

	/// Reads the credentials for `driver` out of its configuration section.
	pub fn from_config(driver: &str, config: &ProviderConfig) -> Result<Self, ConfigError> {
		let field = |value: &Option<String>, field| {
			value.clone().ok_or_else(|| ConfigError::MissingCredential { driver: driver.to_owned(), field })
		};

		Ok(Self::new(
			field(&config.client_id, "client_id")?,
			field(&config.client_secret, "client_secret")?,
			field(&config.redirect, "redirect")?,
		))
	}
}
