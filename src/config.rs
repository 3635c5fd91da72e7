//! Per-driver configuration supplied by the application's config loader.

// self
use crate::{_prelude::*, error::ConfigError};

/// Configuration for every driver, keyed by driver name.
///
/// ```
/// use oauth2_socialite::config::Config;
///
/// let config = Config::from_json_str(
/// 	r#"{ "github": { "client_id": "id", "client_secret": "secret", "redirect": "https://app.example.com/cb" } }"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.get("github").and_then(|c| c.client_id.as_deref()), Some("id"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(BTreeMap<String, ProviderConfig>);
impl Config {
	/// Parses a JSON document, reporting the failing path on error.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut de).map_err(|source| ConfigError::Parse { source })
	}

	/// Converts an already-decoded JSON value.
	pub fn from_value(value: Value) -> Result<Self, ConfigError> {
		serde_path_to_error::deserialize(value).map_err(|source| ConfigError::Parse { source })
	}

	/// Adds or replaces the section for `driver`.
	pub fn with_provider(mut self, driver: impl Into<String>, config: ProviderConfig) -> Self {
		self.0.insert(driver.into(), config);

		self
	}

	/// Section for `driver`, if configured.
	pub fn get(&self, driver: &str) -> Option<&ProviderConfig> {
		self.0.get(driver)
	}

	/// Configured driver names.
	pub fn drivers(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}
}

/// Credentials section for one driver.
///
/// The three credential keys are optional at parse time so a malformed section is reported by
/// the manager with the driver name attached; unknown keys are kept in `extra` for custom
/// factories.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
	/// OAuth client identifier (`appid`/`client_key` for some providers).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	/// OAuth client secret.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<String>,
	/// Redirect URI registered with the provider.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect: Option<String>,
	/// Additional driver-specific keys.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, Value>,
}
impl ProviderConfig {
	/// Creates a complete credentials section.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		redirect: impl Into<String>,
	) -> Self {
		Self {
			client_id: Some(client_id.into()),
			client_secret: Some(client_secret.into()),
			redirect: Some(redirect.into()),
			extra: Default::default(),
		}
	}

	/// Adds a driver-specific key.
	pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);

		self
	}

	/// Driver-specific key rendered as text; numbers and booleans are formatted.
	pub fn extra_string(&self, key: &str) -> Option<String> {
		match self.extra.get(key)? {
			Value::String(s) if !s.is_empty() => Some(s.clone()),
			Value::Number(n) => Some(n.to_string()),
			Value::Bool(b) => Some(b.to_string()),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_sections_keep_unknown_keys() {
		let config = Config::from_json_str(
			r#"{
				"wework": { "client_id": "corp", "client_secret": "s", "redirect": "https://a/cb", "agent_id": 1000002 },
				"github": { "client_id": "gh" }
			}"#,
		)
		.expect("Configuration should parse.");
		let wework = config.get("wework").expect("WeWork section should exist.");

		assert_eq!(wework.extra_string("agent_id").as_deref(), Some("1000002"));
		assert_eq!(config.get("github").and_then(|c| c.redirect.as_deref()), None);
		assert_eq!(config.drivers().collect::<Vec<_>>(), vec!["github", "wework"]);
	}

	#[test]
	fn parse_errors_carry_the_path() {
		let err = Config::from_json_str(r#"{ "github": { "client_id": 7 } }"#)
			.expect_err("Numeric client ids must be rejected.");

		assert!(matches!(&err, ConfigError::Parse { source } if source.path().to_string() == "github.client_id"));
	}
}
