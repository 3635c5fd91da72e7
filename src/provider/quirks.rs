//! Wire-level differences between providers.

// self
use crate::_prelude::*;

/// HTTP method used for the code-for-token exchange.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenMethod {
	/// Form-encoded POST body.
	#[default]
	Post,
	/// Fields sent in the query string.
	Get,
}

/// Wire-format differences between providers that the shared steps honor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Character used to join scopes when constructing the `scope` parameter.
	pub scope_separator: char,
	/// Method used by the default code exchange.
	pub token_method: TokenMethod,
}
impl ProviderQuirks {
	/// Overrides the scope separator.
	pub fn with_scope_separator(mut self, separator: char) -> Self {
		self.scope_separator = separator;

		self
	}

	/// Overrides the token exchange method.
	pub fn with_token_method(mut self, method: TokenMethod) -> Self {
		self.token_method = method;

		self
	}
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self { scope_separator: ',', token_method: TokenMethod::Post }
	}
}
