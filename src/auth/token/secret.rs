//! Redacted wrapper for every credential the crate holds: bearer and refresh tokens, OAuth
//! client secrets, and WeChat component access tokens.

// self
use crate::_prelude::*;

/// Secret string that never prints itself.
///
/// `Debug` and `Display` both render `<redacted>`, so provider and credential structs can derive
/// `Debug` freely. Serialization keeps the raw value for callers persisting tokens.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the secret is the empty string.
	///
	/// WeChat omits `secret` from its token request when the client secret is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
