//! Read-only view of the inbound authorization callback.

// self
use crate::_prelude::*;

/// `code` and `state` query parameters delivered to the redirect handler.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callback {
	code: Option<String>,
	state: Option<String>,
}
impl Callback {
	/// Builds a callback from already-extracted parameters.
	pub fn new(code: Option<impl Into<String>>, state: Option<impl Into<String>>) -> Self {
		Self { code: code.map(Into::into), state: state.map(Into::into) }
	}

	/// Parses a raw query string (with or without the leading `?`).
	pub fn from_query(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		let mut callback = Self::default();

		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			match key.as_ref() {
				"code" => callback.code = Some(value.into_owned()),
				"state" => callback.state = Some(value.into_owned()),
				_ => (),
			}
		}

		callback
	}

	/// Extracts the parameters from a full callback URL.
	pub fn from_url(url: &Url) -> Self {
		Self::from_query(url.query().unwrap_or_default())
	}

	/// Authorization code, when present and non-empty.
	pub fn code(&self) -> Option<&str> {
		self.code.as_deref().filter(|code| !code.is_empty())
	}

	/// State echoed back by the provider.
	pub fn state(&self) -> Option<&str> {
		self.state.as_deref()
	}
}
