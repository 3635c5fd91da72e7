//! Access tokens returned by provider token endpoints.

pub mod secret;

// self
use crate::{
	_prelude::*,
	auth::{Attributes, TokenSecret},
};

/// Access token produced by a code exchange (or supplied by the caller).
///
/// Known fields are lifted into typed members; the full response stays available through
/// [`attributes`](Self::attributes) so provider extras such as `openid` or `open_id` survive.
#[derive(Clone, Debug, Serialize)]
pub struct AccessToken {
	/// Bearer token; never empty.
	pub token: TokenSecret,
	/// Refresh token, when issued.
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime in seconds, when reported.
	pub expires_in: Option<u64>,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	attributes: Attributes,
}
impl AccessToken {
	/// Field carrying the bearer token in token endpoint responses.
	pub const TOKEN_FIELD: &'static str = "access_token";

	/// Wraps a caller-supplied bearer token.
	pub fn new(token: impl Into<String>) -> Self {
		let token = token.into();
		let mut attributes = Attributes::default();

		attributes.insert(Self::TOKEN_FIELD, Value::String(token.clone()));

		Self {
			token: TokenSecret::new(token),
			refresh_token: None,
			expires_in: None,
			issued_at: OffsetDateTime::now_utc(),
			attributes,
		}
	}

	/// Builds a token from a decoded token endpoint response.
	///
	/// Fails with [`Error::AuthorizationFailed`] carrying the response when `access_token` is
	/// absent, not a string, or empty.
	pub fn from_response(response: Attributes) -> Result<Self> {
		let Some(token) = response
			.get(Self::TOKEN_FIELD)
			.and_then(Value::as_str)
			.filter(|token| !token.is_empty())
			.map(TokenSecret::new)
		else {
			return Err(Error::AuthorizationFailed { body: response.into_value() });
		};
		let refresh_token = response
			.get("refresh_token")
			.and_then(Value::as_str)
			.filter(|token| !token.is_empty())
			.map(TokenSecret::new);
		let expires_in = response.get("expires_in").and_then(parse_seconds);

		Ok(Self {
			token,
			refresh_token,
			expires_in,
			issued_at: OffsetDateTime::now_utc(),
			attributes: response,
		})
	}

	/// Attaches or replaces a raw attribute (for example `openid` for a caller-supplied token).
	pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
		self.attributes.insert(key, value);

		self
	}

	/// Returns the bearer token. Callers must avoid logging this string.
	pub fn secret(&self) -> &str {
		self.token.expose()
	}

	/// Resolves a dotted path inside the raw token response.
	pub fn attribute(&self, path: &str) -> Option<&Value> {
		self.attributes.get(path)
	}

	/// Resolves a dotted path inside the raw token response and renders it as text.
	pub fn attribute_string(&self, path: &str) -> Option<String> {
		self.attributes.get_string(path)
	}

	/// Full raw token response.
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Expiry instant derived from `issued_at + expires_in`, when the lifetime is known.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		let secs = i64::try_from(self.expires_in?).ok()?;

		self.issued_at.checked_add(Duration::seconds(secs))
	}
}

fn parse_seconds(value: &Value) -> Option<u64> {
	match value {
		Value::Number(n) => n.as_u64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn response_with_token_builds_access_token() {
		let token = AccessToken::from_response(Attributes::new(json!({
			"access_token": "tok123",
			"refresh_token": "ref456",
			"expires_in": "7200",
			"openid": "oid-9",
		})))
		.expect("Token response should be accepted.");

		assert_eq!(token.secret(), "tok123");
		assert_eq!(token.refresh_token.as_ref().map(TokenSecret::expose), Some("ref456"));
		assert_eq!(token.expires_in, Some(7200));
		assert_eq!(token.expires_at(), Some(token.issued_at + Duration::seconds(7200)));
		assert_eq!(token.attribute_string("openid").as_deref(), Some("oid-9"));
	}

	#[test]
	fn empty_or_missing_token_fails_with_raw_body() {
		for body in [json!({ "access_token": "" }), json!({ "error": "bad_code" }), json!(null)] {
			let err = AccessToken::from_response(Attributes::new(body.clone()))
				.expect_err("Unusable token responses must be rejected.");

			assert!(matches!(err, Error::AuthorizationFailed { body: kept } if kept == body));
		}
	}

	#[test]
	fn caller_supplied_tokens_expose_attributes() {
		let token = AccessToken::new("t1").with_attribute("openid", json!("oid-1"));

		assert_eq!(token.secret(), "t1");
		assert_eq!(token.attribute_string("access_token").as_deref(), Some("t1"));
		assert_eq!(token.attribute_string("openid").as_deref(), Some("oid-1"));
		assert_eq!(token.expires_at(), None);
	}
}
