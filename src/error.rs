//! Crate-level error types shared across providers, the manager, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant is terminal for the call that produced it; nothing is retried internally.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); passed through untouched.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// CSRF state is missing from the session or does not match the callback.
	///
	/// The flow must restart from `redirect`.
	#[error("Authorization state is missing or does not match the callback state.")]
	InvalidState,
	/// Token endpoint answered without a usable access token.
	#[error("Authorization failed: {body}.")]
	AuthorizationFailed {
		/// Raw token endpoint response kept for diagnostics.
		body: Value,
	},
	/// The manager knows no built-in driver or custom factory under this name.
	#[error("Driver `{driver}` is not supported.")]
	UnsupportedDriver {
		/// Requested driver name.
		driver: String,
	},
	/// A value required by the current request is absent.
	#[error("Invalid argument: {reason}.")]
	InvalidArgument {
		/// Human-readable description of the missing value.
		reason: String,
	},
	/// Provider API responded with a body that could not be decoded.
	#[error("Provider returned a malformed response.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl Error {
	/// Builds an [`Error::InvalidArgument`] from any displayable reason.
	pub fn invalid_argument(reason: impl Into<String>) -> Self {
		Self::InvalidArgument { reason: reason.into() }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A provider endpoint or redirect URI cannot be parsed.
	#[error("URL `{url}` is invalid.")]
	InvalidUrl {
		/// Offending URL text.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Requested scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Configuration document could not be parsed.
	#[error("Configuration could not be parsed.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},

	/// No configuration section exists for a built-in driver.
	#[error("Driver `{driver}` has no configuration section.")]
	MissingDriverConfig {
		/// Driver name.
		driver: String,
	},
	/// A provider section omits one of `client_id`, `client_secret`, or `redirect`.
	#[error("Driver `{driver}` configuration is missing `{field}`.")]
	MissingCredential {
		/// Driver name.
		driver: String,
		/// Missing configuration key.
		field: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a URL parse failure together with the offending text.
	pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { url: url.into(), source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn messages_name_the_offending_value() {
		let err = Error::UnsupportedDriver { driver: "myspace".into() };

		assert_eq!(err.to_string(), "Driver `myspace` is not supported.");

		let err: Error =
			ConfigError::MissingCredential { driver: "github".into(), field: "redirect" }.into();

		assert_eq!(err.to_string(), "Driver `github` configuration is missing `redirect`.");
	}

	#[test]
	fn authorization_failure_keeps_raw_body() {
		let body = serde_json::json!({ "error": "bad_verification_code" });
		let err = Error::AuthorizationFailed { body: body.clone() };

		assert!(matches!(&err, Error::AuthorizationFailed { body: kept } if *kept == body));
		assert!(err.to_string().contains("bad_verification_code"));
	}
}
