//! Normalized user profiles shared by every provider.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Attributes},
};

/// Provider-mapped profile fields.
///
/// All fields are best-effort: providers fill what their payload carries and leave the rest as
/// `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Provider-namespace-unique identifier.
	pub id: Option<String>,
	/// Login handle.
	pub username: Option<String>,
	/// Display nickname.
	pub nickname: Option<String>,
	/// Full name.
	pub name: Option<String>,
	/// Primary e-mail address.
	pub email: Option<String>,
	/// Avatar URL.
	pub avatar: Option<String>,
	/// Provider-specific fields that have no normalized slot.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub extra: BTreeMap<String, Value>,
}
impl UserProfile {
	/// Adds a provider-specific field when the value is present.
	pub fn with_extra(mut self, key: impl Into<String>, value: Option<String>) -> Self {
		if let Some(value) = value {
			self.extra.insert(key.into(), Value::String(value));
		}

		self
	}
}

/// User returned by the shared workflow: mapped fields plus the raw payload, token, and provider.
#[derive(Clone, Debug, Serialize)]
pub struct NormalizedUser {
	/// Mapped profile fields.
	#[serde(flatten)]
	pub profile: UserProfile,
	/// Unmodified provider profile payload.
	pub raw: Attributes,
	/// Token used to fetch the profile.
	#[serde(skip)]
	pub token: AccessToken,
	/// Driver name of the provider that produced the user.
	pub provider: String,
}
impl NormalizedUser {
	/// Assembles a user from its parts.
	pub fn new(
		profile: UserProfile,
		raw: Attributes,
		token: AccessToken,
		provider: impl Into<String>,
	) -> Self {
		Self { profile, raw, token, provider: provider.into() }
	}

	/// Provider-namespace-unique identifier.
	pub fn id(&self) -> Option<&str> {
		self.profile.id.as_deref()
	}

	/// Login handle.
	pub fn username(&self) -> Option<&str> {
		self.profile.username.as_deref()
	}

	/// Display nickname.
	pub fn nickname(&self) -> Option<&str> {
		self.profile.nickname.as_deref()
	}

	/// Full name.
	pub fn name(&self) -> Option<&str> {
		self.profile.name.as_deref()
	}

	/// Primary e-mail address.
	pub fn email(&self) -> Option<&str> {
		self.profile.email.as_deref()
	}

	/// Avatar URL.
	pub fn avatar(&self) -> Option<&str> {
		self.profile.avatar.as_deref()
	}

	/// Provider-specific field with no normalized slot.
	pub fn extra(&self, key: &str) -> Option<&Value> {
		self.profile.extra.get(key)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn serialization_flattens_profile_and_hides_token() {
		let profile = UserProfile {
			id: Some("1".into()),
			nickname: Some("bob".into()),
			..Default::default()
		}
		.with_extra("deviceId", Some("dev-1".into()))
		.with_extra("openid", None);
		let user = NormalizedUser::new(
			profile,
			Attributes::new(json!({ "id": 1, "login": "bob" })),
			AccessToken::new("t1"),
			"github",
		);
		let value = serde_json::to_value(&user).expect("User should serialize.");

		assert_eq!(value["id"], json!("1"));
		assert_eq!(value["email"], Value::Null);
		assert_eq!(value["extra"], json!({ "deviceId": "dev-1" }));
		assert_eq!(value["raw"]["login"], json!("bob"));
		assert_eq!(value["provider"], json!("github"));
		assert!(value.get("token").is_none());
		assert_eq!(user.extra("openid"), None);
	}
}
