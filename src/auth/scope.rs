//! Scope modeling helpers used by provider authorization requests.

// std
use std::{slice::Iter, str::FromStr};
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Ordered, de-duplicated list of OAuth scopes.
///
/// Providers serialize scopes in the order they were configured, so insertion order is kept and
/// only repeated entries are dropped.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Creates a validated scope list from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			let owned: String = scope.into();

			if owned.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if owned.chars().any(char::is_whitespace) {
				return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
			}
			if !list.contains(&owned) {
				list.push(owned);
			}
		}

		Ok(Self(list))
	}

	/// Builds a list from provider-owned defaults known to be valid.
	pub(crate) fn from_static(scopes: &[&str]) -> Self {
		Self(scopes.iter().map(|scope| (*scope).to_owned()).collect())
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in configured order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Joins the scopes with the provider's separator.
	pub fn join(&self, separator: &str) -> String {
		self.0.join(separator)
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.join(" "))
	}
}

/// Iterator over scope strings.
pub struct ScopeIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for ScopeIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(|s| s.as_str())
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = ScopeIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		ScopeIter { inner: self.0.iter() }
	}
}
impl TryFrom<Vec<String>> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ScopeList {
	type Err = ScopeValidationError;

	/// Parses a comma- or whitespace-separated scope string.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}

		let parts = s.split(|c: char| c == ',' || c.is_whitespace()).filter(|p| !p.is_empty());
		let list = Self::new(parts)?;

		if list.is_empty() { Err(ScopeValidationError::Empty) } else { Ok(list) }
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.0.len()))?;

		for scope in self.0.iter() {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeList::new(values).map_err(DeError::custom)
	}
}
