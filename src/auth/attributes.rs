//! Open attribute bag with lenient, dotted-path lookups.

// self
use crate::_prelude::*;

/// Decoded provider payload kept verbatim, with dotted-path accessors.
///
/// Lookups never fail: a key that matches directly (even one containing dots) wins when its value
/// is not `null`; otherwise the path is split on `.` and walked through nested objects, and any
/// missing segment yields `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Value);
impl Attributes {
	/// Wraps an arbitrary JSON value.
	pub fn new(value: Value) -> Self {
		Self(value)
	}

	/// Resolves `path` to a non-null value.
	pub fn get(&self, path: &str) -> Option<&Value> {
		lookup(&self.0, path)
	}

	/// Resolves `path`, falling back to `default` when any segment is absent.
	pub fn get_or<'a>(&'a self, path: &str, default: &'a Value) -> &'a Value {
		self.get(path).unwrap_or(default)
	}

	/// Resolves `path` and renders scalars as text.
	///
	/// Strings are returned as-is, numbers and booleans are formatted; containers yield `None`.
	pub fn get_string(&self, path: &str) -> Option<String> {
		self.get(path).and_then(scalar_to_string)
	}

	/// Resolves `path` into a nested attribute bag.
	pub fn get_nested(&self, path: &str) -> Attributes {
		Self(self.get(path).cloned().unwrap_or_else(empty_object))
	}

	/// Returns true when `path` resolves to a non-null value.
	pub fn contains(&self, path: &str) -> bool {
		self.get(path).is_some()
	}

	/// Inserts a top-level key, turning a non-object payload into an object first.
	pub fn insert(&mut self, key: impl Into<String>, value: Value) {
		if !self.0.is_object() {
			self.0 = empty_object();
		}
		if let Value::Object(map) = &mut self.0 {
			map.insert(key.into(), value);
		}
	}

	/// Borrows the underlying JSON value.
	pub fn as_value(&self) -> &Value {
		&self.0
	}

	/// Consumes the bag and returns the underlying JSON value.
	pub fn into_value(self) -> Value {
		self.0
	}
}
impl Default for Attributes {
	fn default() -> Self {
		Self(empty_object())
	}
}
impl From<Value> for Attributes {
	fn from(value: Value) -> Self {
		Self(value)
	}
}
impl From<serde_json::Map<String, Value>> for Attributes {
	fn from(map: serde_json::Map<String, Value>) -> Self {
		Self(Value::Object(map))
	}
}

fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
	if let Some(direct) = root.get(path).filter(|value| !value.is_null()) {
		return Some(direct);
	}

	let mut current = root;

	for segment in path.split('.') {
		current = current.as_object()?.get(segment)?;
	}

	(!current.is_null()).then_some(current)
}

fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn empty_object() -> Value {
	Value::Object(Default::default())
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn dotted_paths_walk_nested_objects() {
		let attrs = Attributes::new(json!({
			"data": { "user": { "open_id": "oid-1", "display_name": "Ada" } },
			"id": 42,
		}));

		assert_eq!(attrs.get_string("data.user.open_id").as_deref(), Some("oid-1"));
		assert_eq!(attrs.get_string("id").as_deref(), Some("42"));
		assert_eq!(attrs.get_nested("data.user").get_string("display_name").as_deref(), Some("Ada"));
	}

	#[test]
	fn missing_segments_fall_back_to_default() {
		let attrs = Attributes::new(json!({ "data": { "user": null }, "list": [1, 2] }));
		let fallback = json!("fallback");

		assert_eq!(attrs.get("data.user.open_id"), None);
		assert_eq!(attrs.get("data.user"), None);
		assert_eq!(attrs.get("nope"), None);
		assert_eq!(attrs.get("list.0"), None, "Arrays are not traversed by dotted paths.");
		assert_eq!(attrs.get_or("data.missing", &fallback), &fallback);
		assert_eq!(attrs.get_string("list"), None);
	}

	#[test]
	fn literal_dotted_keys_win_over_traversal() {
		let attrs = Attributes::new(json!({
			"user.name": "literal",
			"user": { "name": "nested" },
		}));

		assert_eq!(attrs.get_string("user.name").as_deref(), Some("literal"));

		let attrs = Attributes::new(json!({ "user.name": null, "user": { "name": "nested" } }));

		assert_eq!(attrs.get_string("user.name").as_deref(), Some("nested"));
	}

	#[test]
	fn non_object_payloads_stay_lenient() {
		let mut attrs = Attributes::new(json!("plain text"));

		assert_eq!(attrs.get("anything"), None);

		attrs.insert("email", json!("a@example.com"));

		assert_eq!(attrs.get_string("email").as_deref(), Some("a@example.com"));
	}
}
