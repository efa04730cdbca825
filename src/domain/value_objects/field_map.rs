use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name → value mapping taken from one inbound request.
///
/// Values are JSON-like so nested form structures survive; only top-level
/// string values are ever inspected by the sanitizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestFieldMap(BTreeMap<String, Value>);

impl RequestFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Value of `name` if it is a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Map every string in the structure (recursively) through `f`,
    /// leaving numbers, booleans and nulls untouched.
    pub fn map_strings(&self, f: impl Fn(&str) -> String + Copy) -> Self {
        self.map_with(f, |k| k.to_string())
    }

    /// Like [`map_strings`](Self::map_strings), but object keys at every
    /// depth, field names included, go through `f` as well.
    pub fn map_strings_and_keys(&self, f: impl Fn(&str) -> String + Copy) -> Self {
        self.map_with(f, f)
    }

    fn map_with(
        &self,
        value_fn: impl Fn(&str) -> String + Copy,
        key_fn: impl Fn(&str) -> String + Copy,
    ) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, v)| (key_fn(k), map_value_strings(v, value_fn, key_fn)))
                .collect(),
        )
    }
}

fn map_value_strings(
    value: &Value,
    value_fn: impl Fn(&str) -> String + Copy,
    key_fn: impl Fn(&str) -> String + Copy,
) -> Value {
    match value {
        Value::String(s) => Value::String(value_fn(s)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| map_value_strings(v, value_fn, key_fn))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (key_fn(k), map_value_strings(v, value_fn, key_fn)))
                .collect(),
        ),
        other => other.clone(),
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RequestFieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_str_only_returns_strings() {
        let fields = RequestFieldMap::new()
            .with_field("username", "john_doe")
            .with_field("page", 1);

        assert_eq!(fields.get_str("username"), Some("john_doe"));
        assert_eq!(fields.get_str("page"), None);
        assert!(fields.contains("page"));
        assert_eq!(fields.get_str("missing"), None);
    }

    #[test]
    fn test_remove_field() {
        let mut fields: RequestFieldMap = [("a", "1"), ("b", "2")].into_iter().collect();

        assert_eq!(fields.remove("a"), Some(json!("1")));
        assert_eq!(fields.len(), 1);
        assert!(!fields.contains("a"));
    }

    #[test]
    fn test_map_strings_and_keys_reaches_nested_keys() {
        let fields = RequestFieldMap::new()
            .with_field("top", json!({"inner": {"deep": "v"}, "list": [{"k": 1}]}));

        let upper = fields.map_strings_and_keys(|s| s.to_uppercase());

        assert_eq!(
            upper.get("TOP"),
            Some(&json!({"INNER": {"DEEP": "V"}, "LIST": [{"K": 1}]}))
        );
        // Plain map_strings keeps keys as they are
        assert!(fields.map_strings(|s| s.to_uppercase()).contains("top"));
    }

    #[test]
    fn test_map_strings_recurses_into_nested_values() {
        let fields = RequestFieldMap::new()
            .with_field("name", "x")
            .with_field("tags", json!(["a", 2, {"inner": "b"}]))
            .with_field("flag", true);

        let upper = fields.map_strings(|s| s.to_uppercase());

        assert_eq!(upper.get("name"), Some(&json!("X")));
        assert_eq!(upper.get("tags"), Some(&json!(["A", 2, {"inner": "B"}])));
        assert_eq!(upper.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let fields: RequestFieldMap =
            serde_json::from_str(r#"{"search":"<b>","page":3}"#).unwrap();

        assert_eq!(fields.get_str("search"), Some("<b>"));
        assert_eq!(fields.get("page"), Some(&json!(3)));
    }
}
