use serde_json::{Map, Value};

use super::sanitize::sanitize_key;

/// Ordered property mapping of a feature.
///
/// Keys only enter through [`Properties::insert`], which runs them through
/// the sanitizer, so every stored key is persistence-safe. Values are kept
/// as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Map<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build from a raw JSON object, sanitizing every key.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        object.iter().map(|(k, v)| (k.as_str(), v.clone())).collect()
    }

    /// Insert under the sanitized form of `key`. When two raw keys collapse
    /// to the same sanitized key the later value wins and the first position
    /// is kept.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(sanitize_key(key).into_owned(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String view of a value; non-string scalars are not coerced.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        for (key, value) in iter {
            properties.insert(key.as_ref(), value);
        }
        properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_sanitizes_and_keeps_order() {
        let mut props = Properties::new();
        props.insert("color", "");
        props.insert("name", "Chez Rémy");
        props.insert("A . in the name", "");

        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["color", "name", "A _ in the name"]);
        assert_eq!(props.get_str("name"), Some("Chez Rémy"));
        assert!(!props.contains_key("A . in the name"));
    }

    #[test]
    fn colliding_keys_keep_first_position_and_last_value() {
        let props: Properties = [("a.b", "first"), ("z", "mid"), ("a_b", "second")].into_iter().collect();
        assert_eq!(props.len(), 2);
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a_b", "z"]);
        assert_eq!(props.get_str("a_b"), Some("second"));
    }

    #[test]
    fn json_object_values_are_untouched() {
        let raw = json!({"n.1": 3, "nested": {"x.y": [1, 2]}, "s": "v.w"});
        let props = Properties::from_json_object(raw.as_object().unwrap());
        assert_eq!(props.get("n_1"), Some(&json!(3)));
        // Only top-level keys are storage fields.
        assert_eq!(props.get("nested"), Some(&json!({"x.y": [1, 2]})));
        assert_eq!(props.get_str("s"), Some("v.w"));
    }
}
