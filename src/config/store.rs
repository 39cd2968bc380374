//! Nested key/value tree addressed by dotted paths.
//!
//! `redis.host` addresses the `host` entry of the `redis` object. Intermediate
//! objects are created on demand and never pruned.

use serde_json::{Map, Value};

use super::ConfigError;

/// Insertion-ordered tree of configuration values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPathStore {
    root: Map<String, Value>,
}

impl KeyPathStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value at `path`, creating intermediate objects as needed.
    ///
    /// An intermediate that holds a non-object value is replaced by an object.
    pub fn set(&mut self, path: &str, value: Value) -> Result<(), ConfigError> {
        let words = split_path(path)?;
        let (last, parents) = words.split_last().ok_or_else(|| invalid(path))?;
        parent_mut(&mut self.root, parents).insert((*last).to_string(), value);
        Ok(())
    }

    /// Remove the leaf at `path`. Empty intermediate objects stay in place.
    pub fn remove(&mut self, path: &str) -> Result<Option<Value>, ConfigError> {
        let words = split_path(path)?;
        let (last, parents) = words.split_last().ok_or_else(|| invalid(path))?;
        Ok(parent_mut(&mut self.root, parents).shift_remove(*last))
    }

    /// Resolve `path` to a value, if present.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let words = split_path(path).ok()?;
        let (first, rest) = words.split_first()?;
        rest.iter()
            .try_fold(self.root.get(*first)?, |value, word| value.as_object()?.get(*word))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

fn invalid(path: &str) -> ConfigError {
    ConfigError::InvalidKey(path.to_string())
}

/// Validate and split a dotted path. Surrounding whitespace is ignored.
fn split_path(path: &str) -> Result<Vec<&str>, ConfigError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(invalid(path));
    }
    Ok(trimmed.split('.').collect())
}

/// Walk `words` from `root`, materializing objects along the way.
fn parent_mut<'a>(root: &'a mut Map<String, Value>, words: &[&str]) -> &'a mut Map<String, Value> {
    let mut current = root;
    for word in words {
        let slot = current
            .entry((*word).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            unreachable!("slot was replaced by an object above");
        };
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut store = KeyPathStore::new();
        store.set("redis.host", json!("redis.sandbox")).unwrap();
        store.set("redis.port", json!(6390)).unwrap();

        assert_eq!(store.get("redis.host"), Some(&json!("redis.sandbox")));
        assert_eq!(
            store.into_value(),
            json!({ "redis": { "host": "redis.sandbox", "port": 6390 } })
        );
    }

    #[test]
    fn test_set_trims_path() {
        let mut store = KeyPathStore::new();
        store.set("  port ", json!(8123)).unwrap();
        assert_eq!(store.get("port"), Some(&json!(8123)));
    }

    #[test]
    fn test_set_replaces_scalar_intermediate() {
        let mut store = KeyPathStore::new();
        store.set("session", json!("plain")).unwrap();
        store.set("session.ttl", json!(600)).unwrap();
        assert_eq!(store.get("session"), Some(&json!({ "ttl": 600 })));
    }

    #[test]
    fn test_remove_keeps_empty_parents() {
        let mut store = KeyPathStore::new();
        store.set("a.b.c", json!(1)).unwrap();

        let removed = store.remove("a.b.c").unwrap();
        assert_eq!(removed, Some(json!(1)));
        assert_eq!(store.get("a.b"), Some(&json!({})));
        assert!(!store.contains("a.b.c"));
    }

    #[test]
    fn test_remove_missing_leaf() {
        let mut store = KeyPathStore::new();
        assert_eq!(store.remove("nothing.here").unwrap(), None);
    }

    #[test]
    fn test_invalid_key_leaves_store_untouched() {
        let mut store = KeyPathStore::new();
        store.set("port", json!(8123)).unwrap();
        let before = store.clone();

        assert!(matches!(store.set("", json!(1)), Err(ConfigError::InvalidKey(_))));
        assert!(matches!(store.set("   ", json!(1)), Err(ConfigError::InvalidKey(_))));
        assert!(matches!(store.remove("\t"), Err(ConfigError::InvalidKey(_))));
        assert_eq!(store, before);
    }

    #[test]
    fn test_get_through_scalar_is_none() {
        let mut store = KeyPathStore::new();
        store.set("port", json!(8123)).unwrap();
        assert_eq!(store.get("port.value"), None);
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = KeyPathStore::new();
        store.set("zeta", json!(1)).unwrap();
        store.set("alpha", json!(2)).unwrap();
        let keys: Vec<_> = store.as_map().keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha"]);
    }
}
