//! Input values for the configuration resolver.
//!
//! Profile-dependent values are an explicit variant rather than an object that
//! happens to have `development` and `production` keys.

use serde_json::{Number, Value};

/// Key name of the development branch in configuration files.
pub const DEVELOPMENT: &str = "development";
/// Key name of the production branch in configuration files.
pub const PRODUCTION: &str = "production";

/// A configuration input value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Removes the key it is added under.
    Null,
    /// String, number or boolean.
    Scalar(Value),
    /// Stored verbatim, never recursed into.
    Array(Vec<Value>),
    /// Nested keys, in insertion order.
    Map(Vec<(String, ConfigValue)>),
    /// Collapsed to one branch by the active profile.
    Profiled {
        development: Box<ConfigValue>,
        production: Box<ConfigValue>,
    },
}

impl ConfigValue {
    pub fn profiled(development: impl Into<ConfigValue>, production: impl Into<ConfigValue>) -> Self {
        Self::Profiled {
            development: Box::new(development.into()),
            production: Box::new(production.into()),
        }
    }

    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<ConfigValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn array<V: Into<Value>, I: IntoIterator<Item = V>>(items: I) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// The branch matching the profile, consuming `self`.
    ///
    /// Non-profiled values are returned unchanged.
    pub fn select(self, production: bool) -> ConfigValue {
        match self {
            Self::Profiled {
                development,
                production: prod,
            } => {
                if production {
                    *prod
                } else {
                    *development
                }
            }
            other => other,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Insert into a map value, replacing an existing entry in place.
    ///
    /// A non-map value is turned into an empty map first.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        let key = key.into();
        let value = value.into();
        if !matches!(self, Self::Map(_)) {
            *self = Self::Map(Vec::new());
        }
        if let Self::Map(entries) = self {
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        match self {
            Self::Map(entries) => {
                let idx = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(idx).1)
            }
            _ => None,
        }
    }

    /// Parse a TOML value.
    ///
    /// Tables whose keys are exactly `development` and `production` become
    /// [`ConfigValue::Profiled`]; this is the file convention for profile
    /// values and the only place the shape is inspected.
    pub fn from_toml(value: toml::Value) -> Self {
        match value {
            toml::Value::Table(table) => {
                let is_profiled = table.len() == 2
                    && table.contains_key(DEVELOPMENT)
                    && table.contains_key(PRODUCTION);
                let mut entries: Vec<(String, ConfigValue)> = table
                    .into_iter()
                    .map(|(k, v)| (k, Self::from_toml(v)))
                    .collect();
                if is_profiled {
                    let mut take = |name: &str| {
                        entries
                            .iter()
                            .position(|(k, _)| k == name)
                            .map(|idx| entries.remove(idx).1)
                            .unwrap_or(Self::Null)
                    };
                    let development = take(DEVELOPMENT);
                    let production = take(PRODUCTION);
                    Self::profiled(development, production)
                } else {
                    Self::Map(entries)
                }
            }
            toml::Value::Array(items) => Self::Array(items.iter().map(toml_to_json).collect()),
            scalar => Self::Scalar(toml_to_json(&scalar)),
        }
    }
}

/// Convert a TOML value to JSON without any profile handling.
fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number((*i).into()),
        toml::Value::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
    }
}

impl From<Value> for ConfigValue {
    /// JSON objects become plain maps; they are never treated as profiled.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Array(items) => Self::Array(items),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            scalar => Self::Scalar(scalar),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConfigValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Value::from(value))
                }
            }
        )*
    };
}

scalar_from!(bool, i32, i64, u16, u32, u64, f64, String, &str);

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_branch() {
        let value = ConfigValue::profiled(2222, 3333);
        assert_eq!(value.clone().select(false), ConfigValue::from(2222));
        assert_eq!(value.select(true), ConfigValue::from(3333));
        assert_eq!(ConfigValue::from("x").select(true), ConfigValue::from("x"));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut value = ConfigValue::map([("port", 1), ("host", 2)]);
        value.insert("port", 3);
        value.insert("ssl", true);
        assert_eq!(
            value,
            ConfigValue::Map(vec![
                ("port".into(), 3.into()),
                ("host".into(), 2.into()),
                ("ssl".into(), true.into()),
            ])
        );
        assert_eq!(value.remove("host"), Some(2.into()));
        assert_eq!(value.get("host"), None);
    }

    #[test]
    fn test_from_toml_detects_profiled_tables() {
        let doc: toml::Table = toml::from_str(
            r#"
            port = { development = 2222, production = 3333 }
            [redis]
            host = "127.0.0.1"
            port = "6390"
            "#,
        )
        .unwrap();
        let value = ConfigValue::from_toml(toml::Value::Table(doc));

        assert_eq!(value.get("port"), Some(&ConfigValue::profiled(2222i64, 3333i64)));
        assert_eq!(
            value.get("redis").and_then(|r| r.get("port")),
            Some(&ConfigValue::from("6390"))
        );
    }

    #[test]
    fn test_from_toml_three_keys_is_plain_map() {
        let doc: toml::Table =
            toml::from_str("development = 1\nproduction = 2\nother = 3").unwrap();
        let value = ConfigValue::from_toml(toml::Value::Table(doc));
        assert!(matches!(value, ConfigValue::Map(ref e) if e.len() == 3));
    }

    #[test]
    fn test_from_toml_arrays_stay_opaque() {
        let doc: toml::Table =
            toml::from_str(r#"list = [{ development = 1, production = 2 }]"#).unwrap();
        let value = ConfigValue::from_toml(toml::Value::Table(doc));
        assert_eq!(
            value.get("list"),
            Some(&ConfigValue::Array(vec![json!({ "development": 1, "production": 2 })]))
        );
    }

    #[test]
    fn test_json_objects_are_never_profiled() {
        let value = ConfigValue::from(json!({ "development": 1, "production": 2 }));
        assert!(matches!(value, ConfigValue::Map(_)));
    }
}
