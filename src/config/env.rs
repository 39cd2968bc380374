//! Environment snapshot and key → variable name bindings.
//!
//! The resolver never reads the process environment directly: it receives an
//! [`Environment`] captured once, and looks names up in an [`EnvBindings`]
//! table declared from the option keys.

use std::collections::BTreeMap;

use super::value::ConfigValue;

/// Variable selecting the active profile.
pub const PROFILE_VAR: &str = "CIRCUMFLEX_ENV";

/// Value of [`PROFILE_VAR`] that selects the production profile.
pub const PRODUCTION_PROFILE: &str = "production";

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn capture() -> Self {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Snapshot with the production profile selected.
    pub fn production() -> Self {
        Self::from_pairs([(PROFILE_VAR, PRODUCTION_PROFILE)])
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Value of `name`; empty values count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_production(&self) -> bool {
        self.get(PROFILE_VAR) == Some(PRODUCTION_PROFILE)
    }
}

/// Derive the variable name for a dotted key.
///
/// An underscore goes before every capital, dots become underscores and the
/// result is upper-cased: `staticDomain` → `STATIC_DOMAIN`,
/// `redis.host` → `REDIS_HOST`.
pub fn env_var_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        match ch {
            '.' => name.push('_'),
            c if c.is_ascii_uppercase() => {
                name.push('_');
                name.push(c);
            }
            c => name.extend(c.to_uppercase()),
        }
    }
    name
}

/// Table of configuration keys that may be overridden, with their variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvBindings {
    table: BTreeMap<String, String>,
}

impl EnvBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for every key path reachable in `options`.
    pub fn derive(options: &ConfigValue) -> Self {
        let mut bindings = Self::new();
        if let ConfigValue::Map(entries) = options {
            for (key, value) in entries {
                bindings.declare(key, value);
            }
        }
        bindings
    }

    /// Bind `key` to an explicit variable name, replacing any derived one.
    pub fn bind(&mut self, key: impl Into<String>, name: impl Into<String>) -> &mut Self {
        self.table.insert(key.into(), name.into());
        self
    }

    /// Declare `key` and the key paths below it, keeping existing entries.
    ///
    /// Both branches of a profiled value are declared under the same key.
    /// Array elements are not addressable and get no bindings.
    pub fn declare(&mut self, key: &str, value: &ConfigValue) {
        self.table
            .entry(key.to_string())
            .or_insert_with(|| env_var_name(key));
        match value {
            ConfigValue::Map(entries) => {
                for (child, child_value) in entries {
                    self.declare(&format!("{key}.{child}"), child_value);
                }
            }
            ConfigValue::Profiled {
                development,
                production,
            } => {
                self.declare(key, development);
                self.declare(key, production);
            }
            ConfigValue::Null | ConfigValue::Scalar(_) | ConfigValue::Array(_) => {}
        }
    }

    pub fn name_for(&self, key: &str) -> Option<&str> {
        self.table.get(key).map(String::as_str)
    }

    /// Override value for `key` from `env`, if bound and set.
    pub fn lookup<'e>(&self, key: &str, env: &'e Environment) -> Option<&'e str> {
        self.name_for(key).and_then(|name| env.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.table.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("port"), "PORT");
        assert_eq!(env_var_name("staticDomain"), "STATIC_DOMAIN");
        assert_eq!(env_var_name("redis.host"), "REDIS_HOST");
        assert_eq!(env_var_name("session.cookieMaxAge"), "SESSION_COOKIE_MAX_AGE");
    }

    #[test]
    fn test_empty_values_are_absent() {
        let env = Environment::from_pairs([("PORT", ""), ("HOST", "example.com")]);
        assert_eq!(env.get("PORT"), None);
        assert_eq!(env.get("HOST"), Some("example.com"));
    }

    #[test]
    fn test_production_flag() {
        assert!(!Environment::default().is_production());
        assert!(Environment::production().is_production());
        assert!(!Environment::from_pairs([(PROFILE_VAR, "staging")]).is_production());
    }

    #[test]
    fn test_derive_walks_nested_and_profiled_keys() {
        let options = ConfigValue::map([
            ("port", ConfigValue::from(8123)),
            (
                "redis",
                ConfigValue::map([("host", ConfigValue::profiled("a", "b"))]),
            ),
            (
                "session",
                ConfigValue::profiled(
                    ConfigValue::map([("ttl", 60)]),
                    ConfigValue::map([("secret", "s")]),
                ),
            ),
            ("locales", ConfigValue::array(["en", "fr"])),
        ]);
        let bindings = EnvBindings::derive(&options);

        assert_eq!(bindings.name_for("port"), Some("PORT"));
        assert_eq!(bindings.name_for("redis.host"), Some("REDIS_HOST"));
        assert_eq!(bindings.name_for("session.ttl"), Some("SESSION_TTL"));
        assert_eq!(bindings.name_for("session.secret"), Some("SESSION_SECRET"));
        assert_eq!(bindings.name_for("locales"), Some("LOCALES"));
        assert_eq!(bindings.name_for("locales.0"), None);
    }

    #[test]
    fn test_bind_overrides_derived_name() {
        let mut bindings = EnvBindings::derive(&ConfigValue::map([("port", 1)]));
        bindings.bind("port", "APP_PORT");
        bindings.declare("port", &ConfigValue::from(2));

        let env = Environment::from_pairs([("PORT", "1"), ("APP_PORT", "9000")]);
        assert_eq!(bindings.lookup("port", &env), Some("9000"));
        assert_eq!(bindings.lookup("host", &env), None);
    }
}
