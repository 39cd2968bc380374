//! Layered resolution of configuration values into a [`KeyPathStore`].

use serde_json::Value;

use super::env::{EnvBindings, Environment};
use super::store::KeyPathStore;
use super::value::ConfigValue;
use super::ConfigError;
use crate::debug;

/// Adds values to a store, collapsing profiles and applying env overrides.
///
/// Precedence for a key: environment variable, then the branch of a profiled
/// value for the active profile, then the plain value.
#[derive(Debug)]
pub struct Resolver<'e> {
    env: &'e Environment,
    production: bool,
    bindings: EnvBindings,
    store: KeyPathStore,
}

impl<'e> Resolver<'e> {
    /// The profile is read from `env` here and never again.
    pub fn new(env: &'e Environment) -> Self {
        Self {
            env,
            production: env.is_production(),
            bindings: EnvBindings::new(),
            store: KeyPathStore::new(),
        }
    }

    pub fn with_bindings(mut self, bindings: EnvBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn production(&self) -> bool {
        self.production
    }

    pub fn bindings(&self) -> &EnvBindings {
        &self.bindings
    }

    pub fn store(&self) -> &KeyPathStore {
        &self.store
    }

    /// Add `value` under the dotted `key`.
    ///
    /// With `use_env`, the key and its sub-keys are declared in the bindings
    /// table first, and a set, non-empty bound variable replaces the value
    /// with its raw string. Otherwise:
    ///
    /// - `Null` removes the key
    /// - arrays are stored verbatim
    /// - profiled values re-enter `add` with the active branch
    /// - maps recurse as `key.child`
    /// - scalars are stored
    pub fn add(&mut self, key: &str, value: ConfigValue, use_env: bool) -> Result<(), ConfigError> {
        if key.trim().is_empty() {
            return Err(ConfigError::InvalidKey(key.to_string()));
        }

        if use_env {
            self.bindings.declare(key, &value);
            if let Some(raw) = self.bindings.lookup(key, self.env) {
                debug!("config"; "`{}` taken from ${}", key, self.bindings.name_for(key).unwrap_or_default());
                return self.store.set(key, Value::String(raw.to_string()));
            }
        }

        match value {
            ConfigValue::Null => self.store.remove(key).map(|_| ()),
            ConfigValue::Array(items) => self.store.set(key, Value::Array(items)),
            profiled @ ConfigValue::Profiled { .. } => {
                self.add(key, profiled.select(self.production), use_env)
            }
            ConfigValue::Map(entries) => {
                for (child, child_value) in entries {
                    self.add(&format!("{key}.{child}"), child_value, use_env)?;
                }
                Ok(())
            }
            ConfigValue::Scalar(scalar) => self.store.set(key, scalar),
        }
    }

    /// Set a value verbatim.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        self.store.set(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, ConfigError> {
        self.store.remove(key)
    }

    pub fn finish(self) -> (KeyPathStore, EnvBindings) {
        (self.store, self.bindings)
    }
}
