//! Application configuration.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── env        # Environment snapshot, key → variable bindings
//! ├── error      # ConfigError
//! ├── resolve    # Resolver (profiles + env overrides)
//! ├── store      # KeyPathStore (dotted get/set/remove)
//! ├── util       # Config file lookup
//! ├── value      # ConfigValue input tree
//! └── mod.rs     # Configuration (this file)
//! ```
//!
//! # Precedence
//!
//! For every key, highest first:
//!
//! | Source                                   | Example                       |
//! |------------------------------------------|-------------------------------|
//! | environment variable                     | `STATIC_DOMAIN=cdn.app.com`   |
//! | profiled value for the active profile    | `port = { development = 1 }`  |
//! | legacy `[development]` / `[production]`  | `[development] port = 1`      |
//! | options                                  | `port = 8000`                 |
//! | defaults                                 | `port = 8123`                 |

pub mod env;
mod error;
pub mod resolve;
pub mod store;
mod util;
pub mod value;

pub use env::{EnvBindings, Environment, env_var_name};
pub use error::ConfigError;
pub use resolve::Resolver;
pub use store::KeyPathStore;
pub use util::find_config_file;
pub use value::ConfigValue;

use serde_json::{Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

use value::{DEVELOPMENT, PRODUCTION};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8123;
/// Default host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default session lifetime in seconds.
pub const DEFAULT_SESSION_TTL: u64 = 600;
/// Default session secret.
pub const DEFAULT_SESSION_SECRET: &str = "CIRCUMFLEX";
/// Default config file name.
pub const CONFIG_FILE: &str = "circumflex.toml";

/// Keys read by the origin helpers. They take environment overrides even
/// when no layer sets them.
const ORIGIN_KEYS: &[&str] = &[
    "ssl",
    "domain",
    "staticHost",
    "staticDomain",
    "secureHost",
    "secureDomain",
];

// ============================================================================
// Configuration
// ============================================================================

/// Resolved, read-only configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    production: bool,
    tree: KeyPathStore,
    bindings: EnvBindings,
}

impl Configuration {
    /// Resolve `options` over the defaults under the profile selected by `env`.
    ///
    /// `options` is expected to be a [`ConfigValue::Map`]; anything else
    /// contributes no keys.
    pub fn new(options: ConfigValue, env: &Environment) -> Result<Self, ConfigError> {
        let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_root(options, env, &root)
    }

    /// Like [`Configuration::new`] with `root` as the default project root.
    ///
    /// A relative `root`, whichever layer it came from, is resolved against
    /// the default root.
    pub fn with_root(options: ConfigValue, env: &Environment, root: &Path) -> Result<Self, ConfigError> {
        let production = env.is_production();
        let merged = merge_options(defaults(root), options, production);
        let unset: Vec<&str> = ORIGIN_KEYS
            .iter()
            .copied()
            .filter(|key| merged.get(key).is_none())
            .collect();

        let mut resolver = Resolver::new(env).with_bindings(EnvBindings::derive(&merged));
        if let ConfigValue::Map(entries) = merged {
            for (key, value) in entries {
                resolver.add(&key, value, true)?;
            }
        }
        for key in unset {
            resolver.add(key, ConfigValue::Null, true)?;
        }

        let (mut tree, bindings) = resolver.finish();
        if let Some(relative) = tree
            .get("root")
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .filter(|p| p.is_relative())
        {
            tree.set("root", Value::String(root.join(relative).display().to_string()))?;
        }

        Ok(Self {
            production,
            tree,
            bindings,
        })
    }

    /// Load options from a TOML file and resolve them.
    ///
    /// `root` defaults to the directory containing the file; a relative
    /// `root` option is resolved against that directory.
    pub fn load(path: &Path, env: &Environment) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let options = Self::parse_options(&content)?;
        Self::with_root(options, env, &base)
    }

    /// Parse TOML text into an options tree.
    ///
    /// The document root is always a plain map, even when its only keys are
    /// `development` and `production`.
    pub fn parse_options(content: &str) -> Result<ConfigValue, ConfigError> {
        let table: toml::Table = toml::from_str(content)?;
        Ok(ConfigValue::Map(
            table
                .into_iter()
                .map(|(k, v)| (k, ConfigValue::from_toml(v)))
                .collect(),
        ))
    }

    // ------------------------------------------------------------------------
    // raw access
    // ------------------------------------------------------------------------

    /// Whether the production profile was active at construction.
    pub fn production(&self) -> bool {
        self.production
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.tree.get(path)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Numbers, or strings that parse as numbers (env overrides are strings).
    pub fn get_u64(&self, path: &str) -> Option<u64> {
        match self.get(path)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Booleans, or `"true"`/`"1"`/`"false"`/`"0"` strings.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        match self.get(path)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// First of `paths` holding a non-empty string.
    fn first_str(&self, paths: &[&str]) -> Option<&str> {
        paths
            .iter()
            .filter_map(|p| self.get_str(p))
            .find(|s| !s.is_empty())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        self.tree.as_map()
    }

    pub fn to_value(&self) -> Value {
        self.tree.clone().into_value()
    }

    /// Environment variables consulted during resolution.
    pub fn env_bindings(&self) -> &EnvBindings {
        &self.bindings
    }

    // ------------------------------------------------------------------------
    // well-known properties
    // ------------------------------------------------------------------------

    pub fn port(&self) -> u16 {
        self.get_u64("port")
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn host(&self) -> &str {
        self.get_str("host").unwrap_or(DEFAULT_HOST)
    }

    /// Public domain, falling back to `host`.
    pub fn domain(&self) -> &str {
        self.first_str(&["domain", "host"]).unwrap_or(DEFAULT_HOST)
    }

    pub fn silent(&self) -> bool {
        self.get_bool("silent").unwrap_or(false)
    }

    pub fn ssl(&self) -> bool {
        self.get_bool("ssl").unwrap_or(false)
    }

    pub fn root(&self) -> PathBuf {
        self.get_str("root").map(PathBuf::from).unwrap_or_default()
    }

    /// `root` joined with `name`.
    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root().join(name)
    }

    /// Alias of [`Configuration::path`].
    pub fn dir(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path(name)
    }

    /// Public web root (`<root>/public`).
    pub fn public_dir(&self) -> PathBuf {
        self.path("public")
    }

    /// `http://domain`, or `https://domain` when `ssl` is set.
    pub fn origin(&self) -> String {
        let scheme = if self.ssl() { "https://" } else { "http://" };
        format!("{scheme}{}", self.domain())
    }

    /// Protocol-relative origin for static resources.
    pub fn static_origin(&self) -> String {
        let host = self
            .first_str(&["staticHost", "staticDomain", "domain", "host"])
            .unwrap_or(DEFAULT_HOST);
        format!("//{host}")
    }

    /// HTTPS origin for sensitive areas.
    pub fn secure_origin(&self) -> String {
        let host = self
            .first_str(&["secureHost", "secureDomain", "domain", "host"])
            .unwrap_or(DEFAULT_HOST);
        format!("https://{host}")
    }
}

// ============================================================================
// helpers
// ============================================================================

fn defaults(root: &Path) -> ConfigValue {
    ConfigValue::map([
        ("port", ConfigValue::from(DEFAULT_PORT)),
        ("host", ConfigValue::from(DEFAULT_HOST)),
        ("root", ConfigValue::from(root.display().to_string())),
        ("silent", ConfigValue::from(false)),
        (
            "session",
            ConfigValue::map([
                ("ttl", ConfigValue::from(DEFAULT_SESSION_TTL)),
                ("secret", ConfigValue::from(DEFAULT_SESSION_SECRET)),
            ]),
        ),
    ])
}

/// Shallow-merge `options` over `defaults`, then the legacy profile block.
///
/// The `development` and `production` blocks are stripped either way.
fn merge_options(mut merged: ConfigValue, options: ConfigValue, production: bool) -> ConfigValue {
    if let ConfigValue::Map(entries) = options {
        for (key, value) in entries {
            merged.insert(key, value);
        }
    }

    let development = merged.remove(DEVELOPMENT);
    let production_block = merged.remove(PRODUCTION);
    let active = if production { production_block } else { development };

    if let Some(ConfigValue::Map(overrides)) = active {
        for (key, value) in overrides {
            merged.insert(key, value);
        }
    }
    merged
}
