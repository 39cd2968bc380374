//! `circumflex config`: inspect the resolved configuration.

use anyhow::{Result, bail};

use crate::config::Configuration;

/// Pretty JSON of the whole tree, or of the value at `key`.
pub fn render_config(conf: &Configuration, key: Option<&str>) -> Result<String> {
    let json = match key {
        Some(key) => match conf.get(key) {
            Some(value) => serde_json::to_string_pretty(value)?,
            None => bail!("key '{key}' is not set"),
        },
        None => serde_json::to_string_pretty(&conf.to_value())?,
    };
    Ok(json)
}

/// `key = VARIABLE` lines for every environment binding.
pub fn render_env_bindings(conf: &Configuration) -> String {
    conf.env_bindings()
        .iter()
        .map(|(key, name)| format!("{key} = {name}\n"))
        .collect()
}
