//! `circumflex.toml` template.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::config::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = include_str!("../../../templates/circumflex.toml");

/// Template text with every `{{domain}}` replaced.
pub fn render_config_template(domain: &str) -> String {
    CONFIG_TEMPLATE.replace("{{domain}}", domain)
}

/// Write `circumflex.toml` into `root`.
pub fn write_config(root: &Path, domain: &str) -> Result<()> {
    let path = root.join(CONFIG_FILE);
    fs::write(&path, render_config_template(domain))
        .with_context(|| format!("Failed to write config file '{}'", path.display()))
}
