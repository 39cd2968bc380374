//! Command-line interface module.

mod args;
pub mod build;
pub mod bundle;
pub mod config;
pub mod init;

pub use args::{Cli, Commands};

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::config::{CONFIG_FILE, Configuration, Environment, find_config_file};
use crate::debug;

/// Locate and resolve the configuration for `cli`.
///
/// An explicit `-C` path must exist; otherwise the nearest
/// `circumflex.toml` from the current directory upwards is used.
pub fn load_config(cli: &Cli, env: &Environment) -> Result<Configuration> {
    let path = match &cli.config {
        Some(path) => {
            if !path.is_file() {
                bail!("config file '{}' not found", path.display());
            }
            path.clone()
        }
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            find_config_file(Path::new(CONFIG_FILE), &cwd).with_context(|| {
                format!("no {CONFIG_FILE} found in '{}' or its parents", cwd.display())
            })?
        }
    };

    debug!("config"; "loading {}", path.display());
    let path = std::path::absolute(&path).unwrap_or(path);
    Configuration::load(&path, env)
        .with_context(|| format!("failed to load config '{}'", path.display()))
}
