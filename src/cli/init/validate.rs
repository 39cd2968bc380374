//! Pre-initialization validation.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Initialization mode determines validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    /// `circumflex init` - initialize in current directory (must be empty)
    CurrentDir,
    /// `circumflex init <name>` - target must be missing or empty
    NewDir,
}

/// Validate target directory for initialization.
pub fn validate_target(root: &Path, mode: InitMode) -> Result<()> {
    if is_empty(root)? {
        return Ok(());
    }
    match mode {
        InitMode::CurrentDir => bail!(
            "Current directory is not empty.\n\
             Use `circumflex init <name>` to create in a new subdirectory."
        ),
        InitMode::NewDir => bail!(
            "Directory '{}' is not empty.\n\
             Choose a different name or remove the existing directory.",
            root.display()
        ),
    }
}

/// Check if directory is empty or doesn't exist.
fn is_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    if !path.is_dir() {
        return Ok(false);
    }
    let is_empty = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory '{}'", path.display()))?
        .next()
        .is_none();
    Ok(is_empty)
}
