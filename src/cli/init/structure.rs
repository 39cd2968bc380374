//! Project directory structure creation.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Standard project directory structure.
const PROJECT_DIRS: &[&str] = &["public/css", "public/js", "public/generated"];

/// Create the project directory structure at the given root.
///
/// The root directory is created if it doesn't exist.
pub fn create_structure(root: &Path) -> Result<()> {
    for dir in PROJECT_DIRS {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
    }
    Ok(())
}
