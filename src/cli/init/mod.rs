//! Project initialization.
//!
//! # Module Structure
//!
//! - [`validate`]: Pre-initialization validation
//! - [`structure`]: Directory structure creation
//! - [`template`]: `circumflex.toml` rendering

mod structure;
mod template;
mod validate;

use anyhow::Result;
use std::path::Path;

use crate::log;

pub use template::render_config_template;
pub use validate::InitMode;

/// Create a new project at `root`.
///
/// # Steps
/// 1. Validate target directory
/// 2. Create `public/` layout
/// 3. Write `circumflex.toml` for `domain`
pub fn new_project(root: &Path, mode: InitMode, domain: &str) -> Result<()> {
    validate::validate_target(root, mode)?;
    structure::create_structure(root)?;
    template::write_config(root, domain)?;

    log!("init"; "project initialized in {}", root.display());
    Ok(())
}
