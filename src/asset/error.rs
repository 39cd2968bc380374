//! Asset compilation errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an asset compile.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("failed to write `{0}`")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("failed to create directory `{0}`")]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error("preprocessor failed on `{0}`")]
    Preprocess(PathBuf, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to serialize assets manifest")]
    Manifest(#[from] serde_json::Error),
}

impl AssetError {
    /// Path of the file involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Read(p, _) | Self::Write(p, _) | Self::CreateDir(p, _) | Self::Preprocess(p, _) => {
                Some(p.as_path())
            }
            Self::Manifest(_) => None,
        }
    }
}
