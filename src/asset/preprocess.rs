//! Stylesheet preprocessor integration.
//!
//! A stylesheet reference `/css/main.css` has an implied preprocessor source
//! `/css/main.styl` (extension configurable). When the source exists it is
//! compiled and the `.css` file is overwritten before bundling.
//!
//! ```toml
//! [assets]
//! preprocessor = ["stylus", "--compress", "--print"]
//! preprocessorExt = ".styl"
//! ```

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::utils::exec::Cmd;

/// Default preprocessor source extension.
pub const DEFAULT_SOURCE_EXT: &str = ".styl";

/// Compiles preprocessor source text into plain CSS.
pub trait StylePreprocessor: Send + Sync {
    /// `path` is the source file, for diagnostics and relative imports.
    fn compile(&self, source: &str, path: &Path) -> Result<String>;

    /// Extension of source files, including the dot.
    fn source_ext(&self) -> &str {
        DEFAULT_SOURCE_EXT
    }
}

impl<F> StylePreprocessor for F
where
    F: Fn(&str, &Path) -> Result<String> + Send + Sync,
{
    fn compile(&self, source: &str, path: &Path) -> Result<String> {
        self(source, path)
    }
}

/// Runs an external command, piping the source to stdin and reading CSS
/// from stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPreprocessor {
    command: Vec<String>,
    source_ext: String,
}

impl CommandPreprocessor {
    pub fn new<S: Into<String>>(command: impl IntoIterator<Item = S>) -> Self {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            source_ext: DEFAULT_SOURCE_EXT.to_string(),
        }
    }

    pub fn with_source_ext(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        self.source_ext = if ext.starts_with('.') {
            ext
        } else {
            format!(".{ext}")
        };
        self
    }

    /// Build from `assets.preprocessor` (a command array or a single
    /// program name) and `assets.preprocessorExt`.
    pub fn from_config(conf: &Configuration) -> Option<Self> {
        let command: Vec<String> = match conf.get("assets.preprocessor")? {
            Value::Array(parts) => parts
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Value::String(program) => program.split_whitespace().map(str::to_string).collect(),
            _ => return None,
        };
        if command.is_empty() {
            return None;
        }

        let preprocessor = Self::new(command);
        Some(match conf.get_str("assets.preprocessorExt") {
            Some(ext) if !ext.trim().is_empty() => preprocessor.with_source_ext(ext.trim()),
            _ => preprocessor,
        })
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }
}

impl StylePreprocessor for CommandPreprocessor {
    fn compile(&self, source: &str, path: &Path) -> Result<String> {
        let mut cmd = Cmd::from_argv(&self.command)
            .env("CIRCUMFLEX_SOURCE", path)
            .stdin(source);
        if let Some(dir) = path.parent() {
            cmd = cmd.cwd(dir);
        }
        let output = cmd.run()?;
        String::from_utf8(output.stdout)
            .with_context(|| format!("preprocessor output for `{}` is not UTF-8", path.display()))
    }

    fn source_ext(&self) -> &str {
        &self.source_ext
    }
}

/// Preprocessor source path implied by a stylesheet file path.
///
/// `main.css` → `main.styl`; paths without a `.css` suffix get the
/// extension appended.
pub fn source_path(css_file: &Path, source_ext: &str) -> PathBuf {
    let raw = css_file.as_os_str().to_string_lossy();
    let stem = raw.strip_suffix(".css").unwrap_or(&raw);
    PathBuf::from(format!("{stem}{source_ext}"))
}
