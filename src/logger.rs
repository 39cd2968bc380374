//! Colored, module-prefixed log lines on stderr.
//!
//! Stdout belongs to command output (`circumflex config` prints JSON), so
//! every log line goes to stderr.
//!
//! ```ignore
//! log!("assets"; "writing {}", path);
//! debug!("config"; "env override for {}", key);
//! ```

use owo_colors::OwoColorize;
use std::{
    io::{Write, stderr},
    sync::atomic::{AtomicBool, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable `debug!` output (`--verbose`).
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

// ============================================================================
// Macros
// ============================================================================

/// Print `[module] message`.
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Like [`log!`], only under `--verbose`. Arguments are not evaluated
/// otherwise.
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Output
// ============================================================================

pub fn log(module: &str, message: &str) {
    let line = format_line(module, message);
    let mut err = stderr().lock();
    writeln!(err, "{line}").ok();
}

fn format_line(module: &str, message: &str) -> String {
    let tag = format!("[{module}]");
    let tag = match Level::of(module) {
        Level::Build => tag.bright_blue().bold().to_string(),
        Level::Assets => tag.bright_green().bold().to_string(),
        Level::Error => tag.bright_red().bold().to_string(),
        Level::Warn => tag.bright_magenta().bold().to_string(),
        Level::Other => tag.bright_yellow().bold().to_string(),
    };
    format!("{tag} {message}")
}

/// Color class of a module tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Build,
    Assets,
    Error,
    Warn,
    Other,
}

impl Level {
    fn of(module: &str) -> Self {
        match module.to_ascii_lowercase().as_str() {
            "build" | "init" => Self::Build,
            "assets" => Self::Assets,
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_of_module() {
        assert_eq!(Level::of("assets"), Level::Assets);
        assert_eq!(Level::of("WARN"), Level::Warn);
        assert_eq!(Level::of("init"), Level::Build);
        assert_eq!(Level::of("config"), Level::Other);
    }

    #[test]
    fn test_line_keeps_tag_and_message() {
        let line = format_line("assets", "/generated/global_0badc0de.js");
        assert!(line.contains("[assets]"));
        assert!(line.ends_with(" /generated/global_0badc0de.js"));
    }
}
