//! External command execution.
//!
//! ```ignore
//! let output = Cmd::from_argv(&["stylus", "--compress", "--print"])
//!     .cwd(dir)
//!     .env("CIRCUMFLEX_SOURCE", path)
//!     .stdin(source)
//!     .run()?;
//! ```

use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    thread,
};

use crate::debug;

/// A command line with optional working directory, environment and stdin.
#[derive(Debug, Default, Clone)]
pub struct Cmd {
    argv: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
    stdin: Option<Vec<u8>>,
}

impl Cmd {
    /// `argv[0]` is the program; empty entries are dropped.
    pub fn from_argv<S: AsRef<OsStr>>(argv: &[S]) -> Self {
        Self {
            argv: argv
                .iter()
                .map(|a| a.as_ref().to_owned())
                .filter(|a| !a.is_empty())
                .collect(),
            ..Self::default()
        }
    }

    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_owned(), value.as_ref().to_owned()));
        self
    }

    pub fn stdin(mut self, data: impl AsRef<[u8]>) -> Self {
        self.stdin = Some(data.as_ref().to_vec());
        self
    }

    /// Program name for messages.
    pub fn program(&self) -> String {
        self.argv
            .first()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Run to completion, capturing stdout and stderr.
    ///
    /// A non-zero exit status is an error carrying the captured stderr.
    pub fn run(self) -> Result<Output> {
        let Some((program, args)) = self.argv.split_first() else {
            bail!("empty command");
        };
        let name = self.program();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(if self.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        debug!("exec"; "`{}` {:?}", name, args);
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{name}`"))?;

        // Feed stdin from a separate thread so a child filling its stdout
        // pipe cannot block on us.
        let writer = match (self.stdin, child.stdin.take()) {
            (Some(data), Some(mut pipe)) => Some(thread::spawn(move || pipe.write_all(&data))),
            _ => None,
        };

        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to wait for `{name}`"))?;
        let written = writer.map(|w| w.join());

        if !output.status.success() {
            bail!(failure_message(&name, &output));
        }
        match written {
            Some(Ok(result)) => result.with_context(|| format!("failed to write stdin of `{name}`"))?,
            Some(Err(_)) => bail!("stdin writer of `{name}` panicked"),
            None => {}
        }
        Ok(output)
    }
}

fn failure_message(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("`{name}` failed with {}", output.status)
    } else {
        format!("`{name}` failed with {}\n{stderr}", output.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv() {
        let cmd = Cmd::from_argv(&["npx", "", "stylus", "--print"]).cwd("/tmp");
        assert_eq!(cmd.program(), "npx");
        assert_eq!(cmd.argv.len(), 3);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_empty_command_fails() {
        let empty: [&str; 0] = [];
        assert!(Cmd::from_argv(&empty).run().is_err());
        assert!(Cmd::from_argv(&[""]).run().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_pipe() {
        let output = Cmd::from_argv(&["cat"]).stdin(b"a{b:c}").run().unwrap();
        assert_eq!(output.stdout, b"a{b:c}");
    }

    #[cfg(unix)]
    #[test]
    fn test_env_and_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let output = Cmd::from_argv(&["sh", "-c", "printf '%s' \"$CIRCUMFLEX_SOURCE\"; pwd"])
            .env("CIRCUMFLEX_SOURCE", "main.styl")
            .cwd(temp.path())
            .run()
            .unwrap();
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.starts_with("main.styl"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_carries_stderr() {
        let err = Cmd::from_argv(&["sh", "-c", "echo broken >&2; exit 3"])
            .run()
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }
}
