//! Process boundary for the external tool.
//!
//! Everything the crate knows about the mainframe comes back through
//! [`CommandRunner::run`] as three captured streams.

use std::process::Command;

/// Captured result of one external invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Process-level failure: spawn error or non-zero exit.
    pub error: Option<String>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            error: None,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn has_stderr(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// Runs a fully assembled command line and blocks until it exits.
pub trait CommandRunner {
    fn run(&self, command: &str) -> CommandResult;
}

/// Runs commands through the platform shell in the current directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> CommandResult {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        };

        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };

        match cmd.output() {
            Ok(out) => {
                let error = if out.status.success() {
                    None
                } else {
                    Some(match out.status.code() {
                        Some(code) => format!("exited with status {}", code),
                        None => "terminated by signal".to_string(),
                    })
                };

                CommandResult {
                    error,
                    stdout: String::from_utf8_lossy(&out.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&out.stderr).to_string(),
                }
            }
            Err(e) => CommandResult::failed(format!("failed to start: {}", e)),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_stdout() {
        let result = ShellRunner::new().run("echo hello");
        assert_eq!(result.error, None);
        assert_eq!(result.stdout, "hello\n");
        assert!(!result.has_stderr());
    }

    #[test]
    fn captures_stderr_without_error() {
        let result = ShellRunner::new().run("echo oops 1>&2");
        assert_eq!(result.error, None);
        assert_eq!(result.stderr, "oops\n");
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let result = ShellRunner::new().run("exit 3");
        assert_eq!(result.error.as_deref(), Some("exited with status 3"));
    }
}
