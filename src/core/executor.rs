//! Single command execution: invoke, archive, classify.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CommandInvocationFailedDetails, Error, Result};
use crate::runner::{CommandResult, CommandRunner};
use crate::utils::shell;
use crate::verify;

/// One external command plus where its output goes and what it must contain.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    command: String,
    output_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_outputs: Option<Vec<String>>,
    #[serde(skip)]
    secrets: Vec<String>,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            output_dir: output_dir.into(),
            expected_outputs: None,
            secrets: Vec::new(),
        }
    }

    pub fn expecting<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_outputs = Some(expected.into_iter().map(Into::into).collect());
        self
    }

    /// Values masked whenever the command line is logged or reported.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secrets.push(secret.into());
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn expected_outputs(&self) -> Option<&[String]> {
        self.expected_outputs.as_deref()
    }

    /// Command line with secrets masked.
    pub fn display_command(&self) -> String {
        shell::redact(&self.command, &self.secrets)
    }
}

/// Run one command, archive its output, and classify the outcome.
///
/// Priority: process error, then stderr, then expected output, then success.
pub fn run(runner: &dyn CommandRunner, spec: &CommandSpec) -> Result<()> {
    let result = invoke(runner, spec, &[spec.output_dir()]);
    classify(spec, &result)?;

    if let Some(expected) = spec.expected_outputs() {
        verify::verify(&result.stdout, expected)?;
    }

    Ok(())
}

/// Invoke the command and archive the captured result under every `dir`.
pub(crate) fn invoke(
    runner: &dyn CommandRunner,
    spec: &CommandSpec,
    archive_dirs: &[&Path],
) -> CommandResult {
    tracing::debug!(command = %spec.display_command(), "running command");

    let mut result = runner.run(spec.command());
    if !spec.secrets.is_empty() {
        result.stdout = shell::redact(&result.stdout, &spec.secrets);
        result.stderr = shell::redact(&result.stderr, &spec.secrets);
        result.error = result.error.map(|e| shell::redact(&e, &spec.secrets));
    }

    for dir in archive_dirs {
        crate::archive::archive_result(dir, &result);
    }

    result
}

/// Process-level and stderr failures shared by plain commands and job submission.
pub(crate) fn classify(spec: &CommandSpec, result: &CommandResult) -> Result<()> {
    if let Some(error) = &result.error {
        return Err(Error::command_invocation_failed(
            CommandInvocationFailedDetails {
                command: spec.display_command(),
                error: error.clone(),
                stdout: result.stdout.clone(),
                stderr: result.stderr.clone(),
            },
        ));
    }

    if result.has_stderr() {
        return Err(Error::command_stderr(
            spec.display_command(),
            result.stderr.clone(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::cell::RefCell;
    use std::fs;

    struct Scripted {
        result: CommandResult,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(result: CommandResult) -> Self {
            Self {
                result,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for Scripted {
        fn run(&self, command: &str) -> CommandResult {
            self.seen.borrow_mut().push(command.to_string());
            self.result.clone()
        }
    }

    fn archived(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .map(|entries| {
                entries
                    .map(|e| fs::read_to_string(e.unwrap().path()).unwrap())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn plain_success() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Scripted::new(CommandResult::success("done"));
        let spec = CommandSpec::new("zowe cics refresh program X", tmp.path().join("refresh"));

        run(&runner, &spec).unwrap();

        assert_eq!(*runner.seen.borrow(), vec!["zowe cics refresh program X"]);
        assert_eq!(archived(&tmp.path().join("refresh")), vec!["Error:\n\nStdErr:\n\nData:\ndone"]);
    }

    #[test]
    fn invocation_error_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Scripted::new(CommandResult::failed("exited with status 1").with_stderr("bad"));
        let spec = CommandSpec::new("zowe x", tmp.path());

        let err = run(&runner, &spec).unwrap_err();

        assert_eq!(err.code, ErrorCode::CommandInvocationFailed);
        assert_eq!(err.details["error"], "exited with status 1");
        assert_eq!(archived(tmp.path()).len(), 1);
    }

    #[test]
    fn stderr_fails_even_when_expected_output_matches() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Scripted::new(CommandResult::success("NEWCOPY OK").with_stderr("deprecated flag"));
        let spec = CommandSpec::new("zowe x", tmp.path()).expecting(["NEWCOPY OK"]);

        let err = run(&runner, &spec).unwrap_err();

        assert_eq!(err.code, ErrorCode::CommandStderr);
        assert!(err.message.contains("zowe x"));
        assert!(err.message.contains("deprecated flag"));
    }

    #[test]
    fn expected_output_is_verified() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Scripted::new(CommandResult::success("element generated"));

        let ok = CommandSpec::new("zowe x", tmp.path()).expecting(["generated"]);
        assert!(run(&runner, &ok).is_ok());

        let missing = CommandSpec::new("zowe x", tmp.path()).expecting(["generated", "RC=0"]);
        let err = run(&runner, &missing).unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandOutputMismatch);
        assert_eq!(err.details["missing"], "RC=0");
    }

    #[test]
    fn archive_failure_does_not_change_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let ok = Scripted::new(CommandResult::success("fine"));
        assert!(run(&ok, &CommandSpec::new("zowe x", blocker.join("sub"))).is_ok());

        let bad = Scripted::new(CommandResult::success("").with_stderr("boom"));
        let err = run(&bad, &CommandSpec::new("zowe x", blocker.join("sub"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::CommandStderr);
    }

    #[test]
    fn secrets_are_masked_in_errors_and_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Scripted::new(CommandResult::success("").with_stderr("auth failed for hunter2"));
        let spec = CommandSpec::new("zowe profiles create zosmf zw --pass hunter2", tmp.path())
            .with_secret("hunter2");

        let err = run(&runner, &spec).unwrap_err();

        assert!(!err.message.contains("hunter2"));
        assert!(err.message.contains("--pass ****"));
        assert!(!archived(tmp.path())[0].contains("hunter2"));
        assert_eq!(runner.seen.borrow()[0], spec.command());
    }
}
