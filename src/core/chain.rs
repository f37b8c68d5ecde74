//! Fail-fast sequential execution of independent commands.

use crate::error::Result;
use crate::executor::{self, CommandSpec};
use crate::runner::CommandRunner;

/// Run every command in order, stopping at the first failure.
///
/// The slice is only read; commands after a failing one are never invoked and
/// side effects of earlier commands are left in place. An empty slice succeeds.
pub fn run_all(runner: &dyn CommandRunner, specs: &[CommandSpec]) -> Result<()> {
    let total = specs.len();

    for (index, spec) in specs.iter().enumerate() {
        tracing::debug!(step = index + 1, total, "chain step");
        if let Err(err) = executor::run(runner, spec) {
            tracing::debug!(
                step = index + 1,
                total,
                skipped = total - index - 1,
                "chain stopped"
            );
            return Err(err);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::runner::CommandResult;
    use std::cell::RefCell;

    /// Fails the command whose text matches `fail_on`.
    struct Recording {
        fail_on: Option<String>,
        calls: RefCell<Vec<String>>,
    }

    impl Recording {
        fn new(fail_on: Option<&str>) -> Self {
            Self {
                fail_on: fail_on.map(str::to_string),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for Recording {
        fn run(&self, command: &str) -> CommandResult {
            self.calls.borrow_mut().push(command.to_string());
            if self.fail_on.as_deref() == Some(command) {
                CommandResult::success("").with_stderr("failed")
            } else {
                CommandResult::success("ok")
            }
        }
    }

    fn specs(dir: &std::path::Path, n: usize) -> Vec<CommandSpec> {
        (0..n)
            .map(|i| CommandSpec::new(format!("cmd-{}", i), dir.join(format!("step-{}", i))))
            .collect()
    }

    #[test]
    fn empty_chain_succeeds_without_invocations() {
        let runner = Recording::new(None);
        assert!(run_all(&runner, &[]).is_ok());
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn drains_every_command_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Recording::new(None);

        run_all(&runner, &specs(tmp.path(), 4)).unwrap();

        assert_eq!(
            *runner.calls.borrow(),
            vec!["cmd-0", "cmd-1", "cmd-2", "cmd-3"]
        );
    }

    #[test]
    fn stops_at_first_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Recording::new(Some("cmd-2"));

        let err = run_all(&runner, &specs(tmp.path(), 6)).unwrap_err();

        assert_eq!(err.code, ErrorCode::CommandStderr);
        assert!(err.message.contains("cmd-2"));
        assert_eq!(runner.calls.borrow().len(), 3);
        assert!(!tmp.path().join("step-3").exists());
    }

    #[test]
    fn failure_at_every_position() {
        let tmp = tempfile::tempdir().unwrap();
        let list = specs(tmp.path(), 5);

        for i in 0..5 {
            let name = format!("cmd-{}", i);
            let runner = Recording::new(Some(name.as_str()));
            assert!(run_all(&runner, &list).is_err());
            assert_eq!(runner.calls.borrow().len(), i + 1);
        }
    }

    #[test]
    fn caller_list_is_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let list = specs(tmp.path(), 3);
        let runner = Recording::new(None);

        run_all(&runner, &list).unwrap();
        run_all(&runner, &list).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(runner.calls.borrow().len(), 6);
    }
}
