//! Named build and deploy tasks.
//!
//! Each task maps to one command, one job submission, or (for `deploy`) a
//! fixed fail-fast sequence of other tasks.

use serde::Serialize;

use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::executor::{self, CommandSpec};
use crate::job::{self, JobCompletion, JobSubmission};
use crate::runner::CommandRunner;
use crate::utils::shell::CommandLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    BuildCobol,
    CicsRefresh,
    CopyDbrm,
    CopyLoad,
    BindNGrant,
    Deploy,
}

impl Task {
    pub const ALL: [Task; 6] = [
        Task::BuildCobol,
        Task::CicsRefresh,
        Task::CopyDbrm,
        Task::CopyLoad,
        Task::BindNGrant,
        Task::Deploy,
    ];

    pub const DEPLOY_SEQUENCE: [Task; 4] = [
        Task::CopyDbrm,
        Task::CopyLoad,
        Task::BindNGrant,
        Task::CicsRefresh,
    ];

    /// Name used on the command line and as the archive subdirectory.
    pub fn name(&self) -> &'static str {
        match self {
            Task::BuildCobol => "build-cobol",
            Task::CicsRefresh => "cics-refresh",
            Task::CopyDbrm => "copy-dbrm",
            Task::CopyLoad => "copy-load",
            Task::BindNGrant => "bind-n-grant",
            Task::Deploy => "deploy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Task::BuildCobol => "Build COBOL element",
            Task::CicsRefresh => "Refresh (new-copy) the CICS program",
            Task::CopyDbrm => "Copy DBRMLIB to test environment",
            Task::CopyLoad => "Copy LOADLIB to test environment",
            Task::BindNGrant => "Bind & Grant job",
            Task::Deploy => "Deploy program (copy-dbrm, copy-load, bind-n-grant, cics-refresh)",
        }
    }

    pub fn from_name(name: &str) -> Result<Task> {
        Task::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| {
                Error::validation_invalid_argument(
                    "task",
                    format!("Unknown task '{}'", name),
                    Some(name.to_string()),
                    Some(Task::ALL.iter().map(|t| t.name().to_string()).collect()),
                )
            })
    }
}

/// What a task did before returning successfully.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub task: Task,
    pub completed: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<JobCompletion>,
}

impl TaskReport {
    fn new(task: Task) -> Self {
        Self {
            task,
            completed: Vec::new(),
            jobs: Vec::new(),
        }
    }
}

/// `<cli> endevor generate element <element> --type COBOL ...`
pub fn build_cobol_command(config: &ProjectConfig) -> CommandSpec {
    let command = CommandLine::new(&config.cli_path)
        .args(["endevor", "generate", "element"])
        .arg(&config.deploy.test_element)
        .opt("--type", "COBOL")
        .arg("--override-signout")
        .opt("--maxrc", 0)
        .opt("--stage-number", 1)
        .build();

    CommandSpec::new(command, config.archive_layout().command_dir(Task::BuildCobol.name()))
}

/// `<cli> cics refresh program <program>`
pub fn cics_refresh_command(config: &ProjectConfig) -> CommandSpec {
    let command = CommandLine::new(&config.cli_path)
        .args(["cics", "refresh", "program"])
        .arg(&config.cics.program)
        .build();

    CommandSpec::new(command, config.archive_layout().command_dir(Task::CicsRefresh.name()))
}

/// Copy the element's member from the dev library to the test library.
fn copy_command(config: &ProjectConfig, task: Task, from: &str, to: &str) -> CommandSpec {
    let command = CommandLine::new(&config.cli_path)
        .args(["file-master-plus", "copy", "data-set", from, to])
        .opt("-m", &config.deploy.test_element)
        .build();

    CommandSpec::new(command, config.archive_layout().command_dir(task.name()))
}

pub fn copy_dbrm_command(config: &ProjectConfig) -> CommandSpec {
    copy_command(
        config,
        Task::CopyDbrm,
        &config.deploy.dev_dbrmlib,
        &config.deploy.test_dbrmlib,
    )
}

pub fn copy_load_command(config: &ProjectConfig) -> CommandSpec {
    copy_command(
        config,
        Task::CopyLoad,
        &config.deploy.dev_loadlib,
        &config.deploy.test_loadlib,
    )
}

pub fn bind_grant_submission(config: &ProjectConfig) -> JobSubmission {
    JobSubmission::new(&config.deploy.bind_grant_jcl)
        .with_output_dir(config.archive_layout().job_dir(Task::BindNGrant.name()))
        .with_max_rc(config.deploy.bind_grant_max_rc)
}

/// Run one task to completion or first failure.
pub fn run(runner: &dyn CommandRunner, config: &ProjectConfig, task: Task) -> Result<TaskReport> {
    let mut report = TaskReport::new(task);

    if task == Task::Deploy {
        for (index, step) in Task::DEPLOY_SEQUENCE.iter().enumerate() {
            crate::log_status!("deploy", "{}/{} {}", index + 1, Task::DEPLOY_SEQUENCE.len(), step.name());
            run_step(runner, config, *step, &mut report).map_err(|err| {
                let done: Vec<_> = report.completed.iter().map(|t| t.name()).collect();
                let err = err.with_hint(format!("Deploy stopped at '{}'", step.name()));
                if done.is_empty() {
                    err
                } else {
                    err.with_hint(format!(
                        "Already applied and not rolled back: {}",
                        done.join(", ")
                    ))
                }
            })?;
        }
    } else {
        crate::log_status!("task", "{}", task.name());
        run_step(runner, config, task, &mut report)?;
    }

    Ok(report)
}

fn run_step(
    runner: &dyn CommandRunner,
    config: &ProjectConfig,
    task: Task,
    report: &mut TaskReport,
) -> Result<()> {
    match task {
        Task::BuildCobol => executor::run(runner, &build_cobol_command(config))?,
        Task::CicsRefresh => executor::run(runner, &cics_refresh_command(config))?,
        Task::CopyDbrm => executor::run(runner, &copy_dbrm_command(config))?,
        Task::CopyLoad => executor::run(runner, &copy_load_command(config))?,
        Task::BindNGrant => {
            let layout = config.archive_layout();
            let completion = job::submit_and_await(
                runner,
                &config.cli_path,
                &bind_grant_submission(config),
                &layout.submission_log(),
            )?;
            report.jobs.push(completion);
        }
        Task::Deploy => {
            return Err(Error::internal_unexpected("deploy cannot be nested"));
        }
    }

    report.completed.push(task);
    Ok(())
}
