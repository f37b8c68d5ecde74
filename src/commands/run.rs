use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use mfdeploy::archive::COMMAND_ARCHIVE;
use mfdeploy::executor;
use mfdeploy::utils::shell;
use mfdeploy::{CommandSpec, ShellRunner};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Archive name; output goes to command-archive/<TASK>
    #[arg(long, default_value = "adhoc")]
    pub task: String,

    /// Archive directory (overrides --task)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Text that must appear in stdout (repeatable)
    #[arg(long = "expect", value_name = "TEXT")]
    pub expected: Vec<String>,

    /// Command to run, after `--`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub command: String,
    pub spec: CommandSpec,
}

pub fn run_json(args: RunArgs) -> CmdResult<RunOutput> {
    let dir = args
        .dir
        .unwrap_or_else(|| PathBuf::from(COMMAND_ARCHIVE).join(&args.task));

    let mut spec = CommandSpec::new(shell::quote_args(args.command.as_slice()), dir);
    if !args.expected.is_empty() {
        spec = spec.expecting(args.expected);
    }

    executor::run(&ShellRunner::new(), &spec)?;

    Ok((
        RunOutput {
            command: "command.run".to_string(),
            spec,
        },
        0,
    ))
}
