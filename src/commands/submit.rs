use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use mfdeploy::archive::ArchiveLayout;
use mfdeploy::job::{self, JobCompletion, JobSubmission, DEFAULT_MAX_RC};
use mfdeploy::ShellRunner;

use super::CmdResult;

#[derive(Args)]
pub struct SubmitArgs {
    /// Data set (or member) containing the JCL to submit
    pub data_set: String,

    /// Local directory to download the job spool to
    #[arg(long, default_value = "job-archive")]
    pub dir: PathBuf,

    /// Highest acceptable completion code
    #[arg(long, default_value_t = DEFAULT_MAX_RC)]
    pub max_rc: u32,

    /// External tool executable
    #[arg(long, default_value = "zowe")]
    pub cli: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutput {
    pub command: String,
    pub request: JobSubmission,
    pub job: JobCompletion,
}

pub fn run_json(args: SubmitArgs) -> CmdResult<SubmitOutput> {
    let request = JobSubmission::new(args.data_set)
        .with_output_dir(args.dir)
        .with_max_rc(args.max_rc);

    let layout = ArchiveLayout::default();
    let job = job::submit_and_await(
        &ShellRunner::new(),
        &args.cli,
        &request,
        &layout.submission_log(),
    )?;

    Ok((
        SubmitOutput {
            command: "job.submit".to_string(),
            request,
            job,
        },
        0,
    ))
}
