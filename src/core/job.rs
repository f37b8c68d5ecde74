//! Batch job submission with return-code acceptance.
//!
//! Waiting for the job to finish is left to the external tool: the submit
//! command only returns once the job has completed, and prints a JSON
//! response whose `data.retcode` looks like `CC 0004`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::archive::JOB_ARCHIVE;
use crate::error::{Error, JobFailedDetails, Result};
use crate::executor::{self, CommandSpec};
use crate::runner::CommandRunner;
use crate::utils::shell::CommandLine;

pub const DEFAULT_MAX_RC: u32 = 0;

/// A data set to submit, where to download its spool, and the highest
/// acceptable completion code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSubmission {
    pub data_set: String,
    pub output_dir: PathBuf,
    pub max_rc: u32,
}

impl JobSubmission {
    pub fn new(data_set: impl Into<String>) -> Self {
        Self {
            data_set: data_set.into(),
            output_dir: PathBuf::from(JOB_ARCHIVE),
            max_rc: DEFAULT_MAX_RC,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_max_rc(mut self, max_rc: u32) -> Self {
        self.max_rc = max_rc;
        self
    }

    /// `<cli> jobs submit data-set <ds> -d <dir> --rfj`
    pub fn command(&self, cli: &str) -> String {
        CommandLine::new(cli)
            .args(["jobs", "submit", "data-set"])
            .arg(&self.data_set)
            .opt("-d", self.output_dir.to_string_lossy())
            .arg("--rfj")
            .build()
    }
}

/// Completion status of a job, after parsing its `retcode` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnCode {
    /// `CC nnnn`
    Completed(u32),
    /// Anything else: `ABEND S0C4`, `JCL ERROR`, `SEC ERROR`...
    Abnormal(String),
}

impl ReturnCode {
    pub fn parse(retcode: &str) -> Self {
        let mut tokens = retcode.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some("CC"), Some(code), None) => match code.parse::<u32>() {
                Ok(n) => ReturnCode::Completed(n),
                Err(_) => ReturnCode::Abnormal(retcode.to_string()),
            },
            _ => ReturnCode::Abnormal(retcode.to_string()),
        }
    }

    pub fn is_accepted(&self, max_rc: u32) -> bool {
        matches!(self, ReturnCode::Completed(n) if *n <= max_rc)
    }
}

/// `data` object of the submit response. Unknown fields are kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCompletion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub retcode: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobCompletion {
    pub fn return_code(&self) -> Option<ReturnCode> {
        self.retcode.as_deref().map(ReturnCode::parse)
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    data: Option<Value>,
}

/// Parse the JSON printed by the submit command. Fails closed on anything
/// that is not an object with a `data.retcode` string.
pub fn parse_completion(data_set: &str, stdout: &str) -> Result<JobCompletion> {
    let response: SubmitResponse = serde_json::from_str(stdout).map_err(|e| {
        Error::job_payload_invalid(data_set, format!("not JSON: {}", e), stdout)
    })?;

    let data = response
        .data
        .filter(Value::is_object)
        .ok_or_else(|| Error::job_payload_invalid(data_set, "missing 'data' object", stdout))?;

    let completion: JobCompletion = serde_json::from_value(data).map_err(|e| {
        Error::job_payload_invalid(data_set, format!("unexpected 'data' shape: {}", e), stdout)
    })?;

    if completion.retcode.is_none() {
        return Err(Error::job_payload_invalid(
            data_set,
            "missing 'retcode'",
            stdout,
        ));
    }

    Ok(completion)
}

/// Submit a job, wait for it through the external tool, and accept it when
/// its completion code is at most `max_rc`.
///
/// The raw response is archived under `submission_log` and under the
/// request's own output directory.
pub fn submit_and_await(
    runner: &dyn CommandRunner,
    cli: &str,
    request: &JobSubmission,
    submission_log: &Path,
) -> Result<JobCompletion> {
    let spec = CommandSpec::new(request.command(cli), &request.output_dir);
    let result = executor::invoke(
        runner,
        &spec,
        &[submission_log, request.output_dir.as_path()],
    );
    executor::classify(&spec, &result)?;

    let completion = parse_completion(&request.data_set, &result.stdout)?;
    let retcode = completion.retcode.clone().unwrap_or_default();
    let accepted = completion
        .return_code()
        .is_some_and(|rc| rc.is_accepted(request.max_rc));

    if accepted {
        tracing::info!(
            data_set = %request.data_set,
            jobid = completion.jobid.as_deref().unwrap_or("?"),
            %retcode,
            "job accepted"
        );
        return Ok(completion);
    }

    let payload = serde_json::to_value(&completion).unwrap_or(Value::Null);
    Err(Error::job_failed(JobFailedDetails {
        data_set: request.data_set.clone(),
        retcode,
        max_rc: request.max_rc,
        payload,
    }))
}
