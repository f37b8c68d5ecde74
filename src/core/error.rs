use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    CommandInvocationFailed,
    CommandStderr,
    CommandOutputMismatch,

    JobFailed,
    JobPayloadInvalid,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::CommandInvocationFailed => "command.invocation_failed",
            ErrorCode::CommandStderr => "command.stderr",
            ErrorCode::CommandOutputMismatch => "command.output_mismatch",

            ErrorCode::JobFailed => "job.failed",
            ErrorCode::JobPayloadInvalid => "job.payload_invalid",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInvocationFailedDetails {
    pub command: String,
    pub error: String,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandStderrDetails {
    pub command: String,
    pub stderr: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutputMismatchDetails {
    pub missing: String,
    pub output: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFailedDetails {
    pub data_set: String,
    pub retcode: String,
    pub max_rc: u32,
    pub payload: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayloadInvalidDetails {
    pub data_set: String,
    pub problem: String,
    pub payload: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.clone(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            format!("Invalid argument: {}", problem),
            details,
        )
    }

    /// The process could not be started or exited unsuccessfully.
    pub fn command_invocation_failed(details: CommandInvocationFailedDetails) -> Self {
        let message = format!(
            "Command failed:\n{}\n{}",
            details.command, details.error
        );
        Self::new(
            ErrorCode::CommandInvocationFailed,
            message,
            to_details(details),
        )
        .with_hint("Inspect the archived output for the full diagnostics")
    }

    /// The process ran but wrote diagnostics to stderr.
    pub fn command_stderr(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        let command = command.into();
        let stderr = stderr.into();
        let message = format!("\nCommand:\n{}\n{}", command, stderr);

        Self::new(
            ErrorCode::CommandStderr,
            message,
            to_details(CommandStderrDetails { command, stderr }),
        )
    }

    pub fn command_output_mismatch(missing: impl Into<String>, output: impl Into<String>) -> Self {
        let missing = missing.into();
        let output = output.into();
        let message = format!("{} not found in response: {}", missing, output);

        Self::new(
            ErrorCode::CommandOutputMismatch,
            message,
            to_details(CommandOutputMismatchDetails { missing, output }),
        )
    }

    pub fn job_failed(details: JobFailedDetails) -> Self {
        let pretty = serde_json::to_string_pretty(&details.payload).unwrap_or_default();
        let message = format!(
            "Job did not complete successfully ({} exceeds max RC {}). Additional diagnostics:{}",
            details.retcode, details.max_rc, pretty
        );

        Self::new(ErrorCode::JobFailed, message, to_details(details))
    }

    pub fn job_payload_invalid(
        data_set: impl Into<String>,
        problem: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        let details = to_details(JobPayloadInvalidDetails {
            data_set: data_set.into(),
            problem: problem.clone(),
            payload: payload.into(),
        });

        Self::new(
            ErrorCode::JobPayloadInvalid,
            format!("Unreadable job submission response: {}", problem),
            details,
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            to_details(ConfigInvalidJsonDetails {
                path: path.into(),
                error: err.to_string(),
            }),
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let problem = problem.into();
        let message = format!("Invalid configuration value for '{}': {}", key, problem);

        Self::new(
            ErrorCode::ConfigInvalidValue,
            message,
            to_details(ConfigInvalidValueDetails {
                key,
                value,
                problem,
            }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(ctx) => format!("IO error ({}): {}", ctx, error),
            None => format!("IO error: {}", error),
        };

        Self::new(
            ErrorCode::InternalIoError,
            message,
            to_details(InternalIoErrorDetails { error, context }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalJsonErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
