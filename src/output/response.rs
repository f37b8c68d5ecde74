//! CLI response formatting and output.
//!
//! Provides JSON envelope, printing, and exit code mapping.

use mfdeploy::error::Hint;
use mfdeploy::{Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationMissingArgument
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::CommandInvocationFailed
        | ErrorCode::CommandStderr
        | ErrorCode::CommandOutputMismatch => 20,

        ErrorCode::JobFailed | ErrorCode::JobPayloadInvalid => 21,

        ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,
    }
}

pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stderr_failure_serializes_command_and_stream() {
        let err = Error::command_stderr("zowe cics refresh program MARBLE01", "CICS region down");

        let json = CliResponse::<()>::from_error(&err).to_json().unwrap();

        assert!(json.contains("\"code\": \"command.stderr\""));
        assert!(json.contains("CICS region down"));
        assert!(json.contains("\"success\": false"));
    }

    #[test]
    fn success_envelope_omits_error() {
        let data = serde_json::json!({ "command": "task.deploy" });

        let json = CliResponse::success(data).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["command"], "task.deploy");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn hints_are_omitted_when_empty() {
        let bare = CliResponse::<()>::from_error(&Error::command_stderr("x", "y"));
        assert!(bare.error.as_ref().unwrap().hints.is_none());

        let hinted = Error::command_stderr("x", "y").with_hint("Deploy stopped at 'copy-load'");
        let json = CliResponse::<()>::from_error(&hinted).to_json().unwrap();
        assert!(json.contains("Deploy stopped at 'copy-load'"));
    }

    #[test]
    fn exit_codes_by_category() {
        let (_, code) = map_cmd_result_to_json::<()>(Err(Error::command_stderr("x", "y")));
        assert_eq!(code, 20);

        let (_, code) = map_cmd_result_to_json::<()>(Err(Error::job_payload_invalid("ds", "bad", "")));
        assert_eq!(code, 21);

        let (_, code) = map_cmd_result_to_json::<()>(Err(Error::config_invalid_value("k", None, "p")));
        assert_eq!(code, 2);

        let (value, code) = map_cmd_result_to_json(Ok(("done", 0)));
        assert_eq!(code, 0);
        assert_eq!(value.unwrap(), serde_json::json!("done"));
    }
}
