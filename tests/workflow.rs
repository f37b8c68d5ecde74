use std::cell::RefCell;
use std::fs;
use std::path::Path;

use mfdeploy::chain;
use mfdeploy::profiles::{bootstrap_profiles, Credentials};
use mfdeploy::tasks::{self, Task};
use mfdeploy::{CommandResult, CommandRunner, CommandSpec, ErrorCode, ProjectConfig};

const CONFIG: &str = r#"{
    "cliPath": "zowe",
    "profileName": "zw",
    "zosmf":   { "port": 443 },
    "endevor": { "port": 6002, "instance": "ENDEVOR", "environment": "DEV",
                 "system": "MARBLES", "subsystem": "MARBLES" },
    "fmp":     { "port": 6001 },
    "cics":    { "port": 6000, "region": "CICSTRN1", "program": "MARBLE01" },
    "db2":     { "port": 6017, "database": "DBNAME" },
    "deploy":  { "testElement": "MARBLE01",
                 "devDbrmlib": "HLQ.DEV.DBRMLIB", "testDbrmlib": "HLQ.TEST.DBRMLIB",
                 "devLoadlib": "HLQ.DEV.LOADLIB", "testLoadlib": "HLQ.TEST.LOADLIB",
                 "bindGrantJcl": "HLQ.MARBLES.JCL(BINDGRNT)", "bindGrantMaxRc": 4 }
}"#;

/// Replays scripted results in order; anything past the script succeeds.
struct Replay {
    script: RefCell<Vec<CommandResult>>,
    calls: RefCell<Vec<String>>,
}

impl Replay {
    fn new(mut script: Vec<CommandResult>) -> Self {
        script.reverse();
        Self {
            script: RefCell::new(script),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl CommandRunner for Replay {
    fn run(&self, command: &str) -> CommandResult {
        self.calls.borrow_mut().push(command.to_string());
        self.script
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| CommandResult::success("ok"))
    }
}

fn config(root: &Path) -> ProjectConfig {
    let path = root.join("mfdeploy.json");
    fs::write(&path, CONFIG).unwrap();
    let mut config = ProjectConfig::load(&path.to_string_lossy()).unwrap();
    config.archive_root = root.to_path_buf();
    config
}

fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn bootstrap_runs_twelve_commands_and_archives_each() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = Replay::new(vec![]);
    let creds = Credentials::new("mf.example.com", "IBMUSER", "sys1");

    bootstrap_profiles(&runner, &config(tmp.path()), &creds).unwrap();

    assert_eq!(runner.calls(), 12);
    let archive = tmp.path().join("command-archive");
    assert_eq!(entries(&archive), 12);
    assert_eq!(entries(&archive.join("create-cics-profile")), 1);
}

#[test]
fn bootstrap_third_failure_leaves_remaining_nine_unrun() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = Replay::new(vec![
        CommandResult::success("created"),
        CommandResult::success("set"),
        CommandResult::success("").with_stderr("Unable to connect to Endevor"),
    ]);
    let creds = Credentials::new("mf.example.com", "IBMUSER", "sys1");

    let err = bootstrap_profiles(&runner, &config(tmp.path()), &creds).unwrap_err();

    assert_eq!(err.code, ErrorCode::CommandStderr);
    assert!(err.message.contains("Unable to connect to Endevor"));
    assert_eq!(runner.calls(), 3);
    assert_eq!(entries(&tmp.path().join("command-archive")), 3);
}

#[test]
fn chain_with_verification_failure_in_the_middle() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = Replay::new(vec![
        CommandResult::success("NEWCOPY successful"),
        CommandResult::success("nothing useful"),
    ]);
    let specs = vec![
        CommandSpec::new("first", tmp.path().join("a")).expecting(["NEWCOPY"]),
        CommandSpec::new("second", tmp.path().join("b")).expecting(["NEWCOPY"]),
        CommandSpec::new("third", tmp.path().join("c")),
    ];

    let err = chain::run_all(&runner, &specs).unwrap_err();

    assert_eq!(err.code, ErrorCode::CommandOutputMismatch);
    assert_eq!(err.details["output"], "nothing useful");
    assert_eq!(runner.calls(), 2);
    assert_eq!(entries(&tmp.path().join("c")), 0);
}

#[test]
fn deploy_archives_job_response_twice() {
    let tmp = tempfile::tempdir().unwrap();
    let job = serde_json::json!({
        "success": true,
        "data": { "jobid": "JOB00099", "jobname": "BINDGRNT", "retcode": "CC 0004" }
    });
    let runner = Replay::new(vec![
        CommandResult::success("copied"),
        CommandResult::success("copied"),
        CommandResult::success(job.to_string()),
        CommandResult::success("refreshed"),
    ]);

    let report = tasks::run(&runner, &config(tmp.path()), Task::Deploy).unwrap();

    assert_eq!(report.completed.len(), 4);
    assert_eq!(report.jobs[0].jobid.as_deref(), Some("JOB00099"));
    assert_eq!(entries(&tmp.path().join("command-archive/job-submission")), 1);
    assert_eq!(entries(&tmp.path().join("job-archive/bind-n-grant")), 1);
}

#[test]
fn deploy_with_malformed_job_response_fails_closed() {
    let tmp = tempfile::tempdir().unwrap();
    let runner = Replay::new(vec![
        CommandResult::success("copied"),
        CommandResult::success("copied"),
        CommandResult::success("Waiting for job completion..."),
    ]);

    let err = tasks::run(&runner, &config(tmp.path()), Task::Deploy).unwrap_err();

    assert_eq!(err.code, ErrorCode::JobPayloadInvalid);
    assert_eq!(runner.calls(), 3);
}
