//! Profile bootstrap: create and default one profile per subsystem.

use std::fmt;

use serde::Serialize;

use crate::chain;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::executor::CommandSpec;
use crate::runner::CommandRunner;
use crate::utils::shell::CommandLine;

/// Connection credentials collected from the operator.
#[derive(Clone)]
pub struct Credentials {
    pub host: String,
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

/// Profile types, in the order they must be created. Later profiles may rely
/// on earlier ones being the active default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Subsystem {
    Zosmf,
    Endevor,
    EndevorLocation,
    Fmp,
    Cics,
    Db2,
}

impl Subsystem {
    pub const ALL: [Subsystem; 6] = [
        Subsystem::Zosmf,
        Subsystem::Endevor,
        Subsystem::EndevorLocation,
        Subsystem::Fmp,
        Subsystem::Cics,
        Subsystem::Db2,
    ];

    /// Profile type understood by the external tool.
    pub fn profile_type(&self) -> &'static str {
        match self {
            Subsystem::Zosmf => "zosmf",
            Subsystem::Endevor => "endevor",
            Subsystem::EndevorLocation => "endevor-location",
            Subsystem::Fmp => "fmp",
            Subsystem::Cics => "cics",
            Subsystem::Db2 => "db2",
        }
    }

    fn create_command(&self, config: &ProjectConfig, creds: &Credentials) -> String {
        let base = CommandLine::new(&config.cli_path)
            .args(["profiles", "create", self.profile_type()])
            .arg(&config.profile_name);

        let with_login = |cmd: CommandLine, password_flag: &str| {
            cmd.opt("--host", &creds.host)
                .opt("--user", &creds.user)
                .opt(password_flag, &creds.password)
        };

        let cmd = match self {
            Subsystem::Zosmf => with_login(base, "--pass")
                .opt("--port", config.zosmf.port)
                .opt("--ru", config.zosmf.reject_unauthorized),
            Subsystem::Endevor => with_login(base, "--pass")
                .opt("--port", config.endevor.port)
                .opt("--ru", config.endevor.reject_unauthorized)
                .opt("--protocol", &config.endevor.protocol),
            Subsystem::EndevorLocation => base
                .opt("--instance", &config.endevor.instance)
                .opt("--environment", &config.endevor.environment)
                .opt("--system", &config.endevor.system)
                .opt("--subsystem", &config.endevor.subsystem)
                .opt("--ccid", &creds.user)
                .opt("--maxrc", 0)
                .opt("--stage-number", 1)
                .opt("--comment", &creds.user),
            Subsystem::Fmp => with_login(base, "--pass")
                .opt("--port", config.fmp.port)
                .opt("--ru", config.fmp.reject_unauthorized)
                .opt("--protocol", &config.fmp.protocol),
            Subsystem::Cics => with_login(base, "--password")
                .opt("--port", config.cics.port)
                .opt("--region-name", &config.cics.region)
                .opt("--protocol", &config.cics.protocol),
            Subsystem::Db2 => with_login(base, "--pass")
                .opt("--port", config.db2.port)
                .opt("--database", &config.db2.database),
        };

        cmd.arg("--ow").build()
    }

    fn set_command(&self, config: &ProjectConfig) -> String {
        CommandLine::new(&config.cli_path)
            .args(["profiles", "set", self.profile_type()])
            .arg(&config.profile_name)
            .build()
    }
}

/// The twelve create/set commands, paired per subsystem in bootstrap order.
pub fn bootstrap_commands(config: &ProjectConfig, creds: &Credentials) -> Vec<CommandSpec> {
    let layout = config.archive_layout();

    Subsystem::ALL
        .iter()
        .flat_map(|subsystem| {
            let kind = subsystem.profile_type();
            [
                CommandSpec::new(
                    subsystem.create_command(config, creds),
                    layout.command_dir(&format!("create-{}-profile", kind)),
                )
                .with_secret(&creds.password),
                CommandSpec::new(
                    subsystem.set_command(config),
                    layout.command_dir(&format!("set-{}-profile", kind)),
                ),
            ]
        })
        .collect()
}

/// Create and default every project profile, stopping at the first failure.
pub fn bootstrap_profiles(
    runner: &dyn CommandRunner,
    config: &ProjectConfig,
    creds: &Credentials,
) -> Result<()> {
    chain::run_all(runner, &bootstrap_commands(config, creds))
}
