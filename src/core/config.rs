//! Project configuration: connection parameters per subsystem and the data
//! sets the deploy tasks operate on.
//!
//! Loaded once at startup and passed by reference to everything that needs it.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::archive::ArchiveLayout;
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "mfdeploy.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Executable of the external tool.
    #[serde(default = "default_cli_path")]
    pub cli_path: String,

    /// Name given to every profile created by the bootstrap workflow.
    #[serde(default = "default_profile_name")]
    pub profile_name: String,

    /// Directory under which `command-archive/` and `job-archive/` live.
    #[serde(default = "default_archive_root")]
    pub archive_root: PathBuf,

    pub zosmf: ZosmfConfig,
    pub endevor: EndevorConfig,
    pub fmp: FmpConfig,
    pub cics: CicsConfig,
    pub db2: Db2Config,
    pub deploy: DeployConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZosmfConfig {
    pub port: u16,
    #[serde(default)]
    pub reject_unauthorized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndevorConfig {
    pub port: u16,
    #[serde(default)]
    pub reject_unauthorized: bool,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    pub instance: String,
    pub environment: String,
    pub system: String,
    pub subsystem: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpConfig {
    pub port: u16,
    #[serde(default)]
    pub reject_unauthorized: bool,
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CicsConfig {
    pub port: u16,
    pub region: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Program refreshed after deploy.
    pub program: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Db2Config {
    pub port: u16,
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployConfig {
    pub test_element: String,
    pub dev_dbrmlib: String,
    pub test_dbrmlib: String,
    pub dev_loadlib: String,
    pub test_loadlib: String,
    pub bind_grant_jcl: String,
    #[serde(default = "default_bind_grant_max_rc")]
    pub bind_grant_max_rc: u32,
}

fn default_cli_path() -> String {
    "zowe".to_string()
}

fn default_profile_name() -> String {
    "zw".to_string()
}

fn default_archive_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_bind_grant_max_rc() -> u32 {
    4
}

impl ProjectConfig {
    pub fn from_json(content: &str, source: &str) -> Result<Self> {
        let config: ProjectConfig = serde_json::from_str(content)
            .map_err(|e| Error::config_invalid_json(source, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file. `~` and environment variables in the
    /// path are expanded.
    pub fn load(path: &str) -> Result<Self> {
        let expanded = expand_path(path);

        if !expanded.exists() {
            return Err(Error::internal_io(
                format!("Config file not found: {}", expanded.display()),
                Some("load config".to_string()),
            )
            .with_hint(format!(
                "Create {} or pass --config <path>",
                DEFAULT_CONFIG_FILE
            )));
        }

        let content = fs::read_to_string(&expanded).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read {}", expanded.display())))
        })?;

        let mut config = Self::from_json(&content, &expanded.display().to_string())?;
        config.archive_root = expand_path(&config.archive_root.to_string_lossy());
        Ok(config)
    }

    pub fn archive_layout(&self) -> ArchiveLayout {
        ArchiveLayout::new(&self.archive_root)
    }

    /// Reject values that would produce a malformed command line.
    pub fn validate(&self) -> Result<()> {
        require("cliPath", &self.cli_path)?;
        require("profileName", &self.profile_name)?;

        let ports = [
            ("zosmf.port", self.zosmf.port),
            ("endevor.port", self.endevor.port),
            ("fmp.port", self.fmp.port),
            ("cics.port", self.cics.port),
            ("db2.port", self.db2.port),
        ];
        for (key, port) in ports {
            if port == 0 {
                return Err(Error::config_invalid_value(
                    key,
                    Some("0".to_string()),
                    "port must be between 1 and 65535",
                ));
            }
        }

        let strings = [
            ("endevor.protocol", &self.endevor.protocol),
            ("endevor.instance", &self.endevor.instance),
            ("endevor.environment", &self.endevor.environment),
            ("endevor.system", &self.endevor.system),
            ("endevor.subsystem", &self.endevor.subsystem),
            ("fmp.protocol", &self.fmp.protocol),
            ("cics.region", &self.cics.region),
            ("cics.protocol", &self.cics.protocol),
            ("cics.program", &self.cics.program),
            ("db2.database", &self.db2.database),
            ("deploy.testElement", &self.deploy.test_element),
            ("deploy.devDbrmlib", &self.deploy.dev_dbrmlib),
            ("deploy.testDbrmlib", &self.deploy.test_dbrmlib),
            ("deploy.devLoadlib", &self.deploy.dev_loadlib),
            ("deploy.testLoadlib", &self.deploy.test_loadlib),
            ("deploy.bindGrantJcl", &self.deploy.bind_grant_jcl),
        ];
        for (key, value) in strings {
            require(key, value)?;
        }

        Ok(())
    }
}

fn require(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::config_invalid_value(
            key,
            Some(value.to_string()),
            "must not be empty",
        ));
    }
    Ok(())
}

fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(path),
    }
}
