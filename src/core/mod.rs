// Public modules
pub mod archive;
pub mod chain;
pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod profiles;
pub mod runner;
pub mod tasks;
pub mod verify;

// Re-export common types for convenience
pub use config::ProjectConfig;
pub use error::{Error, ErrorCode, Result};
pub use executor::CommandSpec;
pub use runner::{CommandResult, CommandRunner, ShellRunner};
