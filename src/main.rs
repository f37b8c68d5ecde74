use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{profiles, run, submit};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "mfdeploy")]
#[command(version = VERSION)]
#[command(about = "Sequence mainframe build and deploy commands with archived diagnostics")]
struct Cli {
    /// Project configuration file
    #[arg(long, global = true, default_value = mfdeploy::config::DEFAULT_CONFIG_FILE)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create project profiles and set them as default
    #[command(alias = "setup-profiles")]
    Profiles(profiles::ProfilesArgs),
    /// Build COBOL element
    BuildCobol,
    /// Refresh (new-copy) the CICS program
    CicsRefresh,
    /// Copy DBRMLIB to test environment
    CopyDbrm,
    /// Copy LOADLIB to test environment
    CopyLoad,
    /// Submit the Bind & Grant job
    BindNGrant,
    /// Deploy program: copy-dbrm, copy-load, bind-n-grant, cics-refresh
    Deploy,
    /// Run a single external command with archiving and output checks
    Run(run::RunArgs),
    /// Submit a job and wait for its completion code
    Submit(submit::SubmitArgs),
    /// List available tasks
    Tasks,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("MFDEPLOY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> std::process::ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let global = GlobalArgs {
        config_path: cli.config,
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        tracing::error!(error = %err, "failed to print response");
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
