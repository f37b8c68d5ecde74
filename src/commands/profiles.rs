use clap::Args;
use serde::Serialize;

use mfdeploy::profiles::{self, Credentials, Subsystem};
use mfdeploy::ShellRunner;

use super::CmdResult;
use crate::tty;

#[derive(Args)]
pub struct ProfilesArgs {
    /// Host name or IP address (prompted when omitted)
    #[arg(long)]
    pub host: Option<String>,

    /// Username (prompted when omitted)
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilesOutput {
    pub command: String,
    pub profile_name: String,
    pub profiles: Vec<Subsystem>,
}

pub fn run(args: ProfilesArgs, global: &crate::commands::GlobalArgs) -> CmdResult<ProfilesOutput> {
    let config = global.load_config()?;

    let host = match args.host {
        Some(host) => host,
        None => tty::prompt("Host name or IP address: ")?,
    };
    let user = match args.user {
        Some(user) => user,
        None => tty::prompt("Username: ")?,
    };
    let password = tty::prompt_password("Password: ")?;

    let mut missing = Vec::new();
    for (name, value) in [("host", &host), ("user", &user), ("password", &password)] {
        if value.is_empty() {
            missing.push(name.to_string());
        }
    }
    if !missing.is_empty() {
        return Err(mfdeploy::Error::validation_missing_argument(missing));
    }

    let creds = Credentials::new(host, user, password);
    profiles::bootstrap_profiles(&ShellRunner::new(), &config, &creds)?;

    Ok((
        ProfilesOutput {
            command: "profiles.bootstrap".to_string(),
            profile_name: config.profile_name,
            profiles: Subsystem::ALL.to_vec(),
        },
        0,
    ))
}
