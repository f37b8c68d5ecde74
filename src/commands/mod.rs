use mfdeploy::ProjectConfig;

pub type CmdResult<T> = mfdeploy::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub config_path: String,
}

impl GlobalArgs {
    pub fn load_config(&self) -> mfdeploy::Result<ProjectConfig> {
        ProjectConfig::load(&self.config_path)
    }
}

pub mod profiles;
pub mod run;
pub mod submit;
pub mod task;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run_json($args))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (mfdeploy::Result<serde_json::Value>, i32) {
    use mfdeploy::tasks::Task;

    crate::tty::status("mfdeploy is working...");

    match command {
        // Commands without project configuration
        crate::Commands::Run(args) => dispatch!(args, run),
        crate::Commands::Submit(args) => dispatch!(args, submit),
        crate::Commands::Tasks => crate::output::map_cmd_result_to_json(task::list()),

        // Commands with project configuration
        crate::Commands::Profiles(args) => dispatch!(args, global, profiles),
        crate::Commands::BuildCobol => dispatch!(Task::BuildCobol, global, task),
        crate::Commands::CicsRefresh => dispatch!(Task::CicsRefresh, global, task),
        crate::Commands::CopyDbrm => dispatch!(Task::CopyDbrm, global, task),
        crate::Commands::CopyLoad => dispatch!(Task::CopyLoad, global, task),
        crate::Commands::BindNGrant => dispatch!(Task::BindNGrant, global, task),
        crate::Commands::Deploy => dispatch!(Task::Deploy, global, task),
    }
}
