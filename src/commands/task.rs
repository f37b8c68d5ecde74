use serde::Serialize;

use mfdeploy::tasks::{self, Task, TaskReport};
use mfdeploy::ShellRunner;

use super::CmdResult;

#[derive(Serialize)]
pub struct TaskOutput {
    pub command: String,
    #[serde(flatten)]
    pub report: TaskReport,
}

#[derive(Serialize)]
pub struct TaskInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn run(task: Task, global: &crate::commands::GlobalArgs) -> CmdResult<TaskOutput> {
    let config = global.load_config()?;
    let report = tasks::run(&ShellRunner::new(), &config, task)?;

    Ok((
        TaskOutput {
            command: format!("task.{}", task.name()),
            report,
        },
        0,
    ))
}

pub fn list() -> CmdResult<Vec<TaskInfo>> {
    let mut infos = vec![TaskInfo {
        name: "profiles",
        description: "Create project profiles and set them as default",
    }];
    infos.extend(Task::ALL.iter().map(|task| TaskInfo {
        name: task.name(),
        description: task.description(),
    }));

    Ok((infos, 0))
}
