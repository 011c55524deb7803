use clap::Args;
use serde::Serialize;

use repackage::package_id::{self, DetectionSource};

use super::{CmdResult, GlobalArgs, ProjectArgs};

#[derive(Args)]
pub struct DetectArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Debug, Serialize)]
pub struct DetectOutput {
    pub command: &'static str,
    pub project_root: String,
    pub package_id: String,
    pub source: DetectionSource,
}

pub fn run(args: DetectArgs, global: &GlobalArgs) -> CmdResult<DetectOutput> {
    let root = args.project.project_root()?;
    let layout = &global.defaults.layout;

    let (package_id, source) = package_id::detect(&root, layout).into_result(&root, layout)?;

    Ok((
        DetectOutput {
            command: "detect",
            project_root: root.display().to_string(),
            package_id,
            source,
        },
        0,
    ))
}
