use clap::Args;
use serde::Serialize;

use repackage::package_id::{self, Normalization};
use repackage::{plan_migration, MigrationPlan};

use super::migrate::resolve_old_id;
use super::{CmdResult, GlobalArgs, ProjectArgs};

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Project name to derive the new package id from
    #[arg(long, short = 'n')]
    pub name: String,

    /// Current package id (skips detection)
    #[arg(long, value_name = "PACKAGE_ID")]
    pub from: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlanOutput {
    pub command: &'static str,
    pub project_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<Normalization>,
    pub files_to_update: usize,
    pub renames_refused: usize,
    pub plan: MigrationPlan,
}

/// Dry run: report what `migrate` would change without writing anything.
pub fn run(args: PlanArgs, global: &GlobalArgs) -> CmdResult<PlanOutput> {
    let root = args.project.project_root()?;
    let layout = &global.defaults.layout;

    let old_id = resolve_old_id(&root, layout, args.from.as_deref())?;
    let generated = package_id::generate_with_prefix(&args.name, &global.defaults.id_prefix)?;

    let plan = plan_migration(&root, &old_id, generated.package_id.as_str(), layout)?;

    Ok((
        PlanOutput {
            command: "plan",
            project_root: root.display().to_string(),
            normalization: generated.normalization,
            files_to_update: plan.files_to_update(),
            renames_refused: plan.renames_refused(),
            plan,
        },
        0,
    ))
}
