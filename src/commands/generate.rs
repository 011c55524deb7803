use clap::Args;
use serde::Serialize;

use repackage::package_id::{self, Normalization, PackageId};

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct GenerateArgs {
    /// Free-form project name (e.g. "My App")
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub command: &'static str,
    pub name: String,
    pub package_id: PackageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<Normalization>,
}

pub fn run(args: GenerateArgs, global: &GlobalArgs) -> CmdResult<GenerateOutput> {
    let generated = package_id::generate_with_prefix(&args.name, &global.defaults.id_prefix)?;

    Ok((
        GenerateOutput {
            command: "generate",
            name: args.name,
            package_id: generated.package_id,
            normalization: generated.normalization,
        },
        0,
    ))
}
