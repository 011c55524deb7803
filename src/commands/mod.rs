use clap::Args;
use std::path::PathBuf;

use repackage::defaults::Defaults;

pub type CmdResult<T> = repackage::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// repackage.json merged over the built-in defaults.
    pub defaults: Defaults,
}

/// Project root selection shared by every command that touches a project.
#[derive(Args, Default, Debug, Clone)]
pub struct ProjectArgs {
    /// Path to the React Native project root (default: current directory)
    #[arg(long, short = 'p', value_name = "DIR")]
    pub path: Option<String>,
}

impl ProjectArgs {
    /// Resolve the project root, expanding `~` and requiring it to exist.
    pub fn project_root(&self) -> repackage::Result<PathBuf> {
        let raw = self.path.as_deref().unwrap_or(".");
        let expanded = shellexpand::tilde(raw).into_owned();
        let path = PathBuf::from(&expanded);

        let absolute = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()
                .map_err(|e| {
                    repackage::Error::internal_io(e.to_string(), Some("read cwd".to_string()))
                })?
                .join(path)
        };

        if !absolute.is_dir() {
            return Err(repackage::Error::project_root_not_found(
                absolute.display().to_string(),
            ));
        }

        Ok(absolute)
    }
}

pub mod config;
pub mod detect;
pub mod generate;
pub mod migrate;
pub mod plan;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (repackage::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Detect(args) => dispatch!(args, global, detect),
        crate::Commands::Generate(args) => dispatch!(args, global, generate),
        crate::Commands::Plan(args) => dispatch!(args, global, plan),
        crate::Commands::Migrate(args) => dispatch!(args, global, migrate),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}
