//! Whole-project migration: build config first, then the source tree.
//!
//! Nothing is rolled back. Each step is best-effort and the result records
//! what actually happened.

use serde::Serialize;
use std::path::Path;

use crate::defaults::LayoutConfig;
use crate::error::{Error, Result};
use crate::events::EventLog;
use crate::gradle;
use crate::package_id::{two_segments, PackageId};
use crate::source_tree::{self, PlannedDirectory, SourceTreeResult};

/// Outcome of one migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationResult {
    pub build_config_updated: bool,
    pub directories_found: usize,
    pub directories_renamed: usize,
    pub files_updated: usize,
}

impl MigrationResult {
    fn new(build_config_updated: bool, tree: SourceTreeResult) -> Self {
        Self {
            build_config_updated,
            directories_found: tree.directories_found,
            directories_renamed: tree.directories_renamed,
            files_updated: tree.files_updated,
        }
    }

    /// Whether the run changed anything on disk.
    pub fn changed_anything(&self) -> bool {
        self.build_config_updated || self.directories_renamed > 0 || self.files_updated > 0
    }
}

/// Preview of a migration. Produced without touching the filesystem.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPlan {
    pub old_id: String,
    pub new_id: String,
    pub build_config: String,
    pub build_config_would_change: bool,
    pub directories: Vec<PlannedDirectory>,
}

impl MigrationPlan {
    pub fn files_to_update(&self) -> usize {
        self.directories.iter().map(|d| d.files.len()).sum()
    }

    pub fn renames_refused(&self) -> usize {
        self.directories.iter().filter(|d| d.destination_exists).count()
    }
}

/// The new id must have the generated shape and live under the configured
/// package root, since that is the directory the rename happens in.
fn validate_ids(old_id: &str, new_id: &str, layout: &LayoutConfig) -> Result<()> {
    two_segments(old_id, "old_package_id")?;
    let new_id = PackageId::parse(new_id)?;

    if new_id.prefix() != layout.package_root {
        return Err(Error::validation_invalid_argument(
            "new_package_id",
            format!(
                "Package id '{}' does not start with the package root folder '{}'; set id_prefix and layout.package_root to the same value",
                new_id, layout.package_root
            ),
            Some(new_id.to_string()),
            None,
        ));
    }
    Ok(())
}

/// Migrate the project at `project_root` from `old_id` to `new_id`.
///
/// Fails only when an id is malformed or the new id's prefix does not match
/// `layout.package_root`. Both are checked before the first write.
pub fn migrate_project(
    project_root: &Path,
    old_id: &str,
    new_id: &str,
    layout: &LayoutConfig,
    events: &mut EventLog,
) -> Result<MigrationResult> {
    validate_ids(old_id, new_id, layout)?;

    let build_config_updated =
        gradle::rewrite_build_config(project_root, old_id, new_id, layout, events);
    let tree = source_tree::migrate_source_tree(project_root, old_id, new_id, layout, events)?;

    Ok(MigrationResult::new(build_config_updated, tree))
}

/// Describe what `migrate_project` would do.
pub fn plan_migration(
    project_root: &Path,
    old_id: &str,
    new_id: &str,
    layout: &LayoutConfig,
) -> Result<MigrationPlan> {
    validate_ids(old_id, new_id, layout)?;

    Ok(MigrationPlan {
        old_id: old_id.to_string(),
        new_id: new_id.to_string(),
        build_config: layout.build_config.clone(),
        build_config_would_change: gradle::build_config_would_change(project_root, new_id, layout),
        directories: source_tree::plan_source_tree(project_root, old_id, new_id, layout)?,
    })
}
