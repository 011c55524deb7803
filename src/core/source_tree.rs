//! Source tree rewriting: package declarations, imports and package directories.
//!
//! For each candidate source root (main/debug/release, java/kotlin):
//! 1. Locate `<root>/com/<old-segment>/`
//! 2. Rewrite `package`/`import` lines of the `.kt`/`.java` files directly inside it
//! 3. Rename the directory to `<root>/com/<new-segment>/`, refusing if that exists
//!
//! Candidates are independent: a miss or failure in one never stops the next.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::defaults::LayoutConfig;
use crate::error::Result;
use crate::events::EventLog;
use crate::package_id::two_segments;
use crate::utils::io;

// ============================================================================
// Types
// ============================================================================

/// Aggregate counts for one source tree pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceTreeResult {
    pub directories_found: usize,
    pub directories_renamed: usize,
    pub files_updated: usize,
}

/// What a source tree pass would do for one package directory.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedDirectory {
    /// Source root the directory was found under.
    pub source_root: String,
    pub from: String,
    pub to: String,
    /// Source files whose content would change.
    pub files: Vec<String>,
    /// The destination already exists, so the rename would be refused.
    pub destination_exists: bool,
}

// ============================================================================
// File content
// ============================================================================

/// Rewrite `package <old>` and `import <old>.` to the new id.
///
/// Both are literal substring replacements of every occurrence; the old id is
/// not treated as a pattern.
pub fn rewrite_source_content(content: &str, old_id: &str, new_id: &str) -> String {
    content
        .replace(&format!("package {}", old_id), &format!("package {}", new_id))
        .replace(&format!("import {}.", old_id), &format!("import {}.", new_id))
}

/// Rewrite one source file in place. Returns `true` only when it changed.
pub fn rewrite_package_declaration(
    file_path: &Path,
    old_id: &str,
    new_id: &str,
    events: &mut EventLog,
) -> bool {
    if !file_path.exists() {
        return false;
    }

    let content = match io::read_file(file_path, "read source file") {
        Ok(content) => content,
        Err(e) => {
            events.error("filesystem_error", file_path, e.to_string());
            return false;
        }
    };

    let updated = rewrite_source_content(&content, old_id, new_id);
    if updated == content {
        events.detail(
            "source_unchanged",
            file_path,
            format!("No package references to replace in {}", display_name(file_path)),
        );
        return false;
    }

    if let Err(e) = io::write_file(file_path, &updated, "write source file") {
        events.error("filesystem_error", file_path, e.to_string());
        return false;
    }

    events.success(
        "source_updated",
        file_path,
        format!("Updated {}", display_name(file_path)),
    );
    true
}

/// Source files directly inside `dir` (non-recursive), sorted by name.
fn source_files(dir: &Path, layout: &LayoutConfig, events: &mut EventLog) -> Vec<PathBuf> {
    let entries = match io::list_dir(dir, "list package directory") {
        Ok(entries) => entries,
        Err(e) => {
            events.error("filesystem_error", dir, e.to_string());
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .map(|name| layout.is_source_file(&name.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect()
}

/// Rewrite every source file directly inside `dir_path`.
///
/// Returns the number of files that changed; 0 when the directory is missing.
pub fn scan_directory(
    dir_path: &Path,
    old_id: &str,
    new_id: &str,
    layout: &LayoutConfig,
    events: &mut EventLog,
) -> usize {
    if !dir_path.exists() {
        return 0;
    }

    events.info(
        "scan_directory",
        dir_path,
        format!("Processing files in {}", dir_path.display()),
    );

    source_files(dir_path, layout, events)
        .iter()
        .filter(|file| rewrite_package_declaration(file, old_id, new_id, events))
        .count()
}

// ============================================================================
// Directories
// ============================================================================

/// Find `<base_dir>/<package_root>/<segment>`, checking each level exists.
pub fn locate_package_directory(
    base_dir: &Path,
    segment: &str,
    layout: &LayoutConfig,
    events: &mut EventLog,
) -> Option<PathBuf> {
    if !base_dir.exists() {
        events.detail(
            "source_root_missing",
            base_dir,
            format!("Source root not found: {}", base_dir.display()),
        );
        return None;
    }

    let package_root = base_dir.join(&layout.package_root);
    if !package_root.exists() {
        events.detail(
            "package_root_missing",
            &package_root,
            format!(
                "Folder '{}' not found in {}",
                layout.package_root,
                base_dir.display()
            ),
        );
        return None;
    }

    let package_dir = package_root.join(segment);
    if !package_dir.exists() {
        events.detail(
            "package_directory_missing",
            &package_dir,
            format!("Folder '{}' not found in {}", segment, package_root.display()),
        );
        return None;
    }

    Some(package_dir)
}

/// Sibling destination for a package directory rename.
pub fn rename_destination(old_dir_path: &Path, new_segment: &str) -> PathBuf {
    match old_dir_path.parent() {
        Some(parent) => parent.join(new_segment),
        None => PathBuf::from(new_segment),
    }
}

/// Rename a package directory to `<parent>/<new_segment>` in one step.
///
/// Never overwrites: an existing destination is left untouched and the
/// rename is refused with a warning.
pub fn rename_package_directory(
    old_dir_path: &Path,
    new_segment: &str,
    events: &mut EventLog,
) -> bool {
    let destination = rename_destination(old_dir_path, new_segment);

    if destination.exists() {
        events.warning(
            "destination_exists",
            &destination,
            format!(
                "Folder {} already exists; not renaming {}",
                destination.display(),
                old_dir_path.display()
            ),
        );
        return false;
    }

    if let Err(e) = io::rename_path(old_dir_path, &destination, "rename package directory") {
        events.error("filesystem_error", old_dir_path, e.to_string());
        return false;
    }

    events.success(
        "directory_renamed",
        &destination,
        format!("Renamed {} → {}", display_name(old_dir_path), new_segment),
    );
    true
}

// ============================================================================
// Whole tree
// ============================================================================

/// Rewrite and relocate the package directory under every candidate source root.
///
/// Both ids must have exactly two segments; the second one names the
/// directory. That check happens before anything is touched.
pub fn migrate_source_tree(
    project_root: &Path,
    old_id: &str,
    new_id: &str,
    layout: &LayoutConfig,
    events: &mut EventLog,
) -> Result<SourceTreeResult> {
    let (_, old_segment) = two_segments(old_id, "old_package_id")?;
    let (_, new_segment) = two_segments(new_id, "new_package_id")?;

    let mut result = SourceTreeResult::default();

    for base_dir in layout.source_root_paths(project_root) {
        let Some(package_dir) = locate_package_directory(&base_dir, old_segment, layout, events)
        else {
            continue;
        };

        result.directories_found += 1;
        events.success(
            "package_directory_found",
            &package_dir,
            format!("Found package folder in {}", base_dir.display()),
        );

        result.files_updated += scan_directory(&package_dir, old_id, new_id, layout, events);

        if rename_package_directory(&package_dir, new_segment, events) {
            result.directories_renamed += 1;
        }
    }

    Ok(result)
}

/// Preview `migrate_source_tree` without touching the filesystem.
pub fn plan_source_tree(
    project_root: &Path,
    old_id: &str,
    new_id: &str,
    layout: &LayoutConfig,
) -> Result<Vec<PlannedDirectory>> {
    let (_, old_segment) = two_segments(old_id, "old_package_id")?;
    let (_, new_segment) = two_segments(new_id, "new_package_id")?;

    // Misses are expected while previewing; the plan itself is the report.
    let mut scratch = EventLog::new();
    let mut planned = Vec::new();

    for base_dir in layout.source_root_paths(project_root) {
        let Some(package_dir) =
            locate_package_directory(&base_dir, old_segment, layout, &mut scratch)
        else {
            continue;
        };

        let files = source_files(&package_dir, layout, &mut scratch)
            .into_iter()
            .filter(|file| {
                io::read_file(file, "read source file")
                    .map(|content| rewrite_source_content(&content, old_id, new_id) != content)
                    .unwrap_or(false)
            })
            .map(|file| relative(&file, project_root))
            .collect();

        let destination = rename_destination(&package_dir, new_segment);

        planned.push(PlannedDirectory {
            source_root: relative(&base_dir, project_root),
            from: relative(&package_dir, project_root),
            to: relative(&destination, project_root),
            files,
            destination_exists: destination.exists(),
        });
    }

    Ok(planned)
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Tests
// ============================================================================
