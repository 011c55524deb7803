use clap::Args;
use serde::Serialize;
use std::path::Path;

use repackage::defaults::LayoutConfig;
use repackage::events::{EventLevel, EventLog, MigrationEvent};
use repackage::log_status;
use repackage::package_id::{self, two_segments, PackageId};
use repackage::validation;
use repackage::{migrate_project, MigrationResult};

use super::{CmdResult, GlobalArgs, ProjectArgs};

/// Shown after a successful run.
pub const NEXT_STEPS: &[&str] = &[
    "Clean the Android build: cd android && ./gradlew clean",
    "Build and run: npx react-native run-android",
];

#[derive(Args, Default)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Project name to derive the new package id from (prompted if omitted)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Current package id (skips detection)
    #[arg(long, value_name = "PACKAGE_ID")]
    pub from: Option<String>,

    /// Apply without asking for confirmation; prints a JSON report
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Also show per-file and missing-folder details
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

pub fn is_interactive(args: &MigrateArgs) -> bool {
    !args.yes
}

#[derive(Debug, Serialize)]
pub struct MigrateOutput {
    pub command: &'static str,
    pub project_root: String,
    pub old_id: String,
    pub new_id: PackageId,
    pub result: MigrationResult,
    pub events: Vec<MigrationEvent>,
    pub next_steps: Vec<String>,
}

/// Current package id: `--from` if given, otherwise detected.
pub(crate) fn resolve_old_id(
    root: &Path,
    layout: &LayoutConfig,
    from: Option<&str>,
) -> repackage::Result<String> {
    let old_id = match from {
        Some(id) => validation::require_non_empty(id, "from", "--from must not be empty")?
            .to_string(),
        None => package_id::detect(root, layout).into_result(root, layout)?.0,
    };
    two_segments(&old_id, "old_package_id")?;
    Ok(old_id)
}

/// Non-interactive migration (`--yes`).
pub fn run(args: MigrateArgs, global: &GlobalArgs) -> CmdResult<MigrateOutput> {
    let root = args.project.project_root()?;
    let layout = &global.defaults.layout;

    let name = args
        .name
        .as_deref()
        .ok_or_else(|| repackage::Error::validation_missing_argument(vec!["--name".to_string()]))?;

    let old_id = resolve_old_id(&root, layout, args.from.as_deref())?;
    let generated = package_id::generate_with_prefix(name, &global.defaults.id_prefix)?;
    let new_id = generated.package_id;

    log_status!("migrate", "{} → {}", old_id, new_id);

    let mut events = EventLog::new();
    let result = migrate_project(&root, &old_id, new_id.as_str(), layout, &mut events)?;

    for event in events.events() {
        if event.level != EventLevel::Detail || args.verbose {
            log_status!("migrate", "{}", event.message);
        }
    }

    Ok((
        MigrateOutput {
            command: "migrate",
            project_root: root.display().to_string(),
            old_id,
            new_id,
            result,
            events: events.into_events(),
            next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        },
        0,
    ))
}

// ============================================================================
// Interactive flow
// ============================================================================

/// Detect → name → confirm → migrate, each step a blocking read with its
/// own way out. Returns the process exit code.
///
/// Cancelling, a name that normalizes to nothing, or an undetectable
/// package id ends the run with code 0 before anything is written.
pub fn run_interactive(args: MigrateArgs, global: &GlobalArgs) -> i32 {
    let layout = &global.defaults.layout;

    println!();
    println!("  Android package id migration");
    println!();

    let root = match args.project.project_root() {
        Ok(root) => root,
        Err(err) => {
            print_error(&err);
            return crate::output::exit_code_for_error(err.code);
        }
    };
    println!("Project root: {}", root.display());

    let old_id = match resolve_old_id(&root, layout, args.from.as_deref()) {
        Ok(id) => id,
        Err(err) => {
            print_error(&err);
            return 0;
        }
    };
    println!("✓ Current package id: {}", old_id);

    let name = match args.name {
        Some(name) => name,
        None => match crate::tty::prompt("Project name for the new package id: ") {
            Ok(name) => name,
            Err(err) => {
                print_error(&err);
                return 1;
            }
        },
    };

    let generated = match package_id::generate_with_prefix(&name, &global.defaults.id_prefix) {
        Ok(generated) => generated,
        Err(err) => {
            print_error(&err);
            return 0;
        }
    };

    if let Some(normalization) = &generated.normalization {
        println!(
            "⚠ Removed characters that are not allowed: {} → {}",
            normalization.before, normalization.after
        );
    }

    println!();
    println!("Current id: {}", old_id);
    println!("New id:     {}", generated.package_id);
    println!();

    match crate::tty::confirm("Apply changes? (y/n): ") {
        Ok(true) => {}
        Ok(false) => {
            println!();
            println!("▶ Cancelled. Nothing was changed.");
            return 0;
        }
        Err(err) => {
            print_error(&err);
            return 1;
        }
    }

    println!();
    println!("=== Migrating {} → {} ===", old_id, generated.package_id);

    let mut events = EventLog::new();
    let result = match migrate_project(
        &root,
        &old_id,
        generated.package_id.as_str(),
        layout,
        &mut events,
    ) {
        Ok(result) => result,
        Err(err) => {
            print_error(&err);
            return crate::output::exit_code_for_error(err.code);
        }
    };

    render_events(&events, args.verbose);
    render_summary(&result);
    if result.changed_anything() {
        render_next_steps();
    }

    0
}

fn print_error(err: &repackage::Error) {
    println!("✗ {}", err.message);
    for hint in &err.hints {
        println!("  {}", hint.message);
    }
}

fn render_events(events: &EventLog, verbose: bool) {
    for event in events.events() {
        match event.level {
            EventLevel::Detail if !verbose => {}
            EventLevel::Detail => println!("  {}", event.message),
            EventLevel::Info => println!("{}", event.message),
            EventLevel::Success => println!("✓ {}", event.message),
            EventLevel::Warning => println!("⚠ {}", event.message),
            EventLevel::Error => println!("✗ {}", event.message),
        }
    }
}

pub(crate) fn summary_lines(result: &MigrationResult) -> Vec<String> {
    vec![
        format!(
            "{:<24}{}",
            "Build config",
            if result.build_config_updated {
                "✓ updated"
            } else {
                "⚠ unchanged"
            }
        ),
        format!("{:<24}{}", "Folders found", result.directories_found),
        format!("{:<24}{}", "Folders renamed", result.directories_renamed),
        format!("{:<24}{}", "Files updated", result.files_updated),
    ]
}

fn render_summary(result: &MigrationResult) {
    println!();
    for line in summary_lines(result) {
        println!("{}", line);
    }
    println!();

    if result.changed_anything() {
        println!("Migration complete.");
    } else {
        println!("Finished, but nothing was changed.");
        println!("Check that the package ids are correct.");
    }
}

fn render_next_steps() {
    println!();
    println!("▶ Next steps:");
    for (i, step) in NEXT_STEPS.iter().enumerate() {
        println!("{}. {}", i + 1, step);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use repackage::defaults::Defaults;
    use std::fs;
    use tempfile::tempdir;

    fn global() -> GlobalArgs {
        GlobalArgs {
            defaults: Defaults::default(),
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn non_interactive_run_requires_name() {
        let dir = tempdir().unwrap();
        let args = MigrateArgs {
            project: ProjectArgs {
                path: Some(dir.path().display().to_string()),
            },
            yes: true,
            ..Default::default()
        };

        let err = run(args, &global()).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.missing_argument");
    }

    #[test]
    fn non_interactive_run_migrates_demo_project() {
        let dir = tempdir().unwrap();
        write(dir.path(), "android/app/build.gradle", "applicationId \"com.demo\"\n");
        write(
            dir.path(),
            "android/app/src/main/java/com/demo/MainActivity.kt",
            "package com.demo\n",
        );

        let args = MigrateArgs {
            project: ProjectArgs {
                path: Some(dir.path().display().to_string()),
            },
            name: Some("Great App 2".to_string()),
            yes: true,
            ..Default::default()
        };

        let (output, exit_code) = run(args, &global()).unwrap();
        assert_eq!(exit_code, 0);
        assert_eq!(output.old_id, "com.demo");
        assert_eq!(output.new_id.as_str(), "com.greatapp");
        assert!(output.result.build_config_updated);
        assert_eq!(output.result.directories_renamed, 1);
        assert!(dir
            .path()
            .join("android/app/src/main/java/com/greatapp/MainActivity.kt")
            .exists());
    }

    #[test]
    fn from_overrides_detection_but_must_have_two_segments() {
        let dir = tempdir().unwrap();
        let layout = LayoutConfig::default();

        assert_eq!(
            resolve_old_id(dir.path(), &layout, Some("com.legacy")).unwrap(),
            "com.legacy"
        );
        assert!(resolve_old_id(dir.path(), &layout, Some("com.example.app")).is_err());

        let err = resolve_old_id(dir.path(), &layout, None).unwrap_err();
        assert_eq!(err.code.as_str(), "package_id.not_found");
    }

    #[test]
    fn summary_lines_report_each_count() {
        let lines = summary_lines(&MigrationResult {
            build_config_updated: true,
            directories_found: 2,
            directories_renamed: 1,
            files_updated: 3,
        });
        assert!(lines[0].ends_with("✓ updated"));
        assert!(lines[1].ends_with('2'));
        assert!(lines[2].ends_with('1'));
        assert!(lines[3].ends_with('3'));
    }
}
