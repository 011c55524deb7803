//! Build config rewriting.
//!
//! Substitution is structural: whatever sits inside the quotes after
//! `applicationId` or `namespace` is replaced, whether or not it equals the
//! detected old id. Every occurrence is rewritten, so per-flavor ids collapse
//! onto the new one.

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

use crate::defaults::LayoutConfig;
use crate::events::EventLog;
use crate::utils::io;

static APPLICATION_ID_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\bapplicationId(?:\s+|\s*=\s*))["'][^"']*["']"#).unwrap());

static NAMESPACE_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\bnamespace(?:\s+|\s*=\s*))["'][^"']*["']"#).unwrap());

/// Replace the quoted value of every `applicationId` and `namespace`
/// declaration with `new_id`. The keyword must be followed by whitespace or
/// `=`, so string literals that merely contain it are left alone. The keyword
/// and its separator are kept as written; the value is always re-quoted with
/// double quotes.
pub fn rewrite_declarations(content: &str, new_id: &str) -> String {
    let quote_new = |caps: &Captures| format!("{}\"{}\"", &caps[1], new_id);
    let content = APPLICATION_ID_DECL.replace_all(content, quote_new);
    NAMESPACE_DECL.replace_all(&content, quote_new).into_owned()
}

/// Rewrite the build config under `project_root` to declare `new_id`.
///
/// Returns `true` only when the file was changed and written. A missing file,
/// a file without declarations, and a failed write all return `false` and are
/// recorded in `events`.
pub fn rewrite_build_config(
    project_root: &Path,
    _old_id: &str,
    new_id: &str,
    layout: &LayoutConfig,
    events: &mut EventLog,
) -> bool {
    let path = layout.build_config_path(project_root);

    if !path.exists() {
        events.error(
            "build_config_missing",
            &path,
            format!("Build config not found: {}", path.display()),
        );
        return false;
    }

    let content = match io::read_file(&path, "read build config") {
        Ok(content) => content,
        Err(e) => {
            events.error("filesystem_error", &path, e.to_string());
            return false;
        }
    };

    let updated = rewrite_declarations(&content, new_id);

    if updated == content {
        events.warning(
            "build_config_unchanged",
            &path,
            "No applicationId or namespace declarations to replace",
        );
        return false;
    }

    if let Err(e) = io::write_file(&path, &updated, "write build config") {
        events.error("filesystem_error", &path, e.to_string());
        return false;
    }

    events.success(
        "build_config_updated",
        &path,
        format!("Updated {}", file_name(&path)),
    );
    true
}

/// Whether rewriting the build config would change it. Never writes.
pub fn build_config_would_change(
    project_root: &Path,
    new_id: &str,
    layout: &LayoutConfig,
) -> bool {
    let path = layout.build_config_path(project_root);
    io::read_file(&path, "read build config")
        .map(|content| rewrite_declarations(&content, new_id) != content)
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const GRADLE: &str = r#"android {
    namespace "com.old"
    defaultConfig {
        applicationId 'com.old'
        applicationIdSuffix ".debug"
        versionCode 1
    }
}
"#;

    fn project_with(content: &str) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let path = dir.path().join("android/app/build.gradle");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        dir
    }

    fn read_gradle(root: &Path) -> String {
        fs::read_to_string(root.join("android/app/build.gradle")).unwrap()
    }

    #[test]
    fn rewrites_both_declarations() {
        let dir = project_with(GRADLE);
        let mut events = EventLog::new();

        assert!(rewrite_build_config(
            dir.path(),
            "com.old",
            "com.new",
            &LayoutConfig::default(),
            &mut events
        ));

        let content = read_gradle(dir.path());
        assert!(content.contains("namespace \"com.new\""));
        assert!(content.contains("applicationId \"com.new\""));
        assert!(content.contains("applicationIdSuffix \".debug\""));
        assert!(!content.contains("com.old"));
        assert_eq!(events.of_kind("build_config_updated").count(), 1);
    }

    #[test]
    fn second_run_is_a_no_op_but_a_different_id_still_applies() {
        let dir = project_with(GRADLE);
        let layout = LayoutConfig::default();
        let mut events = EventLog::new();

        assert!(rewrite_build_config(dir.path(), "com.old", "com.new", &layout, &mut events));
        assert!(!rewrite_build_config(dir.path(), "com.old", "com.new", &layout, &mut events));
        assert_eq!(events.of_kind("build_config_unchanged").count(), 1);

        assert!(rewrite_build_config(dir.path(), "com.old", "com.other", &layout, &mut events));
        assert!(read_gradle(dir.path()).contains("applicationId \"com.other\""));
    }

    #[test]
    fn overwrites_values_that_differ_from_old_id() {
        let dir = project_with(
            "productFlavors {\n  free { applicationId \"com.free\" }\n  paid { applicationId \"com.paid\" }\n}\n",
        );
        let mut events = EventLog::new();

        assert!(rewrite_build_config(
            dir.path(),
            "com.old",
            "com.new",
            &LayoutConfig::default(),
            &mut events
        ));
        assert_eq!(read_gradle(dir.path()).matches("applicationId \"com.new\"").count(), 2);
    }

    #[test]
    fn missing_build_config_is_recoverable() {
        let dir = tempdir().unwrap();
        let mut events = EventLog::new();

        assert!(!rewrite_build_config(
            dir.path(),
            "com.old",
            "com.new",
            &LayoutConfig::default(),
            &mut events
        ));
        assert_eq!(events.of_kind("build_config_missing").count(), 1);
        assert!(events.has_errors());
    }

    #[test]
    fn file_without_declarations_is_not_written() {
        let dir = project_with("android { compileSdk 34 }\n");
        let mut events = EventLog::new();

        assert!(!rewrite_build_config(
            dir.path(),
            "com.old",
            "com.new",
            &LayoutConfig::default(),
            &mut events
        ));
        assert_eq!(read_gradle(dir.path()), "android { compileSdk 34 }\n");
    }

    #[test]
    fn kotlin_dsl_assignment_keeps_separator() {
        assert_eq!(
            rewrite_declarations("namespace = \"com.old\"\napplicationId = \"com.old\"\n", "com.new"),
            "namespace = \"com.new\"\napplicationId = \"com.new\"\n"
        );
    }

    #[test]
    fn keywords_inside_string_literals_are_not_declarations() {
        let content = "resValue \"string\", \"namespace\", \"x\"\nprintln(\"applicationId\" + \" set\")\napplicationId \"com.old\"\n";
        assert_eq!(
            rewrite_declarations(content, "com.new"),
            "resValue \"string\", \"namespace\", \"x\"\nprintln(\"applicationId\" + \" set\")\napplicationId \"com.new\"\n"
        );
    }

    #[test]
    fn would_change_does_not_write() {
        let dir = project_with(GRADLE);
        let layout = LayoutConfig::default();

        assert!(build_config_would_change(dir.path(), "com.new", &layout));
        assert_eq!(read_gradle(dir.path()), GRADLE);

        let mut events = EventLog::new();
        rewrite_build_config(dir.path(), "com.old", "com.new", &layout, &mut events);
        assert!(!build_config_would_change(dir.path(), "com.new", &layout));
    }

    #[cfg(unix)]
    #[test]
    fn failed_write_is_an_event_not_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = project_with(GRADLE);
        let path = dir.path().join("android/app/build.gradle");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

        // Privileged users bypass file modes; nothing to observe then.
        if fs::OpenOptions::new().write(true).open(&path).is_ok() {
            return;
        }

        let mut events = EventLog::new();
        assert!(!rewrite_build_config(
            dir.path(),
            "com.old",
            "com.new",
            &LayoutConfig::default(),
            &mut events
        ));
        assert_eq!(events.of_kind("filesystem_error").count(), 1);
        assert!(events.has_errors());
        assert_eq!(read_gradle(dir.path()), GRADLE);
    }
}
