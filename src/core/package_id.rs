//! Package identifier generation and detection.
//!
//! A new identifier is derived from a free-form project name (`My App!` →
//! `com.myapp`). The current identifier is read from the Android project,
//! trying `applicationId`, then `namespace` in the build config, then the
//! manifest's `package` attribute.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::defaults::LayoutConfig;
use crate::error::{Error, Result};
use crate::utils::{io, parser};

pub const DEFAULT_PREFIX: &str = "com";

static APPLICATION_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bapplicationId(?:\s+|\s*=\s*)["']([^"']*)["']"#).unwrap());

static NAMESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bnamespace(?:\s+|\s*=\s*)["']([^"']*)["']"#).unwrap());

static MANIFEST_PACKAGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"package=["']([^"']*)["']"#).unwrap());

// ============================================================================
// Types
// ============================================================================

/// A package identifier produced by this tool: `<prefix>.<segment>`, every
/// segment lowercase ASCII letters only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Validate an identifier against the generated-id shape.
    pub fn parse(value: &str) -> Result<Self> {
        let segments: Vec<&str> = value.split('.').collect();
        if segments.len() != 2 || !segments.iter().all(|s| is_letter_segment(s)) {
            return Err(Error::validation_invalid_argument(
                "package_id",
                format!(
                    "'{}' is not a two-segment package id of lowercase letters (e.g. com.example)",
                    value
                ),
                Some(value.to_string()),
                None,
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reverse-domain segment (`com` in `com.myapp`).
    pub fn prefix(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// The project-derived segment (`myapp` in `com.myapp`).
    pub fn project_segment(&self) -> &str {
        self.0.split('.').nth(1).unwrap_or_default()
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Characters were dropped while normalizing the project name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalization {
    /// The lowercased input.
    pub before: String,
    /// What survived normalization.
    pub after: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedId {
    pub package_id: PackageId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<Normalization>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    ApplicationId,
    Namespace,
    ManifestPackage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Found {
        package_id: String,
        source: DetectionSource,
    },
    MissingBuildConfig {
        path: PathBuf,
    },
    Unreadable {
        path: PathBuf,
        error: String,
    },
    NoMatch,
}

impl Detection {
    pub fn package_id(&self) -> Option<&str> {
        match self {
            Detection::Found { package_id, .. } => Some(package_id),
            _ => None,
        }
    }

    /// Turn a failed detection into the error the CLI aborts with.
    pub fn into_result(
        self,
        project_root: &Path,
        layout: &LayoutConfig,
    ) -> Result<(String, DetectionSource)> {
        let probed = vec![layout.build_config.clone(), layout.manifest.clone()];
        let root = project_root.display().to_string();
        match self {
            Detection::Found { package_id, source } => Ok((package_id, source)),
            Detection::MissingBuildConfig { path } => Err(Error::package_id_not_found(
                root,
                format!("{} not found", path.display()),
                probed,
            )),
            Detection::Unreadable { path, error } => Err(Error::package_id_not_found(
                root,
                format!("{} could not be read: {}", path.display(), error),
                probed,
            )),
            Detection::NoMatch => Err(Error::package_id_not_found(
                root,
                "no applicationId, namespace or manifest package declaration found",
                probed,
            )),
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

fn is_letter_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_lowercase())
}

/// Derive `com.<segment>` from a project name.
pub fn generate(project_name: &str) -> Result<GeneratedId> {
    generate_with_prefix(project_name, DEFAULT_PREFIX)
}

/// Derive `<prefix>.<segment>` from a project name.
///
/// The name is lowercased and everything outside `a-z` is dropped. Digits,
/// whitespace, punctuation and non-ASCII letters are removed, not
/// transliterated.
pub fn generate_with_prefix(project_name: &str, prefix: &str) -> Result<GeneratedId> {
    if !is_letter_segment(prefix) {
        return Err(Error::validation_invalid_argument(
            "id_prefix",
            format!("Package id prefix '{}' must be lowercase letters only", prefix),
            Some(prefix.to_string()),
            None,
        ));
    }

    if project_name.is_empty() {
        return Err(Error::validation_invalid_argument(
            "project_name",
            "A project name is required to build the new package id",
            None,
            None,
        ));
    }

    let lowered = project_name.to_lowercase();
    let segment: String = lowered.chars().filter(|c| c.is_ascii_lowercase()).collect();

    if segment.is_empty() {
        return Err(Error::validation_invalid_argument(
            "project_name",
            "Project name is empty after removing everything but letters a-z",
            Some(project_name.to_string()),
            None,
        ));
    }

    let normalization = (lowered != segment).then(|| Normalization {
        before: lowered.clone(),
        after: segment.clone(),
    });

    Ok(GeneratedId {
        package_id: PackageId(format!("{}.{}", prefix, segment)),
        normalization,
    })
}

// ============================================================================
// Segments
// ============================================================================

/// Split an identifier that must have exactly two segments.
///
/// Ids detected from an existing project are not held to the lowercase-letter
/// rule, only to the segment count the directory layout depends on.
pub fn two_segments<'a>(id: &'a str, field: &str) -> Result<(&'a str, &'a str)> {
    let mut parts = id.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) if !first.is_empty() && !second.is_empty() => {
            Ok((first, second))
        }
        _ => Err(Error::validation_invalid_argument(
            field,
            format!(
                "Package id '{}' must have exactly two segments (e.g. com.example)",
                id
            ),
            Some(id.to_string()),
            None,
        )),
    }
}

// ============================================================================
// Detection
// ============================================================================

/// Detect the project's current package id.
///
/// The manifest is only consulted when the build config exists but declares
/// neither `applicationId` nor `namespace`.
pub fn detect(project_root: &Path, layout: &LayoutConfig) -> Detection {
    let build_config = layout.build_config_path(project_root);
    if !build_config.exists() {
        return Detection::MissingBuildConfig { path: build_config };
    }

    let content = match io::read_file(&build_config, "read build config") {
        Ok(content) => content,
        Err(e) => {
            return Detection::Unreadable {
                path: build_config,
                error: e.to_string(),
            }
        }
    };

    if let Some(package_id) = parser::extract_first(&content, &APPLICATION_ID_PATTERN) {
        return Detection::Found {
            package_id,
            source: DetectionSource::ApplicationId,
        };
    }

    if let Some(package_id) = parser::extract_first(&content, &NAMESPACE_PATTERN) {
        return Detection::Found {
            package_id,
            source: DetectionSource::Namespace,
        };
    }

    let manifest = layout.manifest_path(project_root);
    if manifest.exists() {
        if let Ok(manifest_content) = io::read_file(&manifest, "read manifest") {
            if let Some(package_id) =
                parser::extract_first(&manifest_content, &MANIFEST_PACKAGE_PATTERN)
            {
                return Detection::Found {
                    package_id,
                    source: DetectionSource::ManifestPackage,
                };
            }
        }
    }

    Detection::NoMatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn generate_folds_case_and_strips_punctuation() {
        let generated = generate("My App!").unwrap();
        assert_eq!(generated.package_id.as_str(), "com.myapp");
        assert_eq!(
            generated.normalization,
            Some(Normalization {
                before: "my app!".to_string(),
                after: "myapp".to_string(),
            })
        );
    }

    #[test]
    fn generate_without_stripping_has_no_advisory() {
        let generated = generate("MyApp").unwrap();
        assert_eq!(generated.package_id.as_str(), "com.myapp");
        assert!(generated.normalization.is_none());
    }

    #[test]
    fn generate_drops_digits_and_non_ascii_letters() {
        assert_eq!(generate("Great App 2").unwrap().package_id.as_str(), "com.greatapp");
        assert_eq!(generate("Café Ñu").unwrap().package_id.as_str(), "com.cafu");
    }

    #[test]
    fn generate_rejects_names_without_letters() {
        for input in ["", "123!!", "   ", "ñ 42"] {
            let err = generate(input).unwrap_err();
            assert_eq!(err.code.as_str(), "validation.invalid_argument", "input {:?}", input);
        }
    }

    #[test]
    fn generated_ids_always_have_the_expected_shape() {
        let re = Regex::new(r"^com\.[a-z]+$").unwrap();
        for input in ["a", "Z", "x-y_z", "Hello, World 2024", "\tTabbed\nName", "ÅngströmB"] {
            let id = generate(input).unwrap().package_id;
            assert!(re.is_match(id.as_str()), "{} -> {}", input, id);
            assert!(PackageId::parse(id.as_str()).is_ok());
        }
    }

    #[test]
    fn generate_uses_configured_prefix() {
        let generated = generate_with_prefix("Demo", "org").unwrap();
        assert_eq!(generated.package_id.as_str(), "org.demo");
        assert_eq!(generated.package_id.prefix(), "org");
        assert_eq!(generated.package_id.project_segment(), "demo");
        assert!(generate_with_prefix("Demo", "Org1").is_err());
    }

    #[test]
    fn parse_rejects_three_segments_and_digits() {
        assert!(PackageId::parse("com.example").is_ok());
        assert!(PackageId::parse("com.example.app").is_err());
        assert!(PackageId::parse("com.app2").is_err());
        assert!(PackageId::parse("com").is_err());
    }

    #[test]
    fn two_segments_splits_or_rejects() {
        assert_eq!(two_segments("com.demo", "old").unwrap(), ("com", "demo"));
        assert_eq!(two_segments("com.my_app1", "old").unwrap(), ("com", "my_app1"));
        assert!(two_segments("com.example.app", "old").is_err());
        assert!(two_segments("com", "old").is_err());
        assert!(two_segments("com.", "old").is_err());
    }

    #[test]
    fn detect_skips_keywords_inside_string_literals() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "android/app/build.gradle",
            "resValue \"string\", \"namespace\", \"x\"\nnamespace = \"com.kts\"\n",
        );

        let detection = detect(dir.path(), &LayoutConfig::default());
        assert_eq!(detection.package_id(), Some("com.kts"));
    }

    #[test]
    fn detect_prefers_application_id() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "android/app/build.gradle",
            "android {\n    namespace \"com.ns\"\n    defaultConfig {\n        applicationId 'com.appid'\n    }\n}\n",
        );
        write(
            dir.path(),
            "android/app/src/main/AndroidManifest.xml",
            "<manifest package=\"com.manifest\" />",
        );

        let detection = detect(dir.path(), &LayoutConfig::default());
        assert_eq!(
            detection,
            Detection::Found {
                package_id: "com.appid".to_string(),
                source: DetectionSource::ApplicationId,
            }
        );
    }

    #[test]
    fn detect_falls_back_to_namespace_then_manifest() {
        let dir = tempdir().unwrap();
        let layout = LayoutConfig::default();
        write(dir.path(), "android/app/build.gradle", "android {\n    namespace  \"com.ns\"\n}\n");
        write(
            dir.path(),
            "android/app/src/main/AndroidManifest.xml",
            "<manifest package='com.manifest' />",
        );
        assert_eq!(detect(dir.path(), &layout).package_id(), Some("com.ns"));

        write(dir.path(), "android/app/build.gradle", "android {}\n");
        let detection = detect(dir.path(), &layout);
        assert_eq!(detection.package_id(), Some("com.manifest"));
        assert!(matches!(
            detection,
            Detection::Found {
                source: DetectionSource::ManifestPackage,
                ..
            }
        ));
    }

    #[test]
    fn detect_without_build_config_is_not_found_even_with_manifest() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "android/app/src/main/AndroidManifest.xml",
            "<manifest package=\"com.manifest\" />",
        );

        let layout = LayoutConfig::default();
        let detection = detect(dir.path(), &layout);
        assert!(matches!(detection, Detection::MissingBuildConfig { .. }));

        let err = detection.into_result(dir.path(), &layout).unwrap_err();
        assert_eq!(err.code.as_str(), "package_id.not_found");
    }

    #[test]
    fn detect_with_no_declarations_is_no_match() {
        let dir = tempdir().unwrap();
        write(dir.path(), "android/app/build.gradle", "applicationId \"\"\n");
        assert_eq!(detect(dir.path(), &LayoutConfig::default()), Detection::NoMatch);
    }
}
