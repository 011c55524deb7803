use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Root configuration structure for repackage.json
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepackageConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via repackage.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// First segment of every generated package id.
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    #[serde(default)]
    pub layout: LayoutConfig,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            layout: LayoutConfig::default(),
        }
    }
}

/// Where the Android project keeps its identity, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_build_config")]
    pub build_config: String,

    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Directory under each source root that holds package directories.
    #[serde(default = "default_package_root")]
    pub package_root: String,

    /// Candidate source roots, processed in this order.
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<String>,

    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            build_config: default_build_config(),
            manifest: default_manifest(),
            package_root: default_package_root(),
            source_roots: default_source_roots(),
            source_extensions: default_source_extensions(),
        }
    }
}

impl LayoutConfig {
    pub fn build_config_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.build_config)
    }

    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.manifest)
    }

    pub fn source_root_paths(&self, project_root: &Path) -> Vec<PathBuf> {
        self.source_roots
            .iter()
            .map(|root| project_root.join(root))
            .collect()
    }

    pub fn is_source_file(&self, file_name: &str) -> bool {
        self.source_extensions
            .iter()
            .any(|ext| file_name.ends_with(&format!(".{}", ext)))
    }
}

// =============================================================================
// Default value functions (match the stock React Native Android layout)
// =============================================================================

fn default_id_prefix() -> String {
    "com".to_string()
}

fn default_build_config() -> String {
    "android/app/build.gradle".to_string()
}

fn default_manifest() -> String {
    "android/app/src/main/AndroidManifest.xml".to_string()
}

fn default_package_root() -> String {
    "com".to_string()
}

fn default_source_roots() -> Vec<String> {
    vec![
        "android/app/src/main/java".to_string(),
        "android/app/src/main/kotlin".to_string(),
        "android/app/src/debug/java".to_string(),
        "android/app/src/release/java".to_string(),
    ]
}

fn default_source_extensions() -> Vec<String> {
    vec!["kt".to_string(), "java".to_string()]
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If repackage.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full repackage.json config, falling back to defaults on any error.
pub fn load_config() -> RepackageConfig {
    paths::repackage_json()
        .ok()
        .filter(|path| path.exists())
        .and_then(|path| load_config_from(&path).ok())
        .unwrap_or_default()
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> crate::Result<RepackageConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))
}

/// Check if repackage.json file exists
pub fn config_exists() -> bool {
    paths::repackage_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Delete repackage.json file (reset to defaults)
pub fn reset_config() -> crate::Result<bool> {
    let path = paths::repackage_json()?;

    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            crate::Error::internal_io(e.to_string(), Some(format!("delete {}", path.display())))
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Get the path to repackage.json (for display purposes)
pub fn config_path() -> crate::Result<String> {
    Ok(paths::repackage_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}
