use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base repackage config directory (~/.config/repackage/, %APPDATA%\repackage on Windows)
pub fn repackage() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("repackage"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("repackage"))
    }
}

/// Global repackage.json config file path
pub fn repackage_json() -> Result<PathBuf> {
    Ok(repackage()?.join("repackage.json"))
}
