//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Write content to file with standardized error handling.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Rename a file or directory in one step.
///
/// Directories move as a unit with everything inside them; nothing is
/// copied. Fails if the filesystem rejects the rename (cross-device,
/// permissions, a non-empty destination on some platforms).
pub fn rename_path(from: &Path, to: &Path, operation: &str) -> Result<()> {
    fs::rename(from, to)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Sorted immediate children of a directory. Missing directories yield nothing.
pub fn list_dir(dir: &Path, operation: &str) -> Result<Vec<std::path::PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;

    let mut paths = entries
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))?;
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.txt"), "test read");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn write_file_returns_error_for_invalid_path() {
        let result = write_file(
            Path::new("/nonexistent/dir/file.txt"),
            "content",
            "test write",
        );
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn rename_path_moves_directory_with_contents() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("old");
        fs::create_dir_all(from.join("nested")).unwrap();
        fs::write(from.join("nested").join("a.kt"), "x").unwrap();

        let to = dir.path().join("new");
        rename_path(&from, &to, "test rename").unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read_to_string(to.join("nested").join("a.kt")).unwrap(), "x");
    }

    #[test]
    fn list_dir_is_sorted_and_tolerates_missing_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.kt"), "").unwrap();
        fs::write(dir.path().join("a.java"), "").unwrap();

        let names: Vec<_> = list_dir(dir.path(), "test list")
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.java", "b.kt"]);

        assert!(list_dir(&dir.path().join("missing"), "test list")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn list_dir_propagates_listing_errors() {
        let file = NamedTempFile::new().unwrap();
        let err = list_dir(file.path(), "list package directory").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.message.contains("list package directory"));
    }
}
