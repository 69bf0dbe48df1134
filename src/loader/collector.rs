//! Discovery of schema document files on disk.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::debug;
use walkdir::WalkDir;

/// The schema documents found under one data directory.
#[derive(Debug, Clone, Default)]
pub struct SchemaFileSet {
    /// `*.system.json` files, one game system each
    pub system_files: Vec<PathBuf>,
    /// `*.catalogue.json` files
    pub catalogue_files: Vec<PathBuf>,
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(suffix))
        .unwrap_or(false)
}

/// Collects schema document files under a directory, recursively.
pub fn collect_schema_files(dir: &Path) -> Result<SchemaFileSet> {
    if !dir.exists() {
        return Err(anyhow!("Data directory does not exist: {}", dir.display()));
    }

    let mut files = SchemaFileSet::default();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if has_suffix(path, ".system.json") {
            debug!("Found game system file: {}", path.display());
            files.system_files.push(path.to_path_buf());
        } else if has_suffix(path, ".catalogue.json") {
            debug!("Found catalogue file: {}", path.display());
            files.catalogue_files.push(path.to_path_buf());
        }
    }

    files.system_files.sort();
    files.catalogue_files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_collects_by_suffix() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("core.system.json"), "{}")?;
        std::fs::write(dir.path().join("raiders.catalogue.json"), "{}")?;
        std::fs::write(dir.path().join("notes.txt"), "ignored")?;

        let nested = dir.path().join("extra");
        std::fs::create_dir(&nested)?;
        std::fs::write(nested.join("legion.catalogue.json"), "{}")?;

        let files = collect_schema_files(dir.path())?;
        assert_eq!(files.system_files.len(), 1);
        assert_eq!(files.catalogue_files.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let result = collect_schema_files(Path::new("/nonexistent/schema/data"));
        assert!(result.is_err());
    }
}
