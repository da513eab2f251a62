// src/core/fs_ops.rs
//! File system helpers for client-local persistence

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct FsOps;

impl FsOps {
    /// Ensure directory exists
    pub fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    /// Read a file, `None` when it does not exist yet
    pub fn read_optional(path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read file: {}", path.display())),
        }
    }

    /// Replace a file's content through a sibling temp file and a rename
    pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir_exists(parent)?;
            }
        }

        let tmp = Self::temp_path(path);
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write file: {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| {
            format!("Failed to move {} to {}", tmp.display(), path.display())
        })?;

        Ok(())
    }

    /// Remove a file if present
    pub fn remove_file_if_exists(path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove file: {}", path.display())),
        }
    }

    /// Rename a file to `<name>.<suffix>` next to it, replacing any earlier one
    pub fn move_aside(path: &Path, suffix: &str) -> Result<PathBuf> {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        let target = path.with_file_name(name);

        fs::rename(path, &target).with_context(|| {
            format!("Failed to move {} to {}", path.display(), target.display())
        })?;
        Ok(target)
    }

    /// Normalize path against a base directory
    pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FsOps::write_atomic(&path, "{}").unwrap();
        assert_eq!(FsOps::read_optional(&path).unwrap().as_deref(), Some("{}"));
        assert!(!dir.path().join("nested").join("session.json.tmp").exists());

        FsOps::write_atomic(&path, "{\"a\":\"b\"}").unwrap();
        assert_eq!(
            FsOps::read_optional(&path).unwrap().as_deref(),
            Some("{\"a\":\"b\"}")
        );
    }

    #[test]
    fn test_read_and_remove_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert_eq!(FsOps::read_optional(&path).unwrap(), None);
        assert!(FsOps::remove_file_if_exists(&path).is_ok());
    }

    #[test]
    fn test_normalize_path() {
        let base = Path::new("/srv/app");
        assert_eq!(
            FsOps::normalize_path(base, Path::new("data/session.json")),
            PathBuf::from("/srv/app/data/session.json")
        );
        assert_eq!(
            FsOps::normalize_path(base, Path::new("/tmp/x")),
            PathBuf::from("/tmp/x")
        );
    }
}
