//! Infrastructure adapter for landing files on the local filesystem.

use crate::domain::errors::{LandingError, Result};
use crate::ports::landing_port::LandingTarget;
use log::debug;
use std::fs;
use std::path::PathBuf;

/// Concrete implementation of `LandingTarget` over a local directory.
///
/// `ensure_directory` relies on `create_dir_all`, which treats an existing
/// directory as success; `write_file` truncates any previous file of the
/// same name, so re-running a landing job replaces prior output.
pub struct LocalLandingAdapter {
    directory: PathBuf,
}

impl LocalLandingAdapter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl LandingTarget for LocalLandingAdapter {
    fn ensure_directory(&self) -> Result<()> {
        fs::create_dir_all(&self.directory).map_err(|e| {
            LandingError::Directory(format!("{}: {}", self.directory.display(), e))
        })?;
        debug!("Landing directory ready: {}", self.directory.display());
        Ok(())
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.directory.join(name);
        fs::write(&path, bytes).map_err(|e| LandingError::Upload {
            object: name.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("landing");
        let adapter = LocalLandingAdapter::new(&dir);

        adapter.ensure_directory().unwrap();
        adapter.ensure_directory().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_directory_fails_on_file_conflict() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("landing");
        fs::write(&path, b"not a directory").unwrap();

        let adapter = LocalLandingAdapter::new(&path);
        let err = adapter.ensure_directory().unwrap_err();
        assert!(matches!(err, LandingError::Directory(_)));
    }

    #[test]
    fn test_write_file_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = LocalLandingAdapter::new(tmp.path());
        adapter.ensure_directory().unwrap();

        adapter.write_file("clientes.csv", b"id\n1\n").unwrap();
        adapter.write_file("clientes.csv", b"id\n2\n").unwrap();

        let landed = fs::read(tmp.path().join("clientes.csv")).unwrap();
        assert_eq!(landed, b"id\n2\n");
    }

    #[test]
    fn test_write_file_error_is_table_scoped() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = LocalLandingAdapter::new(tmp.path().join("missing"));

        // Directory never ensured, so the write fails with an Upload error.
        let err = adapter.write_file("pedidos.csv", b"x").unwrap_err();
        assert!(matches!(err, LandingError::Upload { .. }));
    }
}
