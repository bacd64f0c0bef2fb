//! Local path preparation and collision checks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{TransferError, TransferErrorKind};

/// What [`prepare_dir`] found or did at a directory path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    /// The directory was already there.
    Existing,
    /// The directory was created.
    Created,
}

/// Whether anything (file, directory, or dangling symlink) exists at `path`.
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Whether `path` is a real directory. Symlinks are not followed.
pub fn is_plain_dir(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

/// Make sure `path` is a directory without touching existing content.
///
/// Creates exactly one level; a non-directory at `path` is an error.
pub fn prepare_dir(path: &Path) -> Result<DirState, TransferError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(DirState::Existing),
        Ok(_) => Err(dir_error(path, "file exists")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir(path).map_err(|e| dir_error(path, e))?;
            Ok(DirState::Created)
        }
        Err(e) => Err(dir_error(path, e)),
    }
}

fn dir_error(path: &Path, reason: impl std::fmt::Display) -> TransferError {
    TransferError::new(
        TransferErrorKind::Filesystem,
        format!("Can't create local directory {}: {}", path.display(), reason),
    )
}

/// Resolve where a single-object download lands.
///
/// An existing directory receives the object under its remote name; any other
/// path is taken as the file name.
pub fn resolve_file_target(path: &Path, remote_name: &str) -> PathBuf {
    if path.is_dir() {
        path.join(remote_name)
    } else {
        path.to_path_buf()
    }
}

/// Create a new file for writing, failing if anything already exists there.
pub fn create_target_file(path: &Path) -> Result<fs::File, TransferError> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => TransferError::collision(path),
            _ => TransferError::filesystem(path, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_dir_creates_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("new");

        assert_eq!(prepare_dir(&dir).unwrap(), DirState::Created);
        assert!(dir.is_dir());
        assert_eq!(prepare_dir(&dir).unwrap(), DirState::Existing);
    }

    #[test]
    fn test_prepare_dir_rejects_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, b"x").unwrap();

        let err = prepare_dir(&file).unwrap_err();
        assert_eq!(err.kind(), TransferErrorKind::Filesystem);
        assert_eq!(fs::read(&file).unwrap(), b"x");
    }

    #[test]
    fn test_prepare_dir_does_not_create_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");

        let err = prepare_dir(&nested).unwrap_err();
        assert_eq!(err.kind(), TransferErrorKind::Filesystem);
        assert!(!tmp.path().join("a").exists());
    }

    #[test]
    fn test_resolve_file_target() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_file_target(tmp.path(), "movie.mkv"),
            tmp.path().join("movie.mkv")
        );

        let explicit = tmp.path().join("renamed.mkv");
        assert_eq!(resolve_file_target(&explicit, "movie.mkv"), explicit);
    }

    #[test]
    fn test_create_target_file_collides() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("exists.txt");
        fs::write(&file, b"keep").unwrap();

        let err = create_target_file(&file).unwrap_err();
        assert_eq!(err.kind(), TransferErrorKind::LocalCollision);
        assert_eq!(fs::read(&file).unwrap(), b"keep");
        assert!(entry_exists(&file));
        assert!(!is_plain_dir(&file));
    }
}
