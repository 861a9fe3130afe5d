//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// A file-based storage backend.
///
/// This backend keeps its snapshot in a single file. Snapshots survive
/// process restarts.
///
/// # Durability
///
/// `write_all` writes the new snapshot to a sibling temporary file, calls
/// `File::sync_all()`, then renames it over the target. A crash mid-write
/// leaves either the old or the new snapshot on disk, never a torn one.
///
/// # Example
///
/// ```no_run
/// use regstore_storage::{StorageBackend, FileBackend};
/// use std::path::Path;
///
/// let mut backend = FileBackend::open(Path::new("data/applications.json")).unwrap();
/// backend.write_all(b"[]").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    tmp_path: PathBuf,
}

impl FileBackend {
    /// Creates a file backend for the given path.
    ///
    /// The file itself is not created until the first write; a missing file
    /// reads back as an empty backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the path has no file name component.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");

        Ok(Self {
            path: path.to_path_buf(),
            tmp_path: path.with_file_name(tmp_name),
        })
    }

    /// Creates a file backend, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the path is invalid.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut file: File = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        if let Err(e) = fs::rename(&self.tmp_path, &self.path) {
            let _ = fs::remove_file(&self.tmp_path);
            return Err(e.into());
        }

        tracing::trace!(path = %self.path.display(), bytes = data.len(), "snapshot replaced");
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        let backend = FileBackend::open(&path).unwrap();
        assert!(backend.read_all().unwrap().is_none());
        assert_eq!(backend.size().unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.write_all(b"hello world").unwrap();

        assert_eq!(backend.read_all().unwrap().unwrap(), b"hello world");
        assert_eq!(backend.size().unwrap(), 11);
    }

    #[test]
    fn write_replaces_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        let mut backend = FileBackend::open(&path).unwrap();
        backend.write_all(b"a much longer first snapshot").unwrap();
        backend.write_all(b"short").unwrap();

        assert_eq!(backend.read_all().unwrap().unwrap(), b"short");
        assert!(!dir.path().join("records.json.tmp").exists());
    }

    #[test]
    fn persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        {
            let mut backend = FileBackend::open(&path).unwrap();
            backend.write_all(b"persistent data").unwrap();
        }

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.read_all().unwrap().unwrap(), b"persistent data");
    }

    #[test]
    fn create_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("records.json");

        let mut backend = FileBackend::open_with_create_dirs(&path).unwrap();
        backend.write_all(b"[]").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_into_missing_dir_fails_and_keeps_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent").join("records.json");

        let mut backend = FileBackend::open(&path).unwrap();
        assert!(matches!(backend.write_all(b"x"), Err(StorageError::Io(_))));
        assert!(backend.read_all().unwrap().is_none());
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let result = FileBackend::open(Path::new("/"));
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[test]
    fn file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");

        let backend = FileBackend::open(&path).unwrap();
        assert_eq!(backend.path(), path);
    }
}
