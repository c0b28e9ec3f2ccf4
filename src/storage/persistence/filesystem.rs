//! Filesystem-based persistence backend.
//!
//! Stores the encoded contact collection in a single file. Every write goes to
//! a temporary sibling file which is then renamed over the target, so the
//! backing file always holds either the previous or the new collection.
//!
//! # Limits
//!
//! Reads refuse files larger than [`MAX_FILE_SIZE`] to avoid loading an
//! arbitrary file into memory by mistake.

use crate::storage::traits::PersistenceBackend;
use crate::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Maximum size of the backing file (16 MiB).
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Suffix appended to the file name for the in-progress write.
const TEMP_SUFFIX: &str = ".tmp";

/// Filesystem-based persistence backend.
#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    /// Path of the backing file.
    path: PathBuf,
}

impl FilesystemBackend {
    /// Creates a backend for the file at `path`.
    ///
    /// Nothing is touched on disk until the first read or write. Missing
    /// parent directories are created on write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))
            },
            _ => Ok(()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("contacts"), OsString::from);
        name.push(TEMP_SUFFIX);
        self.path.with_file_name(name)
    }

    fn read_error(&self, cause: impl ToString) -> Error {
        Error::PersistenceRead {
            path: self.path.clone(),
            cause: cause.to_string(),
        }
    }

    fn write_error(&self, cause: impl ToString) -> Error {
        Error::PersistenceWrite {
            path: self.path.clone(),
            cause: cause.to_string(),
        }
    }

    fn write_temp(temp: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut file = fs::File::create(temp)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl PersistenceBackend for FilesystemBackend {
    fn location(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.read_error(e)),
        };

        if !metadata.is_file() {
            return Err(self.read_error("not a regular file"));
        }

        if metadata.len() > MAX_FILE_SIZE {
            return Err(self.read_error(format!(
                "file exceeds maximum size of {MAX_FILE_SIZE} bytes"
            )));
        }

        let bytes = fs::read(&self.path).map_err(|e| self.read_error(e))?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(bytes))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_parent_dir()?;

        let temp = self.temp_path();
        if let Err(e) = Self::write_temp(&temp, bytes) {
            let _ = fs::remove_file(&temp);
            return Err(self.write_error(e));
        }

        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            self.write_error(e)
        })
    }
}
