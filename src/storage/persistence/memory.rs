//! In-memory persistence backend.
//!
//! Keeps the blob in process memory. Useful for ephemeral stores and tests.

use crate::Result;
use crate::storage::traits::PersistenceBackend;
use std::path::Path;

/// Location reported for in-memory blobs.
const MEMORY_LOCATION: &str = ":memory:";

/// In-memory persistence backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    contents: Option<Vec<u8>>,
    writes: usize,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            contents: None,
            writes: 0,
        }
    }

    /// Creates a backend that already holds `bytes`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Some(bytes.into()),
            writes: 0,
        }
    }

    /// Returns the stored blob, if any.
    #[must_use]
    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    /// Returns how many writes have completed.
    #[must_use]
    pub const fn write_count(&self) -> usize {
        self.writes
    }
}

impl PersistenceBackend for MemoryBackend {
    fn location(&self) -> &Path {
        Path::new(MEMORY_LOCATION)
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.contents.clone().filter(|bytes| !bytes.is_empty()))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.contents = Some(bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}
