//! Persistence backend trait.

use crate::Result;
use std::path::Path;

/// Trait for persistence layer backends.
///
/// A backend holds exactly one blob: the encoded contact collection as of the
/// last successful write. Writes replace the blob as a whole; there is no
/// partial or incremental persistence.
pub trait PersistenceBackend {
    /// Returns where the blob lives, for error reporting and logging.
    fn location(&self) -> &Path;

    /// Reads the stored blob.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PersistenceRead`] if the blob exists but cannot
    /// be read.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replaces the stored blob with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PersistenceWrite`] if the blob cannot be written.
    /// The previous blob is left in place when this fails.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}
