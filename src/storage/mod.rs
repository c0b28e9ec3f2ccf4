//! Storage layer.
//!
//! - **Codec**: versioned encoding of the whole contact collection
//! - **Persistence**: backends that hold the single encoded blob
//!   (filesystem, in-memory)

pub mod codec;
pub mod persistence;
pub mod traits;

pub use codec::{FORMAT_VERSION, SnapshotError};
pub use persistence::{FilesystemBackend, MemoryBackend};
pub use traits::PersistenceBackend;

/// Resolves the per-user data directory for the contact book.
///
/// # Errors
///
/// Returns an error if no home directory can be determined.
pub fn get_user_data_dir() -> crate::Result<std::path::PathBuf> {
    directories::BaseDirs::new()
        .map(|b| b.data_local_dir().join("contactbook"))
        .ok_or_else(|| crate::Error::OperationFailed {
            operation: "get_user_data_dir".to_string(),
            cause: "Could not determine user data directory".to_string(),
        })
}
