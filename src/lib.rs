//! # Contactbook
//!
//! A single-user contact book backed by a phone-number index.
//!
//! Contacts are keyed by their phone number, which acts as the unique business
//! key. Every successful mutation flushes the whole collection to a single
//! backing file, and the collection is reloaded from that file when the store
//! is opened.
//!
//! ## Features
//!
//! - Phone-number keyed store with duplicate rejection and safe rekeying on update
//! - Case-insensitive substring search over names and phone numbers
//! - Versioned snapshot format written atomically to disk
//! - Per-store identifier generator reconciled against loaded data
//!
//! ## Example
//!
//! ```rust,no_run
//! use contactbook::{ContactStore, FilesystemBackend};
//!
//! let mut store = ContactStore::open(FilesystemBackend::new("contacts.json"));
//! let contact = store.new_contact("Alice", "555-0100", "");
//! store.add(contact)?;
//!
//! let found = store.search("ali");
//! assert_eq!(found.len(), 1);
//! # Ok::<(), contactbook::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use config::{ContactBookConfig, LoggingSettings};
pub use models::{Contact, ContactChanges, ContactFields, ContactId, IdGenerator};
pub use services::ContactStore;
pub use storage::{FilesystemBackend, MemoryBackend, PersistenceBackend};

/// Error type for contact book operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `DuplicateKey` | Adding a contact, or rekeying one, onto a phone number already in use |
/// | `NotFound` | Reading, updating, or deleting a phone number that is not stored |
/// | `PersistenceRead` | The backing file cannot be read or decoded |
/// | `PersistenceWrite` | The collection cannot be encoded or written |
/// | `InvalidInput` | The shell rejects empty names, phone numbers, or queries |
/// | `OperationFailed` | Configuration or logging setup fails |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A contact with this phone number already exists.
    ///
    /// The store is left unchanged when this is returned.
    #[error("a contact with phone number '{phone_number}' already exists")]
    DuplicateKey {
        /// The colliding phone number.
        phone_number: String,
    },

    /// No contact is stored under this phone number.
    #[error("no contact with phone number '{phone_number}'")]
    NotFound {
        /// The phone number that was looked up.
        phone_number: String,
    },

    /// The backing file could not be read or decoded.
    ///
    /// Raised when:
    /// - The file exists but cannot be opened or read
    /// - The file exceeds the maximum snapshot size
    /// - The content is not a valid snapshot (bad JSON, unknown format version,
    ///   duplicate phone numbers)
    #[error("failed to read contacts from {}: {cause}", path.display())]
    PersistenceRead {
        /// The backing file path.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },

    /// The collection could not be written.
    ///
    /// When a mutating store operation returns this, the mutation has already
    /// been applied in memory and is not rolled back.
    #[error("failed to write contacts to {}: {cause}", path.display())]
    PersistenceWrite {
        /// The backing file path.
        path: PathBuf,
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - A configuration file cannot be read or parsed
    /// - The logging subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns true if the error is a rejection that left the store untouched.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. } | Self::NotFound { .. })
    }
}

/// Result type alias for contact book operations.
pub type Result<T> = std::result::Result<T, Error>;
