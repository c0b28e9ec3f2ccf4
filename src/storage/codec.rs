//! Snapshot encoding for the contact collection.
//!
//! The whole collection is written as one JSON envelope:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "contacts": [
//!     { "id": 1, "name": "Alice", "phone_number": "555-0100", "email": "" }
//!   ]
//! }
//! ```
//!
//! The envelope is decoupled from [`Contact`] so the on-disk layout can be
//! inspected and versioned on its own. Contacts are written in id order to keep
//! the output stable between saves of the same collection.

use crate::models::{Contact, ContactId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error as ThisError;

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

/// Errors raised while encoding or decoding a snapshot.
#[derive(Debug, ThisError)]
pub enum SnapshotError {
    /// The bytes are not a well-formed snapshot.
    #[error("malformed snapshot: {0}")]
    Malformed(String),

    /// The snapshot was written by an unknown format version.
    #[error(
        "unsupported snapshot format version {found} (expected {expected})",
        expected = FORMAT_VERSION
    )]
    UnsupportedVersion {
        /// The version found in the snapshot.
        found: u32,
    },

    /// Two contacts in the snapshot share a phone number.
    #[error("duplicate phone number '{0}' in snapshot")]
    DuplicatePhoneNumber(String),

    /// A contact carries the id reserved for generator saturation.
    #[error("contact '{0}' uses reserved id {reserved}", reserved = ContactId::RESERVED)]
    ReservedId(String),

    /// The collection could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(String),
}

/// On-disk envelope.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    format_version: u32,
    contacts: Vec<StoredContact>,
}

/// Reads only the version so unknown future layouts are reported as such.
#[derive(Debug, Deserialize)]
struct VersionProbe {
    format_version: u32,
}

/// Serializable contact format.
#[derive(Debug, Serialize, Deserialize)]
struct StoredContact {
    id: u64,
    name: String,
    phone_number: String,
    #[serde(default)]
    email: String,
}

impl From<&Contact> for StoredContact {
    fn from(c: &Contact) -> Self {
        Self {
            id: c.id().as_u64(),
            name: c.name().to_string(),
            phone_number: c.phone_number().to_string(),
            email: c.email().to_string(),
        }
    }
}

impl StoredContact {
    fn into_contact(self) -> Contact {
        Contact::with_id(ContactId::new(self.id), self.name, self.phone_number, self.email)
    }
}

/// Encodes a collection of contacts into a snapshot blob.
pub fn encode<'a, I>(contacts: I) -> Result<Vec<u8>, SnapshotError>
where
    I: IntoIterator<Item = &'a Contact>,
{
    let mut stored: Vec<StoredContact> = contacts.into_iter().map(StoredContact::from).collect();
    stored.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.phone_number.cmp(&b.phone_number)));

    let snapshot = Snapshot {
        format_version: FORMAT_VERSION,
        contacts: stored,
    };

    serde_json::to_vec_pretty(&snapshot).map_err(|e| SnapshotError::Serialize(e.to_string()))
}

/// Decodes a snapshot blob into contacts.
///
/// Blank input (empty or whitespace only) decodes to an empty collection.
pub fn decode(bytes: &[u8]) -> Result<Vec<Contact>, SnapshotError> {
    if is_blank(bytes) {
        return Ok(Vec::new());
    }

    let probe: VersionProbe =
        serde_json::from_slice(bytes).map_err(|e| SnapshotError::Malformed(e.to_string()))?;
    if probe.format_version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: probe.format_version,
        });
    }

    let snapshot: Snapshot =
        serde_json::from_slice(bytes).map_err(|e| SnapshotError::Malformed(e.to_string()))?;

    let mut seen = HashSet::with_capacity(snapshot.contacts.len());
    for stored in &snapshot.contacts {
        if stored.id == ContactId::RESERVED {
            return Err(SnapshotError::ReservedId(stored.phone_number.clone()));
        }
        if !seen.insert(stored.phone_number.as_str()) {
            return Err(SnapshotError::DuplicatePhoneNumber(
                stored.phone_number.clone(),
            ));
        }
    }

    Ok(snapshot
        .contacts
        .into_iter()
        .map(StoredContact::into_contact)
        .collect())
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}
