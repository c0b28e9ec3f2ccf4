//! Contact identifiers and the generator that hands them out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identity of a contact.
///
/// Identity is informational: deduplication is keyed on the phone number,
/// never on the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(u64);

impl ContactId {
    /// Raw value the generator saturates at. Never valid in stored data.
    pub const RESERVED: u64 = u64::MAX;

    /// Creates a contact ID from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ContactId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Monotonic source of contact identifiers.
///
/// Each store owns its own generator. It starts at 1 and only moves forward.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// First identifier handed out by a fresh generator.
    pub const FIRST_ID: u64 = 1;

    /// Creates a generator starting at [`Self::FIRST_ID`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: Self::FIRST_ID,
        }
    }

    /// Returns the identifier the next call to [`Self::next_id`] will produce.
    #[must_use]
    pub const fn peek(&self) -> ContactId {
        ContactId(self.next)
    }

    /// Hands out the next identifier and advances the counter.
    pub const fn next_id(&mut self) -> ContactId {
        let id = ContactId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Moves the counter past `seen` so it can never be handed out again.
    ///
    /// Never moves the counter backwards. `seen` must be below
    /// [`ContactId::RESERVED`]; the snapshot decoder rejects anything else.
    pub fn observe(&mut self, seen: ContactId) {
        let candidate = seen.0.saturating_add(1);
        if candidate > self.next {
            self.next = candidate;
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
