//! Contact records.

use super::id::{ContactId, IdGenerator};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Placeholder rendered in place of an empty email.
pub const EMPTY_EMAIL_PLACEHOLDER: &str = "N/A";

/// A single contact.
///
/// The phone number is the business key: two contacts with the same phone
/// number are equal regardless of id, name, or email. No field is validated
/// here; the shell rejects empty names and phone numbers before a record is
/// built.
#[derive(Debug, Clone)]
pub struct Contact {
    id: ContactId,
    name: String,
    phone_number: String,
    email: String,
}

impl Contact {
    /// Creates a contact with the next identifier from `ids`.
    pub fn new(
        ids: &mut IdGenerator,
        name: impl Into<String>,
        phone_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self::with_id(ids.next_id(), name, phone_number, email)
    }

    /// Creates a contact carrying an existing identity.
    pub fn with_id(
        id: ContactId,
        name: impl Into<String>,
        phone_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone_number: phone_number.into(),
            email: email.into(),
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> ContactId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the phone number (the business key).
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Returns the email, which may be empty.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the email for display, substituting `N/A` when empty.
    #[must_use]
    pub fn display_email(&self) -> &str {
        if self.email.is_empty() {
            EMPTY_EMAIL_PLACEHOLDER
        } else {
            &self.email
        }
    }

    /// Sets the display name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the phone number.
    ///
    /// Changing the key of a stored contact must go through the store so the
    /// index is rekeyed.
    pub fn set_phone_number(&mut self, phone_number: impl Into<String>) {
        self.phone_number = phone_number.into();
    }

    /// Sets the email.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Returns the editable fields of this contact.
    #[must_use]
    pub fn fields(&self) -> ContactFields {
        ContactFields {
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
        }
    }

    /// Returns true if `needle` (already lowercased) occurs in the name or
    /// phone number, ignoring case.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.phone_number.to_lowercase().contains(needle)
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.phone_number == other.phone_number
    }
}

impl Eq for Contact {}

impl Hash for Contact {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.phone_number.hash(state);
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Phone: {}, Email: {}",
            self.id,
            self.name,
            self.phone_number,
            self.display_email()
        )
    }
}

/// Field values for a contact, without identity.
///
/// Used when a stored contact is replaced while keeping its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    /// Display name.
    pub name: String,
    /// Phone number (the business key).
    pub phone_number: String,
    /// Email, may be empty.
    pub email: String,
}

impl ContactFields {
    /// Creates a set of field values.
    pub fn new(
        name: impl Into<String>,
        phone_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
            email: email.into(),
        }
    }

    /// Builds a contact from these fields carrying `id`.
    #[must_use]
    pub fn into_contact(self, id: ContactId) -> Contact {
        Contact::with_id(id, self.name, self.phone_number, self.email)
    }
}

/// Partial edit of a stored contact.
///
/// `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New email.
    pub email: Option<String>,
}

impl ContactChanges {
    /// Creates an empty change set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            phone_number: None,
            email: None,
        }
    }

    /// Sets a new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new phone number.
    #[must_use]
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Sets a new email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none() && self.email.is_none()
    }

    /// Applies the changes on top of `current`.
    #[must_use]
    pub fn apply_to(self, current: &Contact) -> ContactFields {
        ContactFields {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            phone_number: self
                .phone_number
                .unwrap_or_else(|| current.phone_number.clone()),
            email: self.email.unwrap_or_else(|| current.email.clone()),
        }
    }
}
