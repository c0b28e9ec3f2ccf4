//! Update CLI command.
//!
//! Blank or absent fields keep their current values, and the contact keeps
//! its id.

use super::input;
use crate::Result;
use crate::models::ContactChanges;
use crate::services::ContactStore;
use crate::storage::PersistenceBackend;

/// Update command handler.
#[derive(Debug, Clone, Default)]
pub struct UpdateCommand {
    /// Phone number of the contact to update.
    pub phone_number: String,
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub new_phone_number: Option<String>,
    /// New email.
    pub email: Option<String>,
}

impl UpdateCommand {
    /// Creates an update command for the contact at `phone_number`.
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            ..Self::default()
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
    pub fn with_new_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.new_phone_number = Some(phone_number.into());
        self
    }

    /// Sets a new email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Applies the edit and returns the message to show.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone number is blank, the contact does not
    /// exist, the new phone number is taken, or the save fails.
    pub fn execute<B: PersistenceBackend>(&self, store: &mut ContactStore<B>) -> Result<String> {
        let phone_number = input::required("Phone number", &self.phone_number)?;

        let changes = ContactChanges {
            name: input::keep_if_blank(self.name.as_deref()),
            phone_number: input::keep_if_blank(self.new_phone_number.as_deref()),
            email: input::keep_if_blank(self.email.as_deref()),
        };

        let updated = store.apply_changes(&phone_number, changes)?;
        Ok(format!("Contact updated successfully: {updated}"))
    }
}
