//! Add CLI command.

use super::input;
use crate::Result;
use crate::services::ContactStore;
use crate::storage::PersistenceBackend;

/// Add command handler.
#[derive(Debug, Clone)]
pub struct AddCommand {
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone_number: String,
    /// Optional email.
    pub email: Option<String>,
}

impl AddCommand {
    /// Creates a new add command.
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone_number: phone_number.into(),
            email: None,
        }
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Validates input, adds the contact, and returns the message to show.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or phone number is blank, or if the store
    /// rejects or fails to persist the contact.
    pub fn execute<B: PersistenceBackend>(&self, store: &mut ContactStore<B>) -> Result<String> {
        let name = input::required("Name", &self.name)?;
        let phone_number = input::required("Phone number", &self.phone_number)?;
        let email = input::email(self.email.as_deref());

        let contact = store.new_contact(name, phone_number, email);
        let added = store.add(contact)?;
        Ok(format!("Contact added successfully: {added}"))
    }
}
