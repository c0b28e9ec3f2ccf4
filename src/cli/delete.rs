//! Delete CLI command.

use super::input;
use crate::Result;
use crate::services::ContactStore;
use crate::storage::PersistenceBackend;

/// Delete command handler.
#[derive(Debug, Clone)]
pub struct DeleteCommand {
    /// Phone number of the contact to delete.
    pub phone_number: String,
}

impl DeleteCommand {
    /// Creates a delete command.
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
        }
    }

    /// Deletes the contact and returns the message to show.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone number is blank, the contact does not
    /// exist, or the save fails.
    pub fn execute<B: PersistenceBackend>(&self, store: &mut ContactStore<B>) -> Result<String> {
        let phone_number = input::required("Phone number", &self.phone_number)?;
        store.delete(&phone_number)?;
        Ok(format!(
            "Contact with phone number {phone_number} deleted successfully."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::storage::MemoryBackend;

    #[test]
    fn test_delete_command() {
        let mut store = ContactStore::open(MemoryBackend::new());
        let contact = store.new_contact("Alice", "555-0100", "");
        store.add(contact).unwrap();

        let output = DeleteCommand::new("555-0100").execute(&mut store).unwrap();

        assert_eq!(output, "Contact with phone number 555-0100 deleted successfully.");
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_command_missing() {
        let mut store = ContactStore::open(MemoryBackend::new());
        let err = DeleteCommand::new("555-0100").execute(&mut store).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
