//! Read-only CLI commands: get, search, and list.

use super::input;
use crate::Result;
use crate::models::Contact;
use crate::services::ContactStore;
use crate::storage::PersistenceBackend;

/// Get command handler.
#[derive(Debug, Clone)]
pub struct GetCommand {
    /// Phone number to look up.
    pub phone_number: String,
}

impl GetCommand {
    /// Creates a get command.
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
        }
    }

    /// Looks up the contact and returns its rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone number is blank or not stored.
    pub fn execute<B: PersistenceBackend>(&self, store: &ContactStore<B>) -> Result<String> {
        let phone_number = input::required("Phone number", &self.phone_number)?;
        Ok(store.get(&phone_number)?.to_string())
    }
}

/// Search command handler.
#[derive(Debug, Clone)]
pub struct SearchCommand {
    /// Name or phone number fragment.
    pub query: String,
}

impl SearchCommand {
    /// Creates a search command.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Runs the search and returns the rendered matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query is blank.
    pub fn execute<B: PersistenceBackend>(&self, store: &ContactStore<B>) -> Result<String> {
        let query = input::required("Search query", &self.query)?;
        let found = store.search(&query);
        if found.is_empty() {
            return Ok(format!("No contacts found matching '{query}'."));
        }
        Ok(format!("Found Contacts:\n{}", render_contacts(found)))
    }
}

/// List command handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCommand;

impl ListCommand {
    /// Creates a list command.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns every contact rendered one per line.
    pub fn execute<B: PersistenceBackend>(self, store: &ContactStore<B>) -> String {
        let all = store.list_all();
        if all.is_empty() {
            return "No contacts available.".to_string();
        }
        render_contacts(all)
    }
}

/// Renders contacts one per line, ordered by id.
#[must_use]
pub fn render_contacts(mut contacts: Vec<&Contact>) -> String {
    contacts.sort_by_key(|c| c.id());
    contacts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
