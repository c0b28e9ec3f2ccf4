//! Contact store service.
//!
//! Owns the phone-number index, the identifier generator, and the persistence
//! backend. Every successful mutation writes the whole collection back through
//! the backend before returning.
//!
//! # Invariants
//!
//! - Every indexed contact's phone number equals the key it is stored under,
//!   including after a rejected or failed operation.
//! - Rejections (`DuplicateKey`, `NotFound`) never touch the index.
//! - A failed write (`PersistenceWrite`) does not roll back the in-memory
//!   mutation that triggered it; memory and disk diverge until the next
//!   successful save.
//! - After loading, the generator is ahead of every loaded id.

use crate::models::{Contact, ContactChanges, ContactFields, ContactId, IdGenerator};
use crate::storage::codec;
use crate::storage::{FilesystemBackend, PersistenceBackend};
use crate::{Error, Result};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::PathBuf;
use tracing::instrument;

/// Phone-number indexed contact store.
#[derive(Debug)]
pub struct ContactStore<B: PersistenceBackend> {
    /// Phone number to contact.
    index: HashMap<String, Contact>,
    /// Identifier source for newly created contacts.
    ids: IdGenerator,
    /// Where the collection is persisted.
    backend: B,
    /// Read error recovered from while opening, if any.
    load_error: Option<Error>,
}

impl ContactStore<FilesystemBackend> {
    /// Opens a store backed by the file at `path`.
    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::open(FilesystemBackend::new(path))
    }
}

impl<B: PersistenceBackend> ContactStore<B> {
    /// Opens a store over `backend`, loading whatever it currently holds.
    ///
    /// A missing or empty blob yields an empty store. A blob that cannot be
    /// read or decoded is logged, kept available through
    /// [`Self::load_error`], and also yields an empty store.
    pub fn open(backend: B) -> Self {
        let mut store = Self {
            index: HashMap::new(),
            ids: IdGenerator::new(),
            backend,
            load_error: None,
        };
        store.load();
        store
    }

    fn load(&mut self) {
        match self.read_contacts() {
            Ok(contacts) => {
                for contact in contacts {
                    self.ids.observe(contact.id());
                    self.index
                        .insert(contact.phone_number().to_string(), contact);
                }
                tracing::debug!(
                    path = %self.backend.location().display(),
                    count = self.index.len(),
                    next_id = %self.ids.peek(),
                    "Loaded contacts"
                );
            },
            Err(e) => {
                tracing::warn!(
                    path = %self.backend.location().display(),
                    error = %e,
                    "Failed to load contacts, starting with an empty contact book"
                );
                self.load_error = Some(e);
            },
        }
    }

    fn read_contacts(&self) -> Result<Vec<Contact>> {
        let Some(bytes) = self.backend.read()? else {
            return Ok(Vec::new());
        };

        codec::decode(&bytes).map_err(|e| Error::PersistenceRead {
            path: self.backend.location().to_path_buf(),
            cause: e.to_string(),
        })
    }

    /// Writes the whole collection to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistenceWrite`] if the collection cannot be encoded
    /// or written. The in-memory index is unchanged either way.
    pub fn save(&mut self) -> Result<()> {
        let bytes = codec::encode(self.index.values()).map_err(|e| Error::PersistenceWrite {
            path: self.backend.location().to_path_buf(),
            cause: e.to_string(),
        })?;
        self.backend.write(&bytes)
    }

    fn persist(&mut self, operation: &'static str) -> Result<()> {
        self.save().inspect_err(|e| {
            tracing::error!(
                operation,
                path = %self.backend.location().display(),
                error = %e,
                "Failed to persist contacts, in-memory changes remain applied"
            );
        })
    }

    /// Creates a contact with the next identifier from this store's generator.
    ///
    /// The contact is not stored; pass it to [`Self::add`].
    pub fn new_contact(
        &mut self,
        name: impl Into<String>,
        phone_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Contact {
        Contact::new(&mut self.ids, name, phone_number, email)
    }

    /// Adds a contact under its phone number.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateKey`] if the phone number is already stored; the
    ///   store is unchanged.
    /// - [`Error::PersistenceWrite`] if the save fails; the contact stays added.
    #[instrument(skip_all, fields(phone = %contact.phone_number()))]
    pub fn add(&mut self, contact: Contact) -> Result<Contact> {
        match self.index.entry(contact.phone_number().to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!("Rejected add: phone number already stored");
                return Err(Error::DuplicateKey {
                    phone_number: contact.phone_number().to_string(),
                });
            },
            Entry::Vacant(slot) => {
                slot.insert(contact.clone());
            },
        }

        self.persist("add")?;
        tracing::debug!(id = %contact.id(), "Added contact");
        Ok(contact)
    }

    /// Returns the contact stored under `phone_number`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing is stored under that number.
    pub fn get(&self, phone_number: &str) -> Result<&Contact> {
        self.index
            .get(phone_number)
            .ok_or_else(|| not_found(phone_number))
    }

    /// Replaces the contact at `old_phone_number` with `contact`.
    ///
    /// The replacement is stored under its own phone number, which may differ
    /// from `old_phone_number`. Ids are taken from `contact` as given; use
    /// [`Self::replace_preserving_identity`] to keep the original id.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `old_phone_number` is not stored.
    /// - [`Error::DuplicateKey`] if the new phone number differs from the old
    ///   one and is already stored by another contact.
    /// - [`Error::PersistenceWrite`] if the save fails; the replacement stays
    ///   applied.
    #[instrument(skip_all, fields(old_phone = %old_phone_number, new_phone = %contact.phone_number()))]
    pub fn update(&mut self, old_phone_number: &str, contact: Contact) -> Result<Contact> {
        if !self.index.contains_key(old_phone_number) {
            tracing::debug!("Rejected update: old phone number not stored");
            return Err(not_found(old_phone_number));
        }

        let new_phone_number = contact.phone_number();
        if new_phone_number != old_phone_number && self.index.contains_key(new_phone_number) {
            tracing::debug!("Rejected update: new phone number belongs to another contact");
            return Err(Error::DuplicateKey {
                phone_number: new_phone_number.to_string(),
            });
        }

        self.index.remove(old_phone_number);
        self.index
            .insert(new_phone_number.to_string(), contact.clone());

        self.persist("update")?;
        tracing::debug!(id = %contact.id(), "Updated contact");
        Ok(contact)
    }

    /// Replaces the contact at `old_phone_number` with `fields`, keeping its id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`].
    pub fn replace_preserving_identity(
        &mut self,
        old_phone_number: &str,
        fields: ContactFields,
    ) -> Result<Contact> {
        let id = self.get(old_phone_number)?.id();
        self.update(old_phone_number, fields.into_contact(id))
    }

    /// Applies a partial edit to the contact at `phone_number`, keeping its id.
    ///
    /// Fields left as `None` keep their current values.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update`].
    pub fn apply_changes(&mut self, phone_number: &str, changes: ContactChanges) -> Result<Contact> {
        let fields = changes.apply_to(self.get(phone_number)?);
        self.replace_preserving_identity(phone_number, fields)
    }

    /// Removes the contact stored under `phone_number`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if nothing is stored under that number.
    /// - [`Error::PersistenceWrite`] if the save fails; the contact stays
    ///   removed.
    #[instrument(skip(self))]
    pub fn delete(&mut self, phone_number: &str) -> Result<Contact> {
        let Some(removed) = self.index.remove(phone_number) else {
            tracing::debug!("Rejected delete: phone number not stored");
            return Err(not_found(phone_number));
        };

        self.persist("delete")?;
        tracing::debug!(id = %removed.id(), "Deleted contact");
        Ok(removed)
    }

    /// Returns contacts whose name or phone number contains `query`,
    /// ignoring case.
    ///
    /// Emails are not searched. Results come back in index iteration order,
    /// which is unspecified.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = query.to_lowercase();
        self.index
            .values()
            .filter(|contact| contact.matches_lowercase(&needle))
            .collect()
    }

    /// Returns every stored contact in unspecified order.
    pub fn list_all(&self) -> Vec<&Contact> {
        self.index.values().collect()
    }

    /// Returns true if a contact is stored under `phone_number`.
    #[must_use]
    pub fn contains(&self, phone_number: &str) -> bool {
        self.index.contains_key(phone_number)
    }

    /// Returns the number of stored contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no contacts are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the id the next created contact will receive.
    #[must_use]
    pub const fn next_id(&self) -> ContactId {
        self.ids.peek()
    }

    /// Returns the read error recovered from when the store was opened.
    #[must_use]
    pub const fn load_error(&self) -> Option<&Error> {
        self.load_error.as_ref()
    }

    /// Returns the persistence backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the store and returns its backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }
}

fn not_found(phone_number: &str) -> Error {
    Error::NotFound {
        phone_number: phone_number.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use std::path::Path;
    use test_case::test_case;

    /// Backend whose writes always fail.
    #[derive(Debug, Default)]
    struct ReadOnlyBackend {
        contents: Option<Vec<u8>>,
    }

    impl PersistenceBackend for ReadOnlyBackend {
        fn location(&self) -> &Path {
            Path::new("read-only")
        }

        fn read(&self) -> Result<Option<Vec<u8>>> {
            Ok(self.contents.clone())
        }

        fn write(&mut self, _bytes: &[u8]) -> Result<()> {
            Err(Error::PersistenceWrite {
                path: PathBuf::from("read-only"),
                cause: "read-only backend".to_string(),
            })
        }
    }

    fn store() -> ContactStore<MemoryBackend> {
        ContactStore::open(MemoryBackend::new())
    }

    fn add(store: &mut ContactStore<MemoryBackend>, name: &str, phone: &str, email: &str) {
        let contact = store.new_contact(name, phone, email);
        store.add(contact).unwrap();
    }

    fn reopen(store: ContactStore<MemoryBackend>) -> ContactStore<MemoryBackend> {
        ContactStore::open(store.into_backend())
    }

    #[test]
    fn test_add_then_get() {
        let mut store = store();
        add(&mut store, "Alice", "555-0100", "a@b.com");

        let found = store.get("555-0100").unwrap();
        assert_eq!(found.name(), "Alice");
        assert_eq!(found.phone_number(), "555-0100");
        assert_eq!(found.email(), "a@b.com");
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn test_add_duplicate_is_rejected_without_mutation() {
        let mut store = store();
        add(&mut store, "Alice", "555-0100", "");

        let dup = store.new_contact("Alice2", "555-0100", "a@b.com");
        let err = store.add(dup).unwrap_err();

        assert!(matches!(err, Error::DuplicateKey { ref phone_number } if phone_number == "555-0100"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("555-0100").unwrap().name(), "Alice");
        assert_eq!(store.backend().write_count(), 1);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = store();
        assert!(matches!(store.get("nope"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_delete_then_get() {
        let mut store = store();
        add(&mut store, "Alice", "555-0100", "");

        let removed = store.delete("555-0100").unwrap();
        assert_eq!(removed.name(), "Alice");
        assert!(matches!(store.get("555-0100"), Err(Error::NotFound { .. })));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut store = store();
        assert!(matches!(store.delete("555-0100"), Err(Error::NotFound { .. })));
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = store();
        let replacement = store.new_contact("Alice", "555-0200", "");

        let err = store.update("555-0100", replacement).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref phone_number } if phone_number == "555-0100"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_onto_other_contact_is_rejected() {
        let mut store = store();
        add(&mut store, "Alice", "111", "alice@x.com");
        add(&mut store, "Bob", "222", "bob@x.com");

        let replacement = store.new_contact("Alice", "222", "");
        let err = store.update("111", replacement).unwrap_err();

        assert!(matches!(err, Error::DuplicateKey { ref phone_number } if phone_number == "222"));
        assert_eq!(store.get("111").unwrap().name(), "Alice");
        assert_eq!(store.get("111").unwrap().email(), "alice@x.com");
        assert_eq!(store.get("222").unwrap().name(), "Bob");
        assert_eq!(store.get("222").unwrap().email(), "bob@x.com");
    }

    #[test]
    fn test_update_rekeys() {
        let mut store = store();
        add(&mut store, "Alice", "111", "");

        let replacement = store.new_contact("Alice", "333", "a@b.com");
        let replacement_id = replacement.id();
        store.update("111", replacement).unwrap();

        assert!(matches!(store.get("111"), Err(Error::NotFound { .. })));
        let found = store.get("333").unwrap();
        assert_eq!(found.id(), replacement_id);
        assert_eq!(found.email(), "a@b.com");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_same_key() {
        let mut store = store();
        add(&mut store, "Alice", "111", "");

        let replacement = store.new_contact("Alicia", "111", "");
        store.update("111", replacement).unwrap();

        assert_eq!(store.get("111").unwrap().name(), "Alicia");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_preserving_identity_keeps_id() {
        let mut store = store();
        add(&mut store, "Alice", "111", "");
        let original_id = store.get("111").unwrap().id();

        let updated = store
            .replace_preserving_identity("111", ContactFields::new("Alice", "222", "a@b.com"))
            .unwrap();

        assert_eq!(updated.id(), original_id);
        assert_eq!(store.get("222").unwrap().id(), original_id);
    }

    #[test]
    fn test_apply_changes_keeps_unset_fields() {
        let mut store = store();
        add(&mut store, "Alice", "111", "a@b.com");
        let original_id = store.get("111").unwrap().id();

        let updated = store
            .apply_changes("111", ContactChanges::new().with_name("Alicia"))
            .unwrap();

        assert_eq!(updated.id(), original_id);
        assert_eq!(updated.name(), "Alicia");
        assert_eq!(updated.phone_number(), "111");
        assert_eq!(updated.email(), "a@b.com");
    }

    #[test_case("ana", &["111", "222"] ; "lowercase query")]
    #[test_case("ANA", &["111", "222"] ; "uppercase query")]
    #[test_case("33", &["333"] ; "phone substring")]
    #[test_case("x.com", &[] ; "email is not searched")]
    #[test_case("", &["111", "222", "333"] ; "empty query matches all")]
    fn test_search(query: &str, expected: &[&str]) {
        let mut store = store();
        add(&mut store, "Ana", "111", "");
        add(&mut store, "Banana Joe", "222", "");
        add(&mut store, "Bob", "333", "ana@x.com");

        let mut phones: Vec<&str> = store
            .search(query)
            .into_iter()
            .map(Contact::phone_number)
            .collect();
        phones.sort_unstable();

        assert_eq!(phones, expected);
    }

    #[test]
    fn test_list_all() {
        let mut store = store();
        assert!(store.list_all().is_empty());

        add(&mut store, "Ana", "111", "");
        add(&mut store, "Bob", "222", "");

        assert_eq!(store.list_all().len(), 2);
    }

    #[test]
    fn test_index_keys_match_phone_numbers() {
        let mut store = store();
        add(&mut store, "Ana", "111", "");
        add(&mut store, "Bob", "222", "");
        let _ = store.apply_changes("111", ContactChanges::new().with_phone_number("333"));
        let _ = store.apply_changes("222", ContactChanges::new().with_phone_number("333"));

        for (key, contact) in &store.index {
            assert_eq!(key, contact.phone_number());
        }
    }

    #[test]
    fn test_reopen_restores_contacts_and_generator() {
        let mut store = store();
        add(&mut store, "Ana", "111", "");
        add(&mut store, "Bob", "222", "bob@x.com");
        store.delete("111").unwrap();

        let mut reopened = reopen(store);
        assert!(reopened.load_error().is_none());
        assert_eq!(reopened.len(), 1);
        let bob = reopened.get("222").unwrap();
        assert_eq!(bob.id(), ContactId::new(2));
        assert_eq!(bob.email(), "bob@x.com");

        let next = reopened.new_contact("Cat", "333", "");
        assert_eq!(next.id(), ContactId::new(3));
    }

    #[test]
    fn test_load_fast_forwards_generator() {
        let json = r#"{"format_version":1,"contacts":[{"id":57,"name":"Old","phone_number":"1","email":""}]}"#;
        let mut store = ContactStore::open(MemoryBackend::with_contents(json));

        assert_eq!(store.next_id(), ContactId::new(58));
        let contact = store.new_contact("New", "2", "");
        assert!(contact.id() >= ContactId::new(58));
    }

    #[test]
    fn test_reserved_id_on_disk_is_corrupt() {
        let json = format!(
            r#"{{"format_version":1,"contacts":[{{"id":{},"name":"Max","phone_number":"1","email":""}}]}}"#,
            u64::MAX
        );
        let mut store = ContactStore::open(MemoryBackend::with_contents(json));

        assert!(store.is_empty());
        assert!(matches!(store.load_error(), Some(Error::PersistenceRead { .. })));

        let contact = store.new_contact("New", "2", "");
        let added = store.add(contact).unwrap();
        assert_eq!(added.id(), ContactId::new(1));
    }

    #[test]
    fn test_highest_loaded_id_is_not_reissued() {
        let json = format!(
            r#"{{"format_version":1,"contacts":[{{"id":{},"name":"Big","phone_number":"1","email":""}}]}}"#,
            u64::MAX - 1
        );
        let mut store = ContactStore::open(MemoryBackend::with_contents(json));
        assert!(store.load_error().is_none());

        let contact = store.new_contact("New", "2", "");
        let added = store.add(contact).unwrap();
        assert_ne!(added.id(), store.get("1").unwrap().id());
    }

    #[test]
    fn test_corrupt_blob_yields_empty_store() {
        let mut store = ContactStore::open(MemoryBackend::with_contents(b"{not json".to_vec()));

        assert!(store.is_empty());
        assert!(matches!(store.load_error(), Some(Error::PersistenceRead { .. })));
        assert_eq!(store.next_id(), ContactId::new(1));

        add(&mut store, "Ana", "111", "");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_failure_keeps_mutation_in_memory() {
        let mut store = ContactStore::open(ReadOnlyBackend::default());

        let contact = store.new_contact("Ana", "111", "");
        let err = store.add(contact).unwrap_err();

        assert!(matches!(err, Error::PersistenceWrite { .. }));
        assert!(!err.is_rejection());
        assert_eq!(store.get("111").unwrap().name(), "Ana");

        let err = store
            .replace_preserving_identity("111", ContactFields::new("Ana", "222", ""))
            .unwrap_err();
        assert!(matches!(err, Error::PersistenceWrite { .. }));
        assert!(!store.contains("111"));
        assert_eq!(store.get("222").unwrap().id(), ContactId::new(1));

        let err = store.delete("222").unwrap_err();
        assert!(matches!(err, Error::PersistenceWrite { .. }));
        assert!(!store.contains("222"));
    }

    #[test]
    fn test_rejection_on_failing_backend_is_still_rejection() {
        let json = r#"{"format_version":1,"contacts":[{"id":1,"name":"Ana","phone_number":"111","email":""}]}"#;
        let mut store = ContactStore::open(ReadOnlyBackend {
            contents: Some(json.as_bytes().to_vec()),
        });

        let dup = store.new_contact("Other", "111", "");
        let err = store.add(dup).unwrap_err();
        assert!(err.is_rejection());
    }
}
