//! Data models for the contact book.

mod contact;
mod id;

pub use contact::{Contact, ContactChanges, ContactFields, EMPTY_EMAIL_PLACEHOLDER};
pub use id::{ContactId, IdGenerator};
