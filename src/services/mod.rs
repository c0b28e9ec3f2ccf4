//! Business logic services.
//!
//! The contact store is the single service: it enforces the phone-number
//! uniqueness invariant and owns persistence for the collection.

mod contact_store;

pub use contact_store::ContactStore;
