//! CLI command implementations.
//!
//! A thin, one-shot shell over [`crate::ContactStore`]. Each command validates
//! its input, calls one store operation, and returns the text to print.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `add` | Add a contact |
//! | `get` | Show the contact stored under a phone number |
//! | `update` | Edit a contact; omitted fields keep their values |
//! | `delete` | Remove a contact |
//! | `search` | Find contacts by name or phone fragment |
//! | `list` | Show every contact |
//!
//! # Example Usage
//!
//! ```bash
//! contactbook add "Alice" 555-0100 --email alice@example.com
//! contactbook update 555-0100 --phone 555-0200
//! contactbook search ali
//! contactbook list
//! ```

mod add;
mod delete;
pub mod input;
mod lookup;
mod update;

pub use add::AddCommand;
pub use delete::DeleteCommand;
pub use lookup::{GetCommand, ListCommand, SearchCommand, render_contacts};
pub use update::UpdateCommand;
