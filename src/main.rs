//! Binary entry point for contactbook.
//!
//! This binary provides the command-line shell over the contact store.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use contactbook::ContactStore;
use contactbook::cli::{
    AddCommand, DeleteCommand, GetCommand, ListCommand, SearchCommand, UpdateCommand,
};
use contactbook::config::ContactBookConfig;
use contactbook::observability;
use std::path::PathBuf;
use std::process::ExitCode;

/// Contactbook - a single-user contact book.
#[derive(Parser)]
#[command(name = "contactbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the contacts file (overrides config and environment).
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Add a contact.
    Add {
        /// Contact name.
        name: String,

        /// Phone number (unique).
        phone: String,

        /// Email address.
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Show the contact stored under a phone number.
    Get {
        /// Phone number to look up.
        phone: String,
    },

    /// Update a contact. Omitted or blank fields keep their current values.
    Update {
        /// Phone number of the contact to update.
        phone: String,

        /// New name.
        #[arg(short, long)]
        name: Option<String>,

        /// New phone number.
        #[arg(short = 'p', long = "phone")]
        new_phone: Option<String>,

        /// New email address.
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Delete a contact.
    Delete {
        /// Phone number of the contact to delete.
        phone: String,
    },

    /// Search contacts by name or phone number.
    Search {
        /// Name or phone number fragment (case-insensitive).
        query: String,
    },

    /// List all contacts.
    List,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match cli.store.clone() {
        Some(path) => config.with_store_path(path),
        None => config,
    };

    match run_command(cli.command, &config) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command against the configured store.
fn run_command(command: Commands, config: &ContactBookConfig) -> contactbook::Result<String> {
    let mut store = ContactStore::open_file(&config.store_path);
    if let Some(e) = store.load_error() {
        eprintln!("Warning: {e}. Starting with an empty contact book.");
    }

    match command {
        Commands::Add { name, phone, email } => {
            let cmd = AddCommand::new(name, phone);
            let cmd = match email {
                Some(email) => cmd.with_email(email),
                None => cmd,
            };
            cmd.execute(&mut store)
        },

        Commands::Get { phone } => GetCommand::new(phone).execute(&store),

        Commands::Update {
            phone,
            name,
            new_phone,
            email,
        } => UpdateCommand {
            phone_number: phone,
            name,
            new_phone_number: new_phone,
            email,
        }
        .execute(&mut store),

        Commands::Delete { phone } => DeleteCommand::new(phone).execute(&mut store),

        Commands::Search { query } => SearchCommand::new(query).execute(&store),

        Commands::List => Ok(ListCommand::new().execute(&store)),
    }
}

/// Loads configuration.
fn load_config(path: Option<&std::path::Path>) -> contactbook::Result<ContactBookConfig> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        return ContactBookConfig::load_from_file(config_path);
    }

    // Otherwise, load from the environment or default location
    Ok(ContactBookConfig::load_default())
}
