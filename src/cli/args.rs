//! CLI argument definitions using clap
//!
//! Commands:
//! - consentry init --config <path>
//! - consentry show --config <path> --data-dir <path>
//! - consentry accept-all / reject-all --config <path> --data-dir <path>
//! - consentry set <category> <on|off> --config <path> --data-dir <path>
//! - consentry reset --config <path> --data-dir <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// consentry - A strict, deterministic, embeddable consent-management core
#[derive(Parser, Debug)]
#[command(name = "consentry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter configuration file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./consentry.json")]
        config: PathBuf,
    },

    /// Print the reconciled consent record
    Show {
        /// Path to configuration file
        #[arg(long, default_value = "./consentry.json")]
        config: PathBuf,
        /// Directory holding the persisted consent store
        #[arg(long, default_value = "./consent_data")]
        data_dir: PathBuf,
    },

    /// Accept every configured category
    AcceptAll {
        /// Path to configuration file
        #[arg(long, default_value = "./consentry.json")]
        config: PathBuf,
        /// Directory holding the persisted consent store
        #[arg(long, default_value = "./consent_data")]
        data_dir: PathBuf,
    },

    /// Reject every optional category
    RejectAll {
        /// Path to configuration file
        #[arg(long, default_value = "./consentry.json")]
        config: PathBuf,
        /// Directory holding the persisted consent store
        #[arg(long, default_value = "./consent_data")]
        data_dir: PathBuf,
    },

    /// Set a single category decision
    Set {
        /// Category id to update
        category: String,
        /// New state: on|off
        value: String,
        /// Path to configuration file
        #[arg(long, default_value = "./consentry.json")]
        config: PathBuf,
        /// Directory holding the persisted consent store
        #[arg(long, default_value = "./consent_data")]
        data_dir: PathBuf,
    },

    /// Clear persisted consent and start over
    Reset {
        /// Path to configuration file
        #[arg(long, default_value = "./consentry.json")]
        config: PathBuf,
        /// Directory holding the persisted consent store
        #[arg(long, default_value = "./consent_data")]
        data_dir: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
