//! CLI harness for consentry
//!
//! A host integration and debugging aid operating on a file-backed consent
//! store:
//! - init: write a starter configuration file
//! - show: print the reconciled record for the configured storage key
//! - accept-all / reject-all: bulk decisions
//! - set: single-category decision
//! - reset: clear persisted consent

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliResult};
