//! CLI command implementations
//!
//! Every mutating command builds a controller the same way a host would:
//! file store wrapped in the write-through cache, settings from the config
//! file, environment from the process.

use std::fs;
use std::path::Path;

use crate::config::{ConsentCallbacks, ConsentCategory, ConsentSettings, HostEnvironment};
use crate::controller::ConsentController;
use crate::storage::{FileStore, WriteThroughCache};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and dispatch
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}

/// Dispatch a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config } => init(&config),
        Command::Show { config, data_dir } => show(&config, &data_dir),
        Command::AcceptAll { config, data_dir } => {
            mutate(&config, &data_dir, |c| c.accept_all())
        }
        Command::RejectAll { config, data_dir } => {
            mutate(&config, &data_dir, |c| c.reject_all())
        }
        Command::Set {
            category,
            value,
            config,
            data_dir,
        } => {
            let accepted = parse_switch(&value)?;
            mutate(&config, &data_dir, |c| c.update_consent(&category, accepted))
        }
        Command::Reset { config, data_dir } => mutate(&config, &data_dir, |c| c.reset_consent()),
    }
}

/// Write a starter configuration file
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::AlreadyExists(config_path.to_path_buf()));
    }

    let settings = ConsentSettings::new(
        vec![
            ConsentCategory::required("necessary", "Strictly necessary")
                .with_description("Required for the site to function"),
            ConsentCategory::optional("analytics", "Analytics", false)
                .with_description("Usage measurement")
                .with_kind("analytics"),
            ConsentCategory::optional("marketing", "Marketing", false)
                .with_description("Personalized advertising")
                .with_kind("marketing"),
        ],
        "1.0",
    );

    let body = serde_json::to_string_pretty(&settings)
        .map_err(|e| CliError::Io(e.to_string()))?;
    fs::write(config_path, body).map_err(|e| CliError::Io(e.to_string()))?;

    println!("Wrote starter config to {}", config_path.display());
    Ok(())
}

fn show(config_path: &Path, data_dir: &Path) -> CliResult<()> {
    let controller = build_controller(config_path, data_dir)?;
    print_record(&controller)
}

fn mutate(
    config_path: &Path,
    data_dir: &Path,
    op: impl FnOnce(&mut ConsentController),
) -> CliResult<()> {
    let mut controller = build_controller(config_path, data_dir)?;
    op(&mut controller);
    print_record(&controller)
}

fn build_controller(config_path: &Path, data_dir: &Path) -> CliResult<ConsentController> {
    let settings = load_settings(config_path)?;
    let store = WriteThroughCache::new(FileStore::new(data_dir.to_path_buf()));

    Ok(ConsentController::initialize(
        settings,
        HostEnvironment::default(),
        ConsentCallbacks::new(),
        Box::new(store),
    ))
}

fn load_settings(path: &Path) -> CliResult<ConsentSettings> {
    let raw = fs::read_to_string(path).map_err(|e| CliError::ConfigUnreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| CliError::ConfigInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn print_record(controller: &ConsentController) -> CliResult<()> {
    let body = serde_json::to_string_pretty(controller.get_all_consent())
        .map_err(|e| CliError::Io(e.to_string()))?;
    println!("{}", body);
    Ok(())
}

fn parse_switch(value: &str) -> CliResult<bool> {
    match value {
        "on" | "true" | "accept" => Ok(true),
        "off" | "false" | "reject" => Ok(false),
        other => Err(CliError::InvalidArgument(format!(
            "expected on|off, got '{}'",
            other
        ))),
    }
}
