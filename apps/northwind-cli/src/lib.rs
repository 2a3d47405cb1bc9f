//! # northwind-cli
//!
//! The `northwind` console app: loads `appsettings.json`, resolves the
//! connection string, and runs one data-access demonstration per
//! subcommand against the Northwind database.
//!
//! ## Module Organization
//!
//! - [`cli`] - clap definition of flags and subcommands
//! - [`config`] - settings file flattening, connection string lookup
//! - [`commands`] - one runner per demonstration, plus the `all` tour
//! - [`render`] - result rows to output lines
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - `AppError`

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;

use crate::cli::Cli;
use crate::config::{AppSettings, ConfigError};

/// Loads the settings file named on the command line (or the optional
/// default one) and applies environment overrides.
pub fn load_settings(cli: &Cli) -> Result<AppSettings, ConfigError> {
    let (file_name, optional) = cli.settings_file();

    let mut settings = AppSettings::load(&cli.base_dir, &file_name, optional)?;
    settings.apply_env_overrides(&cli.connection);
    Ok(settings)
}
