//! Application settings loaded from a TOML file.
//!
//! The settings file is optional. When it is missing, defaults are used; when it exists
//! but cannot be parsed, start-up fails with a configuration error.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default location of the settings file, relative to the working directory
pub const DEFAULT_SETTINGS_PATH: &str = "finance_tracker.toml";

/// Structure of the settings file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database URL, used when neither `--database-url` nor `DATABASE_URL` is given
    pub database_url: Option<String>,
    /// Symbol printed in front of money amounts
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            currency_symbol: "$".to_string(),
        }
    }
}

impl Settings {
    /// Picks the database URL: an explicit value (flag or environment) wins over the
    /// settings file, which wins over [`DEFAULT_DATABASE_URL`]. Blank values are skipped.
    #[must_use]
    pub fn resolve_database_url(&self, explicit: Option<&str>) -> String {
        non_blank(explicit)
            .or_else(|| non_blank(self.database_url.as_deref()))
            .unwrap_or(DEFAULT_DATABASE_URL)
            .to_string()
    }
}

fn non_blank(url: Option<&str>) -> Option<&str> {
    url.filter(|url| !url.trim().is_empty())
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings file: {e}"),
    })
}

/// Loads settings from `path`, falling back to defaults when the file does not exist.
pub fn load_settings_or_default<P: AsRef<Path>>(path: P) -> Result<Settings> {
    if path.as_ref().exists() {
        load_settings(path)
    } else {
        Ok(Settings::default())
    }
}
