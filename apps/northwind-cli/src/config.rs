//! Settings loading.
//!
//! `appsettings.json` is flattened into `:`-separated keys, so
//!
//! ```json
//! { "ConnectionStrings": { "NorthWindDS": "northwind.db" } }
//! ```
//!
//! becomes `ConnectionStrings:NorthWindDS = northwind.db`. Lookups ignore
//! ASCII case. Array elements use their index as the key segment, `null`
//! becomes an empty string.

use serde_json::Value;
use std::collections::BTreeMap;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default settings file name, looked up in the base directory.
pub const SETTINGS_FILE: &str = "appsettings.json";

/// Environment variable that replaces the selected connection string.
pub const CONNECTION_ENV_VAR: &str = "NORTHWIND_CONNECTION_STRING";

const CONNECTION_STRINGS_SECTION: &str = "ConnectionStrings";

/// Flattened application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    /// Lower-cased key → value.
    values: BTreeMap<String, String>,
}

impl AppSettings {
    /// Loads `file_name` from `base_dir`.
    ///
    /// A missing file yields empty settings when `optional` is set and
    /// `ConfigError::NotFound` otherwise.
    pub fn load(base_dir: &Path, file_name: &Path, optional: bool) -> Result<Self, ConfigError> {
        let path = base_dir.join(file_name);

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound && optional => {
                debug!(path = %path.display(), "Optional settings file not found");
                return Ok(AppSettings::default());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound { path });
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        let settings = AppSettings::from_json(&text).map_err(|reason| ConfigError::Malformed {
            path: path.clone(),
            reason,
        })?;

        info!(path = %path.display(), keys = settings.len(), "Loaded settings");
        Ok(settings)
    }

    /// Parses a settings document. The error is a human-readable reason.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let document: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;

        if !document.is_object() {
            return Err("top-level value must be an object".to_string());
        }

        let mut values = BTreeMap::new();
        flatten("", &document, &mut values);
        Ok(AppSettings { values })
    }

    /// Value for `key` (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_ascii_lowercase(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `ConnectionStrings:<name>`, if present.
    pub fn connection_string(&self, name: &str) -> Option<&str> {
        self.get(&format!("{CONNECTION_STRINGS_SECTION}:{name}"))
    }

    /// Like [`AppSettings::connection_string`], but absence is an error.
    pub fn require_connection_string(&self, name: &str) -> Result<&str, ConfigError> {
        self.connection_string(name)
            .ok_or_else(|| ConfigError::MissingConnectionString {
                name: name.to_string(),
            })
    }

    /// Replaces connection string `name` with a value.
    pub fn override_connection_string(&mut self, name: &str, value: impl Into<String>) {
        self.set(&format!("{CONNECTION_STRINGS_SECTION}:{name}"), value);
    }

    /// Applies environment overrides on top of the loaded file.
    ///
    /// ## Supported Variables
    /// - `NORTHWIND_CONNECTION_STRING` - replaces connection string `name`
    pub fn apply_env_overrides(&mut self, name: &str) {
        if let Ok(value) = env::var(CONNECTION_ENV_VAR) {
            debug!(name, "Connection string overridden from environment");
            self.override_connection_string(name, value);
        }
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    let child_key = |segment: &str| {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}:{segment}")
        }
    };

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten(&child_key(key), child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(&child_key(&index.to_string()), child, out);
            }
        }
        Value::Null => {
            out.insert(prefix.to_ascii_lowercase(), String::new());
        }
        Value::String(s) => {
            out.insert(prefix.to_ascii_lowercase(), s.clone());
        }
        Value::Bool(_) | Value::Number(_) => {
            out.insert(prefix.to_ascii_lowercase(), value.to_string());
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Settings file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed settings file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("No connection string named '{name}' (expected ConnectionStrings:{name})")]
    MissingConnectionString { name: String },
}
