//! Settings for import, vendor cleanup, and display
//!
//! ## Configuration Resolution
//!
//! Settings are loaded with a layered resolution:
//! 1. Explicit path (`--config`), which must exist
//! 2. Override in the config dir (~/.config/tally/settings.toml)
//! 3. Embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::import::LoaderOptions;

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/settings.toml");

/// Boilerplate tokens stripped from descriptions when no settings file says otherwise
pub const DEFAULT_BOILERPLATE_TOKENS: &[&str] = &[
    "pos",
    "card",
    "debit",
    "credit",
    "purchase",
    "auth",
    "online",
    "transaction",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Minimum occurrences for a vendor to count as a possible subscription
    pub subscription_min_occurrences: usize,
    /// Tokens removed from descriptions to derive vendor names
    pub boilerplate_tokens: Vec<String>,
    pub currency_symbol: String,
    /// Rows shown in the head preview
    pub preview_rows: usize,
    /// Field delimiter for uploaded files
    pub delimiter: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            subscription_min_occurrences: 3,
            boilerplate_tokens: DEFAULT_BOILERPLATE_TOKENS
                .iter()
                .map(|t| t.to_string())
                .collect(),
            currency_symbol: "$".to_string(),
            preview_rows: 5,
            delimiter: b',',
        }
    }
}

impl Settings {
    /// Load settings: explicit path, then the config dir override, then embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::InvalidData(format!(
                        "Settings file not found: {}",
                        path.display()
                    )));
                }
                read_settings(path)?
            }
            None => match default_settings_path() {
                Some(default_path) if default_path.exists() => read_settings(&default_path)?,
                _ => DEFAULT_SETTINGS.to_string(),
            },
        };

        Self::from_toml(&content)
    }

    /// Parse settings from TOML content, applied over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawSettings = toml::from_str(content)
            .map_err(|e| Error::InvalidData(format!("Invalid settings TOML: {}", e)))?;

        let mut settings = Settings::default();

        if let Some(subscriptions) = raw.subscriptions {
            if let Some(min) = subscriptions.min_occurrences {
                if min == 0 {
                    return Err(Error::InvalidData(
                        "subscriptions.min_occurrences must be at least 1".into(),
                    ));
                }
                settings.subscription_min_occurrences = min;
            }
        }

        if let Some(vendor) = raw.vendor {
            if let Some(tokens) = vendor.boilerplate_tokens {
                if tokens.iter().any(|t| t.trim().is_empty()) {
                    return Err(Error::InvalidData(
                        "vendor.boilerplate_tokens must not contain empty tokens".into(),
                    ));
                }
                settings.boilerplate_tokens = tokens;
            }
        }

        if let Some(display) = raw.display {
            if let Some(symbol) = display.currency_symbol {
                settings.currency_symbol = symbol;
            }
            if let Some(rows) = display.preview_rows {
                settings.preview_rows = rows;
            }
        }

        if let Some(import) = raw.import {
            if let Some(delimiter) = import.delimiter {
                settings.delimiter = parse_delimiter(&delimiter)?;
            }
        }

        Ok(settings)
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            delimiter: self.delimiter,
        }
    }
}

/// Default settings override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("settings.toml"))
}

/// Parse a delimiter given as a single ASCII character, or `\t`/`tab`
pub fn parse_delimiter(s: &str) -> Result<u8> {
    if matches!(s, "\\t" | "tab") {
        return Ok(b'\t');
    }
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(Error::InvalidData(format!(
            "Delimiter must be a single ASCII character, got {:?}",
            s
        ))),
    }
}

fn read_settings(path: &Path) -> Result<String> {
    debug!("Reading settings from {}", path.display());
    Ok(fs::read_to_string(path)?)
}

/// Raw settings structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawSettings {
    subscriptions: Option<RawSubscriptions>,
    vendor: Option<RawVendor>,
    display: Option<RawDisplay>,
    import: Option<RawImport>,
}

#[derive(Debug, Deserialize)]
struct RawSubscriptions {
    min_occurrences: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawVendor {
    boilerplate_tokens: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
    preview_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawImport {
    delimiter: Option<String>,
}
