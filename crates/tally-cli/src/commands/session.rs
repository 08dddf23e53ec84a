//! Shared setup: turn CLI input arguments into a loaded session

use std::fs;

use anyhow::{Context, Result};
use tally_core::settings::parse_delimiter;
use tally_core::{Session, Settings};
use tracing::debug;

use crate::cli::InputArgs;

/// Read the input file and load it into a new session.
///
/// `--delimiter` overrides the delimiter from settings. Any load or parse
/// failure is returned as an error so nothing gets rendered.
pub fn open_session(settings: &Settings, input: &InputArgs) -> Result<Session> {
    let mut settings = settings.clone();
    if let Some(delimiter) = &input.delimiter {
        settings.delimiter = parse_delimiter(delimiter).context("Invalid --delimiter")?;
    }

    let bytes = fs::read(&input.file)
        .with_context(|| format!("Failed to read {}", input.file.display()))?;
    debug!("Read {} bytes from {}", bytes.len(), input.file.display());

    let mut session = Session::new(settings).context("Invalid settings")?;
    session
        .upload(&bytes)
        .with_context(|| format!("Failed to load {}", input.file.display()))?;

    Ok(session)
}

/// The session's table; commands only run after a successful upload
pub fn loaded_table(session: &Session) -> Result<&tally_core::NormalizedTable> {
    session.table().context("No transactions loaded")
}
