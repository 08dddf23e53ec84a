//! Error types for Tally

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed tabular structure. Blocks all rendering for the upload.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// True for malformed-input errors (as opposed to settings or IO problems)
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Csv(_) | Self::Parse(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
