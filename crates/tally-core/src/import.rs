//! CSV import: byte decoding and header-driven tabular parsing
//!
//! Bank exports arrive in whatever encoding the bank felt like using. Input is
//! decoded as UTF-8 when valid and as Latin-1 otherwise, so decoding itself
//! never fails. Structure problems (no header, rows wider than the header)
//! are reported as parse errors.

use std::borrow::Cow;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Error, Result};

const UTF8_BOM: char = '\u{feff}';

/// Options for reading delimited text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Rows of an uploaded file, keyed by the file's own header names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column). `None` when the row is shorter than the header.
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }
}

/// Decode raw bytes: UTF-8 when valid, Latin-1 otherwise.
///
/// Latin-1 maps every byte to the code point of the same value, so this
/// cannot fail. A leading byte-order mark is dropped.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix(UTF8_BOM).unwrap_or(text)),
        Err(e) => {
            debug!("Input is not valid UTF-8 ({}), falling back to Latin-1", e);
            Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
        }
    }
}

/// Parse delimited text with a header row into a [`RawTable`]
pub fn parse_csv(text: &str, options: &LoaderOptions) -> Result<RawTable> {
    if text.trim().is_empty() {
        return Err(Error::Parse("No columns to parse from file".into()));
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::Parse("Header row has no column names".into()));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;

        // Short rows are padded with missing cells; wide rows have nowhere to go
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            return Err(Error::Parse(format!(
                "Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }

        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(
        "Parsed {} rows with {} columns: {:?}",
        rows.len(),
        headers.len(),
        headers
    );
    Ok(RawTable::new(headers, rows))
}

/// Decode and parse an uploaded file
pub fn load(bytes: &[u8], options: &LoaderOptions) -> Result<RawTable> {
    parse_csv(&decode(bytes), options)
}
