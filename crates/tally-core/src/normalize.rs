//! Normalization of arbitrary bank exports into the canonical schema
//!
//! Column detection runs an ordered list of header rules. Each rule scans the
//! headers in file order and takes the first column any of its matchers
//! accepts. Precedence is fixed: date, then description, then amount, with the
//! exact `debit` + `credit` pair taking priority over a single amount column.
//!
//! Nothing here fails: unparseable dates become null, unparseable amounts
//! become zero, and missing columns fall back to sentinels.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::error::Result;
use crate::import::RawTable;
use crate::models::{
    month_key, AmountSource, ColumnMapping, ColumnRef, NormalizedRow, NormalizedTable,
    SourceField, TransactionType,
};
use crate::settings::{Settings, DEFAULT_BOILERPLATE_TOKENS};

/// How a lowercased header name is tested
#[derive(Debug, Clone, Copy)]
enum Matcher {
    Contains(&'static str),
    Exact(&'static str),
}

impl Matcher {
    fn matches(&self, header: &str) -> bool {
        match self {
            Self::Contains(needle) => header.contains(needle),
            Self::Exact(name) => header == *name,
        }
    }
}

/// A canonical field and the matchers that select its source column
struct ColumnRule {
    field: SourceField,
    matchers: &'static [Matcher],
}

impl ColumnRule {
    /// First column (in file order) accepted by any matcher
    fn find(&self, lowered: &[String], headers: &[String]) -> Option<ColumnRef> {
        lowered
            .iter()
            .position(|h| self.matchers.iter().any(|m| m.matches(h)))
            .map(|i| ColumnRef::new(i, headers[i].clone()))
    }
}

const DATE_RULE: ColumnRule = ColumnRule {
    field: SourceField::Date,
    matchers: &[Matcher::Contains("date")],
};

const DESCRIPTION_RULE: ColumnRule = ColumnRule {
    field: SourceField::Description,
    matchers: &[
        Matcher::Contains("desc"),
        Matcher::Contains("merchant"),
        Matcher::Contains("payee"),
    ],
};

const DEBIT_RULE: ColumnRule = ColumnRule {
    field: SourceField::Amount,
    matchers: &[Matcher::Exact("debit")],
};

const CREDIT_RULE: ColumnRule = ColumnRule {
    field: SourceField::Amount,
    matchers: &[Matcher::Exact("credit")],
};

// Known header aliases first, then substring matches
const AMOUNT_RULE: ColumnRule = ColumnRule {
    field: SourceField::Amount,
    matchers: &[
        Matcher::Exact("amount"),
        Matcher::Exact("transaction amount"),
        Matcher::Exact("debit"),
        Matcher::Exact("credit"),
        Matcher::Contains("amount"),
        Matcher::Contains("debit"),
        Matcher::Contains("credit"),
    ],
};

impl ColumnMapping {
    /// Pick source columns for the canonical fields from a header row
    pub fn detect(headers: &[String]) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let date = DATE_RULE.find(&lowered, headers);
        let description = DESCRIPTION_RULE.find(&lowered, headers);

        let amount = match (
            DEBIT_RULE.find(&lowered, headers),
            CREDIT_RULE.find(&lowered, headers),
        ) {
            (Some(debit), Some(credit)) => AmountSource::DebitCredit { debit, credit },
            _ => match AMOUNT_RULE.find(&lowered, headers) {
                Some(column) => AmountSource::Single { column },
                None => AmountSource::Missing,
            },
        };

        let mapping = Self {
            date,
            description,
            amount,
        };
        debug!(
            "Detected columns: {}={:?}, {}={:?}, {}={:?}",
            DATE_RULE.field,
            mapping.date.as_ref().map(|c| &c.name),
            DESCRIPTION_RULE.field,
            mapping.description.as_ref().map(|c| &c.name),
            AMOUNT_RULE.field,
            mapping.amount
        );
        mapping
    }
}

/// Strips payment-processor boilerplate from descriptions to get vendor names
#[derive(Debug, Clone)]
pub struct VendorCleaner {
    pattern: Option<Regex>,
}

impl VendorCleaner {
    /// Build a cleaner for the given tokens (case-insensitive substring removal)
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        if tokens.is_empty() {
            return Ok(Self { pattern: None });
        }

        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Remove every token occurrence, then trim.
    ///
    /// Removal repeats until nothing matches, so a removal that splices a new
    /// token together ("crCARDedit") is cleaned too and the result is a fixed point.
    pub fn clean(&self, description: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return description.trim().to_string();
        };

        let mut current = description.to_string();
        loop {
            let next = match pattern.replace_all(&current, "") {
                Cow::Borrowed(_) => break,
                Cow::Owned(next) => next,
            };
            current = next;
        }
        current.trim().to_string()
    }
}

impl Default for VendorCleaner {
    fn default() -> Self {
        Self::new(DEFAULT_BOILERPLATE_TOKENS).expect("valid regex")
    }
}

/// Converts a [`RawTable`] into a [`NormalizedTable`]
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    vendor: VendorCleaner,
}

impl Normalizer {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            vendor: VendorCleaner::new(&settings.boilerplate_tokens)?,
        })
    }

    /// One output row per input row, in input order
    pub fn normalize(&self, raw: &RawTable) -> NormalizedTable {
        let columns = ColumnMapping::detect(raw.headers());
        for warning in columns.warnings() {
            warn!("{}", warning);
        }

        let mut unparsed_dates = 0;
        let rows: Vec<NormalizedRow> = raw
            .rows()
            .iter()
            .map(|record| {
                let row = self.normalize_row(record, &columns);
                if row.date.is_none() && has_value(record, columns.date.as_ref()) {
                    unparsed_dates += 1;
                }
                row
            })
            .collect();

        if unparsed_dates > 0 {
            debug!("{} rows had unparseable dates", unparsed_dates);
        }
        debug!("Normalized {} rows", rows.len());

        NormalizedTable::new(columns, rows)
    }

    fn normalize_row(&self, record: &[String], columns: &ColumnMapping) -> NormalizedRow {
        let date = cell(record, columns.date.as_ref()).and_then(parse_date);

        let description = cell(record, columns.description.as_ref())
            .unwrap_or_default()
            .to_string();

        let amount = match &columns.amount {
            AmountSource::DebitCredit { debit, credit } => {
                amount_or_zero(cell(record, Some(credit))) - amount_or_zero(cell(record, Some(debit)))
            }
            AmountSource::Single { column } => amount_or_zero(cell(record, Some(column))),
            AmountSource::Missing => 0.0,
        };
        // Avoid a negative zero from "-0" or 0 - 0
        let amount = if amount == 0.0 { 0.0 } else { amount };

        let vendor = self.vendor.clean(&description);

        NormalizedRow {
            month: month_key(date),
            kind: TransactionType::from_amount(amount),
            date,
            description,
            amount,
            vendor,
        }
    }
}

/// Normalize with the default boilerplate tokens
pub fn normalize(raw: &RawTable) -> NormalizedTable {
    Normalizer::default().normalize(raw)
}

fn cell<'a>(record: &'a [String], column: Option<&ColumnRef>) -> Option<&'a str> {
    column
        .and_then(|c| record.get(c.index))
        .map(String::as_str)
}

fn has_value(record: &[String], column: Option<&ColumnRef>) -> bool {
    cell(record, column).is_some_and(|s| !s.trim().is_empty())
}

fn amount_or_zero(value: Option<&str>) -> f64 {
    value.and_then(parse_amount).unwrap_or(0.0)
}

/// Parse a date string in various common formats
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Timestamps: keep the calendar date
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S", // 2024-01-15 08:30:00
        "%Y-%m-%dT%H:%M:%S", // 2024-01-15T08:30:00
        "%Y-%m-%d %H:%M",    // 2024-01-15 08:30
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // Two-digit years before four-digit ones: %Y would read "24" as year 24
    let formats = [
        "%Y-%m-%d",  // 2024-01-15
        "%m/%d/%y",  // 01/15/24
        "%m/%d/%Y",  // 01/15/2024
        "%m-%d-%Y",  // 01-15-2024
        "%Y/%m/%d",  // 2024/01/15
        "%d/%m/%Y",  // 15/01/2024 (European)
        "%d %b %Y",  // 15 Jan 2024
        "%b %d, %Y", // Jan 15, 2024
    ];
    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    None
}

/// Parse an amount string, handling currency symbols, commas and parentheses
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
