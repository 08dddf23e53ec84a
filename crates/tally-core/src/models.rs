//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Month key used for rows whose date is missing or failed to parse
pub const NULL_MONTH: &str = "NaT";

/// Income/expense classification derived from the sign of the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Zero counts as income.
    pub fn from_amount(amount: f64) -> Self {
        if amount >= 0.0 {
            Self::Income
        } else {
            Self::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Pivot column order
    pub fn all() -> &'static [TransactionType] {
        &[Self::Income, Self::Expense]
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical fields read from a source column.
///
/// `month`, `type` and `vendor` are always derived, so they never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceField {
    Date,
    Description,
    Amount,
}

impl SourceField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Amount => "amount",
        }
    }

    pub fn all() -> &'static [SourceField] {
        &[Self::Date, Self::Description, Self::Amount]
    }
}

impl std::fmt::Display for SourceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source column chosen for a canonical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Position in the source header
    pub index: usize,
    /// Header name as it appeared in the file
    pub name: String,
}

impl ColumnRef {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// How the signed amount is derived for each row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AmountSource {
    /// `credit - debit`, each missing value counted as zero
    DebitCredit { debit: ColumnRef, credit: ColumnRef },
    /// A single signed amount column
    Single { column: ColumnRef },
    /// No recognizable amount column; every amount is zero
    Missing,
}

/// Which source columns feed the canonical fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date: Option<ColumnRef>,
    pub description: Option<ColumnRef>,
    pub amount: AmountSource,
}

impl ColumnMapping {
    /// Soft warnings for canonical fields that fall back to sentinel values
    pub fn warnings(&self) -> Vec<MissingColumn> {
        let mut warnings = Vec::new();
        if self.date.is_none() {
            warnings.push(MissingColumn(SourceField::Date));
        }
        if self.description.is_none() {
            warnings.push(MissingColumn(SourceField::Description));
        }
        if self.amount == AmountSource::Missing {
            warnings.push(MissingColumn(SourceField::Amount));
        }
        warnings
    }
}

/// A canonical field with no recognizable source column.
///
/// Not an error: the field defaults to its sentinel (null date, empty
/// description, zero amount) for every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingColumn(pub SourceField);

impl std::fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fallback = match self.0 {
            SourceField::Date => "dates default to null",
            SourceField::Description => "descriptions default to empty",
            SourceField::Amount => "amounts default to 0.00",
        };
        write!(f, "no {} column found; {}", self.0, fallback)
    }
}

/// One transaction in the canonical schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub date: Option<NaiveDate>,
    pub description: String,
    /// Positive = inflow, negative = outflow
    pub amount: f64,
    /// "YYYY-MM", or [`NULL_MONTH`] when the date is null
    pub month: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub vendor: String,
}

impl NormalizedRow {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }
}

/// Month key for an optional date
pub fn month_key(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m").to_string(),
        None => NULL_MONTH.to_string(),
    }
}

/// The normalized rows of one upload, plus the column mapping used to build them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub columns: ColumnMapping,
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn new(columns: ColumnMapping, rows: Vec<NormalizedRow>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRow> {
        self.rows.iter()
    }

    pub fn expenses(&self) -> impl Iterator<Item = &NormalizedRow> {
        self.rows.iter().filter(|r| r.is_expense())
    }

    pub fn incomes(&self) -> impl Iterator<Item = &NormalizedRow> {
        self.rows.iter().filter(|r| r.is_income())
    }
}

impl<'a> IntoIterator for &'a NormalizedTable {
    type Item = &'a NormalizedRow;
    type IntoIter = std::slice::Iter<'a, NormalizedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// One month of the income/expense pivot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTotals {
    pub fn get(&self, kind: TransactionType) -> f64 {
        match kind {
            TransactionType::Income => self.income,
            TransactionType::Expense => self.expense,
        }
    }

    pub fn net(&self) -> f64 {
        self.income + self.expense
    }
}

/// Monthly summary pivot: one row per month, one column per transaction type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Types that occur in the data (the pivot's columns)
    pub types: Vec<TransactionType>,
    pub rows: Vec<MonthlyTotals>,
}

/// A single bar segment in the stacked chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: String,
    pub value: f64,
}

/// One stacked layer of the monthly chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub points: Vec<ChartPoint>,
}

/// Whole-table totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub row_count: usize,
}

/// A vendor that recurs often enough to look like a subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCandidate {
    pub vendor: String,
    pub count: usize,
    /// Signed sum of the vendor's amounts
    pub total: f64,
    pub first_seen: Option<NaiveDate>,
    pub last_seen: Option<NaiveDate>,
}
