//! Tally Core Library
//!
//! Shared functionality for the Tally transaction explorer:
//! - CSV loading with encoding fallback
//! - Normalization of arbitrary bank exports into a fixed schema
//! - Monthly income/expense summaries
//! - Subscription detection by vendor frequency
//! - Keyword question answering
//! - Layered settings (explicit file, config dir, embedded defaults)

pub mod detect;
pub mod error;
pub mod import;
pub mod models;
pub mod normalize;
pub mod qa;
pub mod reports;
pub mod session;
pub mod settings;

pub use detect::detect_subscriptions;
pub use error::{Error, Result};
pub use import::{LoaderOptions, RawTable};
pub use models::{
    AmountSource, ChartPoint, ChartSeries, ColumnMapping, ColumnRef, MissingColumn,
    MonthlySummary, MonthlyTotals, NormalizedRow, NormalizedTable, SourceField,
    SubscriptionCandidate, Totals, TransactionType, NULL_MONTH,
};
pub use normalize::{normalize, Normalizer, VendorCleaner};
pub use qa::{answer, format_currency, Answer, Intent};
pub use reports::monthly_summary;
pub use session::Session;
pub use settings::Settings;
