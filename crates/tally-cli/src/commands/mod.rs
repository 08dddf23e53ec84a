//! CLI command implementations
//!
//! Commands are organized by view:
//! - `session` - Shared setup (read the file, load it into a session)
//! - `preview` - Detected columns and head preview
//! - `reports` - Monthly summary, text chart, combined report
//! - `subscriptions` - Recurring vendor list
//! - `ask` - Keyword Q&A (single question and stdin chat)

pub mod ask;
pub mod preview;
pub mod reports;
pub mod session;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use ask::*;
pub use preview::*;
pub use reports::*;
pub use session::*;
pub use subscriptions::*;

use anyhow::{Context, Result};
use serde::Serialize;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
