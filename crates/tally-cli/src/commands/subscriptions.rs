//! Subscription command implementations

use anyhow::{bail, Result};
use tally_core::models::SubscriptionCandidate;
use tally_core::{detect_subscriptions, Session};

use super::{loaded_table, print_json, truncate};

pub fn cmd_subscriptions(session: &Session, min: Option<usize>, json: bool) -> Result<()> {
    let min = min.unwrap_or(session.settings().subscription_min_occurrences);
    if min == 0 {
        bail!("--min must be at least 1");
    }

    let table = loaded_table(session)?;
    let candidates = detect_subscriptions(table, min);

    if json {
        return print_json(&candidates);
    }

    print_subscriptions(&candidates, min, &session.settings().currency_symbol);
    Ok(())
}

pub fn print_subscriptions(candidates: &[SubscriptionCandidate], min: usize, symbol: &str) {
    println!();
    println!("📋 Possible Subscriptions (seen {}+ times)", min);
    println!("   ─────────────────────────────────────────────────────────────");

    if candidates.is_empty() {
        println!("   No recurring vendors found.");
        return;
    }

    for c in candidates {
        let vendor = if c.vendor.is_empty() {
            "(no vendor)"
        } else {
            c.vendor.as_str()
        };
        let range = match (c.first_seen, c.last_seen) {
            (Some(first), Some(last)) => format!("{} → {}", first, last),
            _ => "?".to_string(),
        };

        println!(
            "   {:24} │ {:>3}x │ {:>11} │ {}",
            truncate(vendor, 24),
            c.count,
            format!("{}{:.2}", symbol, c.total),
            range
        );
    }
}
