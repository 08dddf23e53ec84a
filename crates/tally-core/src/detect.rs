//! Subscription detection
//!
//! A vendor is a possible subscription when it shows up at least
//! `min_occurrences` times. Amounts and intervals are reported but never
//! consulted, so irregular or varying charges still qualify.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{NormalizedTable, SubscriptionCandidate};

/// Vendors occurring at least `min_occurrences` times, most frequent first.
///
/// Ties keep the order in which vendors first appear in the table. The empty
/// vendor is grouped like any other.
pub fn detect_subscriptions(
    table: &NormalizedTable,
    min_occurrences: usize,
) -> Vec<SubscriptionCandidate> {
    // Groups in first-encounter order, with an index for lookups
    let mut groups: Vec<SubscriptionCandidate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in table {
        let i = *index.entry(row.vendor.as_str()).or_insert_with(|| {
            groups.push(SubscriptionCandidate {
                vendor: row.vendor.clone(),
                count: 0,
                total: 0.0,
                first_seen: None,
                last_seen: None,
            });
            groups.len() - 1
        });

        let group = &mut groups[i];
        group.count += 1;
        group.total += row.amount;
        if let Some(date) = row.date {
            group.first_seen = Some(group.first_seen.map_or(date, |d| d.min(date)));
            group.last_seen = Some(group.last_seen.map_or(date, |d| d.max(date)));
        }
    }

    let vendor_count = groups.len();
    let mut candidates: Vec<SubscriptionCandidate> = groups
        .into_iter()
        .filter(|g| g.count >= min_occurrences)
        .collect();

    // sort_by is stable, so equal counts stay in encounter order
    candidates.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(
        "{} of {} vendors occur at least {} times",
        candidates.len(),
        vendor_count,
        min_occurrences
    );

    candidates
}
