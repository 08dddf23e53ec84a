//! Preview command: detected columns and the first normalized rows

use anyhow::Result;
use serde::Serialize;
use tally_core::models::{AmountSource, ColumnMapping, ColumnRef, NormalizedRow};
use tally_core::{reports, Session};

use super::{loaded_table, print_json, truncate};

#[derive(Serialize)]
struct PreviewOutput<'a> {
    columns: &'a ColumnMapping,
    warnings: Vec<String>,
    total_rows: usize,
    rows: &'a [NormalizedRow],
}

pub fn cmd_preview(session: &Session, rows: Option<usize>, json: bool) -> Result<()> {
    let table = loaded_table(session)?;
    let n = rows.unwrap_or(session.settings().preview_rows);
    let head = reports::preview(table, n);

    if json {
        return print_json(&PreviewOutput {
            columns: &table.columns,
            warnings: table
                .columns
                .warnings()
                .iter()
                .map(|w| w.to_string())
                .collect(),
            total_rows: table.len(),
            rows: head,
        });
    }

    println!();
    println!("🔎 Detected Columns");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   date:        {}", describe_column(table.columns.date.as_ref()));
    println!(
        "   description: {}",
        describe_column(table.columns.description.as_ref())
    );
    println!("   amount:      {}", describe_amount(&table.columns.amount));
    for warning in table.columns.warnings() {
        println!("   ⚠️  {}", warning);
    }

    println!();
    println!("📄 First {} of {} rows", head.len(), table.len());
    print_rows(head, &session.settings().currency_symbol);

    Ok(())
}

/// Row table shared by preview and report
pub fn print_rows(rows: &[NormalizedRow], symbol: &str) {
    println!("   ─────────────────────────────────────────────────────────────");
    if rows.is_empty() {
        println!("   No rows.");
        return;
    }

    println!(
        "   {:10} │ {:24} │ {:>11} │ {:7} │ {:7} │ Vendor",
        "Date", "Description", "Amount", "Month", "Type"
    );
    println!("   ───────────┼──────────────────────────┼─────────────┼─────────┼─────────┼────────");
    for row in rows {
        let date = row
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {:10} │ {:24} │ {:>11} │ {:7} │ {:7} │ {}",
            date,
            truncate(&row.description, 24),
            format!("{}{:.2}", symbol, row.amount),
            row.month,
            row.kind.as_str(),
            truncate(&row.vendor, 24)
        );
    }
}

fn describe_column(column: Option<&ColumnRef>) -> String {
    match column {
        Some(c) => format!("\"{}\" (column {})", c.name, c.index + 1),
        None => "(not found)".to_string(),
    }
}

fn describe_amount(amount: &AmountSource) -> String {
    match amount {
        AmountSource::DebitCredit { debit, credit } => {
            format!("\"{}\" - \"{}\"", credit.name, debit.name)
        }
        AmountSource::Single { column } => describe_column(Some(column)),
        AmountSource::Missing => "(not found, amounts are 0.00)".to_string(),
    }
}
