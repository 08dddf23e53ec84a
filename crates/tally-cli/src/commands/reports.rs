//! Report command implementations

use anyhow::Result;
use serde::Serialize;
use tally_core::models::{
    ChartSeries, MonthlySummary, NormalizedRow, SubscriptionCandidate, Totals, TransactionType,
};
use tally_core::{detect_subscriptions, monthly_summary, reports, Session};

use super::{loaded_table, print_json, print_rows, print_subscriptions};

/// Width of the longest bar in the text chart
const CHART_WIDTH: usize = 40;

#[derive(Serialize)]
struct SummaryOutput<'a> {
    #[serde(flatten)]
    summary: &'a MonthlySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    series: Option<Vec<ChartSeries>>,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    totals: Totals,
    preview: &'a [NormalizedRow],
    summary: MonthlySummary,
    series: Vec<ChartSeries>,
    subscriptions: Vec<SubscriptionCandidate>,
}

pub fn cmd_summary(session: &Session, chart: bool, json: bool) -> Result<()> {
    let table = loaded_table(session)?;
    let summary = monthly_summary(table);

    if json {
        return print_json(&SummaryOutput {
            summary: &summary,
            series: chart.then(|| summary.series()),
        });
    }

    let symbol = &session.settings().currency_symbol;
    print_summary(&summary, symbol);
    if chart {
        print_chart(&summary);
    }

    Ok(())
}

pub fn cmd_report(session: &Session, json: bool) -> Result<()> {
    let table = loaded_table(session)?;
    let settings = session.settings();

    let totals = reports::totals(table);
    let preview = reports::preview(table, settings.preview_rows);
    let summary = monthly_summary(table);
    let subscriptions = detect_subscriptions(table, settings.subscription_min_occurrences);

    if json {
        return print_json(&ReportOutput {
            totals,
            preview,
            series: summary.series(),
            summary,
            subscriptions,
        });
    }

    let symbol = &settings.currency_symbol;

    println!();
    println!("📊 Totals");
    println!("   ─────────────────────────────");
    println!("   Transactions: {}", totals.row_count);
    println!("   Income:       {}{:.2}", symbol, totals.income);
    println!("   Expenses:     {}{:.2}", symbol, totals.expense);
    println!("   Net:          {}{:.2}", symbol, totals.net);

    println!();
    println!("📄 First {} of {} rows", preview.len(), table.len());
    print_rows(preview, symbol);

    print_summary(&summary, symbol);
    print_chart(&summary);
    print_subscriptions(
        &subscriptions,
        settings.subscription_min_occurrences,
        symbol,
    );

    Ok(())
}

fn print_summary(summary: &MonthlySummary, symbol: &str) {
    println!();
    println!("📅 Monthly Summary");
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.is_empty() {
        println!("   No transactions.");
        return;
    }

    println!(
        "   {:8} │ {:>12} │ {:>12} │ {:>12}",
        "Month", "Income", "Expense", "Net"
    );
    println!("   ─────────┼──────────────┼──────────────┼──────────────");
    for row in &summary.rows {
        println!(
            "   {:8} │ {:>12} │ {:>12} │ {:>12}",
            row.month,
            format!("{}{:.2}", symbol, row.income),
            format!("{}{:.2}", symbol, row.expense),
            format!("{}{:.2}", symbol, row.net())
        );
    }
}

/// Stacked bar per month: income in `█`, expense magnitude in `░`
fn print_chart(summary: &MonthlySummary) {
    if summary.is_empty() {
        return;
    }

    let max = summary
        .rows
        .iter()
        .map(|r| r.income.abs() + r.expense.abs())
        .fold(0.0_f64, f64::max);

    println!();
    println!("📈 Income vs Expense");
    println!("   ─────────────────────────────────────────────────────────────");
    for row in &summary.rows {
        println!(
            "   {:8} │ {}",
            row.month,
            render_bar(row.income, row.expense, max, CHART_WIDTH)
        );
    }

    let legend: Vec<String> = summary
        .types
        .iter()
        .map(|kind| match kind {
            TransactionType::Income => "█ income".to_string(),
            TransactionType::Expense => "░ expense".to_string(),
        })
        .collect();
    println!("   {:8}   {}", "", legend.join("  "));
}

/// One stacked bar scaled so that `max` fills `width` cells
pub fn render_bar(income: f64, expense: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }

    let cells = |value: f64| ((value.abs() / max) * width as f64).round() as usize;
    let income_cells = cells(income);
    let expense_cells = cells(expense).min(width.saturating_sub(income_cells));

    format!("{}{}", "█".repeat(income_cells), "░".repeat(expense_cells))
}
