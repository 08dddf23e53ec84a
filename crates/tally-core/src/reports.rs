//! Monthly reports and other read-only views over a normalized table

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{
    ChartPoint, ChartSeries, MonthlySummary, MonthlyTotals, NormalizedRow, NormalizedTable,
    Totals, TransactionType,
};

/// Sum amounts per (month, type) and pivot to one row per month.
///
/// Months sort as strings, which is chronological for "YYYY-MM" and puts the
/// null-date bucket last. Missing (month, type) combinations are 0.
pub fn monthly_summary(table: &NormalizedTable) -> MonthlySummary {
    let mut by_month: BTreeMap<&str, MonthlyTotals> = BTreeMap::new();
    let mut has_income = false;
    let mut has_expense = false;

    for row in table {
        let totals = by_month
            .entry(row.month.as_str())
            .or_insert_with(|| MonthlyTotals {
                month: row.month.clone(),
                income: 0.0,
                expense: 0.0,
            });

        match row.kind {
            TransactionType::Income => {
                totals.income += row.amount;
                has_income = true;
            }
            TransactionType::Expense => {
                totals.expense += row.amount;
                has_expense = true;
            }
        }
    }

    let types = TransactionType::all()
        .iter()
        .copied()
        .filter(|kind| match kind {
            TransactionType::Income => has_income,
            TransactionType::Expense => has_expense,
        })
        .collect();

    let rows: Vec<MonthlyTotals> = by_month.into_values().collect();
    debug!("Monthly summary covers {} months", rows.len());

    MonthlySummary { types, rows }
}

impl MonthlySummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One stacked-bar layer per transaction type present in the pivot
    pub fn series(&self) -> Vec<ChartSeries> {
        self.types
            .iter()
            .map(|&kind| ChartSeries {
                kind,
                points: self
                    .rows
                    .iter()
                    .map(|r| ChartPoint {
                        month: r.month.clone(),
                        value: r.get(kind),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// The first `n` rows, for a head preview
pub fn preview(table: &NormalizedTable, n: usize) -> &[NormalizedRow] {
    &table.rows[..n.min(table.len())]
}

/// Overall income, expense and net across the whole table
pub fn totals(table: &NormalizedTable) -> Totals {
    // Fold from +0.0: an empty f64 sum is -0.0
    let income = table.incomes().fold(0.0, |acc, r| acc + r.amount);
    let expense = table.expenses().fold(0.0, |acc, r| acc + r.amount);

    Totals {
        income,
        expense,
        net: income + expense,
        row_count: table.len(),
    }
}
