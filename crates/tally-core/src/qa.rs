//! Keyword question answering over a normalized table
//!
//! Questions are matched by substring on their lowercased text, in a fixed
//! priority order; the first matching intent wins. There is no memory between
//! questions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{NormalizedRow, NormalizedTable};
use crate::settings::Settings;

/// Reply used for unrecognized questions and for questions the data cannot answer
pub const FALLBACK_ANSWER: &str = "Sorry, I don't understand that question yet. Try asking about spending last month, income, or your biggest expense.";

/// What a question is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SpendLastMonth,
    TotalIncome,
    BiggestExpense,
    Unknown,
}

impl Intent {
    pub fn classify(question: &str) -> Self {
        let q = question.to_lowercase();

        if q.contains("spend") && q.contains("last month") {
            Self::SpendLastMonth
        } else if q.contains("income") {
            Self::TotalIncome
        } else if q.contains("biggest expense") {
            Self::BiggestExpense
        } else {
            Self::Unknown
        }
    }
}

/// A reply, with the figures behind it for structured display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub intent: Intent,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

impl Answer {
    pub fn fallback() -> Self {
        Self {
            intent: Intent::Unknown,
            text: FALLBACK_ANSWER.to_string(),
            amount: None,
            month: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.intent == Intent::Unknown
    }
}

/// Answer a question against the table. Never fails; unanswerable questions
/// get [`FALLBACK_ANSWER`].
pub fn answer(table: &NormalizedTable, question: &str, settings: &Settings) -> Answer {
    let intent = Intent::classify(question);
    debug!("Question classified as {:?}", intent);

    if table.is_empty() {
        return Answer::fallback();
    }

    let symbol = settings.currency_symbol.as_str();
    let answer = match intent {
        Intent::SpendLastMonth => spend_last_month(table, symbol),
        Intent::TotalIncome => Some(total_income(table, symbol)),
        Intent::BiggestExpense => biggest_expense(table, symbol),
        Intent::Unknown => None,
    };

    answer.unwrap_or_else(Answer::fallback)
}

/// Expense total for the greatest month value in the table.
///
/// Months compare as strings, so the null-date month (`NaT`) wins over any
/// `YYYY-MM` when present. The reply shows the magnitude; `amount` keeps the
/// signed (negative) sum.
fn spend_last_month(table: &NormalizedTable, symbol: &str) -> Option<Answer> {
    let last_month = table.iter().map(|r| r.month.as_str()).max()?;

    let spent = table
        .expenses()
        .filter(|r| r.month == last_month)
        .fold(0.0, |acc, r| acc + r.amount);

    Some(Answer {
        intent: Intent::SpendLastMonth,
        text: format!(
            "You spent {} in {}.",
            format_currency(spent.abs(), symbol),
            last_month
        ),
        amount: Some(spent),
        month: Some(last_month.to_string()),
    })
}

fn total_income(table: &NormalizedTable, symbol: &str) -> Answer {
    let income = table.incomes().fold(0.0, |acc, r| acc + r.amount);

    Answer {
        intent: Intent::TotalIncome,
        text: format!(
            "Your total income is {}.",
            format_currency(income, symbol)
        ),
        amount: Some(income),
        month: None,
    }
}

fn biggest_expense(table: &NormalizedTable, symbol: &str) -> Option<Answer> {
    // Strict comparison keeps the first row among equal amounts
    let biggest = table
        .expenses()
        .fold(None::<&NormalizedRow>, |best, row| match best {
            Some(b) if b.amount <= row.amount => Some(b),
            _ => Some(row),
        })?;

    let date = biggest
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    let value = biggest.amount.abs();

    Some(Answer {
        intent: Intent::BiggestExpense,
        text: format!(
            "Your biggest expense was {} at {} on {}.",
            format_currency(value, symbol),
            biggest.vendor,
            date
        ),
        amount: Some(value),
        month: Some(biggest.month.clone()),
    })
}

/// Two-decimal currency string, e.g. `$1200.00` or `$-45.00`
pub fn format_currency(value: f64, symbol: &str) -> String {
    format!("{}{:.2}", symbol, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{month_key, AmountSource, ColumnMapping, TransactionType, NULL_MONTH};
    use chrono::NaiveDate;

    fn table(rows: &[(Option<&str>, &str, f64)]) -> NormalizedTable {
        let rows = rows
            .iter()
            .map(|&(date, vendor, amount)| {
                let date = date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap());
                NormalizedRow {
                    date,
                    description: vendor.to_string(),
                    amount,
                    month: month_key(date),
                    kind: TransactionType::from_amount(amount),
                    vendor: vendor.to_string(),
                }
            })
            .collect();
        NormalizedTable::new(
            ColumnMapping {
                date: None,
                description: None,
                amount: AmountSource::Missing,
            },
            rows,
        )
    }

    fn ask(t: &NormalizedTable, question: &str) -> Answer {
        answer(t, question, &Settings::default())
    }

    fn sample() -> NormalizedTable {
        table(&[
            (Some("2024-02-01"), "RENT", -900.0),
            (Some("2024-02-03"), "PAYROLL", 1200.0),
            (Some("2024-03-02"), "COFFEE", -5.0),
            (Some("2024-03-09"), "GROCER", -40.0),
            (Some("2024-03-15"), "REFUND", 12.0),
        ])
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(
            Intent::classify("How much did I SPEND last month?"),
            Intent::SpendLastMonth
        );
        // Both spend and income keywords: the earlier rule wins
        assert_eq!(
            Intent::classify("spend vs income last month"),
            Intent::SpendLastMonth
        );
        assert_eq!(Intent::classify("total income?"), Intent::TotalIncome);
        assert_eq!(
            Intent::classify("what was my biggest expense"),
            Intent::BiggestExpense
        );
        assert_eq!(Intent::classify("spend this month"), Intent::Unknown);
        assert_eq!(Intent::classify(""), Intent::Unknown);
    }

    #[test]
    fn test_spend_last_month() {
        let a = ask(&sample(), "How much did I spend last month?");
        assert_eq!(a.intent, Intent::SpendLastMonth);
        assert_eq!(a.month.as_deref(), Some("2024-03"));
        assert_eq!(a.amount, Some(-45.0));
        assert_eq!(a.text, "You spent $45.00 in 2024-03.");
    }

    #[test]
    fn test_spend_last_month_null_month_sorts_last() {
        let t = table(&[(Some("2024-03-01"), "A", -45.0), (None, "B", -7.0)]);
        let a = ask(&t, "How much did I spend last month?");
        assert_eq!(a.intent, Intent::SpendLastMonth);
        assert_eq!(a.month.as_deref(), Some(NULL_MONTH));
        assert_eq!(a.amount, Some(-7.0));
        assert_eq!(a.text, "You spent $7.00 in NaT.");
    }

    #[test]
    fn test_spend_last_month_all_undated() {
        let t = table(&[(None, "A", -45.0), (None, "B", -7.0)]);
        let a = ask(&t, "spend last month");
        assert_eq!(a.month.as_deref(), Some(NULL_MONTH));
        assert_eq!(a.text, "You spent $52.00 in NaT.");
    }

    #[test]
    fn test_spend_last_month_without_expenses() {
        let t = table(&[(Some("2024-01-10"), "PAYROLL", 100.0)]);
        let a = ask(&t, "what did I spend last month");
        assert_eq!(a.text, "You spent $0.00 in 2024-01.");
    }

    #[test]
    fn test_total_income() {
        let a = ask(&sample(), "What is my income?");
        assert_eq!(a.amount, Some(1212.0));
        assert_eq!(a.text, "Your total income is $1212.00.");
    }

    #[test]
    fn test_biggest_expense() {
        let a = ask(&sample(), "Biggest expense?");
        assert_eq!(a.intent, Intent::BiggestExpense);
        assert_eq!(a.amount, Some(900.0));
        assert_eq!(a.text, "Your biggest expense was $900.00 at RENT on 2024-02-01.");
    }

    #[test]
    fn test_biggest_expense_ties_and_missing_date() {
        let t = table(&[(None, "FIRST", -50.0), (Some("2024-01-01"), "SECOND", -50.0)]);
        let a = ask(&t, "biggest expense");
        assert_eq!(
            a.text,
            "Your biggest expense was $50.00 at FIRST on unknown date."
        );
    }

    #[test]
    fn test_biggest_expense_without_expenses_falls_back() {
        let t = table(&[(Some("2024-01-01"), "PAYROLL", 10.0)]);
        let a = ask(&t, "biggest expense");
        assert!(a.is_fallback());
        assert_eq!(a.text, FALLBACK_ANSWER);
    }

    #[test]
    fn test_empty_table_always_falls_back() {
        let empty = table(&[]);
        for q in ["spend last month", "income", "biggest expense", "hello"] {
            assert_eq!(ask(&empty, q), Answer::fallback());
        }
    }

    #[test]
    fn test_unknown_question() {
        assert_eq!(ask(&sample(), "What's the weather?").text, FALLBACK_ANSWER);
    }

    #[test]
    fn test_currency_symbol_from_settings() {
        let settings = Settings {
            currency_symbol: "€".into(),
            ..Settings::default()
        };
        let a = answer(&sample(), "income", &settings);
        assert_eq!(a.text, "Your total income is €1212.00.");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1200.0, "$"), "$1200.00");
        assert_eq!(format_currency(-45.0, "$"), "$-45.00");
        assert_eq!(format_currency(1234.5, "£"), "£1234.50");
    }
}
