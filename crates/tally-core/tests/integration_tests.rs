//! Integration tests for tally-core
//!
//! These tests exercise the full upload → normalize → views workflow.

use chrono::NaiveDate;
use tally_core::{
    detect_subscriptions, import, monthly_summary, normalize, AmountSource, Intent,
    LoaderOptions, Session, Settings, TransactionType, NULL_MONTH,
};

/// Chase-style export: single signed amount column, two date columns.
/// Netflix and Spotify recur monthly; Hulu only twice.
fn chase_csv() -> &'static str {
    r#"Transaction Date,Post Date,Description,Category,Type,Amount,Memo
07/15/2023,07/16/2023,POS NETFLIX.COM,Entertainment,Sale,-15.49,
08/15/2023,08/16/2023,POS NETFLIX.COM,Entertainment,Sale,-15.49,
09/15/2023,09/16/2023,POS NETFLIX.COM,Entertainment,Sale,-15.49,
10/15/2023,10/16/2023,POS NETFLIX.COM,Entertainment,Sale,-15.49,
07/20/2023,07/21/2023,SPOTIFY USA,Entertainment,Sale,-10.99,
08/20/2023,08/21/2023,SPOTIFY USA,Entertainment,Sale,-10.99,
09/20/2023,09/21/2023,SPOTIFY USA,Entertainment,Sale,-10.99,
07/01/2023,07/02/2023,HULU,Entertainment,Sale,-17.99,
08/01/2023,08/02/2023,HULU,Entertainment,Sale,-17.99,
10/01/2023,10/02/2023,ACME PAYROLL,Income,Payment,2500.00,
10/03/2023,10/04/2023,ONLINE TRANSACTION RENT CO,Housing,Sale,-1400.00,"#
}

/// Capital One-style export: separate unsigned debit/credit columns
fn capitalone_csv() -> &'static str {
    r#"Transaction Date,Posted Date,Card No.,Description,Category,Debit,Credit
2024-01-05,2024-01-06,1234,DEBIT CARD GROCER,Groceries,50.00,
2024-01-09,2024-01-10,1234,REFUND GROCER,Groceries,,20.00
2024-02-11,2024-02-12,1234,AUTH GAS STATION,Gas,"1,025.10",
"#
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_chase_export_end_to_end() {
    let raw = import::load(chase_csv().as_bytes(), &LoaderOptions::default())
        .expect("Failed to parse CSV");
    let table = normalize(&raw);

    assert_eq!(table.len(), raw.len());
    assert_eq!(table.columns.date.as_ref().unwrap().name, "Transaction Date");
    assert_eq!(
        table.columns.description.as_ref().unwrap().name,
        "Description"
    );
    assert!(matches!(table.columns.amount, AmountSource::Single { .. }));

    let first = &table.rows[0];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 7, 15));
    assert_eq!(first.month, "2023-07");
    assert_eq!(first.vendor, "NETFLIX.COM");
    assert_eq!(first.description, "POS NETFLIX.COM");
    assert_eq!(first.kind, TransactionType::Expense);

    let rent = table.rows.last().unwrap();
    assert_eq!(rent.vendor, "RENT CO");
}

#[test]
fn test_debit_credit_export() {
    let raw = import::load(capitalone_csv().as_bytes(), &LoaderOptions::default()).unwrap();
    let table = normalize(&raw);

    assert!(matches!(
        table.columns.amount,
        AmountSource::DebitCredit { .. }
    ));

    let amounts: Vec<f64> = table.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![-50.0, 20.0, -1025.10]);

    let kinds: Vec<TransactionType> = table.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TransactionType::Expense,
            TransactionType::Income,
            TransactionType::Expense
        ]
    );
    assert_eq!(table.rows[0].vendor, "GROCER");
    assert_eq!(table.rows[2].vendor, "GAS STATION");
}

#[test]
fn test_unrecognized_columns_still_produce_rows() {
    let raw = import::load(b"Foo,Bar\nx,y\nz,w", &LoaderOptions::default()).unwrap();
    let table = normalize(&raw);

    assert_eq!(table.len(), 2);
    assert_eq!(table.columns.warnings().len(), 3);
    assert!(table.iter().all(|r| r.month == NULL_MONTH && r.amount == 0.0));

    // Everything lands in the null-date income bucket
    let summary = monthly_summary(&table);
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].month, NULL_MONTH);
    assert_eq!(summary.types, vec![TransactionType::Income]);
}

#[test]
fn test_latin1_export() {
    let bytes = b"Date,Payee,Amount\n2024-04-02,Caf\xe9 du Monde,-6.50\n";
    let raw = import::load(bytes, &LoaderOptions::default()).unwrap();
    let table = normalize(&raw);
    assert_eq!(table.rows[0].vendor, "Café du Monde");
}

// =============================================================================
// Views
// =============================================================================

#[test]
fn test_monthly_summary_of_chase_export() {
    let raw = import::load(chase_csv().as_bytes(), &LoaderOptions::default()).unwrap();
    let summary = monthly_summary(&normalize(&raw));

    let months: Vec<&str> = summary.rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["2023-07", "2023-08", "2023-09", "2023-10"]);

    let october = &summary.rows[3];
    assert_eq!(october.income, 2500.0);
    assert!((october.expense - (-15.49 - 1400.0)).abs() < 1e-9);

    let july = &summary.rows[0];
    assert_eq!(july.income, 0.0);
}

#[test]
fn test_subscriptions_of_chase_export() {
    let raw = import::load(chase_csv().as_bytes(), &LoaderOptions::default()).unwrap();
    let table = normalize(&raw);

    let found = detect_subscriptions(&table, 3);
    let vendors: Vec<&str> = found.iter().map(|c| c.vendor.as_str()).collect();
    assert_eq!(vendors, vec!["NETFLIX.COM", "SPOTIFY USA"]);
    assert_eq!(found[0].count, 4);
    assert_eq!(found[1].count, 3);

    // Lower threshold picks up Hulu after the others
    let found = detect_subscriptions(&table, 2);
    assert_eq!(found.len(), 3);
    assert_eq!(found[2].vendor, "HULU");
}

// =============================================================================
// Session workflow
// =============================================================================

#[test]
fn test_session_questions() {
    let mut session = Session::new(Settings::default()).unwrap();
    session.upload(chase_csv().as_bytes()).unwrap();

    let spend = session.ask("How much did I spend last month?");
    assert_eq!(spend.intent, Intent::SpendLastMonth);
    assert_eq!(spend.month.as_deref(), Some("2023-10"));
    assert_eq!(spend.text, "You spent $1415.49 in 2023-10.");

    let income = session.ask("What's my INCOME?");
    assert_eq!(income.text, "Your total income is $2500.00.");

    let biggest = session.ask("What was my biggest expense?");
    assert_eq!(
        biggest.text,
        "Your biggest expense was $1400.00 at RENT CO on 2023-10-03."
    );

    assert!(session.ask("Tell me a joke").is_fallback());
}

#[test]
fn test_session_undated_row_is_last_month() {
    let mut session = Session::new(Settings::default()).unwrap();
    session
        .upload(b"Date,Description,Amount\n2024-03-01,A,-45\nnot-a-date,B,-7\n")
        .unwrap();

    let spend = session.ask("How much did I spend last month?");
    assert_eq!(spend.month.as_deref(), Some(NULL_MONTH));
    assert_eq!(spend.text, "You spent $7.00 in NaT.");

    // No date column at all: every row falls into the null month
    session
        .upload(b"Description,Amount\nA,-45\nB,-7\n")
        .unwrap();
    assert_eq!(
        session.ask("spend last month").text,
        "You spent $52.00 in NaT."
    );
}

#[test]
fn test_session_header_only_upload() {
    let mut session = Session::new(Settings::default()).unwrap();
    let table = session.upload(b"Date,Description,Amount\n").unwrap();
    assert!(table.is_empty());

    assert!(session.monthly_summary().unwrap().is_empty());
    assert!(session.subscriptions().unwrap().is_empty());
    assert!(session.ask("income").is_fallback());
}

#[test]
fn test_session_rejects_malformed_upload() {
    let mut session = Session::new(Settings::default()).unwrap();

    let err = session.upload(b"").unwrap_err();
    assert!(err.is_parse_error());

    let err = session
        .upload(b"Date,Amount\n2024-01-01,1.00\n2024-01-02,2.00,oops\n")
        .unwrap_err();
    assert!(err.is_parse_error());
    assert!(session.table().is_none());
}

#[test]
fn test_session_custom_settings() {
    let settings = Settings::from_toml(
        r#"
[subscriptions]
min_occurrences = 2

[vendor]
boilerplate_tokens = ["usa", ".com"]

[display]
currency_symbol = "€"
"#,
    )
    .unwrap();

    let mut session = Session::new(settings).unwrap();
    session.upload(chase_csv().as_bytes()).unwrap();

    let vendors: Vec<String> = session
        .subscriptions()
        .unwrap()
        .into_iter()
        .map(|c| c.vendor)
        .collect();
    assert_eq!(vendors, vec!["POS NETFLIX", "SPOTIFY", "HULU"]);

    assert_eq!(
        session.ask("income").text,
        "Your total income is €2500.00."
    );
}
