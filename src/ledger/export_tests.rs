#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::Kind;

fn open_temp() -> (tempfile::TempDir, Ledger) {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::open(&dir.path().join("finance.db")).unwrap();
    (dir, ledger)
}

fn seed_march(ledger: &Ledger) {
    for (date, category, amount, desc, kind) in [
        ("2024-03-15", "Salary", dec!(5000), "payday", Kind::Income),
        ("2024-03-20", "Groceries", dec!(120.50), "weekly, with guests", Kind::Expense),
        ("2024-03-05", "Transport", dec!(30), "metro card", Kind::Expense),
    ] {
        assert!(ledger
            .add_transaction(date, category, amount, desc, kind)
            .unwrap());
    }
}

/// Read every non-blank record of the export, fields as strings.
fn read_records(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn test_export_summary_block() {
    let (dir, ledger) = open_temp();
    seed_march(&ledger);

    let out = dir.path().join("march.csv");
    let filename = ledger
        .export_to_csv(2024, 3, Some(out.to_str().unwrap()))
        .unwrap();
    assert_eq!(filename, out.to_str().unwrap());

    let records = read_records(&out);
    assert_eq!(records[0], vec!["Summary for 2024-03"]);
    assert_eq!(records[1], vec![format!("Income: 5000.00 {CURRENCY_SUFFIX}")]);
    assert_eq!(
        records[2],
        vec![format!("Expenses: 150.50 {CURRENCY_SUFFIX}")]
    );
    assert_eq!(
        records[3],
        vec![format!("Balance: 4849.50 {CURRENCY_SUFFIX}")]
    );
    assert_eq!(
        records[4],
        vec!["Date", "Category", "Amount", "Kind", "Description"]
    );
}

#[test]
fn test_export_transactions_ascending_and_round_trip() {
    let (dir, ledger) = open_temp();
    seed_march(&ledger);

    let out = dir.path().join("march.csv");
    ledger
        .export_to_csv(2024, 3, Some(out.to_str().unwrap()))
        .unwrap();

    let records = read_records(&out);
    let header_at = records
        .iter()
        .position(|r| r.first().map(String::as_str) == Some("Date"))
        .unwrap();
    let breakdown_at = records
        .iter()
        .position(|r| r.first().map(String::as_str) == Some("Expenses by category:"))
        .unwrap();
    let rows = &records[header_at + 1..breakdown_at];

    // Ascending date order, description with a comma survives quoting
    assert_eq!(rows.len(), 3);
    assert_eq!(
        rows[0],
        vec!["2024-03-05", "Transport", "30.00", "expense", "metro card"]
    );
    assert_eq!(
        rows[1],
        vec!["2024-03-15", "Salary", "5000.00", "income", "payday"]
    );
    assert_eq!(
        rows[2],
        vec!["2024-03-20", "Groceries", "120.50", "expense", "weekly, with guests"]
    );

    // Round trip: the parsed table is exactly the month's transactions
    let mut expected = ledger.get_all_transactions().unwrap();
    expected.reverse(); // query is date desc; export is date asc
    let parsed: Vec<(String, String, Decimal, String)> = rows
        .iter()
        .map(|r| {
            (
                r[0].clone(),
                r[1].clone(),
                r[2].parse().unwrap(),
                r[4].clone(),
            )
        })
        .collect();
    let direct: Vec<(String, String, Decimal, String)> = expected
        .iter()
        .map(|t| {
            (
                t.date.clone(),
                t.category.clone(),
                t.amount,
                t.description.clone(),
            )
        })
        .collect();
    assert_eq!(parsed, direct);
}

#[test]
fn test_export_expense_breakdown() {
    let (dir, ledger) = open_temp();
    seed_march(&ledger);

    let out = dir.path().join("march.csv");
    ledger
        .export_to_csv(2024, 3, Some(out.to_str().unwrap()))
        .unwrap();

    let records = read_records(&out);
    let breakdown_at = records
        .iter()
        .position(|r| r.first().map(String::as_str) == Some("Expenses by category:"))
        .unwrap();
    assert_eq!(
        records[breakdown_at + 1],
        vec!["Groceries".to_string(), format!("120.50 {CURRENCY_SUFFIX}")]
    );
    assert_eq!(
        records[breakdown_at + 2],
        vec!["Transport".to_string(), format!("30.00 {CURRENCY_SUFFIX}")]
    );
    assert_eq!(records.len(), breakdown_at + 3);
}

#[test]
fn test_export_empty_month_has_no_breakdown() {
    let (dir, ledger) = open_temp();

    let out = dir.path().join("empty.csv");
    ledger
        .export_to_csv(2024, 3, Some(out.to_str().unwrap()))
        .unwrap();

    let records = read_records(&out);
    assert_eq!(records[1], vec![format!("Income: 0.00 {CURRENCY_SUFFIX}")]);
    assert_eq!(
        records.last().unwrap(),
        &vec!["Date", "Category", "Amount", "Kind", "Description"]
    );
    assert!(!records
        .iter()
        .any(|r| r.first().map(String::as_str) == Some("Expenses by category:")));
}

#[test]
fn test_export_default_filename() {
    let (dir, ledger) = open_temp();
    seed_march(&ledger);

    // Default filename is relative to the working directory
    std::env::set_current_dir(dir.path()).unwrap();
    let filename = ledger.export_to_csv(2024, 3, None).unwrap();
    assert_eq!(filename, "finance_2024_03.csv");
    assert!(dir.path().join("finance_2024_03.csv").exists());
}
