use std::fs;

use anyhow::{Context, Result};
use rusqlite::params;

use super::{month_bounds, txn_from_row, Ledger, TXN_COLUMNS};
use crate::models::Transaction;

/// Suffix appended to every amount in the export, e.g. `120.50 RUB`.
pub(crate) const CURRENCY_SUFFIX: &str = "RUB";

impl Ledger {
    /// Write one month's report to a CSV file: summary block, transaction
    /// table in ascending date order, then the expense-by-category breakdown.
    /// Returns the filename actually used (default `finance_<Y>_<M>.csv`).
    pub(crate) fn export_to_csv(
        &self,
        year: i32,
        month: u32,
        filename: Option<&str>,
    ) -> Result<String> {
        let summary = self.get_month_summary(year, month)?;
        let (start, end) = month_bounds(year, month)?;

        let transactions = self.db.fetch_all(
            &format!(
                "SELECT {TXN_COLUMNS}
                 FROM transactions t JOIN categories c ON t.category_id = c.id
                 WHERE t.date BETWEEN ?1 AND ?2
                 ORDER BY t.date, t.id"
            ),
            params![start, end],
            txn_from_row,
        )?;

        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("finance_{year}_{month:02}.csv"));

        let mut out = String::new();
        out.push_str(&format!("Summary for {}\n", summary.month));
        out.push_str(&format!(
            "Income: {:.2} {CURRENCY_SUFFIX}\n",
            summary.total_income
        ));
        out.push_str(&format!(
            "Expenses: {:.2} {CURRENCY_SUFFIX}\n",
            summary.total_expense
        ));
        out.push_str(&format!(
            "Balance: {:.2} {CURRENCY_SUFFIX}\n",
            summary.balance
        ));
        out.push('\n');
        out.push_str(&transaction_table(&transactions)?);

        if !summary.expenses_by_category.is_empty() {
            out.push('\n');
            out.push_str("Expenses by category:\n");
            out.push_str(&breakdown_table(&summary.expenses_by_category)?);
        }

        fs::write(&filename, out)
            .with_context(|| format!("Failed to write CSV export: {filename}"))?;
        Ok(filename)
    }
}

fn transaction_table(transactions: &[Transaction]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Date", "Category", "Amount", "Kind", "Description"])?;
    for t in transactions {
        let amount = format!("{:.2}", t.amount);
        wtr.write_record([
            t.date.as_str(),
            t.category.as_str(),
            amount.as_str(),
            t.kind.as_str(),
            t.description.as_str(),
        ])?;
    }
    into_string(wtr)
}

fn breakdown_table(rows: &[(String, rust_decimal::Decimal)]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for (name, amount) in rows {
        let amount = format!("{amount:.2} {CURRENCY_SUFFIX}");
        wtr.write_record([name.as_str(), amount.as_str()])?;
    }
    into_string(wtr)
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV export produced invalid UTF-8")
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
