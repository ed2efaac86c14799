mod export;

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::params;
use rust_decimal::Decimal;

use crate::db::{Storage, StorageError};
use crate::models::{Category, CategoryStats, ChartData, Kind, MonthSummary, Transaction};

/// Columns of a transaction joined to its category, in the order every
/// transaction query selects them.
const TXN_COLUMNS: &str =
    "t.date, c.name, CAST(t.amount AS TEXT), t.type, t.description";

/// Domain operations over the storage gateway. Expected failures (missing
/// category, duplicate name, kind mismatch, bad input) come back as `false`
/// or `None`; only unexpected storage failures surface as errors.
pub(crate) struct Ledger {
    db: Storage,
}

impl Ledger {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            db: Storage::open(path)?,
        })
    }

    // ── Categories ────────────────────────────────────────────

    /// Insert a new category. `false` if the name is empty or already taken.
    pub(crate) fn add_category(&self, name: &str, kind: Kind) -> Result<bool> {
        if name.trim().is_empty() {
            return Ok(false);
        }
        match self.db.execute(
            "INSERT INTO categories (name, type) VALUES (?1, ?2)",
            params![name, kind.as_str()],
        ) {
            Ok(_) => Ok(true),
            Err(StorageError::Integrity(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename and/or retype a category in place. Unset fields keep their
    /// current values. Transactions reference categories by id, so they all
    /// follow the rename.
    pub(crate) fn edit_category(
        &self,
        old_name: &str,
        new_name: Option<&str>,
        new_kind: Option<Kind>,
    ) -> Result<bool> {
        let Some((id, current_kind)) = self.category_by_name(old_name)? else {
            return Ok(false);
        };

        let new_name = match new_name {
            Some(n) if !n.trim().is_empty() => n,
            _ => old_name,
        };
        let new_kind = new_kind.unwrap_or(current_kind);

        // Pre-check the rename target so the common collision case is a clean
        // `false` instead of a constraint error.
        if new_name != old_name && self.category_by_name(new_name)?.is_some() {
            return Ok(false);
        }

        match self.db.execute(
            "UPDATE categories SET name = ?1, type = ?2 WHERE id = ?3",
            params![new_name, new_kind.as_str(), id],
        ) {
            Ok(_) => Ok(true),
            Err(StorageError::Integrity(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Kind, transaction count/total and most recent transaction for one
    /// category. `None` if the category does not exist.
    pub(crate) fn get_category_stats(&self, name: &str) -> Result<Option<CategoryStats>> {
        let Some((id, kind)) = self.category_by_name(name)? else {
            return Ok(None);
        };

        let (count, total) = self
            .db
            .fetch_one(
                "SELECT COUNT(*), CAST(COALESCE(SUM(amount), 0) AS TEXT)
                 FROM transactions WHERE category_id = ?1",
                params![id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )?
            .unwrap_or((0, "0".into()));

        let last_transaction = if count > 0 {
            self.db.fetch_one(
                &format!(
                    "SELECT {TXN_COLUMNS}
                     FROM transactions t JOIN categories c ON t.category_id = c.id
                     WHERE t.category_id = ?1
                     ORDER BY t.date DESC, t.id DESC LIMIT 1"
                ),
                params![id],
                txn_from_row,
            )?
        } else {
            None
        };

        Ok(Some(CategoryStats {
            kind,
            count,
            total: parse_amount(&total),
            last_transaction,
        }))
    }

    /// Delete a category. Refused when it still owns transactions unless
    /// `force` is set, in which case the transactions go first and the
    /// category second (two auto-committed statements, not one transaction).
    /// Storage failures are swallowed into `false`.
    pub(crate) fn delete_category(&self, name: &str, force: bool) -> bool {
        let Ok(Some((id, _))) = self.category_by_name(name) else {
            return false;
        };
        let count = match self.db.fetch_one(
            "SELECT COUNT(*) FROM transactions WHERE category_id = ?1",
            params![id],
            |row| row.get::<_, i64>(0),
        ) {
            Ok(n) => n.unwrap_or(0),
            Err(_) => return false,
        };

        if count > 0 && !force {
            return false;
        }
        if count > 0
            && self
                .db
                .execute(
                    "DELETE FROM transactions WHERE category_id = ?1",
                    params![id],
                )
                .is_err()
        {
            return false;
        }
        self.db
            .execute("DELETE FROM categories WHERE id = ?1", params![id])
            .is_ok()
    }

    /// All categories ordered by kind then name.
    pub(crate) fn get_all_categories(&self) -> Result<Vec<Category>> {
        Ok(self.db.fetch_all(
            "SELECT id, name, type FROM categories ORDER BY type, name",
            [],
            |row| {
                let kind: String = row.get(2)?;
                Ok(Category {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    kind: Kind::parse(&kind).unwrap_or(Kind::Expense),
                })
            },
        )?)
    }

    // ── Transactions ──────────────────────────────────────────

    /// Record a money movement. `false` when the date is not a real
    /// `YYYY-MM-DD` day, the amount is not positive, the category is missing,
    /// or the supplied kind does not match the category's kind.
    pub(crate) fn add_transaction(
        &self,
        date: &str,
        category_name: &str,
        amount: Decimal,
        description: &str,
        kind: Kind,
    ) -> Result<bool> {
        // Dates are compared textually by the range queries, so only the
        // zero-padded canonical form is accepted.
        let valid_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string() == date)
            .unwrap_or(false);
        if !valid_date {
            return Ok(false);
        }
        if amount <= Decimal::ZERO {
            return Ok(false);
        }
        let Some((category_id, category_kind)) = self.category_by_name(category_name)? else {
            return Ok(false);
        };
        if category_kind != kind {
            return Ok(false);
        }

        match self.db.execute(
            "INSERT INTO transactions (date, category_id, amount, description, type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![date, category_id, amount.to_string(), description, kind.as_str()],
        ) {
            Ok(_) => Ok(true),
            Err(StorageError::Integrity(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent transactions across all categories.
    pub(crate) fn get_recent_transactions(&self, limit: u32) -> Result<Vec<Transaction>> {
        Ok(self.db.fetch_all(
            &format!(
                "SELECT {TXN_COLUMNS}
                 FROM transactions t JOIN categories c ON t.category_id = c.id
                 ORDER BY t.date DESC, t.id DESC LIMIT ?1"
            ),
            params![limit],
            txn_from_row,
        )?)
    }

    pub(crate) fn get_all_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.db.fetch_all(
            &format!(
                "SELECT {TXN_COLUMNS}
                 FROM transactions t JOIN categories c ON t.category_id = c.id
                 ORDER BY t.date DESC, t.id DESC"
            ),
            [],
            txn_from_row,
        )?)
    }

    pub(crate) fn get_transactions_by_date(&self, date: &str) -> Result<Vec<Transaction>> {
        Ok(self.db.fetch_all(
            &format!(
                "SELECT {TXN_COLUMNS}
                 FROM transactions t JOIN categories c ON t.category_id = c.id
                 WHERE t.date = ?1
                 ORDER BY t.id DESC"
            ),
            params![date],
            txn_from_row,
        )?)
    }

    // ── Monthly aggregation ───────────────────────────────────

    /// Totals, per-category breakdowns, balance and the recent-10 window for
    /// one calendar month.
    pub(crate) fn get_month_summary(&self, year: i32, month: u32) -> Result<MonthSummary> {
        let (start, end) = month_bounds(year, month)?;

        let total_income = self.range_total(Kind::Income, &start, &end)?;
        let total_expense = self.range_total(Kind::Expense, &start, &end)?;
        let expenses_by_category = self.range_by_category(Kind::Expense, &start, &end)?;
        let income_by_category = self.range_by_category(Kind::Income, &start, &end)?;

        let recent_transactions = self.db.fetch_all(
            &format!(
                "SELECT {TXN_COLUMNS}
                 FROM transactions t JOIN categories c ON t.category_id = c.id
                 WHERE t.date BETWEEN ?1 AND ?2
                 ORDER BY t.date DESC, t.id DESC LIMIT 10"
            ),
            params![start, end],
            txn_from_row,
        )?;

        Ok(MonthSummary {
            month: format!("{year}-{month:02}"),
            total_income,
            total_expense,
            balance: total_income - total_expense,
            expenses_by_category,
            income_by_category,
            recent_transactions,
        })
    }

    pub(crate) fn get_category_data_for_charts(&self, year: i32, month: u32) -> Result<ChartData> {
        Ok(ChartData::from(self.get_month_summary(year, month)?))
    }

    // ── Internals ─────────────────────────────────────────────

    fn category_by_name(&self, name: &str) -> Result<Option<(i64, Kind)>, StorageError> {
        Ok(self
            .db
            .fetch_one(
                "SELECT id, type FROM categories WHERE name = ?1",
                params![name],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )?
            .map(|(id, kind)| (id, Kind::parse(&kind).unwrap_or(Kind::Expense))))
    }

    fn range_total(&self, kind: Kind, start: &str, end: &str) -> Result<Decimal> {
        let total = self.db.fetch_one(
            "SELECT CAST(COALESCE(SUM(amount), 0) AS TEXT)
             FROM transactions WHERE type = ?1 AND date BETWEEN ?2 AND ?3",
            params![kind.as_str(), start, end],
            |row| row.get::<_, String>(0),
        )?;
        Ok(total.as_deref().map(parse_amount).unwrap_or_default())
    }

    /// Per-category totals of one kind over the range: nonzero only, sorted
    /// descending by total.
    fn range_by_category(
        &self,
        kind: Kind,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Decimal)>> {
        Ok(self.db.fetch_all(
            "SELECT c.name, CAST(COALESCE(SUM(t.amount), 0) AS TEXT)
             FROM categories c
             LEFT JOIN transactions t ON c.id = t.category_id
                 AND t.type = ?1
                 AND t.date BETWEEN ?2 AND ?3
             WHERE c.type = ?1
             GROUP BY c.name
             HAVING COALESCE(SUM(t.amount), 0) > 0
             ORDER BY COALESCE(SUM(t.amount), 0) DESC",
            params![kind.as_str(), start, end],
            |row| {
                let name: String = row.get(0)?;
                let total: String = row.get(1)?;
                Ok((name, total))
            },
        )?
        .into_iter()
        .map(|(name, total)| (name, parse_amount(&total)))
        .collect())
    }
}

fn txn_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let amount: String = row.get(2)?;
    let kind: String = row.get(3)?;
    Ok(Transaction {
        date: row.get(0)?,
        category: row.get(1)?,
        amount: parse_amount(&amount),
        kind: Kind::parse(&kind).unwrap_or(Kind::Expense),
        description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

fn parse_amount(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_default()
}

/// Inclusive `[YYYY-MM-01, YYYY-MM-lastday]` bounds of a calendar month.
fn month_bounds(year: i32, month: u32) -> Result<(String, String)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("invalid month: {year}-{month:02}"))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .with_context(|| format!("invalid month: {year}-{month:02}"))?;
    let last = next_first
        .pred_opt()
        .with_context(|| format!("invalid month: {year}-{month:02}"))?;
    Ok((
        first.format("%Y-%m-%d").to_string(),
        last.format("%Y-%m-%d").to_string(),
    ))
}
