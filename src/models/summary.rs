use rust_decimal::Decimal;

use super::Transaction;

/// Derived aggregate over one calendar month. Per-category breakdowns keep
/// only nonzero totals, sorted descending by total.
#[derive(Debug, Clone)]
pub struct MonthSummary {
    /// `YYYY-MM` label for the summarized month.
    pub month: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub balance: Decimal,
    pub expenses_by_category: Vec<(String, Decimal)>,
    pub income_by_category: Vec<(String, Decimal)>,
    /// The 10 most recent transactions inside the month window.
    pub recent_transactions: Vec<Transaction>,
}

/// Chart-ready reshaping of a [`MonthSummary`].
#[derive(Debug, Clone)]
pub struct ChartData {
    pub income_data: Vec<(String, Decimal)>,
    pub expense_data: Vec<(String, Decimal)>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl From<MonthSummary> for ChartData {
    fn from(summary: MonthSummary) -> Self {
        Self {
            income_data: summary.income_by_category,
            expense_data: summary.expenses_by_category,
            total_income: summary.total_income,
            total_expense: summary.total_expense,
            balance: summary.balance,
        }
    }
}
