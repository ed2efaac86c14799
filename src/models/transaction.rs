use rust_decimal::Decimal;

use super::Kind;

/// A dated money movement, always read joined to its category's name.
/// Transactions are never edited in place; they only disappear when their
/// category is force-deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: String,
    pub category: String,
    pub amount: Decimal,
    pub kind: Kind,
    pub description: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == Kind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == Kind::Expense
    }
}
