use rust_decimal::Decimal;

use super::{Kind, Transaction};

#[derive(Debug, Clone)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub kind: Kind,
}

impl Category {
    /// Find a category by name (exact match) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.name == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Per-category statistics: count/total over all its transactions plus the
/// most recent one (date desc, insertion order desc).
#[derive(Debug, Clone)]
pub struct CategoryStats {
    pub kind: Kind,
    pub count: i64,
    pub total: Decimal,
    pub last_transaction: Option<Transaction>,
}
