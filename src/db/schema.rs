use crate::models::Kind;

/// On-disk contract. Table and column names (including the `type` column)
/// match the data files produced by earlier versions of the app, so an
/// existing `finance.db` keeps working.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL UNIQUE,
    type  TEXT NOT NULL CHECK(type IN ('income', 'expense'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    date         DATE NOT NULL,
    category_id  INTEGER NOT NULL,
    amount       REAL NOT NULL,
    description  TEXT,
    type         TEXT NOT NULL CHECK(type IN ('income', 'expense')),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);
"#;

/// Seeded at startup with INSERT OR IGNORE, so reopening never duplicates.
pub(crate) const DEFAULT_CATEGORIES: &[(&str, Kind)] = &[
    ("Salary", Kind::Income),
    ("Investments", Kind::Income),
    ("Groceries", Kind::Expense),
    ("Transport", Kind::Expense),
    ("Housing", Kind::Expense),
    ("Entertainment", Kind::Expense),
    ("Health", Kind::Expense),
    ("Clothing", Kind::Expense),
    ("Education", Kind::Expense),
];
