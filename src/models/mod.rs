mod category;
mod kind;
mod summary;
mod transaction;

pub use category::{Category, CategoryStats};
pub use kind::Kind;
pub use summary::{ChartData, MonthSummary};
pub use transaction::Transaction;
