pub mod insight;
pub mod transaction;

pub use insight::InsightState;
pub use transaction::{NewTransaction, Transaction, TransactionType};
