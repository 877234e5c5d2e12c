//! Types that represent the core data model, such as `Transaction` and `TransactionTable`.
mod amount;
mod date;
mod transaction;

pub use amount::{Amount, AmountError};
pub use date::coerce_date;
pub use transaction::{
    EntryCategory, EntryType, Transaction, TransactionColumn, TransactionTable, EXPENSE, INCOME,
};
