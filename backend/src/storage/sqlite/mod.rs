//! SQLite storage backend (sqlx).

pub mod account_repository;
pub mod bank_transaction_repository;
pub mod card_repository;
pub mod connection;
pub mod ledger_repository;

pub use account_repository::AccountRepository;
pub use bank_transaction_repository::BankTransactionRepository;
pub use card_repository::CardRepository;
pub use connection::DbConnection;
pub use ledger_repository::LedgerRepository;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

// Amounts are stored as decimal text so SQLite never rounds them through REAL.
pub(crate) fn decimal_from_column(raw: &str, column: &str) -> Result<Decimal> {
    Decimal::from_str(raw).with_context(|| format!("Invalid decimal in column {}: {}", column, raw))
}
