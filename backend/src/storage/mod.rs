//! # Storage Module
//!
//! Persistence for cards with their ledgers, and for bank accounts with
//! their transactions.
//!
//! - **sqlite**: SQLite database through sqlx, used by the server
//! - **memory**: process-local maps, used by tests and ephemeral runs
//!
//! The domain layer only sees the traits in [`traits`].

pub mod memory;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryConnection;
pub use sqlite::DbConnection;
pub use traits::{AccountStorage, BankTransactionStorage, CardStorage, Connection, LedgerStorage};
