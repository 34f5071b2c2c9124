//! # Domain Module
//!
//! Business logic for credit-card ledgers and bank accounts, independent of
//! HTTP and storage.
//!
//! ## Module Organization
//!
//! - **installments**: expansion of one purchase into its monthly installment entries
//! - **bill_aggregator**: current/next bill split of a card's ledger
//! - **import_service**: bulk import pipeline (expand, append, re-read, aggregate)
//! - **card_service**: card registration, listing, update, deletion and bill refresh
//! - **account_service**: bank account registration, bulk import and edits
//! - **bank_transaction_service**: income/expense recording with balance updates
//! - **calendar**: date parsing and calendar-month arithmetic
//! - **clock**: injected source of today's date and timestamps
//! - **ledger_locks**: per-card and per-account serialization of writes
//!
//! ## Business Rules
//!
//! - An `"N/M"` purchase becomes exactly M entries, one per calendar month,
//!   each carrying the purchase amount divided by M
//! - A `"1/1"` purchase is stored as-is with its full amount
//! - Bill totals are always recomputed from the card's complete ledger
//! - Entries dated before the first day of next month belong to the current bill
//! - Cards and accounts are only visible to the user who registered them
//! - Income raises and expense lowers the account balance in the same write
//!   that stores the transaction

pub mod account_service;
pub mod bank_transaction_service;
pub mod bill_aggregator;
pub mod calendar;
pub mod card_service;
pub mod clock;
pub mod commands;
pub mod errors;
pub mod import_service;
pub mod installments;
pub mod ledger_locks;
pub mod models;

pub use account_service::AccountService;
pub use bank_transaction_service::BankTransactionService;
pub use card_service::CardService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{BillingError, BillingResult};
pub use import_service::ImportService;
pub use ledger_locks::LedgerLocks;
