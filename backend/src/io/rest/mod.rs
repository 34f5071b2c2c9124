//! # REST API Interface Layer
//!
//! Axum handlers for the card ledger and bank accounts. Handlers stay thin: they extract the
//! principal, map DTOs to domain commands, call a service and map the result
//! back. Every failure is answered with an `{ "error": ... }` body.

pub mod account_apis;
pub mod bank_transaction_apis;
pub mod card_apis;
pub mod error;
pub mod import_apis;
pub mod mappers;
pub mod principal;

pub use account_apis::{
    create_account, get_account, import_accounts, list_account_transactions, list_accounts, update_account,
};
pub use bank_transaction_apis::create_bank_transaction;
pub use card_apis::{create_card, delete_card, get_card, list_cards, refresh_bills, update_card};
pub use error::ApiError;
pub use import_apis::import_transactions;
pub use principal::Principal;
