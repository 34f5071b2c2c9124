//! Conversions between the `shared` DTOs and domain models.

pub mod account_mapper;
pub mod bank_transaction_mapper;
pub mod card_mapper;
pub mod ledger_entry_mapper;
pub mod purchase_mapper;
