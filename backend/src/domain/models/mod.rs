pub mod account;
pub mod bank_transaction;
pub mod card;
pub mod installment;
pub mod ledger_entry;
pub mod purchase;
