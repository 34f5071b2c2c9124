//! Domain-level command and result types.
//! The REST layer maps the DTOs from the `shared` crate onto these.

pub mod import {
    use crate::domain::models::card::CardBillState;
    use crate::domain::models::ledger_entry::LedgerEntry;
    use crate::domain::models::purchase::PurchaseRecord;

    /// Input for importing a batch of purchases onto one card.
    #[derive(Debug, Clone)]
    pub struct ImportBatchCommand {
        /// Authenticated principal the card must belong to
        pub owner: String,
        pub card_id: String,
        pub purchases: Vec<PurchaseRecord>,
    }

    /// Result of an import: the entries created by this batch and the totals
    /// recomputed over the card's whole ledger.
    #[derive(Debug, Clone)]
    pub struct ImportBatchResult {
        pub entries: Vec<LedgerEntry>,
        pub bill_state: CardBillState,
    }
}

pub mod card {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    /// Input for registering a new card.
    #[derive(Debug, Clone)]
    pub struct CreateCardCommand {
        pub name: String,
        pub last_digits: String,
        pub limit: Decimal,
        pub due_date: NaiveDate,
        pub color: String,
    }

    /// Partial update of a card's descriptive fields.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateCardCommand {
        pub name: Option<String>,
        pub last_digits: Option<String>,
        pub limit: Option<Decimal>,
        pub due_date: Option<NaiveDate>,
        pub color: Option<String>,
    }
}

pub mod account {
    use rust_decimal::Decimal;

    /// Input for opening one bank account.
    #[derive(Debug, Clone)]
    pub struct CreateAccountCommand {
        pub name: String,
        pub bank: String,
        pub currency: String,
        pub country: String,
        pub balance: Decimal,
    }

    /// Partial update of an account. `balance` overwrites the stored balance.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateAccountCommand {
        pub name: Option<String>,
        pub bank: Option<String>,
        pub currency: Option<String>,
        pub country: Option<String>,
        pub balance: Option<Decimal>,
    }
}

pub mod bank_transaction {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::domain::models::bank_transaction::{BankTransaction, BankTransactionKind};

    #[derive(Debug, Clone)]
    pub struct RecordBankTransactionCommand {
        pub owner: String,
        pub account_id: String,
        pub kind: BankTransactionKind,
        pub description: String,
        pub amount: Decimal,
        pub date: NaiveDate,
        pub category: String,
    }

    /// The stored transaction and the account balance it produced
    #[derive(Debug, Clone)]
    pub struct RecordBankTransactionResult {
        pub transaction: BankTransaction,
        pub balance: Decimal,
    }
}
