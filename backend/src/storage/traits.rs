//! # Storage Traits
//!
//! Storage abstractions consumed by the domain services. Both the SQLite
//! backend and the in-memory backend implement them.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::models::account::BankAccount;
use crate::domain::models::bank_transaction::BankTransaction;
use crate::domain::models::card::CreditCard;
use crate::domain::models::ledger_entry::LedgerEntry;

/// Append-only ledger of billed entries, partitioned by card
#[async_trait]
pub trait LedgerStorage: Send + Sync {
    /// Append entries to a card's ledger. All entries are written or none are.
    async fn append_entries(&self, card_id: &str, entries: &[LedgerEntry]) -> Result<()>;

    /// Every entry stored for the card, ordered by date ascending and then by
    /// insertion order
    async fn list_entries(&self, card_id: &str) -> Result<Vec<LedgerEntry>>;

    /// Append and then read back the complete ledger as one unit, so the read
    /// always observes the appended entries. Backends with transactions
    /// override this to run both steps in a single transaction.
    async fn append_and_list(&self, card_id: &str, entries: &[LedgerEntry]) -> Result<Vec<LedgerEntry>> {
        self.append_entries(card_id, entries).await?;
        self.list_entries(card_id).await
    }

    /// Remove a card's whole ledger. Returns the number of entries removed.
    async fn delete_entries(&self, card_id: &str) -> Result<usize>;
}

/// Registered credit cards and their derived bill totals
#[async_trait]
pub trait CardStorage: Send + Sync {
    async fn store_card(&self, card: &CreditCard) -> Result<()>;

    /// Look up a card, returning `None` when it is missing or owned by
    /// someone else
    async fn find_owned_card(&self, card_id: &str, owner: &str) -> Result<Option<CreditCard>>;

    /// All cards of an owner ordered by name
    async fn list_cards(&self, owner: &str) -> Result<Vec<CreditCard>>;

    /// Overwrite the descriptive fields of an existing card
    async fn update_card(&self, card: &CreditCard) -> Result<()>;

    /// Overwrite the stored totals with freshly recomputed ones
    async fn update_bill_totals(&self, card_id: &str, current_bill: Decimal, next_bill: Decimal) -> Result<()>;

    /// Returns true if the card existed
    async fn delete_card(&self, card_id: &str) -> Result<bool>;
}

/// Bank accounts owned by users
#[async_trait]
pub trait AccountStorage: Send + Sync {
    async fn store_account(&self, account: &BankAccount) -> Result<()>;

    /// Store several accounts as one unit: all of them or none
    async fn store_accounts(&self, accounts: &[BankAccount]) -> Result<()>;

    /// `None` when the account is missing or owned by someone else
    async fn find_owned_account(&self, account_id: &str, owner: &str) -> Result<Option<BankAccount>>;

    /// All accounts of an owner, most recently created first
    async fn list_accounts(&self, owner: &str) -> Result<Vec<BankAccount>>;

    /// Overwrite every mutable field, balance included
    async fn update_account(&self, account: &BankAccount) -> Result<()>;
}

/// Movements on bank accounts
#[async_trait]
pub trait BankTransactionStorage: Send + Sync {
    /// Insert the transaction and move the account balance from
    /// `previous_balance` to `new_balance` as one unit. Fails, writing
    /// nothing, if the stored balance is no longer `previous_balance`.
    async fn record_transaction(
        &self,
        transaction: &BankTransaction,
        previous_balance: Decimal,
        new_balance: Decimal,
    ) -> Result<()>;

    /// Transactions of an account, newest first
    async fn list_transactions(&self, account_id: &str) -> Result<Vec<BankTransaction>>;
}

/// Factory for the repositories of one storage backend.
///
/// Services are built from a connection so the domain layer never names a
/// concrete backend.
pub trait Connection: Send + Sync + Clone {
    type LedgerRepository: LedgerStorage + 'static;
    type CardRepository: CardStorage + 'static;
    type AccountRepository: AccountStorage + 'static;
    type BankTransactionRepository: BankTransactionStorage + 'static;

    fn create_ledger_repository(&self) -> Self::LedgerRepository;

    fn create_card_repository(&self) -> Self::CardRepository;

    fn create_account_repository(&self) -> Self::AccountRepository;

    fn create_bank_transaction_repository(&self) -> Self::BankTransactionRepository;
}
