//! Income and expense movements on bank accounts.
//!
//! Recording a transaction moves the account balance in the same storage
//! unit as the insert. Expenses may take the balance below zero.

use std::sync::Arc;
use tracing::info;

use super::clock::Clock;
use super::commands::bank_transaction::{RecordBankTransactionCommand, RecordBankTransactionResult};
use super::errors::{BillingError, BillingResult};
use super::ledger_locks::LedgerLocks;
use super::models::account::BankAccount;
use super::models::bank_transaction::BankTransaction;
use crate::storage::{AccountStorage, BankTransactionStorage, Connection};

#[derive(Clone)]
pub struct BankTransactionService {
    account_repository: Arc<dyn AccountStorage>,
    bank_transaction_repository: Arc<dyn BankTransactionStorage>,
    clock: Arc<dyn Clock>,
    ledger_locks: LedgerLocks,
}

impl BankTransactionService {
    pub fn new<C: Connection>(connection: &C, clock: Arc<dyn Clock>, ledger_locks: LedgerLocks) -> Self {
        Self {
            account_repository: Arc::new(connection.create_account_repository()),
            bank_transaction_repository: Arc::new(connection.create_bank_transaction_repository()),
            clock,
            ledger_locks,
        }
    }

    pub async fn record_transaction(
        &self,
        command: RecordBankTransactionCommand,
    ) -> BillingResult<RecordBankTransactionResult> {
        BankTransaction::validate_amount(command.amount)?;
        BankTransaction::validate_description(&command.description)?;

        let _account_guard = self.ledger_locks.lock(&command.account_id).await;
        let account = self.owned_account(&command.owner, &command.account_id).await?;

        let balance = account
            .balance
            .checked_add(command.kind.signed(command.amount))
            .ok_or_else(|| {
                BillingError::validation(format!(
                    "Balance of account {} would leave the supported amount range",
                    account.id
                ))
            })?;

        let now = self.clock.timestamp();
        let transaction = BankTransaction {
            id: BankTransaction::generate_id(),
            account_id: account.id.clone(),
            kind: command.kind,
            description: command.description.trim().to_string(),
            amount: command.amount,
            date: command.date,
            category: command.category.trim().to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        self.bank_transaction_repository
            .record_transaction(&transaction, account.balance, balance)
            .await?;
        info!(
            "Recorded {} {} on account {}: balance {} -> {}",
            transaction.kind.as_str(),
            transaction.amount,
            account.id,
            account.balance,
            balance
        );
        Ok(RecordBankTransactionResult { transaction, balance })
    }

    /// Transactions of one of the owner's accounts, newest first
    pub async fn list_transactions(&self, owner: &str, account_id: &str) -> BillingResult<Vec<BankTransaction>> {
        let account = self.owned_account(owner, account_id).await?;
        Ok(self.bank_transaction_repository.list_transactions(&account.id).await?)
    }

    async fn owned_account(&self, owner: &str, account_id: &str) -> BillingResult<BankAccount> {
        self.account_repository
            .find_owned_account(account_id, owner)
            .await?
            .ok_or_else(|| BillingError::account_not_found(account_id))
    }
}
