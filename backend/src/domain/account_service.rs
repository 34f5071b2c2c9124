//! Bank account registration and maintenance.
//!
//! Like cards, accounts are scoped to their owner. A bulk import either
//! stores every account or none of them.

use std::sync::Arc;
use tracing::info;

use super::clock::Clock;
use super::commands::account::{CreateAccountCommand, UpdateAccountCommand};
use super::errors::{BillingError, BillingResult};
use super::ledger_locks::LedgerLocks;
use super::models::account::BankAccount;
use crate::storage::{AccountStorage, Connection};

#[derive(Clone)]
pub struct AccountService {
    account_repository: Arc<dyn AccountStorage>,
    clock: Arc<dyn Clock>,
    ledger_locks: LedgerLocks,
}

impl AccountService {
    pub fn new<C: Connection>(connection: &C, clock: Arc<dyn Clock>, ledger_locks: LedgerLocks) -> Self {
        Self {
            account_repository: Arc::new(connection.create_account_repository()),
            clock,
            ledger_locks,
        }
    }

    pub async fn create_account(&self, owner: &str, command: CreateAccountCommand) -> BillingResult<BankAccount> {
        let account = self.build_account(owner, command, &self.clock.timestamp())?;
        self.account_repository.store_account(&account).await?;
        info!("Created account {} ({}) for {}", account.id, account.name, owner);
        Ok(account)
    }

    /// Validate every account first, then store them all in one unit.
    /// Accounts come back in the order they were submitted.
    pub async fn import_accounts(
        &self,
        owner: &str,
        commands: Vec<CreateAccountCommand>,
    ) -> BillingResult<Vec<BankAccount>> {
        if commands.is_empty() {
            return Err(BillingError::validation("No accounts to import"));
        }

        let now = self.clock.timestamp();
        let accounts = commands
            .into_iter()
            .map(|command| self.build_account(owner, command, &now))
            .collect::<BillingResult<Vec<_>>>()?;

        self.account_repository.store_accounts(&accounts).await?;
        info!("Imported {} accounts for {}", accounts.len(), owner);
        Ok(accounts)
    }

    /// The owner's accounts, most recently created first
    pub async fn list_accounts(&self, owner: &str) -> BillingResult<Vec<BankAccount>> {
        Ok(self.account_repository.list_accounts(owner).await?)
    }

    pub async fn get_account(&self, owner: &str, account_id: &str) -> BillingResult<BankAccount> {
        self.account_repository
            .find_owned_account(account_id, owner)
            .await?
            .ok_or_else(|| BillingError::account_not_found(account_id))
    }

    pub async fn update_account(
        &self,
        owner: &str,
        account_id: &str,
        command: UpdateAccountCommand,
    ) -> BillingResult<BankAccount> {
        let _account_guard = self.ledger_locks.lock(account_id).await;
        let mut account = self.get_account(owner, account_id).await?;

        if let Some(name) = command.name {
            BankAccount::validate_name(&name)?;
            account.name = name.trim().to_string();
        }
        if let Some(bank) = command.bank {
            BankAccount::validate_bank(&bank)?;
            account.bank = bank.trim().to_string();
        }
        if let Some(currency) = command.currency {
            account.currency = BankAccount::normalize_currency(&currency)?;
        }
        if let Some(country) = command.country {
            BankAccount::validate_country(&country)?;
            account.country = country.trim().to_string();
        }
        if let Some(balance) = command.balance {
            account.balance = balance;
        }
        account.updated_at = self.clock.timestamp();

        self.account_repository.update_account(&account).await?;
        info!("Updated account {}", account.id);
        Ok(account)
    }

    fn build_account(&self, owner: &str, command: CreateAccountCommand, now: &str) -> BillingResult<BankAccount> {
        BankAccount::validate_name(&command.name)?;
        BankAccount::validate_bank(&command.bank)?;
        BankAccount::validate_country(&command.country)?;
        let currency = BankAccount::normalize_currency(&command.currency)?;

        Ok(BankAccount {
            id: BankAccount::generate_id(),
            owner: owner.to_string(),
            name: command.name.trim().to_string(),
            bank: command.bank.trim().to_string(),
            currency,
            country: command.country.trim().to_string(),
            balance: command.balance,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }
}
