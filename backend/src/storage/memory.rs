//! In-memory storage backend.
//!
//! Cards, ledgers, accounts and bank transactions live in one state guarded
//! by a single lock, so every operation, including `append_and_list` and
//! `record_transaction`, is atomic with respect to the others.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::traits::{AccountStorage, BankTransactionStorage, CardStorage, Connection, LedgerStorage};
use crate::domain::models::account::BankAccount;
use crate::domain::models::bank_transaction::BankTransaction;
use crate::domain::models::card::CreditCard;
use crate::domain::models::ledger_entry::LedgerEntry;

#[derive(Default)]
struct MemoryState {
    cards: HashMap<String, CreditCard>,
    ledgers: HashMap<String, Vec<LedgerEntry>>,
    // insertion order breaks ties between equal creation timestamps
    accounts: Vec<BankAccount>,
    bank_transactions: HashMap<String, Vec<BankTransaction>>,
}

#[derive(Default)]
struct Shared {
    state: RwLock<MemoryState>,
    fail_writes: AtomicBool,
}

impl Shared {
    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state.read().map_err(|_| anyhow!("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("memory store is rejecting writes");
        }
        self.state.write().map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

/// Handle to one in-memory database. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryConnection {
    shared: Arc<Shared>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, to exercise store failure paths
    pub fn fail_writes(&self, fail: bool) {
        self.shared.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl Connection for MemoryConnection {
    type LedgerRepository = MemoryLedgerRepository;
    type CardRepository = MemoryCardRepository;
    type AccountRepository = MemoryAccountRepository;
    type BankTransactionRepository = MemoryBankTransactionRepository;

    fn create_ledger_repository(&self) -> Self::LedgerRepository {
        MemoryLedgerRepository {
            shared: self.shared.clone(),
        }
    }

    fn create_card_repository(&self) -> Self::CardRepository {
        MemoryCardRepository {
            shared: self.shared.clone(),
        }
    }

    fn create_account_repository(&self) -> Self::AccountRepository {
        MemoryAccountRepository {
            shared: self.shared.clone(),
        }
    }

    fn create_bank_transaction_repository(&self) -> Self::BankTransactionRepository {
        MemoryBankTransactionRepository {
            shared: self.shared.clone(),
        }
    }
}

#[derive(Clone)]
pub struct MemoryLedgerRepository {
    shared: Arc<Shared>,
}

fn append_locked(state: &mut MemoryState, card_id: &str, entries: &[LedgerEntry]) -> Result<()> {
    if !state.cards.contains_key(card_id) {
        bail!("cannot append entries to unknown card {}", card_id);
    }
    if let Some(stray) = entries.iter().find(|entry| entry.card_id != card_id) {
        bail!("entry {} belongs to card {}, not {}", stray.id, stray.card_id, card_id);
    }
    state
        .ledgers
        .entry(card_id.to_string())
        .or_default()
        .extend(entries.iter().cloned());
    Ok(())
}

fn list_locked(state: &MemoryState, card_id: &str) -> Vec<LedgerEntry> {
    let mut entries = state.ledgers.get(card_id).cloned().unwrap_or_default();
    // stable: same-day entries keep insertion order
    entries.sort_by_key(|entry| entry.date);
    entries
}

#[async_trait]
impl LedgerStorage for MemoryLedgerRepository {
    async fn append_entries(&self, card_id: &str, entries: &[LedgerEntry]) -> Result<()> {
        let mut state = self.shared.write()?;
        append_locked(&mut state, card_id, entries)
    }

    async fn list_entries(&self, card_id: &str) -> Result<Vec<LedgerEntry>> {
        let state = self.shared.read()?;
        Ok(list_locked(&state, card_id))
    }

    async fn append_and_list(&self, card_id: &str, entries: &[LedgerEntry]) -> Result<Vec<LedgerEntry>> {
        let mut state = self.shared.write()?;
        append_locked(&mut state, card_id, entries)?;
        Ok(list_locked(&state, card_id))
    }

    async fn delete_entries(&self, card_id: &str) -> Result<usize> {
        let mut state = self.shared.write()?;
        Ok(state.ledgers.remove(card_id).map(|entries| entries.len()).unwrap_or(0))
    }
}

#[derive(Clone)]
pub struct MemoryCardRepository {
    shared: Arc<Shared>,
}

#[async_trait]
impl CardStorage for MemoryCardRepository {
    async fn store_card(&self, card: &CreditCard) -> Result<()> {
        let mut state = self.shared.write()?;
        if state.cards.contains_key(&card.id) {
            bail!("card {} already exists", card.id);
        }
        state.cards.insert(card.id.clone(), card.clone());
        Ok(())
    }

    async fn find_owned_card(&self, card_id: &str, owner: &str) -> Result<Option<CreditCard>> {
        let state = self.shared.read()?;
        Ok(state
            .cards
            .get(card_id)
            .filter(|card| card.owner == owner)
            .cloned())
    }

    async fn list_cards(&self, owner: &str) -> Result<Vec<CreditCard>> {
        let state = self.shared.read()?;
        let mut cards: Vec<CreditCard> = state
            .cards
            .values()
            .filter(|card| card.owner == owner)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(cards)
    }

    async fn update_card(&self, card: &CreditCard) -> Result<()> {
        let mut state = self.shared.write()?;
        let stored = state
            .cards
            .get_mut(&card.id)
            .ok_or_else(|| anyhow!("card {} does not exist", card.id))?;
        stored.name = card.name.clone();
        stored.last_digits = card.last_digits.clone();
        stored.limit = card.limit;
        stored.due_date = card.due_date;
        stored.color = card.color.clone();
        stored.updated_at = card.updated_at.clone();
        Ok(())
    }

    async fn update_bill_totals(&self, card_id: &str, current_bill: Decimal, next_bill: Decimal) -> Result<()> {
        let mut state = self.shared.write()?;
        let stored = state
            .cards
            .get_mut(card_id)
            .ok_or_else(|| anyhow!("card {} does not exist", card_id))?;
        stored.current_bill = current_bill;
        stored.next_bill = next_bill;
        Ok(())
    }

    async fn delete_card(&self, card_id: &str) -> Result<bool> {
        let mut state = self.shared.write()?;
        state.ledgers.remove(card_id);
        Ok(state.cards.remove(card_id).is_some())
    }
}

#[derive(Clone)]
pub struct MemoryAccountRepository {
    shared: Arc<Shared>,
}

fn insert_account_locked(state: &mut MemoryState, account: &BankAccount) -> Result<()> {
    if state.accounts.iter().any(|stored| stored.id == account.id) {
        bail!("account {} already exists", account.id);
    }
    state.accounts.push(account.clone());
    Ok(())
}

#[async_trait]
impl AccountStorage for MemoryAccountRepository {
    async fn store_account(&self, account: &BankAccount) -> Result<()> {
        let mut state = self.shared.write()?;
        insert_account_locked(&mut state, account)
    }

    async fn store_accounts(&self, accounts: &[BankAccount]) -> Result<()> {
        let mut state = self.shared.write()?;
        let before = state.accounts.len();
        for account in accounts {
            if let Err(e) = insert_account_locked(&mut state, account) {
                state.accounts.truncate(before);
                return Err(e);
            }
        }
        Ok(())
    }

    async fn find_owned_account(&self, account_id: &str, owner: &str) -> Result<Option<BankAccount>> {
        let state = self.shared.read()?;
        Ok(state
            .accounts
            .iter()
            .find(|account| account.id == account_id && account.owner == owner)
            .cloned())
    }

    async fn list_accounts(&self, owner: &str) -> Result<Vec<BankAccount>> {
        let state = self.shared.read()?;
        let mut accounts: Vec<BankAccount> = state
            .accounts
            .iter()
            .rev()
            .filter(|account| account.owner == owner)
            .cloned()
            .collect();
        // stable: equal timestamps keep newest-inserted first
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }

    async fn update_account(&self, account: &BankAccount) -> Result<()> {
        let mut state = self.shared.write()?;
        let stored = state
            .accounts
            .iter_mut()
            .find(|stored| stored.id == account.id)
            .ok_or_else(|| anyhow!("account {} does not exist", account.id))?;
        stored.name = account.name.clone();
        stored.bank = account.bank.clone();
        stored.currency = account.currency.clone();
        stored.country = account.country.clone();
        stored.balance = account.balance;
        stored.updated_at = account.updated_at.clone();
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryBankTransactionRepository {
    shared: Arc<Shared>,
}

#[async_trait]
impl BankTransactionStorage for MemoryBankTransactionRepository {
    async fn record_transaction(
        &self,
        transaction: &BankTransaction,
        previous_balance: Decimal,
        new_balance: Decimal,
    ) -> Result<()> {
        let mut state = self.shared.write()?;
        let account = state
            .accounts
            .iter_mut()
            .find(|account| account.id == transaction.account_id)
            .ok_or_else(|| anyhow!("account {} does not exist", transaction.account_id))?;
        if account.balance != previous_balance {
            bail!(
                "balance of account {} changed concurrently: expected {}, found {}",
                account.id,
                previous_balance,
                account.balance
            );
        }
        account.balance = new_balance;
        state
            .bank_transactions
            .entry(transaction.account_id.clone())
            .or_default()
            .push(transaction.clone());
        Ok(())
    }

    async fn list_transactions(&self, account_id: &str) -> Result<Vec<BankTransaction>> {
        let state = self.shared.read()?;
        let mut transactions: Vec<BankTransaction> = state
            .bank_transactions
            .get(account_id)
            .map(|stored| stored.iter().rev().cloned().collect())
            .unwrap_or_default();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }
}
