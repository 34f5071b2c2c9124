//! Card registration and maintenance.
//!
//! Cards are always addressed together with their owner: a card that exists
//! but belongs to someone else is reported exactly like a missing one.

use std::sync::Arc;
use tracing::{info, warn};

use super::bill_aggregator::compute_bill_state;
use super::ledger_locks::LedgerLocks;
use super::clock::Clock;
use super::commands::card::{CreateCardCommand, UpdateCardCommand};
use super::errors::{BillingError, BillingResult};
use super::models::card::{CardBillState, CardWithLedger, CreditCard};
use crate::storage::{CardStorage, Connection, LedgerStorage};

#[derive(Clone)]
pub struct CardService {
    card_repository: Arc<dyn CardStorage>,
    ledger_repository: Arc<dyn LedgerStorage>,
    clock: Arc<dyn Clock>,
    ledger_locks: LedgerLocks,
}

impl CardService {
    pub fn new<C: Connection>(connection: &C, clock: Arc<dyn Clock>, ledger_locks: LedgerLocks) -> Self {
        Self {
            card_repository: Arc::new(connection.create_card_repository()),
            ledger_repository: Arc::new(connection.create_ledger_repository()),
            clock,
            ledger_locks,
        }
    }

    pub async fn create_card(&self, owner: &str, command: CreateCardCommand) -> BillingResult<CreditCard> {
        CreditCard::validate_name(&command.name)?;
        CreditCard::validate_last_digits(&command.last_digits)?;
        CreditCard::validate_limit(command.limit)?;

        let now = self.clock.timestamp();
        let card = CreditCard {
            id: CreditCard::generate_id(),
            owner: owner.to_string(),
            name: command.name.trim().to_string(),
            last_digits: command.last_digits,
            limit: command.limit,
            due_date: command.due_date,
            color: command.color,
            current_bill: rust_decimal::Decimal::ZERO,
            next_bill: rust_decimal::Decimal::ZERO,
            created_at: now.clone(),
            updated_at: now,
        };

        self.card_repository.store_card(&card).await?;
        info!("Created card {} ({}) for {}", card.id, card.name, owner);
        Ok(card)
    }

    /// All of the owner's cards, each with its ledger newest first
    pub async fn list_cards(&self, owner: &str) -> BillingResult<Vec<CardWithLedger>> {
        let cards = self.card_repository.list_cards(owner).await?;
        let mut result = Vec::with_capacity(cards.len());
        for card in cards {
            result.push(self.with_ledger(card).await?);
        }
        Ok(result)
    }

    pub async fn get_card(&self, owner: &str, card_id: &str) -> BillingResult<CardWithLedger> {
        let card = self.owned_card(owner, card_id).await?;
        self.with_ledger(card).await
    }

    pub async fn update_card(
        &self,
        owner: &str,
        card_id: &str,
        command: UpdateCardCommand,
    ) -> BillingResult<CreditCard> {
        let _card_guard = self.ledger_locks.lock(card_id).await;
        let mut card = self.owned_card(owner, card_id).await?;

        if let Some(name) = command.name {
            CreditCard::validate_name(&name)?;
            card.name = name.trim().to_string();
        }
        if let Some(last_digits) = command.last_digits {
            CreditCard::validate_last_digits(&last_digits)?;
            card.last_digits = last_digits;
        }
        if let Some(limit) = command.limit {
            CreditCard::validate_limit(limit)?;
            card.limit = limit;
        }
        if let Some(due_date) = command.due_date {
            card.due_date = due_date;
        }
        if let Some(color) = command.color {
            card.color = color;
        }
        card.updated_at = self.clock.timestamp();

        self.card_repository.update_card(&card).await?;
        info!("Updated card {}", card.id);
        Ok(card)
    }

    pub async fn delete_card(&self, owner: &str, card_id: &str) -> BillingResult<()> {
        let card = {
            let _card_guard = self.ledger_locks.lock(card_id).await;
            let card = self.owned_card(owner, card_id).await?;
            let removed = self.ledger_repository.delete_entries(&card.id).await?;
            if !self.card_repository.delete_card(&card.id).await? {
                warn!("Card {} disappeared before it could be deleted", card.id);
            }
            info!("Deleted card {} and {} ledger entries", card.id, removed);
            card
        };
        self.ledger_locks.forget(&card.id);
        Ok(())
    }

    /// Recompute the bill totals from the full ledger and store them
    pub async fn refresh_bills(&self, owner: &str, card_id: &str) -> BillingResult<CardBillState> {
        let _card_guard = self.ledger_locks.lock(card_id).await;
        let card = self.owned_card(owner, card_id).await?;

        let ledger = self.ledger_repository.list_entries(&card.id).await?;
        let bill_state = compute_bill_state(&ledger, self.clock.today())?;
        self.card_repository
            .update_bill_totals(&card.id, bill_state.current_bill, bill_state.next_bill)
            .await?;

        info!(
            "Refreshed bills for card {}: current {}, next {}",
            card.id, bill_state.current_bill, bill_state.next_bill
        );
        Ok(bill_state)
    }

    async fn owned_card(&self, owner: &str, card_id: &str) -> BillingResult<CreditCard> {
        self.card_repository
            .find_owned_card(card_id, owner)
            .await?
            .ok_or_else(|| BillingError::card_not_found(card_id))
    }

    async fn with_ledger(&self, card: CreditCard) -> BillingResult<CardWithLedger> {
        let mut entries = self.ledger_repository.list_entries(&card.id).await?;
        entries.reverse();
        Ok(CardWithLedger { card, entries })
    }
}
