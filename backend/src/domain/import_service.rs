//! Bulk import of card purchases.
//!
//! An import expands every purchase into its installment entries, appends
//! them to the card's ledger, re-reads the complete ledger and recomputes the
//! card's current/next bill totals from it. The stored totals are always
//! overwritten, never incremented.
//!
//! Imports are not idempotent: submitting the same batch twice stores every
//! entry twice.

use std::sync::Arc;
use tracing::{debug, info};

use super::bill_aggregator::compute_bill_state;
use super::ledger_locks::LedgerLocks;
use super::clock::Clock;
use super::commands::import::{ImportBatchCommand, ImportBatchResult};
use super::errors::{BillingError, BillingResult};
use super::installments::expand;
use crate::storage::{CardStorage, Connection, LedgerStorage};

#[derive(Clone)]
pub struct ImportService {
    ledger_repository: Arc<dyn LedgerStorage>,
    card_repository: Arc<dyn CardStorage>,
    clock: Arc<dyn Clock>,
    ledger_locks: LedgerLocks,
}

impl ImportService {
    pub fn new<C: Connection>(connection: &C, clock: Arc<dyn Clock>, ledger_locks: LedgerLocks) -> Self {
        Self {
            ledger_repository: Arc::new(connection.create_ledger_repository()),
            card_repository: Arc::new(connection.create_card_repository()),
            clock,
            ledger_locks,
        }
    }

    pub async fn import_batch(&self, command: ImportBatchCommand) -> BillingResult<ImportBatchResult> {
        info!(
            "Importing {} purchases onto card {}",
            command.purchases.len(),
            command.card_id
        );

        if command.purchases.is_empty() {
            return Err(BillingError::validation("No transactions to import"));
        }

        if let Some(stray) = command
            .purchases
            .iter()
            .find(|purchase| purchase.card_id != command.card_id)
        {
            return Err(BillingError::validation(format!(
                "All transactions in a batch must belong to card {}, found {}",
                command.card_id, stray.card_id
            )));
        }

        // Expand everything before touching the store so a bad label in the
        // middle of the batch writes nothing.
        let recorded_at = self.clock.timestamp();
        let mut entries = Vec::new();
        for purchase in &command.purchases {
            let expanded = expand(purchase, &recorded_at)?;
            debug!(
                "Expanded '{}' ({}) into {} entries",
                purchase.description,
                purchase.installment_label,
                expanded.len()
            );
            entries.extend(expanded);
        }

        // Ownership is checked under the card lock: a delete holding it
        // first leaves nothing to find.
        let _card_guard = self.ledger_locks.lock(&command.card_id).await;

        let card = self
            .card_repository
            .find_owned_card(&command.card_id, &command.owner)
            .await?
            .ok_or_else(|| BillingError::card_not_found(&command.card_id))?;

        let today = self.clock.today();
        // Totals must stay representable before anything is written
        let existing = self.ledger_repository.list_entries(&card.id).await?;
        compute_bill_state(existing.iter().chain(&entries), today)?;

        let ledger = self
            .ledger_repository
            .append_and_list(&card.id, &entries)
            .await?;

        let bill_state = compute_bill_state(&ledger, today)?;

        self.card_repository
            .update_bill_totals(&card.id, bill_state.current_bill, bill_state.next_bill)
            .await?;

        info!(
            "Imported {} entries onto card {}; ledger has {} entries, current bill {}, next bill {}",
            entries.len(),
            card.id,
            ledger.len(),
            bill_state.current_bill,
            bill_state.next_bill
        );

        Ok(ImportBatchResult { entries, bill_state })
    }
}
