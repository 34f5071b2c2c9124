//! Installment expansion.
//!
//! A purchase labelled "k/N" with N > 1 becomes N ledger entries, one per
//! month starting at the purchase date, each carrying an equal share of the
//! purchase amount. A "1/1" purchase is stored as a single entry with the
//! full amount.

use rust_decimal::Decimal;

use super::calendar::add_months;
use super::errors::BillingResult;
use super::models::installment::InstallmentLabel;
use super::models::ledger_entry::LedgerEntry;
use super::models::purchase::PurchaseRecord;

/// Expand one purchase into its ledger entries, ordered by installment.
///
/// `recorded_at` stamps `createdAt`/`updatedAt` on the entries unless the
/// purchase carries its own timestamps. The only failures are a malformed
/// installment label and a schedule that runs past the representable dates.
pub fn expand(purchase: &PurchaseRecord, recorded_at: &str) -> BillingResult<Vec<LedgerEntry>> {
    let label: InstallmentLabel = purchase.installment_label.parse()?;

    let created_at = purchase
        .created_at
        .clone()
        .unwrap_or_else(|| recorded_at.to_string());
    let updated_at = purchase
        .updated_at
        .clone()
        .unwrap_or_else(|| recorded_at.to_string());

    let make_entry = |amount, date, installment: InstallmentLabel| LedgerEntry {
        id: LedgerEntry::generate_id(),
        card_id: purchase.card_id.clone(),
        description: purchase.description.clone(),
        amount,
        date,
        installment_label: installment.to_string(),
        created_at: created_at.clone(),
        updated_at: updated_at.clone(),
    };

    if label.is_single() {
        return Ok(vec![make_entry(
            purchase.amount,
            purchase.date,
            InstallmentLabel::SINGLE,
        )]);
    }

    // No remainder redistribution: every installment gets the same share.
    let share = purchase.amount / Decimal::from(label.total);

    (0..label.total)
        .map(|offset| {
            let date = add_months(purchase.date, offset)?;
            Ok(make_entry(
                share,
                date,
                InstallmentLabel {
                    current: offset + 1,
                    total: label.total,
                },
            ))
        })
        .collect()
}
