//! Domain model for a purchase submitted for import.
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// A purchase as submitted by the client, before installment expansion.
/// The label is kept raw and parsed by the expander.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseRecord {
    pub card_id: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub installment_label: String,
    /// Client supplied timestamps, passed through to every generated entry
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
