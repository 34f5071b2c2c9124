//! Domain model for one billed occurrence on a credit card.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub id: String,
    pub card_id: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub installment_label: String, // "k/total"
    pub created_at: String,        // RFC 3339 timestamp
    pub updated_at: String,        // RFC 3339 timestamp
}

impl LedgerEntry {
    pub fn generate_id() -> String {
        format!("entry::{}", Uuid::new_v4())
    }
}
