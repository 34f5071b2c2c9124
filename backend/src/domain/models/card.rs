//! Domain model for a registered credit card.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::ledger_entry::LedgerEntry;
use crate::domain::errors::{BillingError, BillingResult};

const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct CreditCard {
    pub id: String,
    pub owner: String, // principal email
    pub name: String,
    pub last_digits: String,
    pub limit: Decimal,
    pub due_date: NaiveDate,
    pub color: String,
    pub current_bill: Decimal,
    pub next_bill: Decimal,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

/// A card together with its full ledger, newest entries first
#[derive(Debug, Clone, PartialEq)]
pub struct CardWithLedger {
    pub card: CreditCard,
    pub entries: Vec<LedgerEntry>,
}

/// Current/next bill split of a card's ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardBillState {
    pub current_bill: Decimal,
    pub next_bill: Decimal,
}

impl CreditCard {
    pub fn generate_id() -> String {
        format!("card::{}", Uuid::new_v4())
    }

    pub fn validate_name(name: &str) -> BillingResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(BillingError::validation(format!(
                "Card name must be between 1 and {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(())
    }

    pub fn validate_last_digits(last_digits: &str) -> BillingResult<()> {
        if last_digits.len() != 4 || !last_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(BillingError::validation(
                "Last digits must be exactly 4 digits",
            ));
        }
        Ok(())
    }

    pub fn validate_limit(limit: Decimal) -> BillingResult<()> {
        if limit.is_sign_negative() && !limit.is_zero() {
            return Err(BillingError::validation("Card limit cannot be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_last_digits() {
        assert!(CreditCard::validate_last_digits("1234").is_ok());
        assert!(CreditCard::validate_last_digits("0000").is_ok());
        assert!(CreditCard::validate_last_digits("123").is_err());
        assert!(CreditCard::validate_last_digits("12345").is_err());
        assert!(CreditCard::validate_last_digits("12a4").is_err());
    }

    #[test]
    fn test_validate_name_and_limit() {
        assert!(CreditCard::validate_name("Platinum").is_ok());
        assert!(CreditCard::validate_name("   ").is_err());
        assert!(CreditCard::validate_name(&"x".repeat(101)).is_err());

        assert!(CreditCard::validate_limit(Decimal::new(500000, 2)).is_ok());
        assert!(CreditCard::validate_limit(Decimal::ZERO).is_ok());
        assert!(CreditCard::validate_limit(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(CreditCard::generate_id(), CreditCard::generate_id());
        assert!(CreditCard::generate_id().starts_with("card::"));
    }
}
