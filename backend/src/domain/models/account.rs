//! Domain model for a bank account.
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::errors::{BillingError, BillingResult};

const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct BankAccount {
    pub id: String,
    pub owner: String, // principal email
    pub name: String,
    pub bank: String,
    pub currency: String, // ISO 4217, upper case
    pub country: String,
    pub balance: Decimal,
    pub created_at: String,
    pub updated_at: String,
}

impl BankAccount {
    pub fn generate_id() -> String {
        format!("account::{}", Uuid::new_v4())
    }

    pub fn validate_name(name: &str) -> BillingResult<()> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(BillingError::validation(format!(
                "Account name must be between 1 and {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(())
    }

    pub fn validate_bank(bank: &str) -> BillingResult<()> {
        if bank.trim().is_empty() {
            return Err(BillingError::validation("Bank cannot be empty"));
        }
        Ok(())
    }

    pub fn validate_country(country: &str) -> BillingResult<()> {
        if country.trim().is_empty() {
            return Err(BillingError::validation("Country cannot be empty"));
        }
        Ok(())
    }

    /// Accepts any three-letter code and returns it upper-cased
    pub fn normalize_currency(currency: &str) -> BillingResult<String> {
        let trimmed = currency.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(BillingError::validation(format!(
                "Currency must be a three-letter code, got '{}'",
                currency
            )));
        }
        Ok(trimmed.to_ascii_uppercase())
    }
}
