//! Domain model for a movement on a bank account.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::errors::{BillingError, BillingResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankTransactionKind {
    Income,
    Expense,
}

impl BankTransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BankTransactionKind::Income => "income",
            BankTransactionKind::Expense => "expense",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "income" => Some(BankTransactionKind::Income),
            "expense" => Some(BankTransactionKind::Expense),
            _ => None,
        }
    }

    /// Balance change caused by a transaction of `amount`
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            BankTransactionKind::Income => amount,
            BankTransactionKind::Expense => -amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BankTransaction {
    pub id: String,
    pub account_id: String,
    pub kind: BankTransactionKind,
    pub description: String,
    pub amount: Decimal, // always positive
    pub date: NaiveDate,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BankTransaction {
    pub fn generate_id() -> String {
        format!("banktx::{}", Uuid::new_v4())
    }

    pub fn validate_amount(amount: Decimal) -> BillingResult<()> {
        if amount <= Decimal::ZERO {
            return Err(BillingError::validation("Transaction amount must be positive"));
        }
        Ok(())
    }

    pub fn validate_description(description: &str) -> BillingResult<()> {
        if description.trim().is_empty() {
            return Err(BillingError::validation("Transaction description cannot be empty"));
        }
        Ok(())
    }
}
