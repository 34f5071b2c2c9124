//! Error type shared by the domain services.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BillingError {
    /// The request is malformed: bad installment label, empty or mixed batch,
    /// unparseable date, invalid card or account fields, or an amount that
    /// leaves the representable range.
    #[error("{0}")]
    Validation(String),

    /// The card or account does not exist or is not owned by the caller.
    #[error("{0}")]
    NotFound(String),

    /// The underlying store failed while reading or writing.
    #[error("storage failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn card_not_found(card_id: &str) -> Self {
        Self::NotFound(format!("Card not found: {}", card_id))
    }

    pub fn account_not_found(account_id: &str) -> Self {
        Self::NotFound(format!("Bank account not found: {}", account_id))
    }
}

pub type BillingResult<T> = std::result::Result<T, BillingError>;
