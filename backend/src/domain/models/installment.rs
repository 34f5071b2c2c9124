//! Installment label ("current/total") parsing.
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::BillingError;

/// Longest installment plan a purchase may be split into
pub const MAX_INSTALLMENTS: u32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentLabel {
    pub current: u32,
    pub total: u32,
}

impl InstallmentLabel {
    /// Label carried by a purchase paid in a single installment
    pub const SINGLE: InstallmentLabel = InstallmentLabel { current: 1, total: 1 };

    pub fn is_single(&self) -> bool {
        self.total == 1
    }
}

impl FromStr for InstallmentLabel {
    type Err = BillingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            BillingError::validation(format!(
                "Invalid installment label '{}': expected 'current/total' with 1 <= current <= total",
                raw
            ))
        };

        let (current, total) = raw.trim().split_once('/').ok_or_else(invalid)?;
        let current: u32 = current.trim().parse().map_err(|_| invalid())?;
        let total: u32 = total.trim().parse().map_err(|_| invalid())?;

        if current == 0 || total == 0 || current > total {
            return Err(invalid());
        }
        if total > MAX_INSTALLMENTS {
            return Err(BillingError::validation(format!(
                "Invalid installment label '{}': at most {} installments are supported",
                raw, MAX_INSTALLMENTS
            )));
        }

        Ok(Self { current, total })
    }
}

impl fmt::Display for InstallmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.total)
    }
}
