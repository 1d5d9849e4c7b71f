use crate::error::PayoutError;
use serde::Deserialize;
use std::fmt;

/// A positive asset amount in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self, PayoutError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(PayoutError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for Amount {
    type Error = PayoutError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One row of the input file as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
pub struct PaymentRow {
    pub handle: String,
    pub amount: u64,
}

/// A validated request to pay `amount` to the vault behind `handle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub handle: String,
    pub amount: Amount,
}

impl PaymentRequest {
    pub fn new(handle: impl Into<String>, amount: u64) -> Result<Self, PayoutError> {
        let handle = handle.into().trim().to_string();
        if handle.is_empty() {
            return Err(PayoutError::ValidationError(
                "Handle must not be empty".to_string(),
            ));
        }
        Ok(Self {
            handle,
            amount: Amount::new(amount)?,
        })
    }
}

impl TryFrom<PaymentRow> for PaymentRequest {
    type Error = PayoutError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Self::new(row.handle, row.amount)
    }
}
