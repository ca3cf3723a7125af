use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{deserialize_float_amount, round_to_cents};

pub const MAX_DESCRIPTION_CHARS: usize = 50;

/// Largest amount the `DECIMAL(10, 2)` amount column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x540B_E3FF, 2, 0, false, 2); // 99_999_999.99

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Description must be 50 characters or fewer")]
    DescriptionTooLong,
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
    #[error("Amount must be at most 99999999.99")]
    AmountTooLarge,
    #[error("Transaction date must be in YYYY-MM-DD format")]
    BadDate,
}

/// A purchase submitted by a caller, not yet stored.
///
/// Missing fields fall back to empty values so that they are reported by
/// [`NewTransaction::validate`] rather than by the JSON binder.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_float_amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub transaction_date: String,
}

impl NewTransaction {
    pub fn new(description: &str, amount: Decimal, transaction_date: &str) -> Self {
        Self {
            description: description.to_string(),
            amount,
            transaction_date: transaction_date.to_string(),
        }
    }

    /// Checks the candidate and normalizes its amount to cents.
    ///
    /// Stops at the first failing rule. The amount is only rounded once it
    /// is known to be positive, so `0.001` is accepted and stored as `0.00`.
    pub fn validate(&mut self, date_format: &str) -> Result<(), ValidationError> {
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::DescriptionTooLong);
        }

        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }

        self.amount = round_to_cents(self.amount);
        if self.amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge);
        }

        if NaiveDate::parse_from_str(&self.transaction_date, date_format).is_err() {
            return Err(ValidationError::BadDate);
        }

        Ok(())
    }
}

/// A stored purchase. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub transaction_date: String,
}

impl Transaction {
    pub fn from_new(id: i64, new: NewTransaction) -> Self {
        Self {
            id,
            description: new.description,
            amount: new.amount,
            transaction_date: new.transaction_date,
        }
    }
}
