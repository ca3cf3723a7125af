use std::sync::Arc;

use log::{info, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::exchange_rate::ExchangeRate;
use crate::money::round_to_cents;
use crate::store::{StoreError, TransactionStore};
use crate::transaction::Transaction;
use crate::treasury::{RateFeed, RateFeedError};

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("country is required")]
    CountryRequired,
    #[error("transaction {0} not found")]
    TransactionNotFound(i64),
    #[error("failed to retrieve transaction: {0}")]
    Store(#[from] StoreError),
    #[error("failed to fetch exchange rates: {0}")]
    Upstream(#[from] RateFeedError),
    #[error("no exchange rate found for {country} within six months of {transaction_date}")]
    NoRateFound {
        country: String,
        transaction_date: String,
    },
    #[error("converting transaction {id} at rate {exchange_rate} overflows")]
    AmountOverflow { id: i64, exchange_rate: Decimal },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub id: i64,
    pub description: String,
    pub transaction_date: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub usd_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub exchange_rate: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub converted_amount: Decimal,
}

impl ConversionResult {
    pub fn new(transaction: Transaction, rate: &ExchangeRate) -> Result<Self, ConversionError> {
        let converted = transaction
            .amount
            .checked_mul(rate.exchange_rate)
            .ok_or(ConversionError::AmountOverflow {
                id: transaction.id,
                exchange_rate: rate.exchange_rate,
            })?;

        Ok(Self {
            converted_amount: round_to_cents(converted),
            id: transaction.id,
            description: transaction.description,
            transaction_date: transaction.transaction_date,
            usd_amount: transaction.amount,
            exchange_rate: rate.exchange_rate,
        })
    }
}

/// Joins a stored transaction with the latest Treasury rate for a country.
#[derive(Clone)]
pub struct ConversionService {
    store: Arc<dyn TransactionStore>,
    feed: Arc<dyn RateFeed>,
}

impl ConversionService {
    pub fn new(store: Arc<dyn TransactionStore>, feed: Arc<dyn RateFeed>) -> Self {
        Self { store, feed }
    }

    pub async fn convert(&self, id: i64, country: &str) -> Result<ConversionResult, ConversionError> {
        if country.is_empty() {
            return Err(ConversionError::CountryRequired);
        }

        let transaction = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(ConversionError::TransactionNotFound(id))?;
        info!(target: "conversion", "retrieved transaction {id}");

        let rates = self
            .feed
            .fetch_rates(country, &transaction.transaction_date)
            .await?;

        let Some(latest) = latest_rate(rates) else {
            warn!(target: "conversion", "no exchange rate found for country {country}");
            return Err(ConversionError::NoRateFound {
                country: country.to_string(),
                transaction_date: transaction.transaction_date,
            });
        };

        let result = ConversionResult::new(transaction, &latest)?;
        info!(
            target: "conversion",
            "converted transaction {} at {} {} (effective {}): {}",
            result.id, latest.exchange_rate, latest.currency, latest.effective_date, result.converted_amount
        );

        Ok(result)
    }
}

/// The rate with the newest effective date. On ties, the one the feed
/// listed first.
pub fn latest_rate(mut rates: Vec<ExchangeRate>) -> Option<ExchangeRate> {
    rates.sort_by(|a, b| b.effective_date.cmp(&a.effective_date));
    rates.into_iter().next()
}
