use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::exchange_rate::ExchangeRate;

/// A row of the Treasury "Rates of Exchange" dataset. Only the columns we
/// use are declared; the rest are ignored.
#[derive(Debug, Deserialize, PartialEq)]
pub struct RateRecord {
    pub country: String,
    pub currency: String,
    pub exchange_rate: String,
    pub effective_date: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct RatesOfExchange {
    pub data: Vec<RateRecord>,
}

impl RateRecord {
    pub fn parse(&self, date_format: &str) -> Result<ExchangeRate, String> {
        let exchange_rate = Decimal::from_str(self.exchange_rate.trim())
            .map_err(|e| format!("exchange_rate {:?}: {e}", self.exchange_rate))?;
        if exchange_rate <= Decimal::ZERO {
            return Err(format!("exchange_rate {:?} is not positive", self.exchange_rate));
        }
        let effective_date = NaiveDate::parse_from_str(&self.effective_date, date_format)
            .map_err(|e| format!("effective_date {:?}: {e}", self.effective_date))?;

        Ok(ExchangeRate {
            country: self.country.clone(),
            currency: self.currency.clone(),
            exchange_rate,
            effective_date,
        })
    }
}
