use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One published rate: units of `currency` per one US dollar, in effect
/// from `effective_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub country: String,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub effective_date: NaiveDate,
}
