use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, de};

pub const CENTS: u32 = 2;

/// Rounds to the nearest cent, half away from zero.
///
/// Exact for any `Decimal`. Amounts that arrive as JSON floats go through
/// [`decimal_from_float`] first, so a submitted `1.005` is really
/// `1.00499999...` and lands on `1.00`.
pub fn round_to_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CENTS);
    rounded
}

/// Converts a float into a `Decimal`, keeping the exact binary value
/// rather than its shortest printed form.
pub fn decimal_from_float(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value)
}

pub fn deserialize_float_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    decimal_from_float(value)
        .ok_or_else(|| de::Error::custom(format!("amount {value} is out of range")))
}
