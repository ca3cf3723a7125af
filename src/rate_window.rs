use chrono::{Months, NaiveDate};
use thiserror::Error;

pub const LOOKBACK_MONTHS: u32 = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RateWindowError {
    #[error("transaction date must be in YYYY-MM-DD format")]
    BadDate,
}

/// Inclusive range of effective dates a rate may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    pub start: String,
    pub end: String,
}

impl RateWindow {
    /// Both bounds are re-rendered in `format`.
    pub fn ending_on(date: &str, format: &str) -> Result<Self, RateWindowError> {
        let end = NaiveDate::parse_from_str(date, format).map_err(|_| RateWindowError::BadDate)?;
        let start = end
            .checked_sub_months(Months::new(LOOKBACK_MONTHS))
            .ok_or(RateWindowError::BadDate)?;

        Ok(Self {
            start: start.format(format).to_string(),
            end: end.format(format).to_string(),
        })
    }
}

/// Returns `date` minus six calendar months, in the same format.
///
/// Days that do not exist in the target month are clamped to its last day.
pub fn window_start(date: &str, format: &str) -> Result<String, RateWindowError> {
    RateWindow::ending_on(date, format).map(|window| window.start)
}
