use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Url};
use thiserror::Error;

use crate::config::AppConfig;
use crate::exchange_rate::ExchangeRate;
use crate::rate_window::{RateWindow, RateWindowError};
use crate::rates_of_exchange::RatesOfExchange;

pub const SORT_LATEST_FIRST: &str = "-effective_date";

#[derive(Debug, Error)]
pub enum RateFeedError {
    #[error("country is required")]
    CountryRequired,
    #[error(transparent)]
    BadDate(#[from] RateWindowError),
    #[error("failed to make request to Treasury API: {0}")]
    RequestFailed(#[source] reqwest::Error),
    #[error("received non-success status code: {0}")]
    UpstreamStatus(u16),
    #[error("malformed Treasury API response: {0}")]
    MalformedResponse(String),
    #[error("invalid Treasury API URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait RateFeed: Send + Sync {
    /// Rates published for `country` in the six months up to and including
    /// `transaction_date`, in the order the feed returned them.
    async fn fetch_rates(
        &self,
        country: &str,
        transaction_date: &str,
    ) -> Result<Vec<ExchangeRate>, RateFeedError>;
}

pub struct TreasuryClient {
    client: Client,
    base_url: String,
    date_format: String,
}

impl TreasuryClient {
    pub fn new(config: &AppConfig) -> Result<Self, RateFeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.treasury_timeout_secs))
            .build()
            .map_err(RateFeedError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: config.treasury_api_base_url.clone(),
            date_format: config.date_format.clone(),
        })
    }

    pub fn request_url(&self, country: &str, transaction_date: &str) -> Result<Url, RateFeedError> {
        let window = RateWindow::ending_on(transaction_date, &self.date_format)?;
        let filter = request_filter(country, &window);

        Url::parse_with_params(
            &self.base_url,
            &[("filter", filter.as_str()), ("sort", SORT_LATEST_FIRST)],
        )
        .map_err(|e| RateFeedError::InvalidUrl(format!("{}: {e}", self.base_url)))
    }

    async fn load_json(&self, url: Url) -> Result<String, RateFeedError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(RateFeedError::RequestFailed)?;

        if !resp.status().is_success() {
            return Err(RateFeedError::UpstreamStatus(resp.status().as_u16()));
        }

        resp.text().await.map_err(RateFeedError::RequestFailed)
    }

    fn parse_rates(&self, body: &str) -> Result<Vec<ExchangeRate>, RateFeedError> {
        let feed: RatesOfExchange = serde_json::from_str(body)
            .map_err(|e| RateFeedError::MalformedResponse(e.to_string()))?;

        feed.data
            .iter()
            .map(|record| {
                record
                    .parse(&self.date_format)
                    .map_err(RateFeedError::MalformedResponse)
            })
            .collect()
    }
}

#[async_trait]
impl RateFeed for TreasuryClient {
    async fn fetch_rates(
        &self,
        country: &str,
        transaction_date: &str,
    ) -> Result<Vec<ExchangeRate>, RateFeedError> {
        if country.is_empty() {
            return Err(RateFeedError::CountryRequired);
        }

        let url = self.request_url(country, transaction_date)?;
        debug!(target: "treasury", "GET {url}");

        let body = self.load_json(url).await.inspect_err(|e| {
            warn!(target: "treasury", "rate lookup for {country} failed: {e}");
        })?;
        let rates = self.parse_rates(&body)?;
        debug!(target: "treasury", "{} rate(s) for {country} up to {transaction_date}", rates.len());

        Ok(rates)
    }
}

/// `country:eq:<country>,effective_date:gte:<start>,effective_date:lte:<end>`
pub fn request_filter(country: &str, window: &RateWindow) -> String {
    format!(
        "country:eq:{},effective_date:gte:{},effective_date:lte:{}",
        country, window.start, window.end
    )
}
