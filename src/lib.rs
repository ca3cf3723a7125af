pub mod app;
pub mod config;
pub mod conversion;
pub mod error;
pub mod exchange_rate;
pub mod handler;
pub mod logging;
pub mod money;
pub mod rate_window;
pub mod rates_of_exchange;
pub mod store;
pub mod transaction;
pub mod treasury;
