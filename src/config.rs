use std::env;

use thiserror::Error;

pub const DEFAULT_TREASURY_API_BASE_URL: &str =
    "https://api.fiscaldata.treasury.gov/services/api/fiscal_service/v1/accounting/od/rates_of_exchange";
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the service needs at startup. Built once in `main` and handed
/// to each component's constructor.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_env: String,
    pub log_file: Option<String>,
    pub log_level: String,
    pub api_host: String,
    pub api_port: u16,
    pub database_url: String,
    pub date_format: String,
    pub treasury_api_base_url: String,
    pub treasury_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_env: "dev".to_string(),
            log_file: None,
            log_level: "info".to_string(),
            api_host: "127.0.0.1".to_string(),
            api_port: 8080,
            database_url: "sqlite://transactions.db".to_string(),
            date_format: CANONICAL_DATE_FORMAT.to_string(),
            treasury_api_base_url: DEFAULT_TREASURY_API_BASE_URL.to_string(),
            treasury_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str, default: String| lookup(key).unwrap_or(default);

        let treasury_timeout_secs = parse_var(
            "TREASURY_TIMEOUT_SECS",
            lookup("TREASURY_TIMEOUT_SECS"),
            defaults.treasury_timeout_secs,
        )?;
        if treasury_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "TREASURY_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            app_env: read("APP_ENV", defaults.app_env),
            log_file: lookup("LOG_FILE").filter(|path| !path.trim().is_empty()),
            log_level: read("LOG_LEVEL", defaults.log_level),
            api_host: read("API_HOST", defaults.api_host),
            api_port: parse_var("API_PORT", lookup("API_PORT"), defaults.api_port)?,
            database_url: read("DATABASE_URL", defaults.database_url),
            date_format: read("DATE_FORMAT", defaults.date_format),
            treasury_api_base_url: read("TREASURY_API_BASE_URL", defaults.treasury_api_base_url),
            treasury_timeout_secs,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.api_host.clone(), self.api_port)
    }
}

fn parse_var<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            value: v,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn falls_back_to_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.app_env, "dev");
        assert_eq!(config.log_file, None);
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.treasury_api_base_url, DEFAULT_TREASURY_API_BASE_URL);
        assert_eq!(config.treasury_timeout_secs, 10);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("APP_ENV", "prod"),
            ("LOG_FILE", "app.log"),
            ("API_PORT", "9090"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("TREASURY_API_BASE_URL", "http://localhost:9999/rates"),
            ("TREASURY_TIMEOUT_SECS", "3"),
        ])
        .unwrap();

        assert_eq!(config.app_env, "prod");
        assert_eq!(config.log_file.as_deref(), Some("app.log"));
        assert_eq!(config.bind_addr(), ("127.0.0.1".to_string(), 9090));
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.treasury_api_base_url, "http://localhost:9999/rates");
        assert_eq!(config.treasury_timeout_secs, 3);
    }

    #[test]
    fn blank_log_file_means_stderr() {
        let config = config_from(&[("LOG_FILE", "  ")]).unwrap();
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn rejects_bad_port() {
        let err = config_from(&[("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "API_PORT", .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = config_from(&[("TREASURY_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "TREASURY_TIMEOUT_SECS", .. }));
    }
}
