//! Server configuration read from the environment.

use anyhow::{Context, Result};
use std::net::SocketAddr;

pub const DATABASE_URL_VAR: &str = "CARD_LEDGER_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "CARD_LEDGER_BIND_ADDR";
pub const CORS_ORIGIN_VAR: &str = "CARD_LEDGER_CORS_ORIGIN";
pub const LOG_FILTER_VAR: &str = "CARD_LEDGER_LOG";

const DEFAULT_DATABASE_URL: &str = "sqlite:card_ledger.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";
const DEFAULT_LOG_FILTER: &str = "card_ledger_backend=info,tower_http=info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Origin allowed to call the API from a browser
    pub cors_origin: String,
    /// Fallback tracing filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str, default: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_addr_raw = value(BIND_ADDR_VAR, DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("{} is not a valid socket address: {}", BIND_ADDR_VAR, bind_addr_raw))?;

        Ok(Self {
            database_url: value(DATABASE_URL_VAR, DEFAULT_DATABASE_URL),
            bind_addr,
            cors_origin: value(CORS_ORIGIN_VAR, DEFAULT_CORS_ORIGIN),
            log_filter: value(LOG_FILTER_VAR, DEFAULT_LOG_FILTER),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (DATABASE_URL_VAR, "sqlite:/tmp/ledger.db"),
            (BIND_ADDR_VAR, "0.0.0.0:8000"),
            (CORS_ORIGIN_VAR, "https://finance.example.com"),
            (LOG_FILTER_VAR, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite:/tmp/ledger.db");
        assert_eq!(config.bind_addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.cors_origin, "https://finance.example.com");
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[(DATABASE_URL_VAR, "   ")])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_invalid_bind_addr() {
        let error = AppConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])).unwrap_err();
        assert!(error.to_string().contains(BIND_ADDR_VAR));
    }
}
