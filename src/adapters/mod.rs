//! Concrete adapter implementations for ports.

pub mod alphavantage_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod finnhub_adapter;
pub mod sqlite_store_adapter;

use std::time::Duration;

use crate::domain::error::FoliotrackError;
use crate::ports::config_port::ConfigPort;
use crate::ports::quote_port::QuotePort;

use self::alphavantage_adapter::AlphaVantageAdapter;
use self::finnhub_adapter::FinnhubAdapter;

/// Build the configured market-data vendor.
///
/// The vendor is an explicit capability handed to callers, not a cached
/// module-level instance: construct once at the edge, pass it down.
pub fn quote_port_from_config(
    config: &dyn ConfigPort,
) -> Result<Box<dyn QuotePort>, FoliotrackError> {
    let provider = config
        .get_string("market_data", "provider")
        .unwrap_or_else(|| "alphavantage".to_string());
    let api_key = config.require_string("market_data", "api_key")?;
    let timeout =
        Duration::from_secs(config.get_int("market_data", "timeout_secs", 5).max(1) as u64);
    let base_url = config.get_string("market_data", "base_url");

    match provider.to_lowercase().as_str() {
        "alphavantage" => {
            let mut adapter = AlphaVantageAdapter::new(api_key, timeout)?;
            if let Some(url) = base_url {
                adapter = adapter.with_base_url(url);
            }
            Ok(Box::new(adapter))
        }
        "finnhub" => {
            let mut adapter = FinnhubAdapter::new(api_key, timeout)?;
            if let Some(url) = base_url {
                adapter = adapter.with_base_url(url);
            }
            Ok(Box::new(adapter))
        }
        other => Err(FoliotrackError::ConfigInvalid {
            section: "market_data".into(),
            key: "provider".into(),
            reason: format!("unknown provider: {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn builds_configured_providers() {
        for provider in ["alphavantage", "finnhub", "Finnhub"] {
            let config = FileConfigAdapter::from_string(&format!(
                "[market_data]\nprovider = {provider}\napi_key = demo\n"
            ))
            .unwrap();
            assert!(quote_port_from_config(&config).is_ok(), "{provider}");
        }
    }

    #[test]
    fn provider_defaults_to_alphavantage() {
        let config = FileConfigAdapter::from_string("[market_data]\napi_key = demo\n").unwrap();
        assert!(quote_port_from_config(&config).is_ok());
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let config =
            FileConfigAdapter::from_string("[market_data]\nprovider = finnhub\n").unwrap();
        assert!(matches!(
            quote_port_from_config(&config),
            Err(FoliotrackError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let config = FileConfigAdapter::from_string(
            "[market_data]\nprovider = bloomberg\napi_key = demo\n",
        )
        .unwrap();
        match quote_port_from_config(&config) {
            Err(FoliotrackError::ConfigInvalid { key, reason, .. }) => {
                assert_eq!(key, "provider");
                assert!(reason.contains("bloomberg"));
            }
            Ok(_) => panic!("expected ConfigInvalid, got Ok(..)"),
            Err(other) => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }
}
