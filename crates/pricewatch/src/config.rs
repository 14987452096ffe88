//! Feed configuration, loaded from JSON and handed to the provider as props.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ConfigError;

pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 120;

/// The secondary rate published next to the spot prices.
///
/// Its value is `token price / coin price`, both quoted in `reference_currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DerivedRate {
    pub coin_id: String,
    pub key: String,
    pub reference_currency: String,
}

impl Default for DerivedRate {
    fn default() -> Self {
        Self {
            coin_id: "matic-network".to_string(),
            key: "matic".to_string(),
            reference_currency: "eur".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PricesConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub token_id: String,
    pub currencies: Vec<String>,
    pub derived: DerivedRate,
    pub refresh_interval_secs: u64,
    pub revalidate_on_focus: bool,
    pub persist: bool,
}

impl Default for PricesConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            token_id: "ocean-protocol".to_string(),
            currencies: ["eur", "usd", "eth", "btc"]
                .into_iter()
                .map(String::from)
                .collect(),
            derived: DerivedRate::default(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            revalidate_on_focus: true,
            persist: true,
        }
    }
}

impl PricesConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: PricesConfig = serde_json::from_str(json)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn normalize(&mut self) {
        for currency in &mut self.currencies {
            *currency = currency.trim().to_lowercase();
        }
        let mut seen = std::collections::HashSet::new();
        self.currencies
            .retain(|c| !c.is_empty() && seen.insert(c.clone()));
        self.derived.reference_currency = self.derived.reference_currency.trim().to_lowercase();
        self.api_url = self.api_url.trim_end_matches('/').to_string();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token_id.trim().is_empty() {
            return Err(ConfigError::EmptyTokenId);
        }
        if self.currencies.is_empty() {
            return Err(ConfigError::NoCurrencies);
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if !self.currencies.contains(&self.derived.reference_currency) {
            return Err(ConfigError::UnknownReferenceCurrency(
                self.derived.reference_currency.clone(),
            ));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// The refresh interval in the unit browser timers take.
    pub fn refresh_interval_millis(&self) -> u32 {
        u32::try_from(self.refresh_interval().as_millis()).unwrap_or(u32::MAX)
    }

    /// Local storage key for the last-known prices of this token.
    pub fn storage_key(&self) -> String {
        format!("pricewatch.prices.{}", self.token_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PricesConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.refresh_interval(), Duration::from_secs(120));
        assert_eq!(config.refresh_interval_millis(), 120_000);
        assert_eq!(config.storage_key(), "pricewatch.prices.ocean-protocol");
    }

    #[test]
    fn test_from_json_fills_defaults_and_normalizes() {
        let config = PricesConfig::from_json(
            r#"{ "currencies": ["EUR", " usd ", "usd"], "api_url": "http://localhost:8080/" }"#,
        )
        .unwrap();
        assert_eq!(config.currencies, vec!["eur", "usd"]);
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.token_id, "ocean-protocol");
        assert_eq!(config.derived, DerivedRate::default());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            PricesConfig::from_json(r#"{ "currencies": [] }"#),
            Err(ConfigError::NoCurrencies)
        ));
        assert!(matches!(
            PricesConfig::from_json(r#"{ "refresh_interval_secs": 0 }"#),
            Err(ConfigError::ZeroRefreshInterval)
        ));
        assert!(matches!(
            PricesConfig::from_json(r#"{ "token_id": "  " }"#),
            Err(ConfigError::EmptyTokenId)
        ));
        assert!(matches!(
            PricesConfig::from_json(r#"{ "currencies": ["usd"] }"#),
            Err(ConfigError::UnknownReferenceCurrency(c)) if c == "eur"
        ));
        assert!(matches!(
            PricesConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_refresh_interval_millis_saturates() {
        let config = PricesConfig {
            refresh_interval_secs: u64::MAX / 1000,
            ..Default::default()
        };
        assert_eq!(config.refresh_interval_millis(), u32::MAX);
    }
}
