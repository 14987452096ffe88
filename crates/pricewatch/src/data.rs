//! Price data exchanged between the feed, the provider and the UI.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Quote currencies rendered with two decimals.
const FIAT_CURRENCIES: &[&str] = &["eur", "usd", "gbp", "jpy", "chf", "cad", "aud", "cny"];

/// A flat mapping from lowercase currency code to price.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Prices(BTreeMap<String, f64>);

impl Prices {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Every currency mapped to `0.0`, the value shown before the first fetch.
    pub fn initial<S: AsRef<str>>(currencies: &[S]) -> Self {
        Self(
            currencies
                .iter()
                .map(|c| (c.as_ref().to_lowercase(), 0.0))
                .collect(),
        )
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.0.get(currency).copied()
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.0.contains_key(currency)
    }

    pub fn insert(&mut self, currency: impl Into<String>, price: f64) {
        self.0.insert(currency.into().to_lowercase(), price);
    }

    /// Overwrites or adds every entry of `other`.
    pub fn merge(&mut self, other: Prices) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, f64>> for Prices {
    fn from(map: HashMap<String, f64>) -> Self {
        map.into_iter().collect()
    }
}

impl FromIterator<(String, f64)> for Prices {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut prices = Prices::new();
        for (currency, price) in iter {
            prices.insert(currency, price);
        }
        prices
    }
}

/// Response of `GET /simple/price`, keyed by token id and then by currency.
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// The part of `GET /coins/{id}` we read.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CoinDetails {
    #[serde(default)]
    pub id: String,
    pub market_data: MarketData,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: HashMap<String, f64>,
}

impl CoinDetails {
    pub fn price_in(&self, currency: &str) -> Option<f64> {
        self.market_data.current_price.get(currency).copied()
    }
}

/// Formats a price for display: fiat with two decimals, everything else with six.
pub fn format_price(value: f64, currency: &str) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if FIAT_CURRENCIES.contains(&currency) {
        format!("{value:.2}")
    } else {
        format!("{value:.6}")
    }
}
