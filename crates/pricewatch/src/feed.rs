//! One refresh cycle of the price feed.
//!
//! A cycle fetches the token's spot prices, then prices a second coin in the
//! reference currency and publishes `token / coin` under the derived key.

use crate::api::{ApiClient, ApiResult, HttpApiClient};
use crate::config::PricesConfig;
use crate::data::{CoinDetails, Prices, SimplePriceResponse};
use crate::errors::PriceError;
use crate::log::{debug, info, warn};

/// Where prices come from.
#[async_trait::async_trait(?Send)]
pub trait PriceSource {
    async fn simple_price(
        &self,
        token_id: &str,
        currencies: &[String],
    ) -> ApiResult<SimplePriceResponse>;

    async fn coin(&self, coin_id: &str) -> ApiResult<CoinDetails>;
}

fn simple_price_endpoint(token_id: &str, currencies: &[String]) -> String {
    format!(
        "/simple/price?ids={token_id}&vs_currencies={}",
        currencies.join(",")
    )
}

fn coin_endpoint(coin_id: &str) -> String {
    format!("/coins/{coin_id}")
}

/// The public CoinGecko API.
pub struct CoinGecko {
    client: HttpApiClient,
}

impl CoinGecko {
    pub fn new(config: &PricesConfig) -> Self {
        let mut client = HttpApiClient::new(config.api_url.as_str());
        if let Some(key) = &config.api_key {
            client.set_header("x-cg-demo-api-key".to_string(), key.clone());
        }
        Self { client }
    }
}

#[async_trait::async_trait(?Send)]
impl PriceSource for CoinGecko {
    async fn simple_price(
        &self,
        token_id: &str,
        currencies: &[String],
    ) -> ApiResult<SimplePriceResponse> {
        self.client
            .get(&simple_price_endpoint(token_id, currencies))
            .await
    }

    async fn coin(&self, coin_id: &str) -> ApiResult<CoinDetails> {
        self.client.get(&coin_endpoint(coin_id)).await
    }
}

/// `base / secondary`, both quoted in the same currency.
pub fn derive_rate(base: f64, secondary: f64) -> Result<f64, PriceError> {
    if secondary == 0.0 || !secondary.is_finite() || !base.is_finite() {
        return Err(PriceError::InvalidRate { base, secondary });
    }
    Ok(base / secondary)
}

pub struct PriceFeed<S> {
    source: S,
    config: PricesConfig,
}

impl PriceFeed<CoinGecko> {
    pub fn coingecko(config: PricesConfig) -> Self {
        Self::new(CoinGecko::new(&config), config)
    }
}

impl<S: PriceSource> PriceFeed<S> {
    pub fn new(source: S, config: PricesConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &PricesConfig {
        &self.config
    }

    /// Runs one refresh cycle.
    ///
    /// Fails only when the spot prices cannot be fetched. If the derived rate
    /// cannot be computed, the spot prices are returned with the derived key
    /// carried over from `previous`.
    pub async fn fetch(&self, previous: &Prices) -> Result<Prices, PriceError> {
        let token_id = &self.config.token_id;
        let mut response = self
            .source
            .simple_price(token_id, &self.config.currencies)
            .await?;
        let spot = response
            .remove(token_id)
            .ok_or_else(|| PriceError::MissingToken(token_id.clone()))?;
        let mut prices = Prices::from(spot);
        info!(token = %token_id, ?prices, "[prices] Got new spot prices");

        let derived = &self.config.derived;
        match self.derived_rate(&prices).await {
            Ok(rate) => {
                info!(key = %derived.key, rate, "[prices] Got new derived rate");
                prices.insert(derived.key.as_str(), rate);
            }
            Err(err) => {
                warn!(key = %derived.key, error = %err, "[prices] Derived rate unavailable");
                if let Some(last) = previous.get(&derived.key) {
                    debug!(key = %derived.key, last, "[prices] Keeping last derived rate");
                    prices.insert(derived.key.as_str(), last);
                }
            }
        }

        Ok(prices)
    }

    async fn derived_rate(&self, spot: &Prices) -> Result<f64, PriceError> {
        let derived = &self.config.derived;
        let currency = &derived.reference_currency;
        let base = spot
            .get(currency)
            .ok_or_else(|| PriceError::MissingCurrency {
                coin: self.config.token_id.clone(),
                currency: currency.clone(),
            })?;

        let coin = self.source.coin(&derived.coin_id).await?;
        let secondary = coin
            .price_in(currency)
            .ok_or_else(|| PriceError::MissingCurrency {
                coin: derived.coin_id.clone(),
                currency: currency.clone(),
            })?;

        derive_rate(base, secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::data::MarketData;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct StubSource {
        spot: Option<SimplePriceResponse>,
        coin: Option<CoinDetails>,
        calls: RefCell<Vec<String>>,
    }

    impl StubSource {
        fn with_spot(token: &str, prices: &[(&str, f64)]) -> Self {
            let inner: HashMap<String, f64> =
                prices.iter().map(|(c, p)| (c.to_string(), *p)).collect();
            Self {
                spot: Some(HashMap::from([(token.to_string(), inner)])),
                ..Default::default()
            }
        }

        fn with_coin(mut self, prices: &[(&str, f64)]) -> Self {
            self.coin = Some(CoinDetails {
                id: "matic-network".to_string(),
                market_data: MarketData {
                    current_price: prices.iter().map(|(c, p)| (c.to_string(), *p)).collect(),
                },
            });
            self
        }
    }

    #[async_trait::async_trait(?Send)]
    impl PriceSource for StubSource {
        async fn simple_price(
            &self,
            token_id: &str,
            currencies: &[String],
        ) -> ApiResult<SimplePriceResponse> {
            self.calls
                .borrow_mut()
                .push(format!("simple_price {token_id} {}", currencies.join(",")));
            self.spot.clone().ok_or(ApiError::InternalServerError)
        }

        async fn coin(&self, coin_id: &str) -> ApiResult<CoinDetails> {
            self.calls.borrow_mut().push(format!("coin {coin_id}"));
            self.coin
                .clone()
                .ok_or_else(|| ApiError::NotFound(format!("/coins/{coin_id} not found")))
        }
    }

    fn feed(source: StubSource) -> PriceFeed<StubSource> {
        PriceFeed::new(source, PricesConfig::default())
    }

    #[test]
    fn test_endpoints() {
        let config = PricesConfig::default();
        assert_eq!(
            simple_price_endpoint(&config.token_id, &config.currencies),
            "/simple/price?ids=ocean-protocol&vs_currencies=eur,usd,eth,btc"
        );
        assert_eq!(coin_endpoint("matic-network"), "/coins/matic-network");
    }

    #[test]
    fn test_derive_rate() {
        assert_eq!(derive_rate(0.5, 0.25).unwrap(), 2.0);
        assert!(matches!(derive_rate(0.5, 0.0), Err(PriceError::InvalidRate { .. })));
        assert!(derive_rate(f64::NAN, 1.0).is_err());
        assert!(derive_rate(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_fetch_publishes_spot_and_derived() {
        let source = StubSource::with_spot(
            "ocean-protocol",
            &[("eur", 0.5), ("usd", 0.55), ("eth", 0.0002), ("btc", 0.00001)],
        )
        .with_coin(&[("eur", 0.25), ("usd", 0.27)]);
        let feed = feed(source);

        let prices = block_on(feed.fetch(&Prices::new())).unwrap();

        assert_eq!(prices.len(), 5);
        assert_eq!(prices.get("usd"), Some(0.55));
        assert_eq!(prices.get("matic"), Some(2.0));
        assert_eq!(
            *feed.source.calls.borrow(),
            vec![
                "simple_price ocean-protocol eur,usd,eth,btc".to_string(),
                "coin matic-network".to_string(),
            ]
        );
    }

    #[test]
    fn test_fetch_uses_fresh_reference_price() {
        let source =
            StubSource::with_spot("ocean-protocol", &[("eur", 1.0)]).with_coin(&[("eur", 0.5)]);
        let mut previous = Prices::new();
        previous.insert("eur", 100.0);

        let prices = block_on(feed(source).fetch(&previous)).unwrap();
        assert_eq!(prices.get("matic"), Some(2.0));
    }

    #[test]
    fn test_fetch_fails_without_spot_prices() {
        let source = StubSource::default();
        let result = block_on(feed(source).fetch(&Prices::new()));
        assert!(matches!(result, Err(PriceError::Api(ApiError::InternalServerError))));
    }

    #[test]
    fn test_fetch_fails_when_token_missing() {
        let source = StubSource::with_spot("bitcoin", &[("eur", 1.0)]);
        let result = block_on(feed(source).fetch(&Prices::new()));
        assert!(matches!(result, Err(PriceError::MissingToken(t)) if t == "ocean-protocol"));
    }

    #[test]
    fn test_derived_failure_keeps_previous_rate() {
        let source = StubSource::with_spot("ocean-protocol", &[("eur", 0.6), ("usd", 0.65)]);
        let mut previous = Prices::new();
        previous.insert("matic", 1.7);

        let prices = block_on(feed(source).fetch(&previous)).unwrap();
        assert_eq!(prices.get("eur"), Some(0.6));
        assert_eq!(prices.get("matic"), Some(1.7));
    }

    #[test]
    fn test_derived_failure_without_previous_rate() {
        let source = StubSource::with_spot("ocean-protocol", &[("eur", 0.6)])
            .with_coin(&[("eur", 0.0)]);

        let prices = block_on(feed(source).fetch(&Prices::new())).unwrap();
        assert_eq!(prices.get("eur"), Some(0.6));
        assert!(!prices.contains("matic"));
    }

    #[test]
    fn test_missing_reference_currency_skips_coin_call() {
        let source =
            StubSource::with_spot("ocean-protocol", &[("usd", 0.65)]).with_coin(&[("eur", 0.3)]);
        let feed = feed(source);

        let prices = block_on(feed.fetch(&Prices::new())).unwrap();
        assert!(!prices.contains("matic"));
        assert_eq!(feed.source.calls.borrow().len(), 1);
    }
}
