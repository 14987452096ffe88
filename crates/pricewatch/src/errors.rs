//! Shared error types for the pricewatch project.
#[cfg(not(target_arch = "wasm32"))]
pub use color_eyre::Report;

pub use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("Failed to install color_eyre")]
    ColorEyre(#[from] color_eyre::Report),
    #[error("Failed to install tracing-subscriber")]
    TracingSubscriber(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("At least one quote currency is required")]
    NoCurrencies,
    #[error("Token id must not be empty")]
    EmptyTokenId,
    #[error("Refresh interval must be greater than zero")]
    ZeroRefreshInterval,
    #[error("Reference currency {0} is not one of the quote currencies")]
    UnknownReferenceCurrency(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("No prices returned for {0}")]
    MissingToken(String),
    #[error("No {currency} price for {coin}")]
    MissingCurrency { coin: String, currency: String },
    #[error("Cannot derive a rate from {base} / {secondary}")]
    InvalidRate { base: f64, secondary: f64 },
}
