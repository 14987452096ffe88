//! Context providers for shared application state and services.

pub mod prices;

pub use prices::{FeedStatus, PricesContext, PricesProvider, use_prices};
