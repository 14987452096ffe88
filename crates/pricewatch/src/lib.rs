//! The shared library for pricewatch, a periodic spot-price feed for Yew front-ends.
//!
//! This library holds everything that does not need a browser: the price data model,
//! configuration, the HTTP client, the refresh cycle itself, logging setup and macros.

pub mod api;
pub mod config;
pub mod data;
pub mod errors;
pub mod feed;
pub mod log;
pub mod macros;

pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing::{debug, error, info, trace, warn};
