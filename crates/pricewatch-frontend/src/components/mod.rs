//! UI components that consume the price context.

pub mod price_ticker;

pub use price_ticker::*;
