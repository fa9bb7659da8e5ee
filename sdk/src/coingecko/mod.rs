//! CoinGecko integration. The [`fetch_prices`] function is the single entry
//! point used by the sync: one request for all supported assets, decoded and
//! validated into [`PriceQuotes`].

pub const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

mod client;
mod error;
mod models;
mod prices;

// Re-exports
pub use {client::*, error::*, models::*, prices::*};
