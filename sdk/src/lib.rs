//! This library contains the building blocks of Price Sync: fetching spot
//! prices from CoinGecko and writing them into matching rows of a Notion
//! database. The CLI is a thin layer on top of it.

/// Supported assets, their identifiers on both sides of the sync and the
/// sanity bounds their prices must fall into.
mod assets;
pub use assets::*;

/// CoinGecko client and the price fetcher built on top of it.
#[cfg(feature = "coingecko")]
pub mod coingecko;

/// Minimal Notion REST client able to query a database page by page and to
/// partially update pages.
#[cfg(feature = "notion")]
pub mod notion;

/// Validation of fetched prices and reconciliation of Notion rows with them.
#[cfg(feature = "reconcile")]
pub mod reconcile;
