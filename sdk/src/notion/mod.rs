//! Notion integration. Only the two calls the sync needs are covered:
//! querying a database one page of results at a time and partially updating
//! a page's properties.

mod client;
mod error;
mod models;

// Re-exports
pub use {client::*, error::*, models::*};
