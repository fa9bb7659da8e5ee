use {
    crate::{display::*, prelude::*},
    thiserror::Error,
};

/// Custom error definitions for the Price Sync CLI. Takes care of displaying
/// a pretty summary in the console.
#[derive(Debug, Error)]
pub(crate) enum PriceSyncCliError {
    #[error("{error}{separator}\n{0}", error = "Syntax Error".red().bold(), separator = separator())]
    SyntaxError(clap::error::Error),
    #[error("{error}{separator}\n{0}", error = "Error".red().bold(), separator = separator())]
    Any(anyhow::Error),
}
