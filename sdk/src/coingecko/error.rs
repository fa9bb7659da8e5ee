use {
    reqwest::StatusCode,
    serde::{Deserialize, Serialize},
    thiserror::Error,
};

/// Error kind enumeration for CoinGecko operations
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoinGeckoErrorKind {
    /// Network connection failed
    Connection,
    /// Request timed out
    Timeout,
    /// Rate limit exceeded (HTTP 429)
    RateLimit,
    /// Server error (HTTP 5xx)
    Server,
    /// Any other non-success status
    Api,
    /// Body could not be decoded or was incomplete
    Parse,
}

/// Error type for CoinGecko operations
#[derive(Error, Debug)]
pub enum CoinGeckoError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("CoinGecko API status error ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Response parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Asset '{0}' is missing from the response")]
    MissingAsset(String),

    #[error("Field '{field}' is missing for asset '{asset}'")]
    MissingField { asset: String, field: String },

    #[error("Field '{field}' for asset '{asset}' has an invalid value")]
    InvalidField { asset: String, field: String },
}

impl CoinGeckoErrorKind {
    /// Maps HTTP status code to our error kind
    pub fn from_status_code(status_code: u16) -> Self {
        match status_code {
            408 => Self::Timeout,
            429 => Self::RateLimit,
            500..=599 => Self::Server,
            _ => Self::Api,
        }
    }

    /// Maps network error to our error kind
    pub fn from_network_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Parse
        } else {
            Self::Connection
        }
    }
}

impl CoinGeckoError {
    pub fn kind(&self) -> CoinGeckoErrorKind {
        match self {
            CoinGeckoError::Network(e) => CoinGeckoErrorKind::from_network_error(e),
            CoinGeckoError::Status { status, .. } => {
                CoinGeckoErrorKind::from_status_code(status.as_u16())
            }
            CoinGeckoError::Parse(_)
            | CoinGeckoError::MissingAsset(_)
            | CoinGeckoError::MissingField { .. }
            | CoinGeckoError::InvalidField { .. } => CoinGeckoErrorKind::Parse,
        }
    }
}
