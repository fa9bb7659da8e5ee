//! CoinGecko API client implementation
//!
//! Public endpoints only, no API key is sent.

use {
    crate::coingecko::{CoinGeckoError, COINGECKO_API_BASE},
    log::debug,
    reqwest::Client,
    serde::de::DeserializeOwned,
};

/// CoinGecko API client for making requests
pub struct CoinGeckoClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL for CoinGecko API
    base_url: String,
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CoinGeckoClient {
    /// Creates a new CoinGecko client instance. Uses [`COINGECKO_API_BASE`]
    /// when no base URL is provided.
    pub fn new(base_url: Option<&str>) -> Self {
        let base_url = base_url
            .unwrap_or(COINGECKO_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes a GET request to the specified endpoint with the given query
    /// parameters and decodes the JSON body.
    pub async fn get<T>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, CoinGeckoError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);

        debug!("GET {url} {query:?}");

        let response = self.client.get(&url).query(query).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CoinGeckoError::Status { status, body: text });
        }

        Ok(serde_json::from_str::<T>(&text)?)
    }
}
