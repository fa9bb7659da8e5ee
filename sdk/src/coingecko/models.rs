//! Data models for the CoinGecko `simple/price` and `ping` endpoints

use {
    crate::Asset,
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

pub const DEFAULT_VS_CURRENCY: &str = "eur";

/// Raw `simple/price` payload: asset id to a map of currency suffixed fields,
/// e.g. `{"bitcoin": {"eur": 45000.1, "eur_24h_change": -1.2}}`.
pub type SimplePriceResponse = BTreeMap<String, BTreeMap<String, Decimal>>;

/// Response of the `ping` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub gecko_says: String,
}

/// Which quote currency to price in and which optional fields to include.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRequest {
    pub vs_currency: String,
    pub include_24h_change: bool,
    pub include_market_cap: bool,
    pub include_24h_vol: bool,
    pub include_last_updated_at: bool,
}

impl Default for PriceRequest {
    fn default() -> Self {
        Self {
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            include_24h_change: true,
            include_market_cap: true,
            include_24h_vol: false,
            include_last_updated_at: false,
        }
    }
}

impl PriceRequest {
    pub fn new(vs_currency: impl Into<String>) -> Self {
        Self {
            vs_currency: vs_currency.into().to_lowercase(),
            ..Default::default()
        }
    }

    /// Request every optional field the endpoint offers.
    pub fn detailed(vs_currency: impl Into<String>) -> Self {
        Self {
            include_24h_vol: true,
            include_last_updated_at: true,
            ..Self::new(vs_currency)
        }
    }

    /// Query parameters for the `simple/price` endpoint.
    pub(crate) fn query(&self, ids: &str) -> Vec<(&'static str, String)> {
        vec![
            ("ids", ids.to_string()),
            ("vs_currencies", self.vs_currency.clone()),
            ("include_24hr_change", self.include_24h_change.to_string()),
            ("include_market_cap", self.include_market_cap.to_string()),
            ("include_24hr_vol", self.include_24h_vol.to_string()),
            (
                "include_last_updated_at",
                self.include_last_updated_at.to_string(),
            ),
        ]
    }

    pub(crate) fn price_field(&self) -> String {
        self.vs_currency.clone()
    }

    pub(crate) fn change_field(&self) -> String {
        format!("{}_24h_change", self.vs_currency)
    }

    pub(crate) fn market_cap_field(&self) -> String {
        format!("{}_market_cap", self.vs_currency)
    }

    pub(crate) fn volume_field(&self) -> String {
        format!("{}_24h_vol", self.vs_currency)
    }
}

/// A normalized quote for one asset. Optional fields are present exactly
/// when they were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub asset: Asset,
    /// Price in the quote currency.
    pub price: Decimal,
    /// 24h change in percent.
    pub change_24h: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub volume_24h: Option<Decimal>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Quotes for every supported asset, all expressed in the same currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuotes {
    pub vs_currency: String,
    pub btc: PriceQuote,
    pub eth: PriceQuote,
}

impl PriceQuotes {
    pub fn get(&self, asset: Asset) -> &PriceQuote {
        match asset {
            Asset::Btc => &self.btc,
            Asset::Eth => &self.eth,
        }
    }

    pub fn price(&self, asset: Asset) -> Decimal {
        self.get(asset).price
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceQuote> {
        [&self.btc, &self.eth].into_iter()
    }
}
