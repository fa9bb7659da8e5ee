use {
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    strum::{Display, EnumIter, IntoEnumIterator},
};

/// Assets whose prices are synced. The ticker is the join key between the
/// price source and the database rows.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    #[strum(serialize = "BTC")]
    Btc,
    #[strum(serialize = "ETH")]
    Eth,
}

impl Asset {
    /// Iterate over all supported assets in a stable order.
    pub fn all() -> impl Iterator<Item = Asset> {
        Asset::iter()
    }

    /// Identifier of the asset in the CoinGecko API.
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::Btc => "bitcoin",
            Asset::Eth => "ethereum",
        }
    }

    /// Ticker symbol as stored in the database rows.
    pub fn ticker(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
        }
    }

    /// Human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin",
            Asset::Eth => "Ethereum",
        }
    }

    /// Exclusive `(lower, upper)` bounds, in quote currency units, a fetched
    /// price must fall into to be written anywhere.
    pub fn sanity_bounds(&self) -> (Decimal, Decimal) {
        match self {
            Asset::Btc => (Decimal::from(1_000), Decimal::from(1_000_000)),
            Asset::Eth => (Decimal::from(10), Decimal::from(100_000)),
        }
    }

    /// Whether the given price lies strictly inside [`Asset::sanity_bounds`].
    pub fn is_realistic_price(&self, price: Decimal) -> bool {
        let (lower, upper) = self.sanity_bounds();

        price > lower && price < upper
    }

    /// Exact, case-sensitive ticker lookup.
    pub fn from_ticker(ticker: &str) -> Option<Self> {
        Asset::iter().find(|asset| asset.ticker() == ticker)
    }

    /// Case-insensitive lookup that also tolerates surrounding whitespace.
    pub fn from_ticker_ignore_case(ticker: &str) -> Option<Self> {
        let ticker = ticker.trim();

        Asset::iter().find(|asset| asset.ticker().eq_ignore_ascii_case(ticker))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, rust_decimal_macros::dec};

    #[test]
    fn test_all_assets_in_order() {
        let assets = Asset::all().collect::<Vec<_>>();

        assert_eq!(assets, vec![Asset::Btc, Asset::Eth]);
    }

    #[test]
    fn test_display_is_ticker() {
        assert_eq!(Asset::Btc.to_string(), "BTC");
        assert_eq!(Asset::Eth.to_string(), "ETH");
    }

    #[rstest]
    #[case(Asset::Btc, dec!(500), false)]
    #[case(Asset::Btc, dec!(1000), false)]
    #[case(Asset::Btc, dec!(1000.01), true)]
    #[case(Asset::Btc, dec!(50000), true)]
    #[case(Asset::Btc, dec!(1000000), false)]
    #[case(Asset::Eth, dec!(10), false)]
    #[case(Asset::Eth, dec!(3000), true)]
    #[case(Asset::Eth, dec!(99999.99), true)]
    #[case(Asset::Eth, dec!(100000), false)]
    fn test_sanity_bounds_are_exclusive(
        #[case] asset: Asset,
        #[case] price: Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(asset.is_realistic_price(price), expected);
    }

    #[test]
    fn test_from_ticker_is_case_sensitive() {
        assert_eq!(Asset::from_ticker("BTC"), Some(Asset::Btc));
        assert_eq!(Asset::from_ticker("ETH"), Some(Asset::Eth));
        assert_eq!(Asset::from_ticker("btc"), None);
        assert_eq!(Asset::from_ticker("SOL"), None);
    }

    #[test]
    fn test_from_ticker_ignore_case() {
        assert_eq!(Asset::from_ticker_ignore_case(" btc "), Some(Asset::Btc));
        assert_eq!(Asset::from_ticker_ignore_case("Eth"), Some(Asset::Eth));
        assert_eq!(Asset::from_ticker_ignore_case("Bitcoin"), None);
    }
}
