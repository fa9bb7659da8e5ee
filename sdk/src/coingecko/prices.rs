use {
    crate::{
        coingecko::{
            CoinGeckoClient,
            CoinGeckoError,
            PingResponse,
            PriceQuote,
            PriceQuotes,
            PriceRequest,
            SimplePriceResponse,
        },
        Asset,
    },
    chrono::{DateTime, Utc},
    log::debug,
    rust_decimal::{prelude::ToPrimitive, Decimal},
    std::collections::BTreeMap,
};

/// Fetch quotes for all supported assets in a single request.
///
/// Fails closed: any transport error, non-success status, undecodable body,
/// missing asset or missing requested field is returned as an error and no
/// partial result is produced.
pub async fn fetch_prices(
    client: &CoinGeckoClient,
    request: &PriceRequest,
) -> Result<PriceQuotes, CoinGeckoError> {
    let ids = Asset::all()
        .map(|asset| asset.coingecko_id())
        .collect::<Vec<_>>()
        .join(",");

    let response = client
        .get::<SimplePriceResponse>("simple/price", &request.query(&ids))
        .await?;

    let quotes = decode_quotes(&response, request)?;

    debug!(
        "Fetched quotes in '{}': BTC {}, ETH {}",
        quotes.vs_currency, quotes.btc.price, quotes.eth.price
    );

    Ok(quotes)
}

/// Check that the API is reachable. Returns the message the API answers with.
pub async fn ping(client: &CoinGeckoClient) -> Result<String, CoinGeckoError> {
    let response = client.get::<PingResponse>("ping", &[]).await?;

    Ok(response.gecko_says)
}

/// Turn the raw payload into [`PriceQuotes`].
pub fn decode_quotes(
    response: &SimplePriceResponse,
    request: &PriceRequest,
) -> Result<PriceQuotes, CoinGeckoError> {
    Ok(PriceQuotes {
        vs_currency: request.vs_currency.clone(),
        btc: decode_quote(Asset::Btc, response, request)?,
        eth: decode_quote(Asset::Eth, response, request)?,
    })
}

fn decode_quote(
    asset: Asset,
    response: &SimplePriceResponse,
    request: &PriceRequest,
) -> Result<PriceQuote, CoinGeckoError> {
    let id = asset.coingecko_id();

    let fields = response
        .get(id)
        .ok_or_else(|| CoinGeckoError::MissingAsset(id.to_string()))?;

    let price = required(id, fields, &request.price_field())?;

    let change_24h = request
        .include_24h_change
        .then(|| required(id, fields, &request.change_field()))
        .transpose()?;

    let market_cap = request
        .include_market_cap
        .then(|| required(id, fields, &request.market_cap_field()))
        .transpose()?;

    let volume_24h = request
        .include_24h_vol
        .then(|| required(id, fields, &request.volume_field()))
        .transpose()?;

    let last_updated_at = request
        .include_last_updated_at
        .then(|| {
            let seconds = required(id, fields, "last_updated_at")?;

            to_datetime(seconds).ok_or_else(|| CoinGeckoError::InvalidField {
                asset: id.to_string(),
                field: "last_updated_at".to_string(),
            })
        })
        .transpose()?;

    Ok(PriceQuote {
        asset,
        price,
        change_24h,
        market_cap,
        volume_24h,
        last_updated_at,
    })
}

fn required(
    id: &str,
    fields: &BTreeMap<String, Decimal>,
    field: &str,
) -> Result<Decimal, CoinGeckoError> {
    fields
        .get(field)
        .copied()
        .ok_or_else(|| CoinGeckoError::MissingField {
            asset: id.to_string(),
            field: field.to_string(),
        })
}

fn to_datetime(seconds: Decimal) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds.trunc().to_i64()?, 0)
}
