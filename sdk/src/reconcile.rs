//! Reconciliation of Notion database rows with freshly fetched quotes.
//!
//! The routine is strictly sequential: check configuration, validate the
//! prices, collect every matching row across all result pages, then update
//! the rows one at a time. Updates are not transactional, a failure stops
//! the run but keeps whatever was written before it.

use {
    crate::{
        coingecko::{PriceQuote, PriceQuotes},
        notion::{Filter, NotionClient, NotionError, Page, PropertyUpdate, NOTION_API_BASE},
        Asset,
    },
    chrono::Utc,
    log::{debug, info, warn},
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
    strum::{Display, EnumString},
    thiserror::Error,
};

pub const DEFAULT_TICKER_PROPERTY: &str = "Ticker";
pub const DEFAULT_TITLE_PROPERTY: &str = "Name";
pub const DEFAULT_PRICE_PROPERTY: &str = "Price today";
pub const DEFAULT_LAST_UPDATED_PROPERTY: &str = "Last updated";

/// How a row is recognized as belonging to an asset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MatchMode {
    /// Select-typed ticker property, exact and case-sensitive. Filtering
    /// happens server side.
    #[default]
    TickerSelect,
    /// Title-typed name property, trimmed and case-insensitive. Notion cannot
    /// filter on that so every row is fetched and matched locally.
    NameTitle,
}

/// Everything the reconciler needs, built once by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcileConf {
    pub base_url: String,
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub match_mode: MatchMode,
    pub ticker_property: String,
    pub title_property: String,
    pub price_property: String,
    /// Date property set to the time of the run, skipped when `None`.
    pub last_updated_property: Option<String>,
    /// Number property receiving the 24h change, skipped when `None`.
    pub change_property: Option<String>,
    /// Resolve and count the updates without sending them.
    pub dry_run: bool,
}

impl Default for ReconcileConf {
    fn default() -> Self {
        Self {
            base_url: NOTION_API_BASE.to_string(),
            token: None,
            database_id: None,
            match_mode: MatchMode::default(),
            ticker_property: DEFAULT_TICKER_PROPERTY.to_string(),
            title_property: DEFAULT_TITLE_PROPERTY.to_string(),
            price_property: DEFAULT_PRICE_PROPERTY.to_string(),
            last_updated_property: Some(DEFAULT_LAST_UPDATED_PROPERTY.to_string()),
            change_property: None,
            dry_run: false,
        }
    }
}

impl ReconcileConf {
    /// Both the token and the database id, or the names of whichever is
    /// missing. Empty values count as missing.
    pub fn credentials(&self) -> Result<(&str, &str), ReconcileError> {
        match (non_empty(&self.token), non_empty(&self.database_id)) {
            (Some(token), Some(database_id)) => Ok((token, database_id)),
            (token, database_id) => {
                let mut missing = vec![];

                if token.is_none() {
                    missing.push("Notion token");
                }

                if database_id.is_none() {
                    missing.push("Notion database id");
                }

                Err(ReconcileError::MissingConfig(missing.join(", ")))
            }
        }
    }

    /// Server side filter for the configured match mode.
    pub fn filter(&self) -> Option<Filter> {
        match self.match_mode {
            MatchMode::TickerSelect => Some(Filter::or(
                Asset::all()
                    .map(|asset| Filter::select_equals(&self.ticker_property, asset.ticker()))
                    .collect(),
            )),
            MatchMode::NameTitle => None,
        }
    }

    /// Which asset, if any, the row belongs to.
    pub fn match_asset(&self, page: &Page) -> Option<Asset> {
        match self.match_mode {
            MatchMode::TickerSelect => page
                .property(&self.ticker_property)
                .and_then(|value| value.select_name())
                .and_then(Asset::from_ticker),
            MatchMode::NameTitle => page
                .property(&self.title_property)
                .and_then(|value| value.title_text())
                .and_then(|text| Asset::from_ticker_ignore_case(&text)),
        }
    }

    /// Properties written to a row of the quote's asset.
    pub fn update_properties(
        &self,
        quote: &PriceQuote,
        timestamp: &str,
    ) -> BTreeMap<String, PropertyUpdate> {
        let mut properties = BTreeMap::new();

        properties.insert(
            self.price_property.clone(),
            PropertyUpdate::Number(quote.price),
        );

        if let Some(property) = &self.last_updated_property {
            properties.insert(property.clone(), PropertyUpdate::date(timestamp));
        }

        if let (Some(property), Some(change)) = (&self.change_property, quote.change_24h) {
            properties.insert(property.clone(), PropertyUpdate::Number(change));
        }

        properties
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub btc_updated: usize,
    pub eth_updated: usize,
    /// Rows returned by the query that matched no asset.
    pub skipped: usize,
    /// Number of query requests it took to exhaust the results.
    pub pages_fetched: usize,
    pub dry_run: bool,
}

impl ReconcileReport {
    pub fn updated(&self, asset: Asset) -> usize {
        match asset {
            Asset::Btc => self.btc_updated,
            Asset::Eth => self.eth_updated,
        }
    }

    pub fn total_updated(&self) -> usize {
        self.btc_updated + self.eth_updated
    }

    fn record(&mut self, asset: Asset) {
        match asset {
            Asset::Btc => self.btc_updated += 1,
            Asset::Eth => self.eth_updated += 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error(
        "{asset} price {price} seems unrealistic (expected between {lower} and {upper}), skipping update"
    )]
    UnrealisticPrice {
        asset: Asset,
        price: Decimal,
        lower: Decimal,
        upper: Decimal,
    },

    #[error("Failed to query the database: {source}")]
    Query { source: NotionError },

    #[error("Failed to update page '{page_id}' after {updated} successful update(s): {source}")]
    Update {
        page_id: String,
        updated: usize,
        source: NotionError,
    },
}

/// Reject the whole batch as soon as one price falls outside its bounds.
pub fn validate_prices(quotes: &PriceQuotes) -> Result<(), ReconcileError> {
    for quote in quotes.iter() {
        if !quote.asset.is_realistic_price(quote.price) {
            let (lower, upper) = quote.asset.sanity_bounds();

            warn!("Rejecting {} price {}", quote.asset, quote.price);

            return Err(ReconcileError::UnrealisticPrice {
                asset: quote.asset,
                price: quote.price,
                lower,
                upper,
            });
        }
    }

    Ok(())
}

/// Write the fetched prices into every matching row of the database.
pub async fn reconcile(
    conf: &ReconcileConf,
    quotes: &PriceQuotes,
) -> Result<ReconcileReport, ReconcileError> {
    let (token, database_id) = conf.credentials()?;

    validate_prices(quotes)?;

    let client = NotionClient::builder(token)
        .with_base_url(&conf.base_url)
        .build();

    let (rows, pages_fetched) = query_all(&client, database_id, conf.filter().as_ref())
        .await
        .map_err(|source| ReconcileError::Query { source })?;

    debug!("Collected {} row(s) over {pages_fetched} page(s)", rows.len());

    let timestamp = Utc::now().to_rfc3339();

    let mut report = ReconcileReport {
        pages_fetched,
        dry_run: conf.dry_run,
        ..Default::default()
    };

    for row in &rows {
        let Some(asset) = conf.match_asset(row) else {
            report.skipped += 1;

            continue;
        };

        let quote = quotes.get(asset);

        if !conf.dry_run {
            let properties = conf.update_properties(quote, &timestamp);

            client
                .update_page(&row.id, &properties)
                .await
                .map_err(|source| ReconcileError::Update {
                    page_id: row.id.clone(),
                    updated: report.total_updated(),
                    source,
                })?;
        }

        info!("Set {asset} row '{}' to {}", row.id, quote.price);

        report.record(asset);
    }

    Ok(report)
}

/// Follow `has_more`/`next_cursor` until the results are exhausted. Returns
/// every row and the number of requests made.
async fn query_all(
    client: &NotionClient,
    database_id: &str,
    filter: Option<&Filter>,
) -> Result<(Vec<Page>, usize), NotionError> {
    let mut rows = vec![];
    let mut cursor: Option<String> = None;
    let mut requests = 0;

    loop {
        let response = client
            .query_database(database_id, filter, cursor.as_deref())
            .await?;

        requests += 1;
        rows.extend(response.results);

        match (response.has_more, response.next_cursor) {
            (true, Some(next)) => cursor = Some(next),
            (true, None) => return Err(NotionError::MissingCursor),
            (false, _) => break,
        }
    }

    Ok((rows, requests))
}
