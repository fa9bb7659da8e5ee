use {
    crate::{
        command_title,
        display::json_output,
        item,
        loading,
        notify_error,
        notify_success,
        prelude::*,
    },
    chrono::Local,
    price_sync_sdk::{
        coingecko::{
            fetch_prices,
            CoinGeckoClient,
            CoinGeckoErrorKind,
            PriceQuotes,
            PriceRequest,
        },
        reconcile::{reconcile, ReconcileConf, ReconcileReport},
        Asset,
    },
    rust_decimal::Decimal,
};

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct UpdateCommand {
    #[arg(
        long = "dry-run",
        help = "Resolve the rows to update without writing anything"
    )]
    pub(crate) dry_run: bool,
    #[arg(
        long = "vs-currency",
        help = "Quote currency, overrides the configuration",
        value_name = "CURRENCY"
    )]
    pub(crate) vs_currency: Option<String>,
    #[arg(
        long = "match-mode",
        help = "How rows are matched to assets (ticker-select or name-title)",
        value_name = "MODE"
    )]
    pub(crate) match_mode: Option<MatchMode>,
    #[arg(
        long = "notion-token",
        env = "NOTION_TOKEN",
        hide_env_values = true,
        help = "Notion integration token",
        value_name = "TOKEN"
    )]
    pub(crate) notion_token: Option<String>,
    #[arg(
        long = "notion-database-id",
        env = "NOTION_DATABASE_ID",
        help = "Notion database to update, overrides the configuration",
        value_name = "DATABASE_ID"
    )]
    pub(crate) notion_database_id: Option<String>,
    /// Hidden argument used for testing to set the path of the configuration
    /// file.
    #[arg(
        long = "conf-path",
        hide = true,
        default_value = CLI_CONF_PATH,
        value_parser = ValueParser::from(expand_tilde)
    )]
    pub(crate) conf_path: PathBuf,
}

/// Everything a run produced. Printed as a whole in JSON mode.
#[derive(Debug, Default, Serialize)]
pub(crate) struct UpdateOutput {
    pub(crate) quotes: Option<PriceQuotes>,
    pub(crate) report: Option<ReconcileReport>,
    pub(crate) error: Option<String>,
    /// Set when the price fetch failed.
    pub(crate) error_kind: Option<CoinGeckoErrorKind>,
}

/// Handle the provided update command. Failures of the run itself are
/// reported to the user and do not fail the process.
pub(crate) async fn handle(command: UpdateCommand) -> AnyResult<(), PriceSyncCliError> {
    let output = update_prices(command).await;

    json_output(&output)
}

/// Fetch current quotes and reconcile the Notion database with them.
pub(crate) async fn update_prices(
    UpdateCommand {
        dry_run,
        vs_currency,
        match_mode,
        notion_token,
        notion_database_id,
        conf_path,
    }: UpdateCommand,
) -> UpdateOutput {
    let mut output = UpdateOutput::default();

    command_title!(
        "Starting crypto price update at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let conf = match CliConf::load_or_default(&conf_path).await {
        Ok(conf) => conf,
        Err(e) => {
            let error = format!(
                "Failed to load configuration from {}: {e}",
                conf_path.display()
            );

            notify_error!("{error}");
            output.error = Some(error);

            return output;
        }
    };

    // == Fetch ==

    let request = PriceRequest::new(vs_currency.unwrap_or(conf.coingecko.vs_currency));
    let client = CoinGeckoClient::new(Some(&conf.coingecko.base_url));

    let fetch_handle = loading!("Fetching prices from CoinGecko...");

    let quotes = match fetch_prices(&client, &request).await {
        Ok(quotes) => {
            fetch_handle.success();

            quotes
        }
        Err(e) => {
            fetch_handle.error();

            let error = format!("Failed to fetch crypto prices: {e}");

            notify_error!("{error}");

            if e.kind() == CoinGeckoErrorKind::RateLimit {
                item!("CoinGecko rate limit reached, try again in a minute");
            }

            output.error = Some(error);
            output.error_kind = Some(e.kind());

            return output;
        }
    };

    let currency = quotes.vs_currency.to_uppercase();

    for quote in quotes.iter() {
        item!(
            "{name}: {price:.2} {currency} ({change})",
            name = quote.asset.name(),
            price = quote.price,
            change = format_change(quote.change_24h),
        );
    }

    // == Reconcile ==

    let reconcile_conf = ReconcileConf {
        base_url: conf.notion.base_url,
        token: notion_token,
        database_id: notion_database_id.or(conf.notion.database_id),
        match_mode: match_mode.unwrap_or(conf.notion.match_mode),
        ticker_property: conf.notion.ticker_property,
        title_property: conf.notion.title_property,
        price_property: conf.notion.price_property,
        last_updated_property: non_empty(conf.notion.last_updated_property),
        change_property: non_empty(conf.notion.change_property),
        dry_run,
    };

    let reconcile_handle = loading!("Updating Notion database...");

    match reconcile(&reconcile_conf, &quotes).await {
        Ok(report) => {
            reconcile_handle.success();

            let verb = if report.dry_run { "Would update" } else { "Updated" };

            for asset in Asset::all() {
                let count = report.updated(asset);

                if count > 0 {
                    notify_success!(
                        "{verb} {count} {name} entries with price: {price:.2} {currency}",
                        name = asset.name(),
                        price = quotes.price(asset),
                    );
                }
            }

            if report.total_updated() == 0 {
                item!("No matching rows found in the database");
            }

            notify_success!("Update completed successfully!");

            output.report = Some(report);
        }
        Err(e) => {
            reconcile_handle.error();

            let error = format!("Error updating Notion database: {e}");

            notify_error!("{error}");
            output.error = Some(error);
        }
    }

    output.quotes = Some(quotes);

    output
}

fn format_change(change: Option<Decimal>) -> String {
    match change {
        Some(change) => format!("{change:.2}%"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        mockito::{Matcher, Server, ServerGuard},
        rust_decimal_macros::dec,
        serde_json::json,
    };

    async fn write_conf(server: &ServerGuard, dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("conf.toml");

        let conf = CliConf {
            coingecko: CoinGeckoConf {
                base_url: server.url(),
                vs_currency: "eur".to_string(),
            },
            notion: NotionConf {
                base_url: server.url(),
                database_id: Some("db-1".to_string()),
                ..Default::default()
            },
        };

        conf.save(&path).await.unwrap();

        path
    }

    async fn mock_prices(server: &mut ServerGuard, btc: f64) -> mockito::Mock {
        server
            .mock("GET", "/simple/price")
            .match_query(Matcher::UrlEncoded("vs_currencies".into(), "eur".into()))
            .with_status(200)
            .with_body(
                json!({
                    "bitcoin": { "eur": btc, "eur_24h_change": 1.5, "eur_market_cap": 1.0 },
                    "ethereum": { "eur": 3000.0, "eur_24h_change": -0.5, "eur_market_cap": 1.0 }
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_update_prices_end_to_end() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let conf_path = write_conf(&server, &dir).await;

        let prices = mock_prices(&mut server, 50000.0).await;

        let query = server
            .mock("POST", "/v1/databases/db-1/query")
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .with_body(
                json!({
                    "object": "list",
                    "results": [
                        { "id": "btc-row", "properties": { "Ticker": { "type": "select", "select": { "name": "BTC" } } } }
                    ],
                    "has_more": false,
                    "next_cursor": null
                })
                .to_string(),
            )
            .create_async()
            .await;

        let update = server
            .mock("PATCH", "/v1/pages/btc-row")
            .match_body(Matcher::PartialJson(json!({
                "properties": { "Price today": { "number": 50000.0 } }
            })))
            .with_status(200)
            .with_body(json!({ "id": "btc-row", "properties": {} }).to_string())
            .expect(1)
            .create_async()
            .await;

        let output = update_prices(UpdateCommand {
            notion_token: Some("token".to_string()),
            conf_path,
            ..Default::default()
        })
        .await;

        assert_eq!(output.error, None);
        assert_eq!(output.error_kind, None);
        assert_eq!(output.quotes.map(|q| q.btc.price), Some(dec!(50000)));
        assert_eq!(output.report.map(|r| (r.btc_updated, r.eth_updated)), Some((1, 0)));

        prices.assert_async().await;
        query.assert_async().await;
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_database() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let conf_path = write_conf(&server, &dir).await;

        let prices = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let notion = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let output = update_prices(UpdateCommand {
            notion_token: Some("token".to_string()),
            conf_path,
            ..Default::default()
        })
        .await;

        assert!(output.quotes.is_none());
        assert!(output.report.is_none());
        assert_eq!(output.error_kind, Some(CoinGeckoErrorKind::Server));
        assert!(output
            .error
            .unwrap()
            .starts_with("Failed to fetch crypto prices"));

        prices.assert_async().await;
        notion.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limited_fetch_reports_kind() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let conf_path = write_conf(&server, &dir).await;

        let prices = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("Too Many Requests")
            .create_async()
            .await;

        let output = update_prices(UpdateCommand {
            notion_token: Some("token".to_string()),
            conf_path,
            ..Default::default()
        })
        .await;

        assert_eq!(output.error_kind, Some(CoinGeckoErrorKind::RateLimit));
        assert!(output.report.is_none());

        prices.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_token_is_reported() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let conf_path = write_conf(&server, &dir).await;

        let prices = mock_prices(&mut server, 50000.0).await;

        let notion = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let output = update_prices(UpdateCommand {
            conf_path,
            ..Default::default()
        })
        .await;

        assert!(output.quotes.is_some());
        assert!(output.report.is_none());
        assert!(output.error.unwrap().contains("Missing configuration"));

        prices.assert_async().await;
        notion.assert_async().await;
    }

    #[tokio::test]
    async fn test_unrealistic_price_is_reported() {
        let mut server = Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let conf_path = write_conf(&server, &dir).await;

        let prices = mock_prices(&mut server, 500.0).await;

        let notion = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let output = update_prices(UpdateCommand {
            notion_token: Some("token".to_string()),
            conf_path,
            ..Default::default()
        })
        .await;

        assert!(output.error.unwrap().contains("unrealistic"));

        prices.assert_async().await;
        notion.assert_async().await;
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(dec!(-2.45))), "-2.45%");
        assert_eq!(format_change(None), "n/a");
    }
}
