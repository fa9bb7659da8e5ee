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
    price_sync_sdk::coingecko::{fetch_prices, ping, CoinGeckoClient, PriceQuotes, PriceRequest},
    rust_decimal::Decimal,
};

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct CheckCommand {
    #[arg(
        long = "vs-currency",
        help = "Quote currency, overrides the configuration",
        value_name = "CURRENCY"
    )]
    pub(crate) vs_currency: Option<String>,
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

#[derive(Debug, Default, Serialize)]
pub(crate) struct CheckOutput {
    pub(crate) quotes: Option<PriceQuotes>,
    pub(crate) ping: Option<String>,
    pub(crate) errors: Vec<String>,
}

/// Handle the provided check command. API failures are reported, they do not
/// fail the process.
pub(crate) async fn handle(command: CheckCommand) -> AnyResult<(), PriceSyncCliError> {
    let conf = CliConf::load_or_default(&command.conf_path)
        .await
        .map_err(PriceSyncCliError::Any)?;

    let output = check_api(&conf.coingecko, command.vs_currency).await;

    json_output(&output)
}

/// Fetch quotes with every optional field and ping the API.
pub(crate) async fn check_api(conf: &CoinGeckoConf, vs_currency: Option<String>) -> CheckOutput {
    let mut output = CheckOutput::default();

    command_title!("Testing CoinGecko API at '{}'", conf.base_url);

    let client = CoinGeckoClient::new(Some(&conf.base_url));
    let request = PriceRequest::detailed(vs_currency.unwrap_or_else(|| conf.vs_currency.clone()));

    let quotes_handle = loading!("Fetching detailed quotes...");

    match fetch_prices(&client, &request).await {
        Ok(quotes) => {
            quotes_handle.success();

            let currency = quotes.vs_currency.to_uppercase();

            for quote in quotes.iter() {
                notify_success!("{} ({})", quote.asset.name().bold(), quote.asset);

                item!("Price: {:.2} {currency}", quote.price);
                item!("24h Change: {}", format_optional(quote.change_24h, 2, "%"));
                item!(
                    "Market Cap: {}",
                    format_optional(quote.market_cap, 0, &format!(" {currency}"))
                );
                item!(
                    "24h Volume: {}",
                    format_optional(quote.volume_24h, 0, &format!(" {currency}"))
                );
                item!(
                    "Last Updated: {}",
                    quote
                        .last_updated_at
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "n/a".to_string())
                );
            }

            output.quotes = Some(quotes);
        }
        Err(e) => {
            quotes_handle.error();

            let error = format!("Error testing API: {e}");

            notify_error!("{error}");
            output.errors.push(error);
        }
    }

    let ping_handle = loading!("Testing API health...");

    match ping(&client).await {
        Ok(message) => {
            ping_handle.success();

            item!("Ping response: {message}");

            output.ping = Some(message);
        }
        Err(e) => {
            ping_handle.error();

            let error = format!("Ping failed: {e}");

            notify_error!("{error}");
            output.errors.push(error);
        }
    }

    output
}

fn format_optional(value: Option<Decimal>, dp: u32, suffix: &str) -> String {
    match value {
        Some(value) => format!("{}{suffix}", value.round_dp(dp)),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        mockito::{Matcher, Server},
        rust_decimal_macros::dec,
        serde_json::json,
    };

    #[tokio::test]
    async fn test_check_api() {
        let mut server = Server::new_async().await;

        let prices = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("vs_currencies".into(), "usd".into()),
                Matcher::UrlEncoded("include_24hr_vol".into(), "true".into()),
                Matcher::UrlEncoded("include_last_updated_at".into(), "true".into()),
            ]))
            .with_status(200)
            .with_body(
                json!({
                    "bitcoin": {
                        "usd": 60000.0, "usd_24h_change": 1.0, "usd_market_cap": 2.0,
                        "usd_24h_vol": 3.0, "last_updated_at": 1700000000
                    },
                    "ethereum": {
                        "usd": 3500.0, "usd_24h_change": 1.0, "usd_market_cap": 2.0,
                        "usd_24h_vol": 3.0, "last_updated_at": 1700000000
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let health = server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body(json!({ "gecko_says": "(V3) To the Moon!" }).to_string())
            .create_async()
            .await;

        let conf = CoinGeckoConf {
            base_url: server.url(),
            ..Default::default()
        };

        let output = check_api(&conf, Some("USD".to_string())).await;

        assert!(output.errors.is_empty());
        assert_eq!(output.ping.as_deref(), Some("(V3) To the Moon!"));

        let quotes = output.quotes.expect("Quotes expected");
        assert_eq!(quotes.btc.price, dec!(60000));
        assert_eq!(quotes.eth.volume_24h, Some(dec!(3)));

        prices.assert_async().await;
        health.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_api_collects_errors() {
        let mut server = Server::new_async().await;

        let prices = server
            .mock("GET", "/simple/price")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let health = server
            .mock("GET", "/ping")
            .with_status(503)
            .create_async()
            .await;

        let conf = CoinGeckoConf {
            base_url: server.url(),
            ..Default::default()
        };

        let output = check_api(&conf, None).await;

        assert!(output.quotes.is_none());
        assert!(output.ping.is_none());
        assert_eq!(output.errors.len(), 2);

        prices.assert_async().await;
        health.assert_async().await;
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(dec!(1234.5678)), 0, " EUR"), "1235 EUR");
        assert_eq!(format_optional(Some(dec!(-1.234)), 2, "%"), "-1.23%");
        assert_eq!(format_optional(None, 2, "%"), "n/a");
    }
}
