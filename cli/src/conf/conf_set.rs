use crate::{command_title, conf::ConfCommand, display::json_output, loading, prelude::*};

/// Set the Price Sync CLI configuration from the provided arguments.
pub(crate) async fn set_conf(
    ConfCommand {
        coingecko_base_url,
        coingecko_vs_currency,
        notion_base_url,
        notion_database_id,
        notion_match_mode,
        notion_ticker_property,
        notion_title_property,
        notion_price_property,
        notion_last_updated_property,
        notion_change_property,
        conf_path,
    }: ConfCommand,
) -> AnyResult<(), PriceSyncCliError> {
    let mut conf = CliConf::load_from_path(&conf_path)
        .await
        .unwrap_or_default();

    command_title!("Updating Price Sync CLI Configuration");

    let conf_handle = loading!("Updating configuration...");

    conf.coingecko.base_url = coingecko_base_url.unwrap_or(conf.coingecko.base_url);
    conf.coingecko.vs_currency = coingecko_vs_currency
        .map(|currency| currency.to_lowercase())
        .unwrap_or(conf.coingecko.vs_currency);
    conf.notion.base_url = notion_base_url.unwrap_or(conf.notion.base_url);
    conf.notion.database_id = match notion_database_id {
        Some(database_id) => non_empty(database_id),
        None => conf.notion.database_id,
    };
    conf.notion.match_mode = notion_match_mode.unwrap_or(conf.notion.match_mode);
    conf.notion.ticker_property = notion_ticker_property.unwrap_or(conf.notion.ticker_property);
    conf.notion.title_property = notion_title_property.unwrap_or(conf.notion.title_property);
    conf.notion.price_property = notion_price_property.unwrap_or(conf.notion.price_property);
    conf.notion.last_updated_property =
        notion_last_updated_property.unwrap_or(conf.notion.last_updated_property);
    conf.notion.change_property = notion_change_property.unwrap_or(conf.notion.change_property);

    match conf.save(&conf_path).await {
        Ok(()) => {
            conf_handle.success();

            json_output(&conf)
        }
        Err(e) => {
            conf_handle.error();

            Err(PriceSyncCliError::Any(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches};

    #[tokio::test]
    async fn test_conf_loads_and_saves() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join(".price-sync/conf.toml");

        assert!(!tokio::fs::try_exists(&path).await.unwrap());

        let command = ConfCommand {
            coingecko_vs_currency: Some("USD".to_string()),
            notion_database_id: Some("db-1".to_string()),
            notion_match_mode: Some(MatchMode::NameTitle),
            notion_change_property: Some("24h change".to_string()),
            conf_path: path.clone(),
            ..Default::default()
        };

        // Command saves values.
        let result = set_conf(command).await;

        assert_matches!(result, Ok(()));

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let conf = toml::from_str::<CliConf>(&contents).unwrap();

        assert_eq!(conf.coingecko.vs_currency, "usd");
        assert_eq!(conf.notion.database_id.as_deref(), Some("db-1"));
        assert_eq!(conf.notion.match_mode, MatchMode::NameTitle);
        assert_eq!(conf.notion.change_property, "24h change");
        assert_eq!(conf.notion.last_updated_property, "Last updated");

        // Overriding one value will save that one value and leave other values intact.
        let command = ConfCommand {
            notion_last_updated_property: Some(String::new()),
            conf_path: path.clone(),
            ..Default::default()
        };

        let result = set_conf(command).await;

        assert_matches!(result, Ok(()));

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let conf = toml::from_str::<CliConf>(&contents).unwrap();

        assert_eq!(conf.notion.last_updated_property, "");
        assert_eq!(conf.notion.change_property, "24h change");
        assert_eq!(conf.coingecko.vs_currency, "usd");
        assert_eq!(conf.notion.database_id.as_deref(), Some("db-1"));
        assert_eq!(conf.notion.match_mode, MatchMode::NameTitle);
    }
}
