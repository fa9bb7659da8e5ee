mod conf_get;
mod conf_set;

use {crate::prelude::*, conf_get::*, conf_set::*};

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ConfCommand {
    #[arg(
        long = "coingecko.base-url",
        help = "Set the CoinGecko API base URL",
        value_name = "URL"
    )]
    coingecko_base_url: Option<String>,
    #[arg(
        long = "coingecko.vs-currency",
        help = "Set the quote currency prices are fetched in",
        value_name = "CURRENCY"
    )]
    coingecko_vs_currency: Option<String>,
    #[arg(
        long = "notion.base-url",
        help = "Set the Notion API base URL",
        value_name = "URL"
    )]
    notion_base_url: Option<String>,
    #[arg(
        long = "notion.database-id",
        help = "Set the Notion database to update",
        value_name = "DATABASE_ID"
    )]
    notion_database_id: Option<String>,
    #[arg(
        long = "notion.match-mode",
        help = "Set how rows are matched to assets (ticker-select or name-title)",
        value_name = "MODE"
    )]
    notion_match_mode: Option<MatchMode>,
    #[arg(
        long = "notion.ticker-property",
        help = "Set the select property holding the ticker",
        value_name = "PROPERTY"
    )]
    notion_ticker_property: Option<String>,
    #[arg(
        long = "notion.title-property",
        help = "Set the title property used by the name-title match mode",
        value_name = "PROPERTY"
    )]
    notion_title_property: Option<String>,
    #[arg(
        long = "notion.price-property",
        help = "Set the number property receiving the price",
        value_name = "PROPERTY"
    )]
    notion_price_property: Option<String>,
    #[arg(
        long = "notion.last-updated-property",
        help = "Set the date property receiving the update time, empty to disable",
        value_name = "PROPERTY"
    )]
    notion_last_updated_property: Option<String>,
    #[arg(
        long = "notion.change-property",
        help = "Set the number property receiving the 24h change, empty to disable",
        value_name = "PROPERTY"
    )]
    notion_change_property: Option<String>,
    /// Hidden argument used for testing to set the path of the configuration
    /// file.
    #[arg(
        long = "conf-path",
        hide = true,
        default_value = CLI_CONF_PATH,
        value_parser = ValueParser::from(expand_tilde)
    )]
    conf_path: PathBuf,
}

impl ConfCommand {
    fn is_empty(&self) -> bool {
        self.coingecko_base_url.is_none()
            && self.coingecko_vs_currency.is_none()
            && self.notion_base_url.is_none()
            && self.notion_database_id.is_none()
            && self.notion_match_mode.is_none()
            && self.notion_ticker_property.is_none()
            && self.notion_title_property.is_none()
            && self.notion_price_property.is_none()
            && self.notion_last_updated_property.is_none()
            && self.notion_change_property.is_none()
    }
}

/// Handle the provided conf command. The [ConfCommand] instance is passed from
/// [crate::main].
pub(crate) async fn handle(command: ConfCommand) -> AnyResult<(), PriceSyncCliError> {
    // If all fields are None, we just want to display the current configuration.
    if command.is_empty() {
        return get_conf(command.conf_path).await.map(|_| ());
    }

    set_conf(command).await
}
