pub(crate) use {
    crate::error::PriceSyncCliError,
    anyhow::{anyhow, Result as AnyResult},
    clap::{builder::ValueParser, Args, Parser, Subcommand},
    colored::Colorize,
    price_sync_sdk::reconcile::MatchMode,
    serde::{Deserialize, Serialize},
    std::{
        path::PathBuf,
        sync::atomic::{AtomicBool, Ordering},
    },
};

// Where to find config file.
pub(crate) const CLI_CONF_PATH: &str = "~/.price-sync/conf.toml";

/// Set by the global `--json` flag. Human readable output is suppressed and
/// commands print a JSON document instead.
pub(crate) static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Struct holding the config structure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CliConf {
    #[serde(default)]
    pub(crate) coingecko: CoinGeckoConf,
    #[serde(default)]
    pub(crate) notion: NotionConf,
}

impl CliConf {
    pub(crate) async fn load_from_path(path: &PathBuf) -> AnyResult<Self> {
        let conf = tokio::fs::read_to_string(path).await?;

        Ok(toml::from_str(&conf)?)
    }

    /// Like [`CliConf::load_from_path`] but a missing file yields the
    /// defaults. A file that exists and fails to parse is still an error.
    pub(crate) async fn load_or_default(path: &PathBuf) -> AnyResult<Self> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(Self::default());
        }

        Self::load_from_path(path).await
    }

    pub(crate) async fn save(&self, path: &PathBuf) -> AnyResult<()> {
        let conf = toml::to_string_pretty(&self)?;

        if let Some(parent_folder) = path.parent() {
            tokio::fs::create_dir_all(parent_folder).await?;
        }

        tokio::fs::write(path, conf).await?;

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CoinGeckoConf {
    pub(crate) base_url: String,
    pub(crate) vs_currency: String,
}

impl Default for CoinGeckoConf {
    fn default() -> Self {
        Self {
            base_url: price_sync_sdk::coingecko::COINGECKO_API_BASE.to_string(),
            vs_currency: price_sync_sdk::coingecko::DEFAULT_VS_CURRENCY.to_string(),
        }
    }
}

/// Notion settings. The integration token is deliberately not part of the
/// file, it comes from `NOTION_TOKEN` or `--notion-token`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NotionConf {
    pub(crate) base_url: String,
    pub(crate) database_id: Option<String>,
    pub(crate) match_mode: MatchMode,
    pub(crate) ticker_property: String,
    pub(crate) title_property: String,
    pub(crate) price_property: String,
    /// Empty disables writing the update time.
    pub(crate) last_updated_property: String,
    /// Empty disables writing the 24h change.
    pub(crate) change_property: String,
}

impl Default for NotionConf {
    fn default() -> Self {
        let defaults = price_sync_sdk::reconcile::ReconcileConf::default();

        Self {
            base_url: defaults.base_url,
            database_id: None,
            match_mode: defaults.match_mode,
            ticker_property: defaults.ticker_property,
            title_property: defaults.title_property,
            price_property: defaults.price_property,
            last_updated_property: defaults.last_updated_property.unwrap_or_default(),
            change_property: defaults.change_property.unwrap_or_default(),
        }
    }
}

// == Used by clap ==

/// Expands `~/` to the user's home directory in path arguments.
pub(crate) fn expand_tilde(path: &str) -> AnyResult<PathBuf> {
    if let Some(path) = path.strip_prefix("~/") {
        match home::home_dir() {
            Some(home) => return Ok(home.join(path)),
            None => return Err(anyhow!("Could not find home directory")),
        }
    }

    Ok(path.into())
}

/// Empty values unset optional string settings.
pub(crate) fn non_empty(value: String) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}
