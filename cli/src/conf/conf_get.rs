use crate::{command_title, display::json_output, prelude::*};

/// Print the current Price Sync CLI configuration. Defaults are shown when no
/// configuration file exists yet.
pub(crate) async fn get_conf(conf_path: PathBuf) -> AnyResult<CliConf, PriceSyncCliError> {
    command_title!("Current Price Sync CLI Configuration");

    let conf = CliConf::load_or_default(&conf_path).await.map_err(|e| {
        PriceSyncCliError::Any(anyhow!(
            "Failed to load Price Sync CLI configuration from {}: {}",
            conf_path.display(),
            e
        ))
    })?;

    if !JSON_MODE.load(Ordering::Relaxed) {
        println!("{:#?}", conf);
    }

    json_output(&conf)?;

    Ok(conf)
}
