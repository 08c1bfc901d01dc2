//! `sluice config`

use std::path::Path;

use anyhow::Context;

use super::load_config;

pub fn cmd_config(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?.redacted();

    if json {
        let value = serde_json::to_string_pretty(&config).context("failed to encode config")?;
        println!("{value}");
    } else {
        let value = toml::to_string_pretty(&config).context("failed to encode config")?;
        print!("{value}");
    }
    Ok(())
}
