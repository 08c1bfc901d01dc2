//! Subcommand entry points

pub mod backups;
pub mod config;
pub mod deploy;

use std::path::Path;

use sluice::{Config, ConfigWarning, DeployError};

/// Load the config file (or defaults) and apply `SLUICE_*` overrides.
///
/// Unknown keys are reported on stderr and otherwise ignored.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let (config, warnings) = Config::load_or_default(explicit).map_err(DeployError::from)?;
    print_config_warnings(&warnings);
    Ok(config.with_env_overrides())
}

fn print_config_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        match w.line {
            Some(line) => eprintln!(
                "warning: unknown config key '{}' in {}:{}",
                w.key,
                w.file.display(),
                line
            ),
            None => eprintln!(
                "warning: unknown config key '{}' in {}",
                w.key,
                w.file.display()
            ),
        }
        if let Some(suggestion) = &w.suggestion {
            eprintln!("   did you mean '{}'?", suggestion);
        }
    }
}
