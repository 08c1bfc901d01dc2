//! `sluice backups`

use std::path::Path;

use sluice::infrastructure::list_snapshots;

use super::load_config;

pub fn cmd_backups(config_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let backup_root = config.backup_root();
    let snapshots = list_snapshots(&backup_root)?;

    if json {
        for snapshot in &snapshots {
            println!(
                "{}",
                serde_json::json!({
                    "event": "snapshot",
                    "command": "backups",
                    "name": snapshot.name,
                    "path": snapshot.path.display().to_string(),
                    "overwritten": snapshot.overwritten,
                    "removed": snapshot.removed,
                })
            );
        }
        return Ok(());
    }

    if snapshots.is_empty() {
        println!("No backups in {}", backup_root.display());
        return Ok(());
    }
    println!("Backups in {}:", backup_root.display());
    for snapshot in &snapshots {
        println!(
            "  {}  {} overwritten, {} removed",
            snapshot.name, snapshot.overwritten, snapshot.removed
        );
    }
    Ok(())
}
