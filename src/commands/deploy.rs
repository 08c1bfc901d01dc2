//! `sluice deploy`

use std::path::{Path, PathBuf};

use sluice::presentation::factory;
use sluice::{DeployReport, DeployRequest};

use super::load_config;

/// Flags of the deploy subcommand
#[derive(Debug, Default)]
pub struct DeployArgs {
    pub repo: Option<String>,
    pub owner: Option<String>,
    pub name: Option<String>,
    pub reference: Option<String>,
    pub token: Option<String>,
    pub root: Option<PathBuf>,
    pub no_backup: bool,
    pub no_prune: bool,
    pub dry_run: bool,
}

pub fn cmd_deploy(
    config_path: Option<&Path>,
    args: DeployArgs,
    json: bool,
    verbose: u8,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(root) = args.root {
        config.root = root;
    }
    if args.no_backup {
        config.backup.enabled = false;
    }
    if args.no_prune {
        config.prune.enabled = false;
    }

    let request = DeployRequest::new()
        .with_repo_key(args.repo)
        .with_owner(args.owner)
        .with_repo(args.name)
        .with_reference(args.reference)
        .with_token(args.token)
        .with_dry_run(args.dry_run);

    let use_case = factory::create_deploy_use_case(config);
    let sink = factory::create_event_sink(json, verbose);
    let report = use_case.execute_with_events(&request, sink)?;

    if report.dry_run && !json {
        print_dry_run(&report);
    }
    Ok(())
}

fn print_dry_run(report: &DeployReport) {
    println!();
    println!("Planned ({} entries):", report.planned.len());
    for entry in &report.planned {
        println!("  {:?} {}", entry.action, entry.relative_path);
    }
    if !report.prune_candidates.is_empty() {
        println!("Would prune ({} entries):", report.prune_candidates.len());
        for path in &report.prune_candidates {
            println!("  {path}");
        }
    }
}
