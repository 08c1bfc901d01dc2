//! Sluice CLI - shell-free deployer for live web roots
//!
//! Usage: sluice <COMMAND>
//!
//! Commands:
//!   deploy   Deploy a revision into the configured root
//!   backups  List backup snapshots
//!   config   Show the effective configuration

mod cli;
mod commands;

use clap::Parser;
use sluice::DeployError;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// Logs go to stderr; stdout carries the transcript.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sluice={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DeployError>())
        .map(DeployError::exit_code)
        .unwrap_or(1)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Deploy {
            repo,
            owner,
            name,
            reference,
            token,
            root,
            no_backup,
            no_prune,
            dry_run,
        } => commands::deploy::cmd_deploy(
            config_path,
            commands::deploy::DeployArgs {
                repo,
                owner,
                name,
                reference,
                token,
                root,
                no_backup,
                no_prune,
                dry_run,
            },
            cli.json,
            cli.verbose,
        ),
        Commands::Backups => commands::backups::cmd_backups(config_path, cli.json),
        Commands::Config => commands::config::cmd_config(config_path, cli.json),
    }
}
