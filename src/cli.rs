use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sluice - deploy a GitHub revision into a live web root without a shell
#[derive(Parser, Debug)]
#[command(name = "sluice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of the progress transcript
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./sluice.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a revision into the configured root
    Deploy {
        /// Key of an alternate repository in the [repos] table
        #[arg(long, value_name = "KEY")]
        repo: Option<String>,

        /// Override the repository owner
        #[arg(long)]
        owner: Option<String>,

        /// Override the repository name
        #[arg(long)]
        name: Option<String>,

        /// Branch, tag, or full commit SHA to deploy
        #[arg(long = "ref", value_name = "REF")]
        reference: Option<String>,

        /// Shared deploy secret
        #[arg(long, env = "SLUICE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Override the target root
        #[arg(long)]
        root: Option<PathBuf>,

        /// Do not keep pre-images of overwritten or removed files
        #[arg(long)]
        no_backup: bool,

        /// Keep target files that are no longer in the repository
        #[arg(long)]
        no_prune: bool,

        /// Plan only; the target is not modified
        #[arg(long)]
        dry_run: bool,
    },

    /// List backup snapshots, newest first
    Backups,

    /// Show the effective configuration with secrets redacted
    Config,
}
