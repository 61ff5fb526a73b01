//! CLI argument parsing with clap

use std::path::PathBuf;

use camino::Utf8PathBuf;
use clap::{Args, Parser};

/// cf-update - Update the Cloud Foundry CLI in place
#[derive(Parser, Debug)]
#[command(name = "cf-update")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors in the log
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub update: UpdateArgs,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Check for updates only
    #[arg(long)]
    pub check: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Update this cf binary instead of the one found on PATH
    #[arg(long, value_name = "PATH")]
    pub cf_path: Option<PathBuf>,

    /// Version reported by --cf-path, skips running `cf -v`
    #[arg(long, value_name = "VERSION", requires = "cf_path")]
    pub cf_version: Option<String>,

    /// Install this version instead of the latest release
    #[arg(long, value_name = "VERSION")]
    pub target_version: Option<String>,

    /// Restore the previous binary if the new one cannot be moved into place
    #[arg(long)]
    pub rollback: bool,

    /// Directory holding config.yaml (default: ~/.cf-update)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<Utf8PathBuf>,
}
