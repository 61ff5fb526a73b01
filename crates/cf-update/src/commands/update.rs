//! Update command
//!
//! Detects the installed cf, compares it with the latest release and, after
//! confirmation, stages the new binary beside the live one and swaps it in.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use cf_update_core::{
    read_binary_version, CfContext, ConfigLoader, HostContext, RuntimeConfig, StaticContext,
};
use cf_update_installer::{BarProgress, BinaryPaths, Installer, LatestRelease, Replacement};
use dialoguer::Confirm;
use semver::Version;
use tracing::debug;

use crate::cli::UpdateArgs;
use crate::output;

pub async fn run(args: UpdateArgs) -> Result<()> {
    let config = load_config(&args)?;
    let context = host_context(&args)?;

    update(context.as_ref(), &config, &args).await
}

/// Load configuration, letting command-line flags win
fn load_config(args: &UpdateArgs) -> Result<RuntimeConfig> {
    let loader = match &args.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir.clone()),
        None => ConfigLoader::new()?,
    };

    let mut config = loader
        .load()
        .with_context(|| format!("Failed to load configuration from {}", loader.config_dir()))?;

    if args.rollback {
        config.update.rollback_on_swap_failure = true;
    }

    Ok(config)
}

fn host_context(args: &UpdateArgs) -> Result<Box<dyn HostContext>> {
    let context: Box<dyn HostContext> = match (&args.cf_path, &args.cf_version) {
        (Some(path), Some(version)) => Box::new(StaticContext::new(path, version)),
        (Some(path), None) => Box::new(CfContext::at(path)?),
        (None, _) => Box::new(CfContext::detect()?),
    };

    debug!("cf path to update: {}", context.executable_path().display());
    Ok(context)
}

/// Run one update attempt against the given host context
pub async fn update(
    context: &dyn HostContext,
    config: &RuntimeConfig,
    args: &UpdateArgs,
) -> Result<()> {
    let current = context.version();

    let target = match &args.target_version {
        Some(version) => {
            let target = parse_version(version)?;
            output::info(&format!(
                "Target version v{} (installed v{})",
                target, current
            ));
            target
        }
        None => match newer_release(config, current).await? {
            Some(latest) => latest,
            None => return Ok(()),
        },
    };

    if args.check {
        output::info("Run 'cf-update' to install the update");
        return Ok(());
    }

    if !args.yes {
        let proceed = Confirm::new()
            .with_prompt("Do you want to update?")
            .default(true)
            .interact()?;

        if !proceed {
            output::info("Update cancelled");
            return Ok(());
        }
    }

    install(context.executable_path(), &target.to_string(), config).await
}

/// Latest release when it is newer than `current`
async fn newer_release(config: &RuntimeConfig, current: &str) -> Result<Option<Version>> {
    let checker = LatestRelease::new(config.release_source.clone(), &config.network.user_agent)?;

    let spinner = output::spinner("Checking for updates...");
    let check = checker.check(current).await;
    spinner.finish_and_clear();
    let check = check.context("Failed to check the latest cf version")?;

    if !check.outdated {
        output::success(&format!(
            "You are using the latest version of cf cli (v{})",
            check.current
        ));
        return Ok(None);
    }

    output::info(&format!(
        "Your cf version v{} is not latest (v{})",
        check.current, check.latest
    ));
    Ok(Some(check.latest))
}

async fn install(live: &Path, version: &str, config: &RuntimeConfig) -> Result<()> {
    let paths = BinaryPaths::for_live(live);
    let installer = Installer::new(version, config)?
        .with_progress(BarProgress::new(format!("Downloading cf v{}", version)));

    debug!("Download URL: {}", installer.target().url);
    installer.install_staged(&paths).await?;

    Replacement::new(paths)
        .with_rollback(config.update.rollback_on_swap_failure)
        .run()?;

    output::success("Successfully updated");
    report_version(live, version);
    Ok(())
}

/// Show what the new binary reports; a mismatch is only a warning
fn report_version(live: &Path, expected: &str) {
    match read_binary_version(live) {
        Ok(version) if version == expected => {
            output::kv("cf version", &version);
        }
        Ok(version) => output::warning(&format!(
            "Expected cf v{} but {} reports v{}",
            expected,
            live.display(),
            version
        )),
        Err(e) => output::warning(&format!("Could not verify the new cf version: {}", e)),
    }
}

fn parse_version(version: &str) -> Result<Version> {
    Version::parse(version.trim().trim_start_matches('v'))
        .map_err(|e| anyhow!("Invalid target version {}: {}", version, e))
}
