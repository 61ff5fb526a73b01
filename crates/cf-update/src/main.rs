//! cf-update - Self-updater for the Cloud Foundry CLI
//!
//! This is the main entry point for the cf-update command-line interface.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Legacy switch that turns on debug logging when set to any non-empty value
const DEBUG_ENV: &str = "DEBUG_PLUGIN";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    let debug_env = std::env::var(DEBUG_ENV).is_ok_and(|value| !value.is_empty());
    init_tracing(cli.verbose, cli.quiet, debug_env);

    // Every workspace and file handle is dropped by the time run() returns
    match commands::update::run(cli.update).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&render_error(&e));
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool, debug_env: bool) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::new(log_level(verbose, quiet, debug_env)))
        .init();
}

fn log_level(verbose: u8, quiet: bool, debug_env: bool) -> &'static str {
    if quiet {
        return "error";
    }

    let verbose = if debug_env { verbose.max(1) } else { verbose };
    match verbose {
        // User-facing progress goes through terminal output, not logs
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Join an error with its causes, skipping causes the message already quotes
fn render_error(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_log_level_defaults_to_warn() {
        assert_eq!(log_level(0, false, false), "warn");
    }

    #[test]
    fn test_log_level_verbosity() {
        assert_eq!(log_level(1, false, false), "debug");
        assert_eq!(log_level(2, false, false), "trace");
        assert_eq!(log_level(5, false, false), "trace");
    }

    #[test]
    fn test_debug_env_acts_as_verbose() {
        assert_eq!(log_level(0, false, true), "debug");
        assert_eq!(log_level(2, false, true), "trace");
    }

    #[test]
    fn test_quiet_wins() {
        assert_eq!(log_level(2, true, true), "error");
    }

    #[test]
    fn test_render_error_appends_new_causes() {
        let err = anyhow::Error::new(io::Error::new(io::ErrorKind::NotFound, "no such file"))
            .context("Failed to read cf version");

        assert_eq!(render_error(&err), "Failed to read cf version: no such file");
    }

    #[test]
    fn test_render_error_skips_quoted_causes() {
        let err = anyhow::Error::new(io::Error::new(io::ErrorKind::NotFound, "no such file"))
            .context("Failed to move cf: no such file");

        assert_eq!(render_error(&err), "Failed to move cf: no such file");
    }
}
