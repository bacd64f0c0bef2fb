//! megadl - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use megadl::{
    cli::Args,
    config::validate_run,
    download::Downloader,
    error::{exit_codes, Result},
    output::{print_error, print_summary},
    session::MegaSession,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::from(exit_codes::SUCCESS as u8),
        Ok(false) => ExitCode::from(exit_codes::FAILURE as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}

async fn run() -> Result<bool> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging. Stdout may carry streamed data, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(args.debug)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration and merge CLI arguments into it
    let mut config = args.load_config()?;
    args.merge_into_config(&mut config);

    validate_run(&config, &args.links)?;
    tracing::debug!("Destination: {}", config.destination());

    let session = MegaSession::new(&config.network)?;
    let mut downloader = Downloader::new(session, &config);
    let summary = downloader.run(&args.links).await;

    if config.show_progress() {
        print_summary(&summary);
    }

    Ok(summary.is_success())
}

/// Failed attempts are reported by the retry loop, so the MEGA client's own
/// error lines are silenced unless debugging.
fn default_log_filter(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn,mega=off"
    }
}
