//! # News Digest
//!
//! Scrapes the current headlines from a fixed set of news sites and emails
//! them to one reader as a plain-text digest.
//!
//! ## Usage
//!
//! ```sh
//! export EMAIL_SENDER='you@gmail.com'
//! export EMAIL_PASSWORD='your-app-password'
//! export EMAIL_RECEIVER='reader@example.com'
//! news_digest
//! ```
//!
//! ## Architecture
//!
//! One run is strictly sequential:
//! 1. **Aggregate**: fetch each site in configuration order and extract up
//!    to five headlines; a failing site gets a placeholder entry
//! 2. **Format**: render the aggregate into a timestamped text digest
//! 3. **Deliver**: send it over SMTP with STARTTLS
//!
//! The process exits 0 only when the email was accepted.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod fetcher;
mod mailer;
mod models;
mod outputs;
mod pipeline;
mod scrapers;

use cli::Cli;
use config::MailCredentials;
use fetcher::{FetchSettings, HttpFetcher, PageFetcher};
use mailer::{DigestMailer, SmtpMailer};
use pipeline::DigestPipeline;
use scrapers::sites::{default_extractors, default_sites};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let fetcher = match HttpFetcher::new(FetchSettings {
        timeout: Duration::from_secs(args.timeout_secs),
        courtesy_delay: Duration::from_secs(args.courtesy_delay_secs),
    }) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let success = launch(&args, |key| std::env::var(key).ok(), fetcher, SmtpMailer).await;

    let elapsed = start_time.elapsed();
    info!(?elapsed, success, "Execution complete");

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Validate the mail configuration, then run one digest.
///
/// Returns `false` without touching the network when configuration is
/// incomplete.
async fn launch<L, F, M>(args: &Cli, lookup: L, fetcher: F, mailer: M) -> bool
where
    L: Fn(&str) -> Option<String>,
    F: PageFetcher,
    M: DigestMailer,
{
    let credentials = match MailCredentials::from_lookup(lookup, &args.smtp_host, args.smtp_port) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "Mail configuration incomplete");
            error!("Set these variables before running:");
            error!("export EMAIL_SENDER='your_email@gmail.com'");
            error!("export EMAIL_PASSWORD='your_app_password'");
            error!("export EMAIL_RECEIVER='receiver@gmail.com'");
            return false;
        }
    };
    info!(
        smtp_host = %credentials.smtp_host,
        smtp_port = credentials.smtp_port,
        "Loaded mail configuration"
    );

    DigestPipeline::new(default_sites(), default_extractors(), fetcher, mailer, credentials)
        .run()
        .await
}
