//! Command-line interface definitions for the news digest.
//!
//! Every option can also be supplied through an environment variable. The
//! mail account itself (`EMAIL_SENDER`, `EMAIL_PASSWORD`, `EMAIL_RECEIVER`)
//! is only ever read from the environment, see [`crate::config`].

use clap::Parser;

use crate::config::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use crate::fetcher::{DEFAULT_COURTESY_DELAY_SECS, DEFAULT_TIMEOUT_SECS};

/// Command-line arguments for a single digest run.
///
/// # Examples
///
/// ```sh
/// # Gmail defaults
/// news_digest
///
/// # Another submission server, slower sites
/// news_digest --smtp-host smtp.fastmail.com --timeout-secs 20
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// SMTP submission server
    #[arg(long, env = "SMTP_SERVER", default_value = DEFAULT_SMTP_HOST)]
    pub smtp_host: String,

    /// SMTP submission port (STARTTLS)
    #[arg(long, env = "SMTP_PORT", default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    /// Per-site HTTP timeout in seconds
    #[arg(long, env = "DIGEST_FETCH_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Pause after each successful fetch, in seconds
    #[arg(long, env = "DIGEST_COURTESY_DELAY", default_value_t = DEFAULT_COURTESY_DELAY_SECS)]
    pub courtesy_delay_secs: u64,
}
