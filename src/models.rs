//! Data models shared by the fetch, extract, format and deliver stages.
//!
//! This module defines the core data structures of a digest run:
//! - [`SiteDescriptor`]: a configured news source
//! - [`FetchOutcome`]: the classified result of one page download
//! - [`SiteOutcome`]: headlines or an explicit per-site failure
//! - [`DigestAggregate`]: every site's outcome, in configuration order
//!
//! Nothing here outlives a single run.

use std::fmt;

/// A news source as configured at build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDescriptor {
    /// Display name, also the key into the extractor registry.
    pub name: String,
    /// Page that is fetched and scraped.
    pub url: String,
}

impl SiteDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Classified result of a single GET against a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A 2xx response; `body` is the decoded page text.
    Document { body: String },
    /// The request did not complete within the configured timeout.
    TimedOut,
    /// The server answered with a non-2xx status.
    HttpError { status: u16, message: String },
    /// DNS, connection, TLS or body decoding failure.
    TransportError(String),
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Document { body } => write!(f, "document ({} bytes)", body.len()),
            FetchOutcome::TimedOut => f.write_str("timed out"),
            FetchOutcome::HttpError { status, message } => write!(f, "HTTP {status} {message}"),
            FetchOutcome::TransportError(message) => write!(f, "transport error: {message}"),
        }
    }
}

/// Why a site produced no headlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    FetchFailed,
    ParseFailed,
    NoExtractor,
}

impl FailureReason {
    /// Human-readable placeholder for `site`, used in diagnostics.
    pub fn placeholder(&self, site: &str) -> String {
        match self {
            FailureReason::FetchFailed => format!("Failed to fetch {site}"),
            FailureReason::ParseFailed => format!("Error parsing {site}"),
            FailureReason::NoExtractor => "No extractor available".to_string(),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FailureReason::FetchFailed => "fetch failed",
            FailureReason::ParseFailed => "parse failed",
            FailureReason::NoExtractor => "no extractor",
        };
        f.write_str(text)
    }
}

/// What one site contributed to the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteOutcome {
    /// Headlines in extraction order, already capped and deduplicated.
    Headlines(Vec<String>),
    Failed(FailureReason),
}

impl SiteOutcome {
    /// Number of entries this site occupies; a failure counts as one placeholder.
    pub fn len(&self) -> usize {
        match self {
            SiteOutcome::Headlines(headlines) => headlines.len(),
            SiteOutcome::Failed(_) => 1,
        }
    }
}

/// One section of the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteReport {
    pub name: String,
    pub url: String,
    pub outcome: SiteOutcome,
}

/// Per-site outcomes in site configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestAggregate {
    pub reports: Vec<SiteReport>,
}

impl DigestAggregate {
    pub fn push(&mut self, report: SiteReport) {
        self.reports.push(report);
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&SiteOutcome> {
        self.reports
            .iter()
            .find(|report| report.name == name)
            .map(|report| &report.outcome)
    }

    /// Site names in the order they will be rendered.
    pub fn site_names(&self) -> impl Iterator<Item = &str> {
        self.reports.iter().map(|report| report.name.as_str())
    }
}
