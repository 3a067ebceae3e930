//! Collects headlines from every configured site, one site at a time.
//!
//! Per-site trouble (no extractor, failed fetch, unparseable page) is
//! recorded as a [`SiteOutcome::Failed`] entry and collection moves on.
//! A site whose URL cannot be fetched at all (malformed or unreachable) is
//! just another failed fetch. Only a malformed site table (an empty or
//! repeated name) stops aggregation, and it does so before any request is
//! made.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::fetcher::PageFetcher;
use crate::models::{
    DigestAggregate, FailureReason, FetchOutcome, SiteDescriptor, SiteOutcome, SiteReport,
};
use crate::scrapers::ExtractorRegistry;
use crate::scrapers::extract::extract;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("site descriptor #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("site `{0}` is configured more than once")]
    DuplicateSite(String),
}

/// Fetch and extract every site in `sites`, preserving their order.
#[instrument(level = "info", skip_all, fields(sites = sites.len()))]
pub async fn aggregate<F: PageFetcher>(
    sites: &[SiteDescriptor],
    extractors: &ExtractorRegistry,
    fetcher: &F,
) -> Result<DigestAggregate, AggregateError> {
    validate(sites)?;
    info!(extractors = extractors.len(), "Starting news collection");

    let mut aggregate = DigestAggregate::default();
    for site in sites {
        let outcome = collect_site(site, extractors, fetcher).await;
        match &outcome {
            SiteOutcome::Headlines(_) => {
                info!(site = %site.name, count = outcome.len(), "Collected headlines");
            }
            SiteOutcome::Failed(reason) => {
                warn!(site = %site.name, %reason, "{}", reason.placeholder(&site.name));
            }
        }
        aggregate.push(SiteReport {
            name: site.name.clone(),
            url: site.url.clone(),
            outcome,
        });
    }

    Ok(aggregate)
}

async fn collect_site<F: PageFetcher>(
    site: &SiteDescriptor,
    extractors: &ExtractorRegistry,
    fetcher: &F,
) -> SiteOutcome {
    let Some(rule) = extractors.get(&site.name) else {
        return SiteOutcome::Failed(FailureReason::NoExtractor);
    };

    match fetcher.fetch(&site.url).await {
        FetchOutcome::Document { body } => extract(&site.name, &body, rule),
        other => {
            debug!(site = %site.name, outcome = %other, "No document to extract from");
            SiteOutcome::Failed(FailureReason::FetchFailed)
        }
    }
}

fn validate(sites: &[SiteDescriptor]) -> Result<(), AggregateError> {
    let mut seen = HashSet::new();
    for (index, site) in sites.iter().enumerate() {
        if site.name.trim().is_empty() {
            return Err(AggregateError::EmptyName { index });
        }
        if !seen.insert(site.name.as_str()) {
            return Err(AggregateError::DuplicateSite(site.name.clone()));
        }
    }
    Ok(())
}
