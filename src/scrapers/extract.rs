//! Generic headline extraction over a fetched page.

use itertools::Itertools;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::{ExtractionRule, SelectionRule};
use crate::models::{FailureReason, SiteOutcome};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Apply `rule` to `body` and return the site's headlines.
///
/// Never fails outright: a rule that cannot be applied yields
/// [`SiteOutcome::Failed`] with [`FailureReason::ParseFailed`].
#[instrument(level = "debug", skip_all, fields(%site))]
pub fn extract(site: &str, body: &str, rule: &ExtractionRule) -> SiteOutcome {
    let document = Html::parse_document(body);

    match headlines(&document, rule) {
        Ok(headlines) => {
            debug!(count = headlines.len(), "Extracted headlines");
            SiteOutcome::Headlines(headlines)
        }
        Err(e) => {
            warn!(error = %e, "Error parsing {site}");
            SiteOutcome::Failed(FailureReason::ParseFailed)
        }
    }
}

fn headlines(document: &Html, rule: &ExtractionRule) -> Result<Vec<String>, ExtractError> {
    let mut found = candidates(document, &rule.primary)?;

    if found.is_empty() {
        if let Some(fallback) = &rule.fallback {
            debug!(selector = %fallback.selector, "Primary selector empty; trying fallback");
            found = candidates(document, fallback)?;
        }
    }

    let found = if rule.dedupe {
        found.into_iter().unique().collect()
    } else {
        found
    };

    Ok(found.into_iter().take(rule.max_headlines).collect())
}

/// Text of the first `scan_limit` matches that pass the length filter.
fn candidates(document: &Html, selection: &SelectionRule) -> Result<Vec<String>, ExtractError> {
    let selector = Selector::parse(&selection.selector).map_err(|e| ExtractError::Selector {
        selector: selection.selector.clone(),
        reason: e.to_string(),
    })?;

    Ok(document
        .select(&selector)
        .take(selection.scan_limit)
        .map(|element| element.text().flat_map(str::split_whitespace).join(" "))
        .filter(|text| !text.is_empty() && text.chars().count() >= selection.min_chars)
        .collect())
}
