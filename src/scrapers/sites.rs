//! Built-in news sources and their extraction rules.
//!
//! Selectors track each site's markup at the time they were written; when a
//! site redesigns, only its entry here needs updating.

use super::{ExtractionRule, ExtractorRegistry, SelectionRule};
use crate::models::SiteDescriptor;

pub const BBC: &str = "BBC";
pub const REUTERS: &str = "Reuters";
pub const TECHCRUNCH: &str = "TechCrunch";

/// Configured sources, in the order they are fetched and rendered.
pub fn default_sites() -> Vec<SiteDescriptor> {
    vec![
        SiteDescriptor::new(BBC, "https://www.bbc.com/news"),
        SiteDescriptor::new(REUTERS, "https://www.reuters.com/"),
        SiteDescriptor::new(TECHCRUNCH, "https://techcrunch.com/"),
    ]
}

/// Extraction rules for every entry of [`default_sites`].
pub fn default_extractors() -> ExtractorRegistry {
    let mut registry = ExtractorRegistry::new();
    registry
        .register(
            BBC,
            ExtractionRule::new(SelectionRule::new("h3.gs-c-promo-heading__title", 8, 11))
                .with_fallback(SelectionRule::new(r#"a[data-testid="internal-link"]"#, 8, 16)),
        )
        .register(
            REUTERS,
            // Reuters repeats a story's heading across the card and its link.
            ExtractionRule::new(SelectionRule::new("h3.text__text__, a.text__text__", 10, 16))
                .deduplicated(),
        )
        .register(
            TECHCRUNCH,
            ExtractionRule::new(SelectionRule::new("h2.post-block__title", 6, 1)),
        );
    registry
}
