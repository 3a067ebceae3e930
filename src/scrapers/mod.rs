//! Per-site headline scraping, driven by rule tables.
//!
//! A site is scraped by one generic function, [`extract::extract`], fed with
//! that site's [`ExtractionRule`]. Adding a source means adding a
//! [`SiteDescriptor`](crate::models::SiteDescriptor) and a rule entry in
//! [`sites`]; no new control flow.
//!
//! # Supported Sources
//!
//! | Source | Primary selector | Fallback | Dedupe |
//! |--------|------------------|----------|--------|
//! | BBC | `h3.gs-c-promo-heading__title` | `a[data-testid="internal-link"]` | no |
//! | Reuters | `h3.text__text__, a.text__text__` | none | yes |
//! | TechCrunch | `h2.post-block__title` | none | no |

use std::collections::HashMap;

pub mod extract;
pub mod sites;

/// Headlines kept per site.
pub const HEADLINE_CAP: usize = 5;

/// One CSS selection pass over a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRule {
    /// CSS selector, matched in document order.
    pub selector: String,
    /// Only the first `scan_limit` matches are considered.
    pub scan_limit: usize,
    /// Minimum candidate length in characters, inclusive.
    pub min_chars: usize,
}

impl SelectionRule {
    pub fn new(selector: impl Into<String>, scan_limit: usize, min_chars: usize) -> Self {
        Self {
            selector: selector.into(),
            scan_limit,
            min_chars,
        }
    }
}

/// Everything needed to turn a site's page into headlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRule {
    pub primary: SelectionRule,
    /// Tried only when `primary` yields nothing after filtering.
    pub fallback: Option<SelectionRule>,
    pub max_headlines: usize,
    /// Drop repeated headlines, keeping the first occurrence.
    pub dedupe: bool,
}

impl ExtractionRule {
    pub fn new(primary: SelectionRule) -> Self {
        Self {
            primary,
            fallback: None,
            max_headlines: HEADLINE_CAP,
            dedupe: false,
        }
    }

    pub fn with_fallback(mut self, fallback: SelectionRule) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn deduplicated(mut self) -> Self {
        self.dedupe = true;
        self
    }
}

/// Extraction rules keyed by site name.
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    rules: HashMap<String, ExtractionRule>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, site: impl Into<String>, rule: ExtractionRule) -> &mut Self {
        self.rules.insert(site.into(), rule);
        self
    }

    pub fn get(&self, site: &str) -> Option<&ExtractionRule> {
        self.rules.get(site)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_builder_defaults() {
        let rule = ExtractionRule::new(SelectionRule::new("h2", 6, 1));
        assert_eq!(rule.max_headlines, HEADLINE_CAP);
        assert!(rule.fallback.is_none());
        assert!(!rule.dedupe);

        let rule = rule.with_fallback(SelectionRule::new("a", 8, 16)).deduplicated();
        assert_eq!(rule.fallback.as_ref().map(|f| f.selector.as_str()), Some("a"));
        assert!(rule.dedupe);
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ExtractorRegistry::new();
        registry.register("Example", ExtractionRule::new(SelectionRule::new("h1", 1, 1)));

        assert_eq!(registry.len(), 1);
        assert!(registry.get("Example").is_some());
        assert!(registry.get("example").is_none());
    }
}
