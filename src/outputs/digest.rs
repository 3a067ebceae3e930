//! Plain-text rendering of a [`DigestAggregate`].
//!
//! Rendering is pure: the same aggregate and timestamp always produce the
//! same bytes. Sections appear in aggregate order and headlines in
//! extraction order.

use chrono::NaiveDateTime;

use crate::models::{DigestAggregate, SiteOutcome, SiteReport};
use crate::scrapers::HEADLINE_CAP;

/// Line shown in place of headlines for a site that produced none.
pub const NO_HEADLINES: &str = "  (Could not retrieve headlines)";

const TITLE_RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 40;

/// Closing hint pointing at where new sources are configured.
pub const FOOTER_TIP: &str =
    "💡 Tip: Add more sources with a descriptor and rule in scrapers::sites";

/// Render the digest body.
pub fn format_digest(aggregate: &DigestAggregate, generated_at: NaiveDateTime) -> String {
    let title_rule = "=".repeat(TITLE_RULE_WIDTH);
    let mut lines: Vec<String> = vec![
        title_rule.clone(),
        "📰 PERSONAL NEWS DIGEST".to_string(),
        format!("📅 {}", generated_at.format("%A, %B %d, %Y")),
        format!("🕒 Generated at: {}", generated_at.format("%H:%M")),
        title_rule.clone(),
        String::new(),
    ];

    for report in &aggregate.reports {
        lines.extend(section(report));
    }

    lines.push(title_rule.clone());
    lines.push(format!("📊 Summary: News from {} sources", aggregate.len()));
    lines.push(FOOTER_TIP.to_string());
    lines.push(title_rule);

    lines.join("\n")
}

/// Email subject for a digest generated at `generated_at`.
pub fn subject_line(generated_at: NaiveDateTime) -> String {
    format!(
        "📰 Your Personal News Digest - {}",
        generated_at.format("%Y-%m-%d")
    )
}

fn section(report: &SiteReport) -> Vec<String> {
    let mut lines = vec![
        format!("【 {} 】", report.name.to_uppercase()),
        format!("🔗 {}", report.url),
        String::new(),
    ];

    match &report.outcome {
        SiteOutcome::Headlines(headlines) if !headlines.is_empty() => {
            for (i, headline) in headlines.iter().take(HEADLINE_CAP).enumerate() {
                lines.push(format!("{}. {}", i + 1, headline));
            }
        }
        _ => lines.push(NO_HEADLINES.to_string()),
    }

    lines.push(String::new());
    lines.push("-".repeat(SECTION_RULE_WIDTH));
    lines.push(String::new());
    lines
}
