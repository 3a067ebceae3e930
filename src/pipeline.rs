//! The digest run: aggregate, format, build the subject, send.
//!
//! [`DigestPipeline::run`] always returns; anything the stages do not
//! contain themselves (an `Err` or a panic) is logged and becomes `false`.
//! Mail is only attempted once a complete digest exists.

use std::panic::AssertUnwindSafe;

use chrono::{Local, NaiveDateTime};
use futures::FutureExt;
use itertools::Itertools;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::aggregator::{AggregateError, aggregate};
use crate::config::MailCredentials;
use crate::fetcher::PageFetcher;
use crate::mailer::DigestMailer;
use crate::models::SiteDescriptor;
use crate::outputs::digest::{format_digest, subject_line};
use crate::scrapers::ExtractorRegistry;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("site table rejected: {0}")]
    Aggregate(#[from] AggregateError),
}

pub struct DigestPipeline<F, M> {
    sites: Vec<SiteDescriptor>,
    extractors: ExtractorRegistry,
    fetcher: F,
    mailer: M,
    credentials: MailCredentials,
}

impl<F: PageFetcher, M: DigestMailer> DigestPipeline<F, M> {
    pub fn new(
        sites: Vec<SiteDescriptor>,
        extractors: ExtractorRegistry,
        fetcher: F,
        mailer: M,
        credentials: MailCredentials,
    ) -> Self {
        Self {
            sites,
            extractors,
            fetcher,
            mailer,
            credentials,
        }
    }

    /// Run once, stamped with the current local time.
    pub async fn run(&self) -> bool {
        self.run_at(Local::now().naive_local()).await
    }

    /// Run once with an explicit generation time.
    #[instrument(level = "info", skip(self))]
    pub async fn run_at(&self, generated_at: NaiveDateTime) -> bool {
        info!("Starting news digest");

        match AssertUnwindSafe(self.deliver(generated_at)).catch_unwind().await {
            Ok(Ok(true)) => {
                info!("News digest completed successfully");
                true
            }
            Ok(Ok(false)) => false,
            Ok(Err(e)) => {
                error!(error = %e, "Unexpected error in digest run");
                false
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(%reason, "Digest run panicked");
                false
            }
        }
    }

    async fn deliver(&self, generated_at: NaiveDateTime) -> Result<bool, PipelineError> {
        let aggregate = aggregate(&self.sites, &self.extractors, &self.fetcher).await?;
        let body = format_digest(&aggregate, generated_at);
        let subject = subject_line(generated_at);

        info!(
            sources = %aggregate.site_names().join(", "),
            bytes = body.len(),
            "Digest formatted"
        );
        Ok(self.mailer.send(&subject, &body, &self.credentials).await)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::aggregator::tests::{FakeFetcher, h2_registry, headline_page};
    use crate::models::FetchOutcome;
    use crate::outputs::digest::NO_HEADLINES;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// Records every message instead of sending it.
    pub(crate) struct RecordingMailer {
        accept: bool,
        pub(crate) sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingMailer {
        pub(crate) fn accepting(accept: bool) -> Self {
            Self {
                accept,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn attempts(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl DigestMailer for RecordingMailer {
        async fn send(&self, subject: &str, body: &str, _: &MailCredentials) -> bool {
            self.sent
                .lock()
                .unwrap()
                .push((subject.to_string(), body.to_string()));
            self.accept
        }
    }

    /// Fails loudly if the pipeline ever asks it for a page.
    struct PanickingFetcher;

    impl PageFetcher for PanickingFetcher {
        async fn fetch(&self, url: &str) -> FetchOutcome {
            panic!("unexpected fetch of {url}");
        }
    }

    pub(crate) fn credentials() -> MailCredentials {
        MailCredentials {
            sender: "me@example.com".into(),
            secret: "secret".into(),
            receiver: "you@example.com".into(),
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn three_sites() -> Vec<SiteDescriptor> {
        vec![
            SiteDescriptor::new("A", "https://a.example/"),
            SiteDescriptor::new("B", "https://b.example/"),
            SiteDescriptor::new("C", "https://c.example/"),
        ]
    }

    #[tokio::test]
    async fn test_end_to_end_mixed_outcomes() {
        let fetcher = FakeFetcher::default()
            .with("https://a.example/", headline_page(3))
            .with("https://b.example/", FetchOutcome::TimedOut)
            .with("https://c.example/", headline_page(6));
        let mailer = RecordingMailer::accepting(true);
        let pipeline = DigestPipeline::new(
            three_sites(),
            h2_registry(&["A", "B", "C"]),
            fetcher,
            mailer,
            credentials(),
        );

        assert!(pipeline.run_at(at()).await);

        let sent = pipeline.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (subject, body) = &sent[0];
        assert_eq!(subject, "📰 Your Personal News Digest - 2026-10-19");

        let a = body.find("【 A 】").unwrap();
        let b = body.find("【 B 】").unwrap();
        let c = body.find("【 C 】").unwrap();
        assert!(a < b && b < c);

        let section_a = &body[a..b];
        assert!(section_a.contains("1. Headline number 1"));
        assert!(section_a.contains("3. Headline number 3"));
        assert!(!section_a.contains("4. "));

        assert!(body[b..c].contains(NO_HEADLINES));

        let section_c = &body[c..];
        assert!(section_c.contains("5. Headline number 5"));
        assert!(!section_c.contains("Headline number 6"));

        assert!(body.contains("📊 Summary: News from 3 sources"));
    }

    #[tokio::test]
    async fn test_rejected_delivery_fails_run() {
        let fetcher = FakeFetcher::default().with("https://a.example/", headline_page(1));
        let pipeline = DigestPipeline::new(
            vec![SiteDescriptor::new("A", "https://a.example/")],
            h2_registry(&["A"]),
            fetcher,
            RecordingMailer::accepting(false),
            credentials(),
        );

        assert!(!pipeline.run_at(at()).await);
        assert_eq!(pipeline.mailer.attempts(), 1);
    }

    #[tokio::test]
    async fn test_faulty_site_table_skips_delivery() {
        let sites = vec![
            SiteDescriptor::new("A", "https://a.example/"),
            SiteDescriptor::new("A", "https://a.example/again"),
        ];
        let pipeline = DigestPipeline::new(
            sites,
            h2_registry(&["A"]),
            FakeFetcher::default(),
            RecordingMailer::accepting(true),
            credentials(),
        );

        assert!(!pipeline.run_at(at()).await);
        assert_eq!(pipeline.mailer.attempts(), 0);
        assert!(pipeline.fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn test_panic_inside_run_is_contained() {
        let pipeline = DigestPipeline::new(
            vec![SiteDescriptor::new("A", "https://a.example/")],
            h2_registry(&["A"]),
            PanickingFetcher,
            RecordingMailer::accepting(true),
            credentials(),
        );

        assert!(!pipeline.run_at(at()).await);
        assert_eq!(pipeline.mailer.attempts(), 0);
    }
}
