//! Whole-run orchestration over the configured topic id range
//!
//! The orchestrator is strictly sequential: no topic's fetch begins before
//! the previous one's summary contribution is recorded. Per-id faults are
//! converted into failure outcomes; the run never aborts because one topic
//! failed.

use crate::config::Config;
use crate::model::{RunSummary, ScrapeOutcome};
use crate::scrape::limiter::RateLimiter;
use crate::scrape::topic::TopicFetcher;
use crate::session::SessionContext;
use crate::HarvestError;
use std::time::{Duration, Instant};
use url::Url;

/// How often (in processed ids) progress is logged
const PROGRESS_EVERY: usize = 10;

/// Drives the scrape across the configured id range
pub struct ScrapeOrchestrator {
    fetcher: TopicFetcher,
    start_id: u64,
    end_id: u64,
    step: u64,
    priority_id: Option<u64>,
}

impl ScrapeOrchestrator {
    /// Creates an orchestrator from a validated configuration and session
    pub fn new(config: &Config, session: SessionContext) -> Result<Self, HarvestError> {
        let base_url = Url::parse(&config.forum.base_url)?;
        let limiter = RateLimiter::new(Duration::from_millis(config.scrape.delay_ms));
        let fetcher = TopicFetcher::new(
            session,
            limiter,
            base_url,
            config.scrape.max_pages_per_topic,
        );

        Ok(Self {
            fetcher,
            start_id: config.scrape.start_id,
            end_id: config.scrape.end_id,
            step: config.scrape.step,
            priority_id: config.scrape.priority_id,
        })
    }

    /// Processing order: the priority id first (if configured), then the
    /// range ids ascending by step, skipping a duplicate of the priority id.
    pub fn id_order(&self) -> Vec<u64> {
        let mut ids = Vec::new();

        if let Some(priority) = self.priority_id {
            ids.push(priority);
        }

        let mut id = self.start_id;
        while id <= self.end_id {
            if Some(id) != self.priority_id {
                ids.push(id);
            }
            id += self.step;
        }

        ids
    }

    /// Processes every id and returns the outcomes plus the run summary
    ///
    /// The run always completes and produces a summary, even if zero topics
    /// succeed.
    pub async fn run(&mut self) -> Result<(Vec<ScrapeOutcome>, RunSummary), HarvestError> {
        let ids = self.id_order();
        let total = ids.len();
        tracing::info!("Starting scrape of {} topic ids", total);

        let start_time = Instant::now();
        let mut outcomes = Vec::with_capacity(total);
        let mut summary = RunSummary::new();

        for (index, id) in ids.into_iter().enumerate() {
            let outcome = match self.fetcher.fetch(id).await {
                Ok(topic) => {
                    tracing::debug!("Topic {}: {}", id, topic.status.as_str());
                    ScrapeOutcome::Scraped(topic)
                }
                Err(e) => {
                    tracing::warn!("Topic {} failed: {}", id, e);
                    ScrapeOutcome::Failed {
                        id,
                        reason: e.to_string(),
                    }
                }
            };

            summary.record(&outcome);
            outcomes.push(outcome);

            let processed = index + 1;
            if processed % PROGRESS_EVERY == 0 {
                let elapsed = start_time.elapsed();
                tracing::info!(
                    "Progress: {}/{} ids, {} with content, {} errors, {:.1}s elapsed",
                    processed,
                    total,
                    summary.has_content,
                    summary.fetch_error,
                    elapsed.as_secs_f64()
                );
            }
        }

        summary.elapsed = start_time.elapsed();
        tracing::info!(
            "Scrape complete: {} ids in {:.1}s (content: {}, empty: {}, missing: {}, errors: {})",
            summary.total(),
            summary.elapsed.as_secs_f64(),
            summary.has_content,
            summary.empty,
            summary.not_found,
            summary.fetch_error
        );

        Ok((outcomes, summary))
    }
}
