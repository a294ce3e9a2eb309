//! Topic scraping module
//!
//! This module contains the core scraping logic:
//! - Rate limiting between outbound requests
//! - Existence classification of fetched pages
//! - Post extraction from topic markup
//! - Per-topic pagination driving
//! - Whole-run orchestration over the configured id range

mod classify;
mod limiter;
mod orchestrator;
mod parser;
mod topic;

pub use classify::classify;
pub use limiter::RateLimiter;
pub use orchestrator::ScrapeOrchestrator;
pub use parser::{parse_topic_page, ParsedTopicPage};
pub use topic::TopicFetcher;

/// One fetched topic page, as handed to the classifier and parser
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL this page was fetched from
    pub url: String,

    /// HTTP status code of the response
    pub status_code: u16,

    /// Response body
    pub body: String,
}
