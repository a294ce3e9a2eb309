//! Core data model for scraped topics and run outcomes

use chrono::{DateTime, FixedOffset, Utc};
use std::time::Duration;

/// Existence state of one topic id, decided once per topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceStatus {
    /// The topic id was never allocated or the forum reports it missing
    NotFound,

    /// The topic exists (a topic header is present) but holds no posts
    Empty,

    /// The topic exists and at least one post was extracted
    HasContent,

    /// Transport or structural failure while fetching the topic
    FetchError,
}

impl ExistenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExistenceStatus::NotFound => "not_found",
            ExistenceStatus::Empty => "empty",
            ExistenceStatus::HasContent => "has_content",
            ExistenceStatus::FetchError => "fetch_error",
        }
    }
}

/// One post extracted from a topic page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Forum-assigned post id (digits from the post anchor)
    pub id: String,

    /// Author display name, or the `"unknown"` placeholder
    pub author: String,

    /// Post timestamp, normalized to ISO-8601 with offset
    pub posted_at: DateTime<FixedOffset>,

    /// Whitespace-collapsed post body text
    pub content: String,
}

/// A fully scraped topic, immutable once classification completes
#[derive(Debug, Clone)]
pub struct Topic {
    pub id: u64,

    /// Canonical first-page URL for this topic
    pub url: String,

    pub title: String,

    /// Posts in insertion order across pages (page 1 first)
    pub posts: Vec<Post>,

    pub status: ExistenceStatus,

    pub scraped_at: DateTime<Utc>,
}

/// Per-id result accumulated by the orchestrator
#[derive(Debug, Clone)]
pub enum ScrapeOutcome {
    Scraped(Topic),

    /// A fetch-layer fault that could not produce a Topic
    Failed { id: u64, reason: String },
}

/// Reference to a successfully scraped topic, kept for the summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRef {
    pub id: u64,
    pub title: String,
}

/// Aggregate counts and references for one complete run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub not_found: u64,
    pub empty: u64,
    pub has_content: u64,
    pub fetch_error: u64,

    /// Total wall-clock time for the run
    pub elapsed: Duration,

    /// Topics that yielded content, in processing order
    pub scraped: Vec<TopicRef>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one outcome into the aggregate counts.
    ///
    /// A `Failed` outcome is a fetch-layer fault and counts as a fetch error;
    /// the run-level taxonomy does not distinguish the two.
    pub fn record(&mut self, outcome: &ScrapeOutcome) {
        match outcome {
            ScrapeOutcome::Scraped(topic) => {
                match topic.status {
                    ExistenceStatus::NotFound => self.not_found += 1,
                    ExistenceStatus::Empty => self.empty += 1,
                    ExistenceStatus::HasContent => self.has_content += 1,
                    ExistenceStatus::FetchError => self.fetch_error += 1,
                }
                if topic.status == ExistenceStatus::HasContent {
                    self.scraped.push(TopicRef {
                        id: topic.id,
                        title: topic.title.clone(),
                    });
                }
            }
            ScrapeOutcome::Failed { .. } => self.fetch_error += 1,
        }
    }

    /// Total number of topic ids processed
    pub fn total(&self) -> u64 {
        self.not_found + self.empty + self.has_content + self.fetch_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn topic_with_status(id: u64, status: ExistenceStatus) -> Topic {
        let posts = if status == ExistenceStatus::HasContent {
            vec![Post {
                id: "1".to_string(),
                author: "alice".to_string(),
                posted_at: FixedOffset::east_opt(0)
                    .unwrap()
                    .with_ymd_and_hms(2023, 5, 1, 12, 0, 0)
                    .unwrap(),
                content: "hello".to_string(),
            }]
        } else {
            vec![]
        };

        Topic {
            id,
            url: format!("https://forum.example.org/viewtopic.php?t={}", id),
            title: format!("Topic {}", id),
            posts,
            status,
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_counts_per_status() {
        let mut summary = RunSummary::new();
        summary.record(&ScrapeOutcome::Scraped(topic_with_status(
            1,
            ExistenceStatus::HasContent,
        )));
        summary.record(&ScrapeOutcome::Scraped(topic_with_status(
            2,
            ExistenceStatus::NotFound,
        )));
        summary.record(&ScrapeOutcome::Scraped(topic_with_status(
            3,
            ExistenceStatus::Empty,
        )));
        summary.record(&ScrapeOutcome::Scraped(topic_with_status(
            4,
            ExistenceStatus::HasContent,
        )));

        assert_eq!(summary.has_content, 2);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.fetch_error, 0);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn test_scraped_list_keeps_only_content_topics() {
        let mut summary = RunSummary::new();
        summary.record(&ScrapeOutcome::Scraped(topic_with_status(
            7,
            ExistenceStatus::HasContent,
        )));
        summary.record(&ScrapeOutcome::Scraped(topic_with_status(
            8,
            ExistenceStatus::Empty,
        )));

        assert_eq!(summary.scraped.len(), 1);
        assert_eq!(summary.scraped[0].id, 7);
        assert_eq!(summary.scraped[0].title, "Topic 7");
    }

    #[test]
    fn test_failed_outcome_counts_as_fetch_error() {
        let mut summary = RunSummary::new();
        summary.record(&ScrapeOutcome::Failed {
            id: 9,
            reason: "connection refused".to_string(),
        });

        assert_eq!(summary.fetch_error, 1);
        assert_eq!(summary.total(), 1);
        assert!(summary.scraped.is_empty());
    }
}
