//! Per-topic pagination driving
//!
//! One `fetch` call walks a single topic id: fetch the first page, classify
//! it, and if the topic has content keep following the next-page affordance
//! until it disappears or the defensive page cap is hit. Every page fetch is
//! preceded by a rate-limiter wait.

use crate::model::{ExistenceStatus, Topic};
use crate::scrape::classify::classify;
use crate::scrape::limiter::RateLimiter;
use crate::scrape::parser::parse_topic_page;
use crate::scrape::FetchedPage;
use crate::session::SessionContext;
use crate::HarvestError;
use chrono::Utc;
use url::Url;

/// Fetches one topic id across all of its pages
pub struct TopicFetcher {
    session: SessionContext,
    limiter: RateLimiter,
    base_url: Url,
    max_pages: u32,
}

impl TopicFetcher {
    pub fn new(
        session: SessionContext,
        limiter: RateLimiter,
        base_url: Url,
        max_pages: u32,
    ) -> Self {
        Self {
            session,
            limiter,
            base_url,
            max_pages,
        }
    }

    /// Canonical first-page URL for a topic id
    ///
    /// The script path is appended under the configured base, whether the
    /// board lives at the host root or under a path prefix.
    pub fn topic_url(&self, id: u64) -> String {
        format!(
            "{}/viewtopic.php?t={}",
            self.base_url.as_str().trim_end_matches('/'),
            id
        )
    }

    /// Fetches and classifies one topic
    ///
    /// Transport and structural failures degrade the topic to `FetchError`;
    /// an `Err` here means the topic URL itself could not be formed, which
    /// the orchestrator records as a failure outcome.
    pub async fn fetch(&mut self, id: u64) -> Result<Topic, HarvestError> {
        let canonical_url = self.topic_url(id);
        let page_base = Url::parse(&canonical_url)?;

        self.limiter.wait().await;
        let first_page = match self.fetch_page(&canonical_url).await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Topic {}: first page fetch failed: {}", id, e);
                return Ok(self.finish(id, canonical_url, String::new(), vec![], ExistenceStatus::FetchError));
            }
        };

        // First page classification decides the terminal status for every
        // branch except HasContent, which goes on to paginate.
        match classify(&first_page) {
            ExistenceStatus::NotFound => {
                return Ok(self.finish(id, canonical_url, String::new(), vec![], ExistenceStatus::NotFound));
            }
            ExistenceStatus::FetchError => {
                tracing::warn!("Topic {}: unrecognized page structure", id);
                return Ok(self.finish(id, canonical_url, String::new(), vec![], ExistenceStatus::FetchError));
            }
            ExistenceStatus::Empty => {
                let parsed = parse_topic_page(&first_page.body, &page_base);
                let title = parsed.title.unwrap_or_default();
                return Ok(self.finish(id, canonical_url, title, vec![], ExistenceStatus::Empty));
            }
            ExistenceStatus::HasContent => {}
        }

        let parsed = parse_topic_page(&first_page.body, &page_base);
        let title = parsed.title.unwrap_or_default();
        let mut posts = parsed.posts;
        let mut next_page = parsed.next_page;
        let mut pages_fetched = 1;
        let mut status = ExistenceStatus::HasContent;

        while let Some(url) = next_page.take() {
            if pages_fetched >= self.max_pages {
                tracing::warn!(
                    "Topic {}: page cap of {} reached, truncating pagination",
                    id,
                    self.max_pages
                );
                break;
            }

            self.limiter.wait().await;
            let page = match self.fetch_page(&url).await {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Topic {}: page {} fetch failed: {}", id, pages_fetched + 1, e);
                    status = ExistenceStatus::FetchError;
                    break;
                }
            };

            if !(200..300).contains(&page.status_code) {
                tracing::warn!(
                    "Topic {}: page {} returned HTTP {}",
                    id,
                    pages_fetched + 1,
                    page.status_code
                );
                status = ExistenceStatus::FetchError;
                break;
            }

            let page_url = Url::parse(&url)?;
            let parsed = parse_topic_page(&page.body, &page_url);
            posts.extend(parsed.posts);
            next_page = parsed.next_page;
            pages_fetched += 1;
        }

        tracing::debug!(
            "Topic {}: {} posts across {} pages",
            id,
            posts.len(),
            pages_fetched
        );

        Ok(self.finish(id, canonical_url, title, posts, status))
    }

    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, HarvestError> {
        let response = self
            .session
            .get(url)
            .await
            .map_err(|source| HarvestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status_code = response.status().as_u16();
        let body = response.text().await.map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(FetchedPage {
            url: url.to_string(),
            status_code,
            body,
        })
    }

    fn finish(
        &self,
        id: u64,
        url: String,
        title: String,
        posts: Vec<crate::model::Post>,
        status: ExistenceStatus,
    ) -> Topic {
        Topic {
            id,
            url,
            title,
            posts,
            status,
            scraped_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::build_http_client;
    use std::time::Duration;

    fn fetcher(base_url: &str) -> TopicFetcher {
        let client = build_http_client("test").unwrap();
        let session = SessionContext::anonymous(client);
        let limiter = RateLimiter::new(Duration::from_millis(100));
        TopicFetcher::new(session, limiter, Url::parse(base_url).unwrap(), 50)
    }

    #[test]
    fn test_topic_url_at_host_root() {
        let f = fetcher("https://forum.example.org");
        assert_eq!(
            f.topic_url(47593),
            "https://forum.example.org/viewtopic.php?t=47593"
        );
    }

    #[test]
    fn test_topic_url_under_path_prefix() {
        let f = fetcher("https://example.org/forum");
        assert_eq!(
            f.topic_url(7),
            "https://example.org/forum/viewtopic.php?t=7"
        );
    }
}
