//! Existence classification of fetched topic pages
//!
//! A topic id that was never allocated must be told apart from one that
//! exists but holds no visible posts. Post count alone cannot make that
//! distinction, so classification inspects structural markers: an explicit
//! "does not exist" message wins over everything, and a recognizable topic
//! header separates an empty topic from a generic error page.

use crate::model::ExistenceStatus;
use crate::scrape::FetchedPage;
use scraper::{Html, Selector};

/// Body markers the forum emits for unallocated or removed topic ids
const NOT_FOUND_MARKERS: &[&str] = &[
    "this topic does not exist",
    "toto téma neexistuje",
    "topic not found",
    "téma nenalezeno",
    "page not found",
    "stránka nenalezena",
];

/// Classifies a fetched page, first matching rule wins
///
/// 1. HTTP 404 or a known "does not exist" marker → `NotFound`
/// 2. Successful page with a topic header but no posts and no pagination → `Empty`
/// 3. Any post entries present → `HasContent`
/// 4. Anything else (error status, unrecognizable structure) → `FetchError`
pub fn classify(page: &FetchedPage) -> ExistenceStatus {
    if page.status_code == 404 {
        return ExistenceStatus::NotFound;
    }

    let lowered = page.body.to_lowercase();
    if NOT_FOUND_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return ExistenceStatus::NotFound;
    }

    if !(200..300).contains(&page.status_code) {
        return ExistenceStatus::FetchError;
    }

    let document = Html::parse_document(&page.body);

    if has_match(&document, "div.post") {
        return ExistenceStatus::HasContent;
    }

    let has_header = has_match(&document, "h2.topic-title");
    let has_pagination = has_match(&document, ".pagination");

    if has_header && !has_pagination {
        ExistenceStatus::Empty
    } else {
        // No posts, no topic header (or dangling pagination without posts):
        // the page structure is not one we recognize.
        ExistenceStatus::FetchError
    }
}

fn has_match(document: &Html, selector: &str) -> bool {
    match Selector::parse(selector) {
        Ok(sel) => document.select(&sel).next().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status_code: u16, body: &str) -> FetchedPage {
        FetchedPage {
            url: "https://forum.example.org/viewtopic.php?t=1".to_string(),
            status_code,
            body: body.to_string(),
        }
    }

    const TOPIC_WITH_POST: &str = r#"
        <html><body>
        <h2 class="topic-title"><a href="./viewtopic.php?t=1">Budget 2023</a></h2>
        <div id="p100" class="post">
            <div class="postbody"><div class="content">First post</div></div>
        </div>
        </body></html>
    "#;

    const EMPTY_TOPIC: &str = r#"
        <html><body>
        <h2 class="topic-title"><a href="./viewtopic.php?t=2">Placeholder thread</a></h2>
        <p>No posts to display.</p>
        </body></html>
    "#;

    #[test]
    fn test_http_404_is_not_found() {
        assert_eq!(
            classify(&page(404, "<html></html>")),
            ExistenceStatus::NotFound
        );
    }

    #[test]
    fn test_marker_text_is_not_found() {
        let body = "<html><body><p>This topic does not exist.</p></body></html>";
        assert_eq!(classify(&page(200, body)), ExistenceStatus::NotFound);
    }

    #[test]
    fn test_czech_marker_is_not_found() {
        let body = "<html><body><p>Toto téma neexistuje.</p></body></html>";
        assert_eq!(classify(&page(200, body)), ExistenceStatus::NotFound);
    }

    #[test]
    fn test_marker_wins_over_post_entries() {
        // First matching rule wins even if the page also shows post markup
        let body = format!(
            "{}<p>topic not found</p>",
            TOPIC_WITH_POST
        );
        assert_eq!(classify(&page(200, &body)), ExistenceStatus::NotFound);
    }

    #[test]
    fn test_posts_present_is_has_content() {
        assert_eq!(
            classify(&page(200, TOPIC_WITH_POST)),
            ExistenceStatus::HasContent
        );
    }

    #[test]
    fn test_header_without_posts_is_empty() {
        assert_eq!(classify(&page(200, EMPTY_TOPIC)), ExistenceStatus::Empty);
    }

    #[test]
    fn test_empty_is_never_not_found() {
        let status = classify(&page(200, EMPTY_TOPIC));
        assert_ne!(status, ExistenceStatus::NotFound);
    }

    #[test]
    fn test_generic_page_is_fetch_error() {
        let body = "<html><body><h1>Welcome</h1></body></html>";
        assert_eq!(classify(&page(200, body)), ExistenceStatus::FetchError);
    }

    #[test]
    fn test_server_error_is_fetch_error() {
        assert_eq!(
            classify(&page(500, "<html></html>")),
            ExistenceStatus::FetchError
        );
    }
}
