//! Post extraction from topic page markup
//!
//! The forum renders one topic page as a sequence of `div.post` blocks, each
//! carrying the post anchor id, an author link in the poster profile, a
//! `<time>` element with a machine-readable datetime, and the body text in
//! `div.content`. Extraction is tolerant: a missing optional field gets a
//! placeholder instead of failing the page.

use crate::model::Post;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Placeholder for posts whose author could not be extracted
const UNKNOWN_AUTHOR: &str = "unknown";

/// Extracted content of one topic page
#[derive(Debug, Clone)]
pub struct ParsedTopicPage {
    /// The topic title, if a topic header is present
    pub title: Option<String>,

    /// Posts in document order
    pub posts: Vec<Post>,

    /// Absolute URL of the next page, if the page exposes one
    pub next_page: Option<String>,
}

/// Parses a topic page and extracts title, posts, and the next-page link
///
/// A page with zero post entries yields an empty sequence, not an error;
/// that case is exactly what feeds the classifier's `Empty` branch.
pub fn parse_topic_page(html: &str, base_url: &Url) -> ParsedTopicPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document);
    let posts = extract_posts(&document);
    let next_page = extract_next_page(&document, base_url);

    ParsedTopicPage {
        title,
        posts,
        next_page,
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("h2.topic-title a, h2.topic-title").ok()?;

    document
        .select(&selector)
        .next()
        .map(collapse_whitespace_of)
        .filter(|s| !s.is_empty())
}

fn extract_posts(document: &Html) -> Vec<Post> {
    let post_selector = match Selector::parse("div.post") {
        Ok(sel) => sel,
        Err(_) => return Vec::new(),
    };

    document
        .select(&post_selector)
        .map(extract_post)
        .collect()
}

fn extract_post(post: ElementRef) -> Post {
    // Post anchors look like id="p12345"
    let id = post
        .value()
        .attr("id")
        .map(|raw| raw.trim_start_matches('p').to_string())
        .unwrap_or_default();

    let author = select_first(
        post,
        ".postprofile a.username-coloured, .postprofile a.username, \
         p.author a.username-coloured, p.author a.username",
    )
    .map(collapse_whitespace_of)
    .filter(|s| !s.is_empty())
    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let posted_at = select_first(post, "p.author time")
        .and_then(|time| time.value().attr("datetime"))
        .map(normalize_datetime)
        .unwrap_or_else(epoch);

    let content = select_first(post, "div.content")
        .map(collapse_whitespace_of)
        .unwrap_or_default();

    Post {
        id,
        author,
        posted_at,
        content,
    }
}

fn extract_next_page(document: &Html, base_url: &Url) -> Option<String> {
    let selector = Selector::parse(r#"a[rel="next"], li.next a"#).ok()?;

    let href = document
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))?;

    base_url.join(href).ok().map(|u| u.to_string())
}

/// Normalizes a source datetime string to ISO-8601 with offset
///
/// The forum emits RFC 3339 in `<time datetime="...">`; older skins render a
/// naive `YYYY-MM-DD HH:MM:SS`, taken as UTC. Anything unparsable falls back
/// to the epoch placeholder.
fn normalize_datetime(raw: &str) -> DateTime<FixedOffset> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt;
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_utc_datetime(&naive).fixed_offset();
    }

    epoch()
}

/// Placeholder timestamp for posts with a missing or unparsable date
fn epoch() -> DateTime<FixedOffset> {
    DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
}

fn select_first<'a>(element: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    element.select(&sel).next()
}

fn collapse_whitespace_of(element: ElementRef) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
