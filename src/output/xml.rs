//! XML report rendering and round-trip parsing
//!
//! Per-topic documents carry the topic id, canonical URL, scrape timestamp,
//! title, and every post in insertion order. The summary document carries the
//! per-status counts and the list of scraped topics. All text and attribute
//! values are escaped by the writer, so arbitrary post content round-trips
//! losslessly; `parse_topic_document` is the other half of that contract.

use crate::model::{Post, RunSummary, Topic};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Renders one topic as an XML document
pub fn render_topic(topic: &Topic) -> Result<String, HarvestError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut topic_start = BytesStart::new("topic");
    topic_start.push_attribute(("id", topic.id.to_string().as_str()));
    topic_start.push_attribute(("url", topic.url.as_str()));
    topic_start.push_attribute(("status", topic.status.as_str()));
    topic_start.push_attribute(("scraped-at", topic.scraped_at.to_rfc3339().as_str()));
    writer.write_event(Event::Start(topic_start))?;

    write_text_element(&mut writer, "title", &topic.title)?;

    let mut posts_start = BytesStart::new("posts");
    posts_start.push_attribute(("count", topic.posts.len().to_string().as_str()));
    writer.write_event(Event::Start(posts_start))?;

    for post in &topic.posts {
        let mut post_start = BytesStart::new("post");
        post_start.push_attribute(("id", post.id.as_str()));
        writer.write_event(Event::Start(post_start))?;

        write_text_element(&mut writer, "author", &post.author)?;
        write_text_element(&mut writer, "posted-at", &post.posted_at.to_rfc3339())?;
        write_text_element(&mut writer, "content", &post.content)?;

        writer.write_event(Event::End(BytesEnd::new("post")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("posts")))?;
    writer.write_event(Event::End(BytesEnd::new("topic")))?;

    into_string(writer)
}

/// Renders the aggregate run summary as an XML document
pub fn render_summary(summary: &RunSummary) -> Result<String, HarvestError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("run-summary");
    root.push_attribute(("generated-at", Utc::now().to_rfc3339().as_str()));
    root.push_attribute((
        "elapsed-seconds",
        format!("{:.1}", summary.elapsed.as_secs_f64()).as_str(),
    ));
    root.push_attribute(("total", summary.total().to_string().as_str()));
    writer.write_event(Event::Start(root))?;

    let mut counts = BytesStart::new("counts");
    counts.push_attribute(("has-content", summary.has_content.to_string().as_str()));
    counts.push_attribute(("empty", summary.empty.to_string().as_str()));
    counts.push_attribute(("not-found", summary.not_found.to_string().as_str()));
    counts.push_attribute(("fetch-error", summary.fetch_error.to_string().as_str()));
    writer.write_event(Event::Empty(counts))?;

    writer.write_event(Event::Start(BytesStart::new("topics")))?;
    for topic_ref in &summary.scraped {
        let mut entry = BytesStart::new("topic");
        entry.push_attribute(("id", topic_ref.id.to_string().as_str()));
        entry.push_attribute(("title", topic_ref.title.as_str()));
        writer.write_event(Event::Empty(entry))?;
    }
    writer.write_event(Event::End(BytesEnd::new("topics")))?;

    writer.write_event(Event::End(BytesEnd::new("run-summary")))?;

    into_string(writer)
}

/// Data recovered from a rendered topic document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTopicDocument {
    pub id: u64,
    pub title: String,
    pub posts: Vec<Post>,
}

/// Parses a topic document back into its id, title, and ordered post list
pub fn parse_topic_document(xml: &str) -> Result<ParsedTopicDocument, HarvestError> {
    let mut reader = Reader::from_str(xml);

    let mut id: Option<u64> = None;
    let mut title = String::new();
    let mut posts = Vec::new();

    // The element whose text content we are currently collecting
    let mut current_field: Option<Vec<u8>> = None;
    let mut pending_post: Option<PendingPost> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Eof => break,
            Event::Start(e) => match e.name().as_ref() {
                b"topic" => {
                    id = Some(
                        attribute(&e, b"id")?
                            .parse()
                            .map_err(|_| HarvestError::MalformedReport(
                                "topic id is not an integer".to_string(),
                            ))?,
                    );
                }
                b"post" => {
                    pending_post = Some(PendingPost {
                        id: attribute(&e, b"id")?,
                        ..PendingPost::default()
                    });
                }
                name @ (b"title" | b"author" | b"posted-at" | b"content") => {
                    current_field = Some(name.to_vec());
                }
                _ => {}
            },
            Event::Text(e) => {
                // Text outside a tracked field is inter-element indentation
                let text = e.unescape().map_err(malformed)?.into_owned();
                match current_field.as_deref() {
                    Some(b"title") => title = text,
                    Some(b"author") => {
                        if let Some(post) = pending_post.as_mut() {
                            post.author = text;
                        }
                    }
                    Some(b"posted-at") => {
                        if let Some(post) = pending_post.as_mut() {
                            post.posted_at = text;
                        }
                    }
                    Some(b"content") => {
                        if let Some(post) = pending_post.as_mut() {
                            post.content = text;
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"post" => {
                    if let Some(pending) = pending_post.take() {
                        posts.push(pending.finish()?);
                    }
                }
                b"title" | b"author" | b"posted-at" | b"content" => {
                    current_field = None;
                }
                _ => {}
            },
            _ => {}
        }
    }

    let id = id.ok_or_else(|| {
        HarvestError::MalformedReport("missing <topic> element".to_string())
    })?;

    Ok(ParsedTopicDocument { id, title, posts })
}

#[derive(Debug, Default)]
struct PendingPost {
    id: String,
    author: String,
    posted_at: String,
    content: String,
}

impl PendingPost {
    fn finish(self) -> Result<Post, HarvestError> {
        let posted_at = DateTime::parse_from_rfc3339(&self.posted_at).map_err(|e| {
            HarvestError::MalformedReport(format!(
                "invalid posted-at '{}': {}",
                self.posted_at, e
            ))
        })?;

        Ok(Post {
            id: self.id,
            author: self.author,
            posted_at,
            content: self.content,
        })
    }
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), HarvestError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn into_string(writer: Writer<Vec<u8>>) -> Result<String, HarvestError> {
    String::from_utf8(writer.into_inner())
        .map_err(|e| HarvestError::MalformedReport(format!("non-UTF-8 output: {}", e)))
}

fn attribute(element: &BytesStart, name: &[u8]) -> Result<String, HarvestError> {
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.as_ref() == name {
            return Ok(attr.unescape_value().map_err(malformed)?.into_owned());
        }
    }
    Err(HarvestError::MalformedReport(format!(
        "missing attribute '{}'",
        String::from_utf8_lossy(name)
    )))
}

fn malformed<E: std::fmt::Display>(e: E) -> HarvestError {
    HarvestError::MalformedReport(e.to_string())
}
