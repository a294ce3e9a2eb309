//! Report output module
//!
//! Rendering of per-topic and summary XML documents, plus the file naming
//! and writing that persists them into the output directory.

mod files;
mod xml;

pub use files::{sanitize_title, summary_filename, topic_filename, ReportWriter};
pub use xml::{parse_topic_document, render_summary, render_topic, ParsedTopicDocument};
