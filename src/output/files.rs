//! Report file naming and writing
//!
//! Per-topic files are named deterministically from the topic id and a
//! sanitized title; the run summary file is named from the run timestamp.

use crate::config::OutputConfig;
use crate::model::{ExistenceStatus, RunSummary, ScrapeOutcome, Topic};
use crate::output::xml::{render_summary, render_topic};
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Longest sanitized title fragment kept in a filename
const MAX_TITLE_LEN: usize = 60;

/// Writes per-topic and summary reports into the output directory
pub struct ReportWriter {
    directory: PathBuf,
    separate_files: bool,
}

impl ReportWriter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
            separate_files: config.separate_files,
        }
    }

    /// Writes all reports for a completed run, returning the written paths
    ///
    /// Per-topic files are only written for topics that actually exist
    /// (`HasContent` or `Empty`); missing ids and fetch failures appear in
    /// the summary counts alone. The summary file is always written, even
    /// when zero topics succeeded.
    pub fn write_reports(
        &self,
        outcomes: &[ScrapeOutcome],
        summary: &RunSummary,
    ) -> Result<Vec<PathBuf>, HarvestError> {
        fs::create_dir_all(&self.directory)?;

        let mut written = Vec::new();

        if self.separate_files {
            for outcome in outcomes {
                if let ScrapeOutcome::Scraped(topic) = outcome {
                    if matches!(
                        topic.status,
                        ExistenceStatus::HasContent | ExistenceStatus::Empty
                    ) {
                        let path = self.directory.join(topic_filename(topic));
                        fs::write(&path, render_topic(topic)?)?;
                        tracing::debug!("Wrote {}", path.display());
                        written.push(path);
                    }
                }
            }
        }

        let summary_path = self.directory.join(summary_filename(Utc::now()));
        fs::write(&summary_path, render_summary(summary)?)?;
        tracing::info!("Summary written to {}", summary_path.display());
        written.push(summary_path);

        Ok(written)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Deterministic per-topic filename: `topic_<id>_<sanitized-title>.xml`
pub fn topic_filename(topic: &Topic) -> String {
    format!("topic_{}_{}.xml", topic.id, sanitize_title(&topic.title))
}

/// Run summary filename: `summary_<YYYYmmdd_HHMMSS>.xml`
pub fn summary_filename(now: DateTime<Utc>) -> String {
    format!("summary_{}.xml", now.format("%Y%m%d_%H%M%S"))
}

/// Reduces a topic title to a filesystem-safe fragment
///
/// Keeps ASCII alphanumerics, `-` and `_`; every other run of characters
/// collapses to a single underscore. The result is trimmed and truncated.
pub fn sanitize_title(title: &str) -> String {
    let mut sanitized = String::new();
    let mut last_was_filler = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            sanitized.push(c);
            last_was_filler = false;
        } else if !last_was_filler {
            sanitized.push('_');
            last_was_filler = true;
        }
        if sanitized.len() >= MAX_TITLE_LEN {
            break;
        }
    }

    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputConfig;
    use crate::model::Post;
    use chrono::{FixedOffset, TimeZone};

    fn topic(id: u64, title: &str, status: ExistenceStatus) -> Topic {
        let posts = if status == ExistenceStatus::HasContent {
            vec![Post {
                id: "1".to_string(),
                author: "alice".to_string(),
                posted_at: FixedOffset::east_opt(0)
                    .unwrap()
                    .with_ymd_and_hms(2023, 1, 1, 0, 0, 0)
                    .unwrap(),
                content: "hi".to_string(),
            }]
        } else {
            vec![]
        };

        Topic {
            id,
            url: format!("https://forum.example.org/viewtopic.php?t={}", id),
            title: title.to_string(),
            posts,
            status,
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_title("budget-2023_v2"), "budget-2023_v2");
    }

    #[test]
    fn test_sanitize_collapses_specials() {
        assert_eq!(sanitize_title("Vote: budget / 2023!"), "Vote_budget_2023");
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_title("Zápis ze schůze"), "Z_pis_ze_sch_ze");
    }

    #[test]
    fn test_sanitize_empty_title() {
        assert_eq!(sanitize_title(""), "untitled");
        assert_eq!(sanitize_title("///"), "untitled");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "a".repeat(200);
        assert!(sanitize_title(&long).len() <= MAX_TITLE_LEN);
    }

    #[test]
    fn test_topic_filename() {
        let t = topic(47593, "Vote: budget", ExistenceStatus::HasContent);
        assert_eq!(topic_filename(&t), "topic_47593_Vote_budget.xml");
    }

    #[test]
    fn test_summary_filename() {
        let now = Utc.with_ymd_and_hms(2023, 5, 12, 13, 45, 7).unwrap();
        assert_eq!(summary_filename(now), "summary_20230512_134507.xml");
    }

    #[test]
    fn test_write_reports_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().to_string_lossy().into_owned(),
            separate_files: true,
        };

        let outcomes = vec![
            ScrapeOutcome::Scraped(topic(1, "First", ExistenceStatus::HasContent)),
            ScrapeOutcome::Scraped(topic(2, "Gone", ExistenceStatus::NotFound)),
            ScrapeOutcome::Scraped(topic(3, "Quiet", ExistenceStatus::Empty)),
        ];
        let mut summary = RunSummary::new();
        for outcome in &outcomes {
            summary.record(outcome);
        }

        let writer = ReportWriter::new(&config);
        let written = writer.write_reports(&outcomes, &summary).unwrap();

        // Two topic files (HasContent + Empty) plus the summary
        assert_eq!(written.len(), 3);
        assert!(dir.path().join("topic_1_First.xml").exists());
        assert!(dir.path().join("topic_3_Quiet.xml").exists());
        assert!(!dir.path().join("topic_2_Gone.xml").exists());
    }

    #[test]
    fn test_write_reports_summary_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().to_string_lossy().into_owned(),
            separate_files: false,
        };

        let outcomes = vec![ScrapeOutcome::Scraped(topic(
            1,
            "First",
            ExistenceStatus::HasContent,
        ))];
        let mut summary = RunSummary::new();
        summary.record(&outcomes[0]);

        let writer = ReportWriter::new(&config);
        let written = writer.write_reports(&outcomes, &summary).unwrap();

        assert_eq!(written.len(), 1);
        assert!(written[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("summary_"));
    }

    #[test]
    fn test_summary_written_even_with_zero_successes() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig {
            directory: dir.path().to_string_lossy().into_owned(),
            separate_files: true,
        };

        let writer = ReportWriter::new(&config);
        let written = writer.write_reports(&[], &RunSummary::new()).unwrap();

        assert_eq!(written.len(), 1);
    }
}
