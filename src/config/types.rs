use serde::Deserialize;

/// Main configuration structure for Forum-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub forum: ForumConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    pub scrape: ScrapeConfig,
    pub output: OutputConfig,
}

/// Target forum identification
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Base URL of the forum, without a trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User agent string sent with every outbound request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Login credentials; leave both empty to scrape anonymously
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Topic id range and pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeConfig {
    /// First topic id of the range (inclusive)
    #[serde(rename = "start-id")]
    pub start_id: u64,

    /// Last topic id of the range (inclusive)
    #[serde(rename = "end-id")]
    pub end_id: u64,

    /// Step between consecutive ids in the range
    #[serde(default = "default_step")]
    pub step: u64,

    /// Topic id to fetch first, regardless of its position in the range
    #[serde(rename = "priority-id", default)]
    pub priority_id: Option<u64>,

    /// Minimum time between outbound requests (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Defensive cap on pages followed within a single topic
    #[serde(rename = "max-pages-per-topic", default = "default_max_pages")]
    pub max_pages_per_topic: u32,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where report files are written
    pub directory: String,

    /// Write one XML file per scraped topic in addition to the summary
    #[serde(rename = "separate-files", default = "default_separate_files")]
    pub separate_files: bool,
}

fn default_step() -> u64 {
    1
}

fn default_max_pages() -> u32 {
    50
}

fn default_separate_files() -> bool {
    true
}
