use crate::config::types::{Config, ForumConfig, OutputConfig, ScrapeConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Validation runs before any network activity; a failure here is fatal for
/// the whole run.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_forum_config(&config.forum)?;
    validate_scrape_config(&config.scrape)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates forum identification
fn validate_forum_config(config: &ForumConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.base_url.ends_with('/') {
        return Err(ConfigError::Validation(
            "base-url must not end with a trailing slash".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the id range and pacing settings
fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.start_id > config.end_id {
        return Err(ConfigError::Validation(format!(
            "start-id ({}) must not exceed end-id ({})",
            config.start_id, config.end_id
        )));
    }

    if config.step < 1 {
        return Err(ConfigError::Validation(format!(
            "step must be >= 1, got {}",
            config.step
        )));
    }

    if config.delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "delay-ms must be >= 100ms, got {}ms",
            config.delay_ms
        )));
    }

    if config.max_pages_per_topic < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-per-topic must be >= 1, got {}",
            config.max_pages_per_topic
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CredentialsConfig;

    fn valid_config() -> Config {
        Config {
            forum: ForumConfig {
                base_url: "https://forum.example.org".to_string(),
                user_agent: "Mozilla/5.0 (test)".to_string(),
            },
            credentials: CredentialsConfig::default(),
            scrape: ScrapeConfig {
                start_id: 100,
                end_id: 200,
                step: 1,
                priority_id: None,
                delay_ms: 2000,
                max_pages_per_topic: 50,
            },
            output: OutputConfig {
                directory: "./data".to_string(),
                separate_files: true,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = valid_config();
        config.scrape.start_id = 300;
        config.scrape.end_id = 200;

        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut config = valid_config();
        config.scrape.step = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_tiny_delay_rejected() {
        let mut config = valid_config();
        config.scrape.delay_ms = 10;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = valid_config();
        config.forum.base_url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_trailing_slash_rejected() {
        let mut config = valid_config();
        config.forum.base_url = "https://forum.example.org/".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_directory_rejected() {
        let mut config = valid_config();
        config.output.directory = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_credentials_allowed() {
        // Anonymous scraping is a supported mode, not a config error
        let config = valid_config();
        assert!(config.credentials.username.is_empty());
        assert!(validate(&config).is_ok());
    }
}
