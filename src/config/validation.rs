use crate::config::types::{Config, CrawlerConfig, OutputConfig, RetryConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrency must be between 1 and 100, got {}",
            config.max_concurrency
        )));
    }

    if config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    for extension in &config.excluded_extensions {
        let trimmed = extension.trim().trim_start_matches('.');
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(ConfigError::Validation(format!(
                "Invalid excluded extension: '{}'",
                extension
            )));
        }
    }

    Ok(())
}

/// Validates retry backoff configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if !config.backoff_multiplier.is_finite() || config.backoff_multiplier < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_multiplier must be >= 1.0, got {}",
            config.backoff_multiplier
        )));
    }

    if config.max_backoff_ms < config.initial_backoff_ms {
        return Err(ConfigError::Validation(format!(
            "max_backoff_ms ({}) must be >= initial_backoff_ms ({})",
            config.max_backoff_ms, config.initial_backoff_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::Validation(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_concurrency_bounds() {
        let mut config = Config::default();
        config.crawler.max_concurrency = 0;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrency = 101;
        assert!(validate(&config).is_err());

        config.crawler.max_concurrency = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_depth_and_retries_are_valid() {
        let mut config = Config::default();
        config.crawler.max_depth = 0;
        config.crawler.max_retries = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_request_timeout_minimum() {
        let mut config = Config::default();
        config.crawler.request_timeout_ms = 99;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_invalid_extensions() {
        let mut config = Config::default();
        config.crawler.excluded_extensions = vec![".".to_string()];
        assert!(validate(&config).is_err());

        config.crawler.excluded_extensions = vec!["tar/gz".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_backoff_validation() {
        let mut config = Config::default();
        config.retry.backoff_multiplier = 0.5;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.retry.initial_backoff_ms = 500;
        config.retry.max_backoff_ms = 100;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_user_agent_validation() {
        let mut config = Config::default();
        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.user_agent.crawler_name = "bad name".to_string();
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.user_agent.contact_url = Some("not a url".to_string());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_user_agent_header_value() {
        let mut config = UserAgentConfig::default();
        config.crawler_name = "MapBot".to_string();
        config.crawler_version = "2.1".to_string();
        assert_eq!(config.header_value(), "MapBot/2.1");

        config.contact_url = Some("https://example.com/bot".to_string());
        assert_eq!(config.header_value(), "MapBot/2.1 (+https://example.com/bot)");
    }

    #[test]
    fn test_empty_output_path() {
        let mut config = Config::default();
        config.output.path = "  ".to_string();
        assert!(validate(&config).is_err());
    }
}
