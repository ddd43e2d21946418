use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig, RegionEntry};
use crate::url::listing_page_url;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_regions(&config.regions)?;
    Ok(())
}

/// Validates crawl limits
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_sights < 1 {
        return Err(ConfigError::Validation(
            "max_sights must be >= 1".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1".to_string(),
        ));
    }

    if config.max_retries < 1 || config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be between 1 and 10, got {}",
            config.max_retries
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates fetcher settings
fn validate_http_config(config: &HttpConfig) -> ConfigResult<()> {
    if config.blocked_min_wait_ms > config.blocked_max_wait_ms {
        return Err(ConfigError::Validation(format!(
            "blocked_min_wait_ms ({}) cannot exceed blocked_max_wait_ms ({})",
            config.blocked_min_wait_ms, config.blocked_max_wait_ms
        )));
    }

    Url::parse(&config.referer)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid referer: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.data_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates region listing entries
fn validate_regions(regions: &[RegionEntry]) -> ConfigResult<()> {
    if regions.is_empty() {
        return Err(ConfigError::Validation(
            "at least one region must be configured".to_string(),
        ));
    }

    for entry in regions {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Region with listing URL '{}' must have a name",
                entry.listing_url
            )));
        }

        let url = Url::parse(&entry.listing_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid listing URL '{}': {}",
                entry.listing_url, e
            ))
        })?;

        if url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Listing URL '{}' must use HTTPS scheme",
                entry.listing_url
            )));
        }

        if listing_page_url(&entry.listing_url, 2).is_none() {
            return Err(ConfigError::Validation(format!(
                "Listing URL '{}' must end in a '-p<N>.html' page marker",
                entry.listing_url
            )));
        }
    }

    Ok(())
}
