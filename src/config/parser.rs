use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

/// Reads a TOML crawler configuration, applies environment overrides and validates it
///
/// Overrides (see [`apply_env_overrides`]) land before validation.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sight_crawler::config::load_config;
///
/// let config = load_config(Path::new("crawler.toml")).unwrap();
/// println!("Max retries: {}", config.crawler.max_retries);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides on top of a parsed configuration
///
/// Recognised keys:
///
/// | Key | Field |
/// |-----|-------|
/// | `MAX_SIGHTS` | `crawler.max-sights` |
/// | `MAX_RETRIES` | `crawler.max-retries` |
/// | `TIMEOUT` | `crawler.timeout-secs` |
/// | `REQUEST_DELAY` | seconds; sets `min-delay-ms`, `max-delay-ms` becomes twice that |
/// | `DEBUG_MODE` | `crawler.debug-mode` (`true` case-insensitive) |
/// | `CRAWL_REVIEWS` | `crawler.crawl-reviews` |
/// | `MAX_REVIEWS_PER_SIGHT` | `crawler.max-reviews-per-sight` |
/// | `DATA_DIR` | `output.data-dir` |
///
/// Values are read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("MAX_SIGHTS") {
        config.crawler.max_sights = parse_env("MAX_SIGHTS", &value)?;
    }
    if let Some(value) = lookup("MAX_RETRIES") {
        config.crawler.max_retries = parse_env("MAX_RETRIES", &value)?;
    }
    if let Some(value) = lookup("TIMEOUT") {
        config.crawler.timeout_secs = parse_env("TIMEOUT", &value)?;
    }
    if let Some(value) = lookup("REQUEST_DELAY") {
        let seconds: f64 = parse_env("REQUEST_DELAY", &value)?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ConfigError::Env {
                key: "REQUEST_DELAY".to_string(),
                message: format!("expected a non-negative number of seconds, got '{}'", value),
            });
        }
        let millis = (seconds * 1000.0).round() as u64;
        let doubled = millis.checked_mul(2).ok_or_else(|| ConfigError::Env {
            key: "REQUEST_DELAY".to_string(),
            message: format!("delay of {} seconds is too large", value),
        })?;
        config.crawler.min_delay_ms = millis;
        config.crawler.max_delay_ms = doubled;
    }
    if let Some(value) = lookup("DEBUG_MODE") {
        config.crawler.debug_mode = parse_flag(&value);
    }
    if let Some(value) = lookup("CRAWL_REVIEWS") {
        config.crawler.crawl_reviews = parse_flag(&value);
    }
    if let Some(value) = lookup("MAX_REVIEWS_PER_SIGHT") {
        config.crawler.max_reviews_per_sight = parse_env("MAX_REVIEWS_PER_SIGHT", &value)?;
    }
    if let Some(value) = lookup("DATA_DIR") {
        config.output.data_dir = value;
    }

    Ok(())
}

fn parse_env<T>(key: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Hex SHA-256 of the raw configuration file, recorded in the run summary
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&content)))
}

/// [`load_config`] plus [`compute_config_hash`] of the same file
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
