//! Configuration module for Sight-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and applying environment overrides on top of them.
//!
//! # Example
//!
//! ```no_run
//! use sight_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawler will assemble at most {} sights", config.crawler.max_sights);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, RegionEntry};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash,
};
pub use validation::validate;
