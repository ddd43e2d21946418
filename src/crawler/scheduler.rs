//! Request pacing
//!
//! The crawl is strictly sequential; the pacer only spaces consecutive
//! fetches by a randomized delay so the target site sees a human-like
//! request rhythm.

use crate::config::CrawlerConfig;
use std::time::{Duration, Instant};

/// Imposes a random delay between consecutive fetches
#[derive(Debug, Clone)]
pub struct Pacer {
    /// Lower bound of the delay
    min_delay: Duration,

    /// Upper bound of the delay
    max_delay: Duration,

    /// When the previous fetch was released, if any
    last_release: Option<Instant>,

    /// Number of fetches released so far
    released: u64,
}

impl Pacer {
    /// Creates a pacer with explicit bounds in milliseconds
    ///
    /// Inverted bounds are swapped rather than rejected.
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        let (low, high) = if min_delay_ms <= max_delay_ms {
            (min_delay_ms, max_delay_ms)
        } else {
            (max_delay_ms, min_delay_ms)
        };

        Self {
            min_delay: Duration::from_millis(low),
            max_delay: Duration::from_millis(high),
            last_release: None,
            released: 0,
        }
    }

    /// Creates a pacer from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// Draws the next delay uniformly from the configured bounds
    pub fn next_delay(&self) -> Duration {
        if self.max_delay > self.min_delay {
            let millis = rand::random_range(self.min_delay.as_millis()..=self.max_delay.as_millis());
            Duration::from_millis(millis as u64)
        } else {
            self.min_delay
        }
    }

    /// Waits until the next fetch may start
    ///
    /// The first call returns immediately. Later calls sleep for a freshly
    /// drawn delay, minus whatever time already passed since the previous
    /// release.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_release {
            let delay = self.next_delay();
            let elapsed = last.elapsed();
            if delay > elapsed {
                let remaining = delay - elapsed;
                tracing::trace!("Pacing next request by {:?}", remaining);
                tokio::time::sleep(remaining).await;
            }
        }

        self.last_release = Some(Instant::now());
        self.released += 1;
    }

    /// Number of fetches released so far
    pub fn released(&self) -> u64 {
        self.released
    }
}
