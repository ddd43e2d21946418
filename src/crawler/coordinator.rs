//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl flow that coordinates all stages of a run:
//! - Walking region listing pages to discover detail links
//! - Fetching and assembling detail pages one at a time
//! - Cleaning, scoring and persisting the records
//! - Optionally crawling review pages for the first records
//! - Writing the run summary

use crate::config::Config;
use crate::crawler::assembler::assemble_record;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::discover_sight_links;
use crate::crawler::scheduler::Pacer;
use crate::extract::{parse_reviews, MAX_REVIEWS_PER_PAGE};
use crate::model::{AttractionRecord, PageOutcome, RejectReason, ReviewRecord};
use crate::output::{
    generate_markdown_summary, log_quality, CrawlSummary, DataQuality, FileStore, OutputHandler,
    OutputResult, SavedFiles, REVIEWS_ENTITY, SIGHTS_ENTITY,
};
use crate::pipeline::clean_records;
use crate::url::listing_page_url;
use crate::Result;
use chrono::Local;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

/// Number of attractions crawled by the debug trial
pub const DEBUG_TRIAL_SIGHTS: usize = 10;

/// Review page URL for an attraction detail page
///
/// ```
/// use sight_crawler::crawler::review_url;
///
/// assert_eq!(
///     review_url("https://you.ctrip.com/sight/beijing1/229.html"),
///     "https://you.ctrip.com/sight/beijing1/229/review.html"
/// );
/// ```
pub fn review_url(sight_url: &str) -> String {
    sight_url.replace(".html", "/review.html")
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    fetcher: Fetcher,
    pacer: Pacer,
    store: FileStore,
    summary: CrawlSummary,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    /// * `config_hash` - Fingerprint of the configuration, recorded in the summary
    pub fn new(config: Config, config_hash: String) -> Result<Self> {
        let fetcher = Fetcher::new(&config)?;
        let pacer = Pacer::from_config(&config.crawler);
        let store = FileStore::new(&config.output.data_dir);

        let summary = CrawlSummary {
            config_hash,
            ..CrawlSummary::new()
        };

        Ok(Self {
            config,
            fetcher,
            pacer,
            store,
            summary,
        })
    }

    /// The summary accumulated so far
    pub fn summary(&self) -> &CrawlSummary {
        &self.summary
    }

    /// Walks every region's listing pages and collects attraction links
    ///
    /// Listing pages that cannot be fetched are skipped. The result is
    /// deduplicated and sorted.
    pub async fn collect_sight_links(&mut self) -> Vec<String> {
        let mut links = BTreeSet::new();
        let regions = self.config.regions.clone();

        for region in &regions {
            tracing::info!("Collecting attraction links for {}", region.name);

            for page in 1..=self.config.crawler.max_pages {
                let Some(page_url) = listing_page_url(&region.listing_url, page) else {
                    tracing::warn!(
                        "Listing URL {} has no page marker, skipping region",
                        region.listing_url
                    );
                    break;
                };

                self.pacer.wait().await;
                let Some(html) = self.fetcher.fetch(&page_url).await else {
                    tracing::warn!("Skipping listing page {}", page_url);
                    continue;
                };

                let found = discover_sight_links(&html);
                tracing::info!("{} page {}: {} attraction links", region.name, page, found.len());
                links.extend(found);
            }
        }

        tracing::info!("Collected {} unique attraction links", links.len());
        self.summary.links_discovered = links.len() as u64;
        links.into_iter().collect()
    }

    /// Fetches one detail page and assembles it
    pub async fn fetch_sight(&mut self, url: &str) -> PageOutcome {
        self.pacer.wait().await;
        self.summary.pages_attempted += 1;

        let outcome = match self.fetcher.fetch(url).await {
            Some(html) => assemble_record(&html, url),
            None => {
                let reason = RejectReason::FetchFailed;
                tracing::warn!("Rejected {} [{}]: {}", url, reason.label(), reason);
                PageOutcome::Rejected(reason)
            }
        };

        match &outcome {
            PageOutcome::Assembled(_) => self.summary.records_assembled += 1,
            PageOutcome::Rejected(reason) => self.summary.record_rejection(reason.label()),
        }

        outcome
    }

    /// Crawls detail pages in order until `max` records are assembled
    pub async fn crawl_sights(&mut self, links: &[String], max: usize) -> Vec<AttractionRecord> {
        let mut records = Vec::new();

        for link in links {
            if records.len() >= max {
                break;
            }
            if let Some(record) = self.fetch_sight(link).await.into_record() {
                records.push(record);
                tracing::info!("Crawled {}/{} attractions", records.len(), max);
            }
        }

        records
    }

    /// Crawls review pages for the first `max-reviews-per-sight` records
    pub async fn crawl_reviews(&mut self, records: &[AttractionRecord]) -> Vec<ReviewRecord> {
        let today = Local::now().date_naive();
        let mut reviews = Vec::new();

        for record in records.iter().take(self.config.crawler.max_reviews_per_sight) {
            let url = review_url(&record.url);
            self.pacer.wait().await;

            let Some(html) = self.fetcher.fetch(&url).await else {
                tracing::warn!("Skipping reviews for {}", record.name);
                continue;
            };

            let found = parse_reviews(&html, &record.name, MAX_REVIEWS_PER_PAGE, today);
            tracing::info!("{}: {} reviews", record.name, found.len());
            reviews.extend(found);
        }

        self.summary.reviews_collected = reviews.len() as u64;
        reviews
    }

    /// Runs a complete crawl and returns its summary
    ///
    /// In debug mode a small trial crawl runs first; if it yields nothing
    /// the run stops without writing data files.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        let start_time = self.start();

        let links = self.collect_sight_links().await;
        if links.is_empty() {
            tracing::warn!("No attraction links found, check the listing URLs or page structure");
        }

        self.crawl_links(&links, start_time).await
    }

    /// Runs every stage after link discovery on an already known link set
    pub async fn run_with_links(&mut self, links: &[String]) -> Result<CrawlSummary> {
        let start_time = self.start();
        self.summary.links_discovered = links.len() as u64;
        self.crawl_links(links, start_time).await
    }

    fn start(&mut self) -> Instant {
        self.summary.started_at = Local::now().to_rfc3339();
        tracing::info!(
            "Starting crawl of up to {} attractions",
            self.config.crawler.max_sights
        );
        Instant::now()
    }

    async fn crawl_links(&mut self, links: &[String], start_time: Instant) -> Result<CrawlSummary> {
        if self.config.crawler.debug_mode {
            tracing::info!("Debug mode: trial crawl of {} attractions", DEBUG_TRIAL_SIGHTS);
            self.summary.debug_trial = true;

            let trial = self.crawl_sights(links, DEBUG_TRIAL_SIGHTS).await;
            if trial.is_empty() {
                tracing::error!("Trial crawl produced no records, aborting");
                return self.finish(start_time);
            }
            tracing::info!("Trial produced {} records, starting full crawl", trial.len());

            // Counters describe the full crawl only
            self.summary.pages_attempted = 0;
            self.summary.records_assembled = 0;
            self.summary.rejections.clear();
        }

        let records = self
            .crawl_sights(links, self.config.crawler.max_sights)
            .await;

        if records.is_empty() {
            tracing::warn!("No attraction records were assembled");
            return self.finish(start_time);
        }

        let cleaned = clean_records(records);
        self.summary.records_cleaned = cleaned.len() as u64;

        let quality = DataQuality::from_records(&cleaned);
        log_quality(&quality);
        self.summary.quality = quality;

        if cleaned.is_empty() {
            tracing::warn!("Cleaning left no records, nothing to save");
            return self.finish(start_time);
        }

        let saved = self.store.save_sights(&cleaned);
        self.record_save(SIGHTS_ENTITY, saved);

        if self.config.crawler.crawl_reviews {
            tracing::info!("Crawling reviews");
            let reviews = self.crawl_reviews(&cleaned).await;
            let saved = self.store.save_reviews(&reviews);
            self.record_save(REVIEWS_ENTITY, saved);
        }

        self.finish(start_time)
    }

    /// Notes written files, or logs and records a failed save
    fn record_save(&mut self, entity: &str, saved: OutputResult<SavedFiles>) {
        match saved {
            Ok(saved) => self.summary.files_written.extend(saved.paths().cloned()),
            Err(e) => {
                tracing::error!("Failed to save {}: {}", entity, e);
                self.summary.save_failures.push(format!("{}: {}", entity, e));
            }
        }
    }

    /// Stamps the end of the run and writes the markdown summary if configured
    fn finish(&mut self, start_time: Instant) -> Result<CrawlSummary> {
        self.summary.finished_at = Some(Local::now().to_rfc3339());
        self.summary.duration_seconds = Some(start_time.elapsed().as_secs());

        if let Some(path) = &self.config.output.summary_path {
            generate_markdown_summary(&self.summary, Path::new(path))?;
            tracing::info!("Wrote run summary to {}", path);
        }

        tracing::info!(
            "Crawl finished: {} pages attempted, {} records kept, {} files written",
            self.summary.pages_attempted,
            self.summary.records_cleaned,
            self.summary.files_written.len()
        );

        Ok(self.summary.clone())
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use sight_crawler::config::load_config_with_hash;
/// use sight_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("config.toml"))?;
/// let summary = run_crawl(config, hash).await?;
/// println!("{} records", summary.records_cleaned);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: String) -> Result<CrawlSummary> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
