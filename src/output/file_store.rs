//! JSON and CSV persistence under a data directory

use crate::model::{AttractionRecord, ReviewRecord};
use crate::output::traits::{default_file_name, OutputHandler, OutputResult, SavedFiles};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Entity name used for attraction files
pub const SIGHTS_ENTITY: &str = "sights";

/// Entity name used for review files
pub const REVIEWS_ENTITY: &str = "reviews";

/// Separator joining tags into a single CSV cell
pub const TAG_SEPARATOR: &str = "|";

/// Flat CSV row for an attraction record
#[derive(Debug, Serialize)]
struct SightRow<'a> {
    name: &'a str,
    rating: f64,
    address: &'a str,
    introduction: &'a str,
    review_count: i64,
    url: &'a str,
    city: &'a str,
    tags: String,
}

impl<'a> From<&'a AttractionRecord> for SightRow<'a> {
    fn from(record: &'a AttractionRecord) -> Self {
        Self {
            name: &record.name,
            rating: record.rating,
            address: &record.address,
            introduction: &record.introduction,
            review_count: record.review_count,
            url: &record.url,
            city: &record.city,
            tags: record.tags.join(TAG_SEPARATOR),
        }
    }
}

/// Writes data files into one directory
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `data_dir`; the directory is created on first write
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The directory files are written to
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn target(&self, entity: &str, extension: &str, file_name: Option<&str>) -> PathBuf {
        match file_name {
            Some(name) => self.data_dir.join(name),
            None => self.data_dir.join(default_file_name(entity, extension, now())),
        }
    }

    fn prepare(&self, path: &Path) -> OutputResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Writes `records` as a pretty-printed JSON array
    ///
    /// Non-ASCII text is written as-is and indentation is two spaces.
    pub fn save_json<T: Serialize>(
        &self,
        entity: &str,
        records: &[T],
        file_name: Option<&str>,
    ) -> OutputResult<PathBuf> {
        let path = self.target(entity, "json", file_name);
        self.prepare(&path)?;

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;

        tracing::info!("Saved {} {} records to {}", records.len(), entity, path.display());
        Ok(path)
    }

    /// Writes `rows` as CSV with a header taken from the row's field names
    ///
    /// Returns `None` without touching the filesystem when `rows` is empty.
    pub fn save_csv<T: Serialize>(
        &self,
        entity: &str,
        rows: &[T],
        file_name: Option<&str>,
    ) -> OutputResult<Option<PathBuf>> {
        if rows.is_empty() {
            tracing::warn!("No {} data to save as CSV", entity);
            return Ok(None);
        }

        let path = self.target(entity, "csv", file_name);
        self.prepare(&path)?;

        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        tracing::info!("Saved {} {} rows to {}", rows.len(), entity, path.display());
        Ok(Some(path))
    }

    /// Writes attraction records as CSV, joining tags with [`TAG_SEPARATOR`]
    pub fn save_sights_csv(
        &self,
        records: &[AttractionRecord],
        file_name: Option<&str>,
    ) -> OutputResult<Option<PathBuf>> {
        let rows: Vec<SightRow<'_>> = records.iter().map(SightRow::from).collect();
        self.save_csv(SIGHTS_ENTITY, &rows, file_name)
    }

    /// Loads attraction records from a JSON file
    ///
    /// Relative names resolve against the data directory.
    pub fn load_sights_json(&self, file_name: &str) -> OutputResult<Vec<AttractionRecord>> {
        let path = self.data_dir.join(file_name);
        let reader = BufReader::new(File::open(&path)?);
        let records: Vec<AttractionRecord> = serde_json::from_reader(reader)?;
        tracing::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// JSON and CSV file names in the data directory, newest first
    ///
    /// A missing data directory yields an empty list.
    pub fn recent_files(&self) -> OutputResult<Vec<String>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files: Vec<(String, SystemTime)> = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let is_data_file = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("json") | Some("csv")
            );
            if !is_data_file || !entry.file_type()?.is_file() {
                continue;
            }
            let modified = entry.metadata()?.modified()?;
            files.push((entry.file_name().to_string_lossy().into_owned(), modified));
        }

        files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(files.into_iter().map(|(name, _)| name).collect())
    }
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Default JSON and CSV names for one save, sharing a timestamp
fn file_pair(entity: &str, at: NaiveDateTime) -> (String, String) {
    (
        default_file_name(entity, "json", at),
        default_file_name(entity, "csv", at),
    )
}

impl OutputHandler for FileStore {
    fn save_sights(&self, records: &[AttractionRecord]) -> OutputResult<SavedFiles> {
        let (json, csv) = file_pair(SIGHTS_ENTITY, now());
        Ok(SavedFiles {
            json: Some(self.save_json(SIGHTS_ENTITY, records, Some(&json))?),
            csv: self.save_sights_csv(records, Some(&csv))?,
        })
    }

    fn save_reviews(&self, reviews: &[ReviewRecord]) -> OutputResult<SavedFiles> {
        if reviews.is_empty() {
            tracing::warn!("No reviews collected, skipping review files");
            return Ok(SavedFiles::default());
        }
        let (json, csv) = file_pair(REVIEWS_ENTITY, now());
        Ok(SavedFiles {
            json: Some(self.save_json(REVIEWS_ENTITY, reviews, Some(&json))?),
            csv: self.save_csv(REVIEWS_ENTITY, reviews, Some(&csv))?,
        })
    }
}
