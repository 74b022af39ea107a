//! Event sources and the per-path load cache.
//!
//! Decoding instrument files is out of scope here; a source only has to turn a
//! sample identifier into an [`EventMatrix`] plus its [`ChannelStatistics`].
//! [`FileEventSource`] reads plain exports (CSV with a header row, or JSON) and
//! memoizes them in an injected [`EventCache`].

use crate::error::{EventError, Result};
use crate::matrix::{EventMatrix, LoadedSample};
use crate::ChannelName;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Anything that can produce the event matrix for a sample.
pub trait EventSource: Send + Sync {
    /// Load (or fetch an already loaded) sample.
    ///
    /// # Errors
    /// Returns `EventError::DataUnavailable` if the sample cannot be read.
    fn load(&self, sample_id: &str) -> Result<Arc<LoadedSample>>;
}

/// Unbounded memo of loaded samples keyed by file path.
///
/// Entries live until `clear` or until the cache is dropped. Two threads that
/// miss on the same path at the same time will both load it; the later `put`
/// replaces the earlier one, which is harmless because loaded samples are
/// read-only.
#[derive(Debug, Default)]
pub struct EventCache {
    entries: RwLock<FxHashMap<PathBuf, Arc<LoadedSample>>>,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<Arc<LoadedSample>> {
        self.entries.read().get(path).cloned()
    }

    pub fn put(&self, path: impl Into<PathBuf>, sample: Arc<LoadedSample>) {
        self.entries.write().insert(path.into(), sample);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// JSON export layout: `{"channels": [...], "events": [[...], ...]}`
#[derive(Deserialize)]
struct JsonEventFile {
    channels: Vec<String>,
    events: Vec<Vec<f64>>,
}

/// Reject sample ids that cannot be used as a single file name component.
///
/// Ids are joined onto source and cache directories, so an empty id, `.`,
/// `..`, path separators and NUL are refused.
///
/// # Errors
/// Returns `EventError::Configuration` naming the offending id.
pub fn check_sample_id(sample_id: &str) -> Result<()> {
    let bad = sample_id.is_empty()
        || sample_id == "."
        || sample_id.contains("..")
        || sample_id.contains(['/', '\\', '\0']);
    if bad {
        return Err(EventError::configuration(format!(
            "sample id {sample_id:?} is not a plain file name"
        )));
    }
    Ok(())
}

/// Reads `<root>/<sample>.csv` or `<root>/<sample>.json`.
pub struct FileEventSource {
    root: PathBuf,
    cache: Arc<EventCache>,
}

impl FileEventSource {
    pub fn new(root: impl Into<PathBuf>, cache: Arc<EventCache>) -> Self {
        Self {
            root: root.into(),
            cache,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache(&self) -> &Arc<EventCache> {
        &self.cache
    }

    /// Find the file backing a sample, preferring CSV over JSON
    pub fn resolve(&self, sample_id: &str) -> Result<PathBuf> {
        check_sample_id(sample_id)?;
        ["csv", "json"]
            .iter()
            .map(|ext| self.root.join(format!("{sample_id}.{ext}")))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                EventError::data_unavailable(
                    sample_id,
                    format!("no .csv or .json export under {}", self.root.display()),
                )
            })
    }

    fn read_file(path: &Path) -> Result<EventMatrix> {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => read_json(path),
            _ => read_csv(path),
        }
    }
}

impl EventSource for FileEventSource {
    fn load(&self, sample_id: &str) -> Result<Arc<LoadedSample>> {
        let path = self.resolve(sample_id)?;
        if let Some(sample) = self.cache.get(&path) {
            debug!("Event cache hit for {}", path.display());
            return Ok(sample);
        }

        let matrix = Self::read_file(&path).map_err(|e| match e {
            EventError::DataUnavailable { message, .. } => {
                EventError::data_unavailable(sample_id, message)
            }
            other => EventError::data_unavailable(sample_id, other.to_string()),
        })?;
        debug!(
            "Loaded {}: {} events, {} channels",
            path.display(),
            matrix.n_events(),
            matrix.n_channels()
        );

        let sample = LoadedSample::new(sample_id, matrix).shared();
        self.cache.put(path, sample.clone());
        Ok(sample)
    }
}

/// Parse a CSV export whose header row names the channels
pub fn read_csv(path: &Path) -> Result<EventMatrix> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let channels: Vec<ChannelName> = reader.headers()?.iter().map(Arc::from).collect();

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                field.parse::<f64>().map_err(|_| {
                    EventError::data_unavailable(
                        path.display().to_string(),
                        format!("row {row_idx} column {col}: '{field}' is not a number"),
                    )
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    EventMatrix::from_rows(channels, rows)
}

/// Parse a JSON export
pub fn read_json(path: &Path) -> Result<EventMatrix> {
    let text = std::fs::read_to_string(path)?;
    let file: JsonEventFile = serde_json::from_str(&text)?;
    let channels = file.channels.iter().map(|c| Arc::from(c.as_str())).collect();
    EventMatrix::from_rows(channels, file.events)
}
