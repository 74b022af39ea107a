use crate::error::{GateError, Result};
use crate::types::{Gate, RetainedSet};
use cytogate_events::{SampleId, check_sample_id};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache key for a derived population
///
/// This key identifies a cached population by:
/// - The sample it was derived from
/// - The ids of the gates applied to it
///
/// Gate ids are stored as a sorted, deduplicated list, so gate order and
/// repeated gates do not change the key. Only ids take part: a gate whose
/// geometry changes under the same id maps to the same key and the stale
/// population is served.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PopulationCacheKey {
    pub sample_id: SampleId,
    pub gate_ids: Vec<Arc<str>>,
}

impl PopulationCacheKey {
    /// Create a new cache key
    pub fn new(
        sample_id: impl Into<SampleId>,
        gate_ids: impl IntoIterator<Item = impl Into<Arc<str>>>,
    ) -> Self {
        let mut ids: Vec<Arc<str>> = gate_ids.into_iter().map(|s| s.into()).collect();
        ids.sort();
        ids.dedup();

        Self {
            sample_id: sample_id.into(),
            gate_ids: ids,
        }
    }

    /// Key for applying `gates` to a sample
    pub fn for_gates(sample_id: impl Into<SampleId>, gates: &[Gate]) -> Self {
        Self::new(sample_id, gates.iter().map(|g| g.id.clone()))
    }

    /// 16 hex digit digest of the sorted gate ids
    pub fn fingerprint(&self) -> String {
        let mut hasher = FxHasher::default();
        // Fixed width, so the count hashes the same on 32 and 64 bit targets
        (self.gate_ids.len() as u64).hash(&mut hasher);
        for id in &self.gate_ids {
            id.hash(&mut hasher);
        }
        format!("{:016x}", hasher.finish())
    }

    /// File name of this population inside a cache directory
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.sample_id, self.fingerprint())
    }
}

/// Trait for caching derived populations
///
/// This trait allows the population filter to work with any cache implementation.
/// A hit is trusted verbatim.
pub trait PopulationCache: Send + Sync {
    /// Get a cached population for a key
    ///
    /// Returns `Some(Arc<RetainedSet>)` if the value is cached, `None` otherwise
    fn get(&self, key: &PopulationCacheKey) -> Option<Arc<RetainedSet>>;

    /// Store a population
    ///
    /// # Errors
    /// Returns `GateError::CacheWrite` if the population could not be persisted.
    fn put(&self, key: &PopulationCacheKey, retained: Arc<RetainedSet>) -> Result<()>;
}

impl<T: PopulationCache + ?Sized> PopulationCache for Box<T> {
    fn get(&self, key: &PopulationCacheKey) -> Option<Arc<RetainedSet>> {
        (**self).get(key)
    }

    fn put(&self, key: &PopulationCacheKey, retained: Arc<RetainedSet>) -> Result<()> {
        (**self).put(key, retained)
    }
}

/// One JSON array file per (sample, gate id set) under a directory.
#[derive(Debug, Clone)]
pub struct FilePopulationCache {
    dir: PathBuf,
}

impl FilePopulationCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Entry path for a key; the sample id must be a plain file name
    pub fn path_for(&self, key: &PopulationCacheKey) -> Result<PathBuf> {
        check_sample_id(&key.sample_id)?;
        Ok(self.dir.join(key.file_name()))
    }
}

impl PopulationCache for FilePopulationCache {
    fn get(&self, key: &PopulationCacheKey) -> Option<Arc<RetainedSet>> {
        let path = match self.path_for(key) {
            Ok(path) => path,
            Err(e) => {
                warn!("Not reading population cache: {}", e);
                return None;
            }
        };
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Ignoring unreadable population cache {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<RetainedSet>(&text) {
            Ok(set) => Some(Arc::new(set)),
            Err(e) => {
                warn!("Ignoring corrupt population cache {}: {}", path.display(), e);
                None
            }
        }
    }

    fn put(&self, key: &PopulationCacheKey, retained: Arc<RetainedSet>) -> Result<()> {
        let path = self
            .path_for(key)
            .map_err(|e| GateError::cache_write(&self.dir, e.to_string()))?;
        let write_err = |message: String| GateError::cache_write(&path, message);

        fs::create_dir_all(&self.dir).map_err(|e| write_err(e.to_string()))?;
        let json = serde_json::to_vec(retained.as_ref()).map_err(|e| write_err(e.to_string()))?;

        // Readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| write_err(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            write_err(e.to_string())
        })?;

        debug!("Wrote {} retained events to {}", retained.len(), path.display());
        Ok(())
    }
}

/// In-process population cache
#[derive(Debug, Default)]
pub struct MemoryPopulationCache {
    entries: RwLock<FxHashMap<PopulationCacheKey, Arc<RetainedSet>>>,
}

impl MemoryPopulationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl PopulationCache for MemoryPopulationCache {
    fn get(&self, key: &PopulationCacheKey) -> Option<Arc<RetainedSet>> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &PopulationCacheKey, retained: Arc<RetainedSet>) -> Result<()> {
        self.entries.write().insert(key.clone(), retained);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ignores_order_and_duplicates() {
        let a = PopulationCacheKey::new("s1", ["g2", "g1", "g2"]);
        let b = PopulationCacheKey::new("s1", ["g1", "g2"]);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);

        let c = PopulationCacheKey::new("s1", ["g1"]);
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.file_name(), format!("s1-{}.json", a.fingerprint()));
    }

    #[test]
    fn test_file_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePopulationCache::new(dir.path().join("populations"));
        let key = PopulationCacheKey::new("s1", ["g1"]);

        assert!(cache.get(&key).is_none());
        cache
            .put(&key, Arc::new(RetainedSet::from_indices([1, 4, 7])))
            .unwrap();

        let text = fs::read_to_string(cache.path_for(&key).unwrap()).unwrap();
        assert_eq!(text, "[1,4,7]");
        assert_eq!(cache.get(&key).unwrap().as_slice(), &[1, 4, 7]);
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FilePopulationCache::new(dir.path());
        let key = PopulationCacheKey::new("s1", ["g1"]);

        fs::write(cache.path_for(&key).unwrap(), "[1, 2,").unwrap();
        assert!(cache.get(&key).is_none());

        fs::write(cache.path_for(&key).unwrap(), "[5, 2]").unwrap();
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_unwritable_dir_is_cache_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let cache = FilePopulationCache::new(&blocker);
        let key = PopulationCacheKey::new("s1", ["g1"]);
        let err = cache
            .put(&key, Arc::new(RetainedSet::default()))
            .unwrap_err();
        assert!(err.is_cache_write());
    }

    #[test]
    fn test_fingerprint_hashes_fixed_width_count() {
        let key = PopulationCacheKey::new("s1", ["g1", "g2"]);

        let mut hasher = FxHasher::default();
        2u64.hash(&mut hasher);
        "g1".hash(&mut hasher);
        "g2".hash(&mut hasher);
        assert_eq!(key.fingerprint(), format!("{:016x}", hasher.finish()));
        assert_eq!(
            key.fingerprint(),
            PopulationCacheKey::new("other", ["g2", "g1"]).fingerprint()
        );
    }

    #[test]
    fn test_traversing_sample_id_never_leaves_cache_dir() {
        let parent = tempfile::tempdir().unwrap();
        let dir = parent.path().join("populations");
        let cache = FilePopulationCache::new(&dir);
        let key = PopulationCacheKey::new("../escaped", ["g1"]);

        assert!(cache.path_for(&key).is_err());
        let err = cache
            .put(&key, Arc::new(RetainedSet::from_indices([0, 1])))
            .unwrap_err();
        assert!(err.is_cache_write());
        assert!(cache.get(&key).is_none());

        let escaped = parent.path().join(key.file_name().trim_start_matches("../"));
        assert!(!escaped.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_memory_cache() {
        let cache = MemoryPopulationCache::new();
        let key = PopulationCacheKey::new("s1", ["g1"]);
        cache.put(&key, Arc::new(RetainedSet::all(2))).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).unwrap().len(), 2);
        assert!(cache.get(&PopulationCacheKey::new("s2", ["g1"])).is_none());
    }
}
