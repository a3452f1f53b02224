//! Signature-keyed cache for the merged dataset.
//!
//! [`DatasetCache::get_or_load`] hands out a shared `Arc<MergedDataset>` and
//! only rebuilds it when the discovered file set changes: a file added,
//! removed, touched or rewritten. Each file is keyed by its size,
//! modification time and a SHA-256 digest of its bytes, so a same-size
//! rewrite within the file system's timestamp granularity is still seen.
//! A rebuild produces a new dataset and swaps
//! the `Arc`; holders of the previous `Arc` keep their snapshot.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use discourse_core::error::{DashboardError, Result};
use discourse_data::merger::MergedDataset;
use discourse_data::pipeline::load_dataset_from_files;
use discourse_data::reader::find_lesson_files;
use sha2::{Digest, Sha256};

// ── SourceSignature ───────────────────────────────────────────────────────────

/// Identity of one discovered lesson file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
    pub digest: [u8; 32],
}

/// Identity of a whole discovered file set, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSignature {
    pub data_dir: PathBuf,
    pub files: Vec<FileStamp>,
}

impl SourceSignature {
    /// Stat and hash every file in `files`.
    pub fn scan(data_dir: &Path, files: &[PathBuf]) -> Result<Self> {
        let files = files
            .iter()
            .map(|path| {
                let meta = fs::metadata(path).map_err(|source| DashboardError::FileRead {
                    path: path.clone(),
                    source,
                })?;
                Ok(FileStamp {
                    path: path.clone(),
                    len: meta.len(),
                    modified: meta.modified().ok(),
                    digest: content_digest(path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            files,
        })
    }
}

/// SHA-256 of a file's bytes, read in 64 KiB chunks.
fn content_digest(path: &Path) -> Result<[u8; 32]> {
    let read_err = |source: io::Error| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::open(path).map_err(read_err)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf).map_err(read_err)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().into())
}

// ── DatasetCache ──────────────────────────────────────────────────────────────

struct CachedDataset {
    signature: SourceSignature,
    dataset: Arc<MergedDataset>,
    built_at: Instant,
}

/// Caller-owned cache of the merged dataset.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use discourse_runtime::dataset_cache::DatasetCache;
///
/// let mut cache = DatasetCache::new();
/// let dataset = cache.get_or_load(Path::new("DATA")).unwrap();
/// println!("{} records", dataset.len());
/// ```
#[derive(Default)]
pub struct DatasetCache {
    cached: Option<CachedDataset>,
    /// Description of the last failed load.
    last_error: Option<String>,
    /// Number of full rebuilds performed.
    loads: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the dataset for `data_dir`, rebuilding it only when the
    /// discovered file set differs from the cached one.
    ///
    /// On failure the cache is emptied and the error returned; a stale
    /// dataset is never served for a changed file set.
    pub fn get_or_load(&mut self, data_dir: &Path) -> Result<Arc<MergedDataset>> {
        match self.refresh(data_dir) {
            Ok(dataset) => {
                self.last_error = None;
                Ok(dataset)
            }
            Err(e) => {
                tracing::warn!(error = %e, dir = %data_dir.display(), "dataset load failed; cache cleared");
                self.cached = None;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Drop the cached dataset so the next [`get_or_load`](Self::get_or_load)
    /// rebuilds unconditionally.
    pub fn invalidate(&mut self) {
        self.cached = None;
        tracing::debug!("dataset cache invalidated");
    }

    /// Rebuild from disk regardless of the signature.
    pub fn reload(&mut self, data_dir: &Path) -> Result<Arc<MergedDataset>> {
        self.invalidate();
        self.get_or_load(data_dir)
    }

    /// The cached dataset, if any, without touching the file system.
    pub fn current(&self) -> Option<Arc<MergedDataset>> {
        self.cached.as_ref().map(|c| Arc::clone(&c.dataset))
    }

    /// Age of the cached dataset.
    pub fn cache_age(&self) -> Option<Duration> {
        self.cached.as_ref().map(|c| c.built_at.elapsed())
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Number of full rebuilds performed so far.
    pub fn load_count(&self) -> u64 {
        self.loads
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn refresh(&mut self, data_dir: &Path) -> Result<Arc<MergedDataset>> {
        let files = find_lesson_files(data_dir)?;
        let signature = SourceSignature::scan(data_dir, &files)?;

        if let Some(cached) = &self.cached {
            if cached.signature == signature {
                tracing::debug!("returning cached dataset");
                return Ok(Arc::clone(&cached.dataset));
            }
            tracing::warn!(
                files = signature.files.len(),
                "lesson files changed; rebuilding dataset"
            );
        }

        let dataset = Arc::new(load_dataset_from_files(data_dir, &files)?);
        self.loads += 1;
        tracing::debug!(
            records = dataset.len(),
            lessons = dataset.lesson_ids().len(),
            "dataset cache updated"
        );

        self.cached = Some(CachedDataset {
            signature,
            dataset: Arc::clone(&dataset),
            built_at: Instant::now(),
        });
        Ok(dataset)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "TimeStamp,Turn,Speaker,Sentence,Teacher_Tag,Student_Tag,DialogAct\n";

    fn write_lesson(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), format!("{HEADER}{body}")).unwrap();
    }

    fn corpus() -> TempDir {
        let dir = TempDir::new().expect("temp dir");
        write_lesson(dir.path(), "L1.csv", ",1,T,hello,Q,,ask\n");
        write_lesson(dir.path(), "L2.csv", ",1,S,hi,,Answer,\n");
        dir
    }

    // ── cache hit ─────────────────────────────────────────────────────────

    #[test]
    fn test_same_arc_while_files_unchanged() {
        let dir = corpus();
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(dir.path()).unwrap();
        let second = cache.get_or_load(dir.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
        assert!(cache.cache_age().unwrap() < Duration::from_secs(5));
    }

    // ── cache miss after change ───────────────────────────────────────────

    #[test]
    fn test_new_arc_after_file_rewritten() {
        let dir = corpus();
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(dir.path()).unwrap();
        write_lesson(dir.path(), "L1.csv", ",1,T,hello,Q,,ask\n,2,T,again,Q,,state\n");
        let second = cache.get_or_load(dir.path()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 3);
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn test_new_arc_after_file_added() {
        let dir = corpus();
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(dir.path()).unwrap();
        write_lesson(dir.path(), "L3.csv", "");
        let second = cache.get_or_load(dir.path()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.lesson_ids(), vec!["L1", "L2", "L3"]);
    }

    #[test]
    fn test_reload_forces_rebuild() {
        let dir = corpus();
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(dir.path()).unwrap();
        let second = cache.reload(dir.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.records(), second.records());
    }

    // ── failure handling ──────────────────────────────────────────────────

    #[test]
    fn test_failed_reload_clears_cache() {
        let dir = corpus();
        let mut cache = DatasetCache::new();
        cache.get_or_load(dir.path()).unwrap();

        fs::write(dir.path().join("L2.csv"), "Turn,Speaker\n1,T\n").unwrap();
        let err = cache.get_or_load(dir.path()).unwrap_err();

        assert!(matches!(err, DashboardError::Schema { .. }));
        assert!(cache.current().is_none());
        assert!(cache.last_error().unwrap().contains("L2.csv"));
    }

    #[test]
    fn test_recovers_after_fix() {
        let dir = corpus();
        let mut cache = DatasetCache::new();
        fs::write(dir.path().join("L2.csv"), "Turn\n1\n").unwrap();
        assert!(cache.get_or_load(dir.path()).is_err());

        write_lesson(dir.path(), "L2.csv", ",1,S,hi,,Answer,\n");
        let dataset = cache.get_or_load(dir.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(cache.last_error().is_none());
    }

    #[test]
    fn test_invalidate() {
        let dir = corpus();
        let mut cache = DatasetCache::new();
        cache.get_or_load(dir.path()).unwrap();
        assert!(cache.current().is_some());

        cache.invalidate();
        assert!(cache.current().is_none());
        assert!(cache.cache_age().is_none());
    }

    #[test]
    fn test_signature_detects_size_change() {
        let dir = corpus();
        let files = find_lesson_files(dir.path()).unwrap();
        let before = SourceSignature::scan(dir.path(), &files).unwrap();
        write_lesson(dir.path(), "L2.csv", ",1,S,hi there,,Answer,\n");
        let after = SourceSignature::scan(dir.path(), &files).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_same_size_rewrite_with_same_mtime_rebuilds() {
        let dir = corpus();
        let path = dir.path().join("L1.csv");
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(dir.path()).unwrap();
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        // Same byte length, different dialog act; mtime pinned back.
        write_lesson(dir.path(), "L1.csv", ",1,T,hello,Q,,asx\n");
        fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);

        let second = cache.get_or_load(dir.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.records()[0].dialog_act.as_deref(), Some("asx"));
    }
}
