use crate::cache_dir::{namespace_dir, CacheConfig};
use crate::error::CacheError;
use crate::event::{CacheEvent, EventSink, Outcome, TracingSink, TRACING_TARGET};
use crate::finite::ensure_finite;
use crate::key::CacheKey;
use crate::options::StoreOptions;
use crate::signature::CallSignature;
use crate::stats::{HitCounters, StoreStats};
use crate::util::{atomic_write, read_entry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A value returned by [`KeyedFileStore::get_or_compute`] together with how it
/// was obtained.
#[derive(Clone, Debug, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub outcome: Outcome,
    pub key: CacheKey,
    /// Wall-clock time spent inside the call, producer included.
    pub elapsed: Duration,
}

impl<T> Cached<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn is_hit(&self) -> bool {
        self.outcome.is_hit()
    }
}

/// Disk-backed memoization for one namespace.
///
/// Layout: `<cache_root>/<namespace>/<hex-key>`, where each file holds the
/// JSON encoding of exactly one result. Entries are written once and never
/// rewritten, expired, or deleted by the store.
///
/// Clones share the same hit/miss counters.
#[derive(Clone)]
pub struct KeyedFileStore {
    namespace: String,
    dir: PathBuf,
    options: StoreOptions,
    counters: Arc<HitCounters>,
    sink: Arc<dyn EventSink>,
}

impl fmt::Debug for KeyedFileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedFileStore")
            .field("namespace", &self.namespace)
            .field("dir", &self.dir)
            .field("options", &self.options)
            .field("stats", &self.counters.snapshot())
            .finish_non_exhaustive()
    }
}

impl KeyedFileStore {
    /// Open a store under the cache root selected by `MEMO_CACHE_DIR`, falling
    /// back to `./.file-cache`.
    pub fn new(namespace: impl Into<String>, options: StoreOptions) -> Result<Self, CacheError> {
        Self::with_config(&CacheConfig::from_env(), namespace, options)
    }

    pub fn with_config(
        config: &CacheConfig,
        namespace: impl Into<String>,
        options: StoreOptions,
    ) -> Result<Self, CacheError> {
        Self::open(config.cache_root(), namespace, options)
    }

    /// Open a store rooted at `cache_root`, creating `<cache_root>/<namespace>`
    /// if it does not exist yet.
    pub fn open(
        cache_root: impl AsRef<Path>,
        namespace: impl Into<String>,
        options: StoreOptions,
    ) -> Result<Self, CacheError> {
        let namespace = namespace.into();
        let dir = namespace_dir(cache_root.as_ref(), &namespace)?;
        std::fs::create_dir_all(&dir).map_err(|err| CacheError::io(&dir, err))?;

        Ok(Self {
            namespace,
            dir,
            options,
            counters: Arc::new(HitCounters::default()),
            sink: Arc::new(TracingSink),
        })
    }

    /// Replace the sink receiving hit/miss records. Defaults to [`TracingSink`].
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn stats(&self) -> StoreStats {
        self.counters.snapshot()
    }

    pub fn key_for(&self, signature: &CallSignature) -> CacheKey {
        signature.key(self.options.hash)
    }

    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    /// Whether an entry exists for `signature`. Does not touch the counters.
    pub fn contains(&self, signature: &CallSignature) -> bool {
        self.entry_path(&self.key_for(signature)).exists()
    }

    /// Read the entry for `signature` without computing it on a miss.
    ///
    /// Does not touch the counters or emit records. A corrupt entry is still
    /// an error.
    pub fn lookup<T>(&self, signature: &CallSignature) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        let path = self.entry_path(&self.key_for(signature));
        if !path.exists() {
            return Ok(None);
        }
        self.read_value(&path).map(Some)
    }

    /// Keys of every entry currently on disk, sorted.
    ///
    /// Files that are not digests of the configured hash (such as temp files
    /// left by an interrupted write) are skipped.
    pub fn keys(&self) -> Result<Vec<CacheKey>, CacheError> {
        let entries =
            std::fs::read_dir(&self.dir).map_err(|err| CacheError::io(&self.dir, err))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| CacheError::io(&self.dir, err))?;
            let is_file = entry
                .file_type()
                .map_err(|err| CacheError::io(entry.path(), err))?
                .is_file();
            if !is_file {
                continue;
            }
            let name = entry.file_name();
            if let Some(key) = name
                .to_str()
                .and_then(|name| CacheKey::parse(self.options.hash, name))
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    /// Return the cached result for `signature`, or run `producer`, persist its
    /// result, and return it.
    pub fn get_or_compute<T, F>(
        &self,
        signature: &CallSignature,
        producer: F,
    ) -> Result<Cached<T>, CacheError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        self.try_get_or_compute(signature, || Ok::<_, CacheError>(producer()))
    }

    /// Like [`KeyedFileStore::get_or_compute`], for producers that can fail.
    ///
    /// A producer error is returned as-is and nothing is written. The miss is
    /// still counted.
    pub fn try_get_or_compute<T, E, F>(
        &self,
        signature: &CallSignature,
        producer: F,
    ) -> Result<Cached<T>, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Result<T, E>,
    {
        let started = Instant::now();
        let key = self.key_for(signature);
        let path = self.entry_path(&key);

        let (value, outcome, stats) = if path.exists() {
            let value = self.read_value(&path)?;
            (value, Outcome::Hit, self.counters.record_hit())
        } else {
            let stats = self.counters.record_miss();
            let value = producer()?;
            self.write_value(&key, &path, &value)?;
            (value, Outcome::Miss, stats)
        };

        let elapsed = started.elapsed();
        self.emit(outcome, &key, stats, elapsed);

        Ok(Cached {
            value,
            outcome,
            key,
            elapsed,
        })
    }

    fn read_value<T: DeserializeOwned>(&self, path: &Path) -> Result<T, CacheError> {
        let bytes = read_entry(path)?;
        serde_json::from_slice(&bytes).map_err(|err| CacheError::corrupt_entry(path, &err))
    }

    fn write_value<T: Serialize>(
        &self,
        key: &CacheKey,
        path: &Path,
        value: &T,
    ) -> Result<(), CacheError> {
        ensure_finite(value).map_err(|err| CacheError::serialize(key.as_str(), err))?;
        let text = serde_json::to_string(value)
            .map_err(|err| CacheError::serialize(key.as_str(), &err))?;
        atomic_write(&self.dir, path, text.as_bytes())?;
        tracing::debug!(
            target: TRACING_TARGET,
            namespace = %self.namespace,
            key = %key,
            bytes = text.len(),
            "wrote cache entry"
        );
        Ok(())
    }

    fn emit(&self, outcome: Outcome, key: &CacheKey, stats: StoreStats, elapsed: Duration) {
        let enabled = match outcome {
            Outcome::Hit => self.options.log_hits,
            Outcome::Miss => self.options.log_misses,
        };
        if !enabled {
            return;
        }
        // Counters were just bumped, so the rate is always defined here.
        let Some(hit_rate) = stats.hit_rate() else {
            return;
        };

        self.sink.record(&CacheEvent {
            namespace: &self.namespace,
            outcome,
            key,
            hit_rate,
            elapsed: self.options.log_time.then_some(elapsed),
        });
    }
}
