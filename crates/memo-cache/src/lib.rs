//! Disk-backed memoization for deterministic calls.
//!
//! A [`KeyedFileStore`] maps a [`CallSignature`] to a hex digest and keeps the
//! JSON-encoded result of the first call under that digest. Later calls with
//! the same signature read the file back instead of running the producer
//! again, including across process restarts.
//!
//! ## On-disk layout
//!
//! - `<cache_root>/<namespace>/<hex-key>`: one JSON document per entry, no
//!   header or checksum.
//! - `<cache_root>` is `$MEMO_CACHE_DIR` when set, otherwise `./.file-cache`.
//! - `<hex-key>` is SHA-1 (default) or SHA-256 of [`CallSignature::render`].
//!
//! There is no index or manifest; the directory listing is the index.
//!
//! ```no_run
//! use memo_cache::{CallSignature, KeyedFileStore, StoreOptions};
//!
//! let store = KeyedFileStore::new(memo_cache::namespace!("get_page"), StoreOptions::default())?;
//! let page = store.get_or_compute(&CallSignature::new().arg("https://x/1"), || {
//!     serde_json::json!({"status": 200, "body": "ok"})
//! })?;
//! assert_eq!(page.value["status"], 200);
//! # Ok::<(), memo_cache::CacheError>(())
//! ```

mod cache_dir;
mod error;
mod event;
mod finite;
mod key;
mod options;
mod signature;
mod stats;
mod store;
mod util;

pub use cache_dir::{default_cache_root, CacheConfig, CACHE_DIR_ENV, DEFAULT_CACHE_DIR_NAME};
pub use error::CacheError;
pub use event::{CacheEvent, EventSink, Outcome, StdoutSink, TracingSink, TRACING_TARGET};
pub use key::{CacheKey, KeyHash};
pub use options::StoreOptions;
pub use signature::CallSignature;
pub use stats::StoreStats;
pub use store::{Cached, KeyedFileStore};

/// Build a namespace of the form `<module_path>:<name>` for the calling module.
///
/// ```
/// let ns = memo_cache::namespace!("get_page");
/// assert!(ns.ends_with(":get_page"));
/// ```
#[macro_export]
macro_rules! namespace {
    ($name:expr) => {
        ::std::format!("{}:{}", ::std::module_path!(), $name)
    };
}
