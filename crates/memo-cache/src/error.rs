use serde_json::error::Category;
use std::path::PathBuf;

/// Errors produced while deriving, reading, or writing cache entries.
///
/// Producer failures never appear here; they are returned to the caller of
/// [`crate::KeyedFileStore::try_get_or_compute`] untouched.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid cache namespace {namespace:?}: {reason}")]
    InvalidNamespace {
        namespace: String,
        reason: &'static str,
    },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize result for key {key}: {message}")]
    Serialize { key: String, message: String },

    /// The entry exists but is not a JSON encoding of the requested type.
    ///
    /// Only the position and kind of the failure are kept; entries hold cached
    /// payloads, so parser messages (which quote input) are not.
    #[error("corrupt cache entry {path}: {} at line {line} column {column}", describe(.category))]
    CorruptEntry {
        path: PathBuf,
        category: Category,
        line: usize,
        column: usize,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn serialize(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Serialize {
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn corrupt_entry(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::CorruptEntry {
            path: path.into(),
            category: err.classify(),
            line: err.line(),
            column: err.column(),
        }
    }

    /// Returns `true` if the error came from an unreadable on-disk entry.
    pub fn is_corrupt_entry(&self) -> bool {
        matches!(self, Self::CorruptEntry { .. })
    }
}

fn describe(category: &Category) -> &'static str {
    match category {
        Category::Io => "read failure",
        Category::Syntax => "malformed JSON",
        Category::Data => "JSON does not match the expected type",
        Category::Eof => "truncated JSON",
    }
}
