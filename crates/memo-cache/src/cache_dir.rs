use crate::error::CacheError;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the cache root.
pub const CACHE_DIR_ENV: &str = "MEMO_CACHE_DIR";

/// Directory name used under the working directory when no override is set.
pub const DEFAULT_CACHE_DIR_NAME: &str = ".file-cache";

/// Configuration for selecting the on-disk cache root.
#[derive(Clone, Debug, Default)]
pub struct CacheConfig {
    /// Override the cache root (the namespace is still appended).
    pub cache_root_override: Option<PathBuf>,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            cache_root_override: std::env::var_os(CACHE_DIR_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Resolve the cache root this configuration points at.
    pub fn cache_root(&self) -> PathBuf {
        match &self.cache_root_override {
            Some(root) => root.clone(),
            None => default_cache_root(),
        }
    }
}

/// Returns `./.file-cache`, relative to the process working directory.
pub fn default_cache_root() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR_NAME)
}

/// Resolve `<cache_root>/<namespace>`, rejecting namespaces that would escape
/// the root or nest further directories.
pub(crate) fn namespace_dir(cache_root: &Path, namespace: &str) -> Result<PathBuf, CacheError> {
    validate_namespace(namespace)?;
    Ok(cache_root.join(namespace))
}

fn validate_namespace(namespace: &str) -> Result<(), CacheError> {
    let reason = if namespace.is_empty() {
        Some("namespace is empty")
    } else if namespace == "." || namespace == ".." {
        Some("namespace must not be a relative path component")
    } else if namespace.contains(['/', '\\']) {
        Some("namespace must not contain path separators")
    } else if namespace.contains('\0') {
        Some("namespace must not contain NUL bytes")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(CacheError::InvalidNamespace {
            namespace: namespace.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_is_appended_to_root() {
        let dir = namespace_dir(Path::new("/tmp/cache"), "fetch:get_page").unwrap();
        assert_eq!(dir, Path::new("/tmp/cache").join("fetch:get_page"));
    }

    #[test]
    fn rejects_namespaces_that_escape_the_root() {
        for namespace in ["", ".", "..", "a/b", "a\\b", "nul\0byte"] {
            let err = namespace_dir(Path::new("root"), namespace).unwrap_err();
            assert!(
                matches!(err, CacheError::InvalidNamespace { .. }),
                "expected {namespace:?} to be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn override_wins_over_default_root() {
        let config = CacheConfig {
            cache_root_override: Some(PathBuf::from("/var/cache/memo")),
        };
        assert_eq!(config.cache_root(), PathBuf::from("/var/cache/memo"));
        assert_eq!(
            CacheConfig::default().cache_root(),
            PathBuf::from(DEFAULT_CACHE_DIR_NAME)
        );
    }
}
