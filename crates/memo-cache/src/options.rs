use crate::key::KeyHash;
use serde::{Deserialize, Serialize};

/// Per-namespace store settings, fixed once the store is constructed.
///
/// All logging switches default to off, so a store is silent unless asked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreOptions {
    /// Emit a record on every cache miss.
    pub log_misses: bool,
    /// Emit a record on every cache hit.
    pub log_hits: bool,
    /// Include the elapsed wall-clock time of the call in emitted records.
    pub log_time: bool,
    /// Digest used for entry file names.
    pub hash: KeyHash,
}

impl StoreOptions {
    /// Options with both hit and miss records enabled.
    pub fn verbose() -> Self {
        Self {
            log_misses: true,
            log_hits: true,
            ..Self::default()
        }
    }

    pub fn with_log_misses(mut self, enabled: bool) -> Self {
        self.log_misses = enabled;
        self
    }

    pub fn with_log_hits(mut self, enabled: bool) -> Self {
        self.log_hits = enabled;
        self
    }

    pub fn with_log_time(mut self, enabled: bool) -> Self {
        self.log_time = enabled;
        self
    }

    pub fn with_hash(mut self, hash: KeyHash) -> Self {
        self.hash = hash;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_silent_sha1() {
        let options = StoreOptions::default();
        assert!(!options.log_misses);
        assert!(!options.log_hits);
        assert!(!options.log_time);
        assert_eq!(options.hash, KeyHash::Sha1);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let options: StoreOptions =
            serde_json::from_str(r#"{"log_hits": true, "hash": "sha256"}"#).unwrap();
        assert_eq!(
            options,
            StoreOptions::default()
                .with_log_hits(true)
                .with_hash(KeyHash::Sha256)
        );
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = serde_json::from_str::<StoreOptions>(r#"{"ttl": 60}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{err}");
    }
}
