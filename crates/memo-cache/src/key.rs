use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt;

/// Digest used to turn a rendered call signature into an entry file name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyHash {
    /// 40 hex characters. Matches entries in existing `.file-cache` directories
    /// for calls without named arguments, or whose named arguments were passed
    /// in alphabetical order; other calls get new keys.
    #[default]
    Sha1,
    /// 64 hex characters.
    Sha256,
}

impl KeyHash {
    /// Length of a digest produced by this hash, in hex characters.
    pub fn hex_len(self) -> usize {
        match self {
            KeyHash::Sha1 => 40,
            KeyHash::Sha256 => 64,
        }
    }

    pub fn digest(self, bytes: impl AsRef<[u8]>) -> CacheKey {
        let hex = match self {
            KeyHash::Sha1 => hex::encode(Sha1::digest(bytes.as_ref())),
            KeyHash::Sha256 => hex::encode(Sha256::digest(bytes.as_ref())),
        };
        CacheKey(hex)
    }
}

/// A lowercase hex digest identifying one cache entry within a namespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Parse a file name back into a key, accepting only digests of `hash`.
    pub fn parse(hash: KeyHash, candidate: &str) -> Option<Self> {
        let well_formed = candidate.len() == hash.hex_len()
            && candidate
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
