use crate::key::{CacheKey, KeyHash};
use std::collections::BTreeMap;
use std::fmt;

/// The arguments identifying one call: positional arguments in call order plus
/// named arguments.
///
/// Every argument is captured as its `Display` rendering when it is added, so
/// only types with a deterministic `Display` impl should be used.
///
/// ```
/// use memo_cache::CallSignature;
///
/// let sig = CallSignature::new()
///     .arg("https://example.com/1")
///     .named("retries", 3);
/// assert_eq!(sig.render(), "https://example.com/1retries=3");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallSignature {
    positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl CallSignature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.push_arg(value);
        self
    }

    /// Add a named argument. Re-adding a name replaces its value.
    pub fn named(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.push_named(name, value);
        self
    }

    pub fn push_arg(&mut self, value: impl fmt::Display) {
        self.positional.push(value.to_string());
    }

    pub fn push_named(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        self.named.insert(name.into(), value.to_string());
    }

    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    pub fn named_args(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// The exact text that gets hashed: positional values concatenated in
    /// order, then `name=value` for each named argument sorted by name.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for value in &self.positional {
            out.push_str(value);
        }
        for (name, value) in &self.named {
            out.push_str(name);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Hash the UTF-8 bytes of [`CallSignature::render`].
    pub fn key(&self, hash: KeyHash) -> CacheKey {
        hash.digest(self.render().as_bytes())
    }
}
