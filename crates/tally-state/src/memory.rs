//! In-memory collaborators for tests and embedding.

use std::sync::RwLock;

use crate::persist::CookieWrite;
use crate::traits::{CandidateSource, PersistenceSink, RawCandidates};

/// HTML escape some frameworks apply to cookie values, breaking `=>`.
const ESCAPED_GT: &str = "&gt;";

/// A candidate source backed by a fixed table.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCandidateSource {
    candidates: RawCandidates,
}

impl InMemoryCandidateSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one raw value under `name`, keeping earlier values.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Append one raw value under `name`, keeping earlier values.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.candidates
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Build a source from cookie pairs already parsed by a web framework.
    ///
    /// Values that had `>` escaped as `&gt;` are repaired so legacy
    /// pair-list payloads stay decodable.
    pub fn from_cookie_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut source = Self::new();
        for (name, value) in pairs {
            source.push(name, value.as_ref().replace(ESCAPED_GT, ">"));
        }
        source
    }

    /// Number of distinct raw names.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if the source holds no values.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl CandidateSource for InMemoryCandidateSource {
    fn read_all(&self) -> RawCandidates {
        self.candidates.clone()
    }
}

/// A sink that records every write in order.
#[derive(Debug, Default)]
pub struct InMemorySink {
    writes: RwLock<Vec<CookieWrite>>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes received so far, oldest first.
    pub fn writes(&self) -> Vec<CookieWrite> {
        self.writes.read().expect("lock poisoned").clone()
    }

    /// Writes received for one external name.
    pub fn writes_for(&self, name: &str) -> Vec<CookieWrite> {
        self.writes
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|w| w.name == name)
            .cloned()
            .collect()
    }

    /// The most recent write.
    pub fn last(&self) -> Option<CookieWrite> {
        self.writes.read().expect("lock poisoned").last().cloned()
    }

    /// Number of writes received.
    pub fn len(&self) -> usize {
        self.writes.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.writes.read().expect("lock poisoned").is_empty()
    }

    /// Forget all recorded writes.
    pub fn clear(&self) {
        self.writes.write().expect("lock poisoned").clear();
    }
}

impl PersistenceSink for InMemorySink {
    fn write(&self, write: &CookieWrite) {
        self.writes
            .write()
            .expect("lock poisoned")
            .push(write.clone());
    }
}
