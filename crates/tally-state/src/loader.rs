use indexmap::IndexMap;
use tracing::debug;

use crate::traits::CandidateSource;

/// Raw candidate values per store, awaiting resolution.
///
/// Filled once from the candidate source. Each store's entry is removed
/// when the store resolves, so resolving again finds nothing to do.
#[derive(Clone, Debug, Default)]
pub struct PendingCandidates {
    entries: IndexMap<String, Vec<String>>,
}

impl PendingCandidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every raw value from `source`, keep the names carrying
    /// `namespace`, and group their values by stripped name.
    pub fn load(source: &dyn CandidateSource, namespace: &str) -> Self {
        let mut pending = Self::new();
        let mut discarded = 0usize;
        for (raw_name, values) in source.read_all() {
            match strip_namespace(&raw_name, namespace) {
                Some(store) => pending.add(store, values),
                None => discarded += 1,
            }
        }
        debug!(
            stores = pending.len(),
            discarded,
            namespace,
            "loaded pending candidates"
        );
        pending
    }

    /// Append raw values for `store` after any already pending.
    /// An empty list is ignored.
    pub fn add(&mut self, store: impl Into<String>, values: Vec<String>) {
        if values.is_empty() {
            return;
        }
        self.entries.entry(store.into()).or_default().extend(values);
    }

    /// Remove and return the candidates for `store`.
    pub fn take(&mut self, store: &str) -> Option<Vec<String>> {
        self.entries.shift_remove(store)
    }

    pub fn get(&self, store: &str) -> Option<&[String]> {
        self.entries.get(store).map(Vec::as_slice)
    }

    pub fn contains(&self, store: &str) -> bool {
        self.entries.contains_key(store)
    }

    /// Store names with pending candidates, in discovery order.
    pub fn store_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strip `namespace` from the front of `raw_name`.
///
/// Returns `None` for names outside the namespace. An empty namespace keeps
/// every name.
pub fn strip_namespace<'a>(raw_name: &'a str, namespace: &str) -> Option<&'a str> {
    if namespace.is_empty() {
        return Some(raw_name);
    }
    raw_name.strip_prefix(namespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryCandidateSource;

    #[test]
    fn namespace_stripping() {
        assert_eq!(strip_namespace("ns_visitor", "ns_"), Some("visitor"));
        assert_eq!(strip_namespace("other_visitor", "ns_"), None);
        assert_eq!(strip_namespace("anything", ""), Some("anything"));
    }

    #[test]
    fn load_groups_by_stripped_name() {
        let source = InMemoryCandidateSource::new()
            .with("ns_visitor", "a")
            .with("other_visitor", "ignored")
            .with("ns_session", "s")
            .with("ns_visitor", "b");
        let pending = PendingCandidates::load(&source, "ns_");
        assert_eq!(pending.len(), 2);
        assert_eq!(pending.get("visitor").unwrap(), ["a", "b"]);
        assert_eq!(pending.get("session").unwrap(), ["s"]);
        assert!(!pending.contains("other_visitor"));
        assert!(!pending.contains("ns_visitor"));
        assert_eq!(pending.store_names(), vec!["visitor", "session"]);
    }

    #[test]
    fn take_drains_once() {
        let source = InMemoryCandidateSource::new().with("v", "1");
        let mut pending = PendingCandidates::load(&source, "");
        assert_eq!(pending.take("v"), Some(vec!["1".to_string()]));
        assert_eq!(pending.take("v"), None);
        assert!(pending.is_empty());
    }

    #[test]
    fn add_appends_and_ignores_empty() {
        let mut pending = PendingCandidates::new();
        pending.add("v", vec![]);
        assert!(!pending.contains("v"));
        pending.add("v", vec!["1".into()]);
        pending.add("v", vec!["2".into()]);
        assert_eq!(pending.get("v").unwrap(), ["1", "2"]);
    }
}
