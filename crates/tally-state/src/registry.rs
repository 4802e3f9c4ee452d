use std::collections::HashMap;

use tally_types::StorePolicy;
use tracing::debug;

/// Per-store policy table.
///
/// Registration overwrites: registering a name again replaces its policy
/// wholesale. A lookup miss is not an error; callers read it as
/// "nothing to persist".
#[derive(Clone, Debug, Default)]
pub struct StoreRegistry {
    policies: HashMap<String, StorePolicy>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the policy for `name`.
    pub fn register(&mut self, name: impl Into<String>, policy: StorePolicy) {
        let name = name.into();
        debug!(
            store = %name,
            format = %policy.format,
            persistence = %policy.persistence,
            fingerprint = policy.fingerprint_required,
            "registered store"
        );
        self.policies.insert(name, policy);
    }

    pub fn get(&self, name: &str) -> Option<&StorePolicy> {
        self.policies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Whether `name` requires a domain fingerprint. Unknown stores do not.
    pub fn is_fingerprint_required(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| p.fingerprint_required)
    }

    /// Whether mutations of `name` persist immediately. Unknown stores do not.
    pub fn is_eager(&self, name: &str) -> bool {
        self.get(name).is_some_and(|p| p.persistence.is_eager())
    }

    /// Registered store names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}
