use serde::{Deserialize, Serialize};

/// Domain and naming settings for a [`crate::StateStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Cookie domain. Also the input of the domain fingerprint.
    pub cookie_domain: String,
    /// Prefix that marks a raw name as belonging to this SDK.
    pub namespace: String,
    /// Path attribute of written cookies.
    pub cookie_path: String,
    /// When `false`, every write is session-only.
    pub cookie_persistence: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            cookie_domain: String::new(),
            namespace: String::new(),
            cookie_path: "/".to_string(),
            cookie_persistence: true,
        }
    }
}

impl StateConfig {
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = domain.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.cookie_persistence = enabled;
        self
    }

    /// The external name under which `store` is written.
    pub fn namespaced(&self, store: &str) -> String {
        format!("{}{}", self.namespace, store)
    }
}
