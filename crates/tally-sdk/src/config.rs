use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tally_state::StateConfig;

use crate::error::{SdkError, SdkResult};

/// Settings shared by every client the factory creates.
///
/// Known settings are typed fields; anything else lands in `extra` and is
/// still reachable through [`SdkConfig::get_setting`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Enables debug-level diagnostics.
    pub debug: bool,
    /// Domain cookies are written for. Also the domain fingerprint input.
    pub cookie_domain: String,
    /// Prefix of every cookie this SDK owns.
    #[serde(rename = "ns")]
    pub cookie_prefix: String,
    /// When `false`, every cookie is session-only.
    pub cookie_persistence: bool,
    /// Site identifier stamped on tracking events.
    pub site_id: Option<String>,
    /// Service namespace, filled in by the client factory.
    pub namespace: Option<String>,
    /// Unrecognized settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            debug: false,
            cookie_domain: String::new(),
            cookie_prefix: "tly_".to_string(),
            cookie_persistence: true,
            site_id: None,
            namespace: None,
            extra: Map::new(),
        }
    }
}

impl SdkConfig {
    /// Parse from JSON text.
    pub fn from_json_str(text: &str) -> SdkResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = domain.into();
        self
    }

    pub fn with_cookie_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cookie_prefix = prefix.into();
        self
    }

    pub fn with_site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Look up a setting by its configuration name, typed or not.
    pub fn get_setting(&self, name: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove(name).filter(|v| !v.is_null()),
            _ => None,
        }
    }

    /// A copy with `overrides` applied on top; overrides win.
    pub fn merged_with(&self, overrides: &Map<String, Value>) -> SdkResult<Self> {
        let Value::Object(mut base) = serde_json::to_value(self)? else {
            return Err(SdkError::InvalidConfig("config did not serialize to an object".into()));
        };
        for (key, value) in overrides {
            base.insert(key.clone(), value.clone());
        }
        Ok(serde_json::from_value(Value::Object(base))?)
    }

    /// Settings for the state store.
    pub fn state_config(&self) -> StateConfig {
        StateConfig::default()
            .with_domain(self.cookie_domain.clone())
            .with_namespace(self.cookie_prefix.clone())
            .with_persistence(self.cookie_persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config() {
        let c = SdkConfig::default();
        assert!(!c.debug);
        assert_eq!(c.cookie_prefix, "tly_");
        assert!(c.cookie_persistence);
        assert!(c.site_id.is_none());
    }

    #[test]
    fn parse_json_with_extra_settings() {
        let c = SdkConfig::from_json_str(
            r#"{"cookie_domain":".example.com","ns":"owa_","api_key":"abc"}"#,
        )
        .unwrap();
        assert_eq!(c.cookie_domain, ".example.com");
        assert_eq!(c.cookie_prefix, "owa_");
        assert_eq!(c.get_setting("api_key"), Some(json!("abc")));
        assert_eq!(c.get_setting("ns"), Some(json!("owa_")));
        assert!(c.get_setting("site_id").is_none());
        assert!(c.get_setting("missing").is_none());
    }

    #[test]
    fn parse_toml() {
        let c = SdkConfig::from_toml_str(
            "debug = true\ncookie_domain = \"example.com\"\nsite_id = \"s1\"\n",
        )
        .unwrap();
        assert!(c.debug);
        assert_eq!(c.site_id.as_deref(), Some("s1"));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(SdkConfig::from_json_str("{"), Err(SdkError::Json(_))));
        assert!(matches!(SdkConfig::from_toml_str("debug = ="), Err(SdkError::Toml(_))));
    }

    #[test]
    fn overrides_win() {
        let base = SdkConfig::default().with_cookie_domain("a.com").with_site_id("base");
        let mut overrides = Map::new();
        overrides.insert("site_id".into(), json!("override"));
        overrides.insert("namespace".into(), json!("Tracker"));
        let merged = base.merged_with(&overrides).unwrap();
        assert_eq!(merged.site_id.as_deref(), Some("override"));
        assert_eq!(merged.namespace.as_deref(), Some("Tracker"));
        assert_eq!(merged.cookie_domain, "a.com");
    }

    #[test]
    fn state_config_mapping() {
        let c = SdkConfig::default()
            .with_cookie_domain(".example.com")
            .with_cookie_prefix("owa_");
        let state = c.state_config();
        assert_eq!(state.cookie_domain, ".example.com");
        assert_eq!(state.namespace, "owa_");
        assert!(state.cookie_persistence);
    }
}
