use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_codec::{encode_value, CodecResult};
use tally_types::{Expiry, StorePolicy, StoreValue};

use crate::config::StateConfig;

/// A single instruction for the persistence medium.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieWrite {
    /// Namespaced external name.
    pub name: String,
    /// Encoded payload. Empty for deletions.
    pub value: String,
    pub expiry: Expiry,
    pub path: String,
    pub domain: String,
    /// Set on writes that remove the value from the medium.
    #[serde(default)]
    pub delete: bool,
}

impl CookieWrite {
    /// Build the write that persists `value` under `store`.
    ///
    /// Mappings are encoded in the policy's format; scalars go out verbatim.
    /// With persistence disabled in `config` the expiry is forced to session.
    pub fn for_store(
        config: &StateConfig,
        store: &str,
        policy: &StorePolicy,
        value: &StoreValue,
        now: DateTime<Utc>,
    ) -> CodecResult<Self> {
        let payload = encode_value(policy.format, value)?;
        let expiry = if config.cookie_persistence {
            policy.expiration.resolve(now)
        } else {
            Expiry::Session
        };
        Ok(Self {
            name: config.namespaced(store),
            value: payload,
            expiry,
            path: config.cookie_path.clone(),
            domain: config.cookie_domain.clone(),
            delete: false,
        })
    }

    /// Build the write that deletes `store`: empty payload, expired 25h ago.
    /// With persistence disabled in `config` the expiry is session-only, like
    /// every other write.
    pub fn delete(config: &StateConfig, store: &str, now: DateTime<Utc>) -> Self {
        let expiry = if config.cookie_persistence {
            Expiry::deletion(now)
        } else {
            Expiry::Session
        };
        Self {
            name: config.namespaced(store),
            value: String::new(),
            expiry,
            path: config.cookie_path.clone(),
            domain: config.cookie_domain.clone(),
            delete: true,
        }
    }

    /// Returns `true` if this write removes the value from the medium.
    pub fn is_delete(&self) -> bool {
        self.delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use serde_json::json;
    use tally_types::{Expiration, Fields, StoreFormat};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn config() -> StateConfig {
        StateConfig::default()
            .with_domain(".example.com")
            .with_namespace("owa_")
    }

    fn visitor() -> StoreValue {
        let mut fields = Fields::new();
        fields.insert("cdh".into(), json!("57a831dc"));
        fields.insert("vid".into(), json!("42"));
        StoreValue::Fields(fields)
    }

    #[test]
    fn pair_list_write() {
        let policy = StorePolicy::new(Expiration::Permanent).with_format(StoreFormat::PairList);
        let write = CookieWrite::for_store(&config(), "v", &policy, &visitor(), now()).unwrap();
        assert_eq!(write.name, "owa_v");
        assert_eq!(write.value, "cdh=>57a831dc|||vid=>42");
        assert_eq!(write.path, "/");
        assert_eq!(write.domain, ".example.com");
        assert!(matches!(write.expiry, Expiry::At(_)));
        assert!(!write.is_delete());
    }

    #[test]
    fn json_write() {
        let policy = StorePolicy::new(Expiration::Session);
        let write = CookieWrite::for_store(&config(), "b", &policy, &visitor(), now()).unwrap();
        assert_eq!(write.value, r#"{"cdh":"57a831dc","vid":"42"}"#);
        assert_eq!(write.expiry, Expiry::Session);
    }

    #[test]
    fn scalar_write_is_verbatim() {
        let policy = StorePolicy::new(Expiration::after(std::time::Duration::from_secs(60)));
        let write =
            CookieWrite::for_store(&config(), "ref", &policy, &StoreValue::from("google"), now())
                .unwrap();
        assert_eq!(write.value, "google");
        assert_eq!(write.expiry, Expiry::At(now() + TimeDelta::seconds(60)));
    }

    #[test]
    fn persistence_disabled_forces_session() {
        let policy = StorePolicy::new(Expiration::Permanent);
        let cfg = config().with_persistence(false);
        let write = CookieWrite::for_store(&cfg, "v", &policy, &visitor(), now()).unwrap();
        assert_eq!(write.expiry, Expiry::Session);
    }

    #[test]
    fn delete_write() {
        let write = CookieWrite::delete(&config(), "v", now());
        assert_eq!(write.name, "owa_v");
        assert!(write.value.is_empty());
        assert_eq!(write.expiry, Expiry::At(now() - TimeDelta::hours(25)));
        assert!(write.is_delete());
    }

    #[test]
    fn delete_is_session_only_when_persistence_disabled() {
        let cfg = config().with_persistence(false);
        let write = CookieWrite::delete(&cfg, "v", now());
        assert_eq!(write.expiry, Expiry::Session);
        assert!(write.value.is_empty());
        assert!(write.is_delete());
    }

    #[test]
    fn empty_value_is_not_a_delete() {
        let policy = StorePolicy::new(Expiration::Session);
        let write =
            CookieWrite::for_store(&config(), "c", &policy, &StoreValue::from(""), now()).unwrap();
        assert!(write.value.is_empty());
        assert!(!write.is_delete());
    }
}
