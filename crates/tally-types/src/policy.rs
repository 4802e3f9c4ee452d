use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::expiration::Expiration;

/// Serialization format used when a mapping value is persisted.
///
/// Reads never consult this: persisted text is sniffed so that values
/// written in either format stay readable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreFormat {
    /// Standard JSON object text.
    #[default]
    Json,
    /// Legacy `key=>value|||key=>value` text.
    #[serde(alias = "assoc")]
    PairList,
}

impl StoreFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::PairList => "pair-list",
        }
    }
}

impl FromStr for StoreFormat {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pair-list" | "pair_list" | "assoc" => Ok(Self::PairList),
            _ => Err(TypeError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for StoreFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When mutations of a store reach the persistence medium.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceClass {
    /// Every mutation is written immediately.
    #[default]
    #[serde(alias = "cookie")]
    Eager,
    /// The caller persists explicitly.
    Deferred,
}

impl PersistenceClass {
    pub fn is_eager(&self) -> bool {
        matches!(self, Self::Eager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eager => "eager",
            Self::Deferred => "deferred",
        }
    }
}

impl FromStr for PersistenceClass {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "eager" | "cookie" => Ok(Self::Eager),
            "deferred" => Ok(Self::Deferred),
            _ => Err(TypeError::UnknownPersistenceClass(s.to_string())),
        }
    }
}

impl fmt::Display for PersistenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable policy for a named store.
///
/// Built once at configuration time and handed to the registry. Policies are
/// never edited in place; registering a name again replaces the whole entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorePolicy {
    /// Expiration hint used when persisting.
    pub expiration: Expiration,
    /// Advisory serialized length. Not used by any logic.
    #[serde(default)]
    pub length_hint: Option<usize>,
    /// Format for persisted mapping values.
    #[serde(default)]
    pub format: StoreFormat,
    /// Whether mutations persist immediately.
    #[serde(default)]
    pub persistence: PersistenceClass,
    /// Whether values must carry a matching domain fingerprint (`cdh`).
    #[serde(default)]
    pub fingerprint_required: bool,
}

impl StorePolicy {
    /// A JSON, eager, unfingerprinted policy with the given expiration.
    pub fn new(expiration: Expiration) -> Self {
        Self {
            expiration,
            length_hint: None,
            format: StoreFormat::Json,
            persistence: PersistenceClass::Eager,
            fingerprint_required: false,
        }
    }

    pub fn with_length_hint(mut self, length: usize) -> Self {
        self.length_hint = Some(length);
        self
    }

    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_persistence(mut self, persistence: PersistenceClass) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_fingerprint(mut self, required: bool) -> Self {
        self.fingerprint_required = required;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parsing() {
        assert_eq!("json".parse::<StoreFormat>().unwrap(), StoreFormat::Json);
        assert_eq!("assoc".parse::<StoreFormat>().unwrap(), StoreFormat::PairList);
        assert_eq!("Pair-List".parse::<StoreFormat>().unwrap(), StoreFormat::PairList);
        assert_eq!(
            "xml".parse::<StoreFormat>(),
            Err(TypeError::UnknownFormat("xml".into()))
        );
    }

    #[test]
    fn persistence_parsing() {
        assert_eq!("cookie".parse::<PersistenceClass>().unwrap(), PersistenceClass::Eager);
        assert_eq!("deferred".parse::<PersistenceClass>().unwrap(), PersistenceClass::Deferred);
        assert!("later".parse::<PersistenceClass>().is_err());
    }

    #[test]
    fn builder_defaults() {
        let policy = StorePolicy::new(Expiration::Session);
        assert_eq!(policy.format, StoreFormat::Json);
        assert!(policy.persistence.is_eager());
        assert!(!policy.fingerprint_required);
        assert!(policy.length_hint.is_none());
    }

    #[test]
    fn builder_chain() {
        let policy = StorePolicy::new(Expiration::Permanent)
            .with_format(StoreFormat::PairList)
            .with_persistence(PersistenceClass::Deferred)
            .with_fingerprint(true)
            .with_length_hint(64);
        assert_eq!(policy.format, StoreFormat::PairList);
        assert_eq!(policy.persistence, PersistenceClass::Deferred);
        assert!(policy.fingerprint_required);
        assert_eq!(policy.length_hint, Some(64));
    }

    #[test]
    fn deserialize_with_legacy_spellings() {
        let policy: StorePolicy = serde_json::from_str(
            r#"{"expiration":"session","format":"assoc","persistence":"cookie"}"#,
        )
        .unwrap();
        assert_eq!(policy.format, StoreFormat::PairList);
        assert_eq!(policy.persistence, PersistenceClass::Eager);
        assert!(!policy.fingerprint_required);
    }

    #[test]
    fn display_names() {
        assert_eq!(StoreFormat::PairList.to_string(), "pair-list");
        assert_eq!(PersistenceClass::Deferred.to_string(), "deferred");
    }
}
