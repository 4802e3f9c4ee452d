use std::fmt;

use serde_json::Value;

/// Field name under which a mapping value carries its domain fingerprint.
pub const FINGERPRINT_FIELD: &str = "cdh";

/// Short, content-derived tag of the cookie domain a value was written for.
///
/// The fingerprint is the CRC-32 (IEEE) of the domain text rendered as
/// lowercase hex without zero padding, so `""` yields `"0"`. Two subdomains
/// that both planted a cookie under the same name are told apart by
/// comparing this tag against the one computed for the active domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DomainFingerprint(String);

impl DomainFingerprint {
    /// Fingerprint of the given domain.
    pub fn of(domain: &str) -> Self {
        Self(format!("{:x}", crc32fast::hash(domain.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `value` is exactly this fingerprint as a JSON string.
    pub fn matches(&self, value: &Value) -> bool {
        value.as_str() == Some(self.0.as_str())
    }

    /// The fingerprint as a JSON field value.
    pub fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl fmt::Display for DomainFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_domain_is_zero() {
        assert_eq!(DomainFingerprint::of("").as_str(), "0");
    }

    #[test]
    fn known_values() {
        assert_eq!(DomainFingerprint::of("123456789").as_str(), "cbf43926");
        assert_eq!(DomainFingerprint::of("example.com").as_str(), "b6fa4eb9");
        assert_eq!(DomainFingerprint::of(".example.com").as_str(), "57a831dc");
    }

    #[test]
    fn no_zero_padding() {
        assert_eq!(DomainFingerprint::of("d40.com").as_str(), "7458d4c");
    }

    #[test]
    fn subdomains_differ() {
        assert_ne!(
            DomainFingerprint::of("www.example.com"),
            DomainFingerprint::of(".example.com")
        );
    }

    #[test]
    fn matches_only_exact_strings() {
        let fp = DomainFingerprint::of("example.com");
        assert!(fp.matches(&json!("b6fa4eb9")));
        assert!(!fp.matches(&json!("B6FA4EB9")));
        assert!(!fp.matches(&json!(0xb6fa4eb9u32)));
        assert!(!fp.matches(&json!(null)));
    }

    #[test]
    fn display_and_value() {
        let fp = DomainFingerprint::of("a");
        assert_eq!(fp.to_string(), "e8b7be43");
        assert_eq!(fp.to_value(), json!("e8b7be43"));
    }
}
