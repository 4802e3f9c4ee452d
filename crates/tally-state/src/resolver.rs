//! Candidate resolution: which raw value becomes a store's live value.

use tally_codec::{decode_candidate, DomainFingerprint, FINGERPRINT_FIELD};
use tally_types::StoreValue;
use tracing::debug;

/// Pick the live value for `store` out of its raw candidates.
///
/// Every candidate is decoded in discovery order. With a `fingerprint`, the
/// first mapping whose `cdh` field equals it wins; mappings with another
/// fingerprint, mappings without one, and scalars are skipped. Without a
/// fingerprint the last candidate wins.
///
/// Returns `None` when nothing qualifies.
pub fn resolve_candidates(
    store: &str,
    candidates: &[String],
    fingerprint: Option<&DomainFingerprint>,
) -> Option<StoreValue> {
    let decoded = candidates.iter().map(|raw| decode_candidate(raw));

    let Some(expected) = fingerprint else {
        let last = decoded.last();
        if last.is_some() {
            debug!(store, count = candidates.len(), "using last candidate");
        }
        return last;
    };

    for (index, value) in decoded.enumerate() {
        match value.field(FINGERPRINT_FIELD) {
            Some(found) if expected.matches(found) => {
                debug!(store, index, cdh = %expected, "domain fingerprint match");
                return Some(value);
            }
            Some(found) => {
                debug!(
                    store,
                    index,
                    runtime = %expected,
                    candidate = %found,
                    "domain fingerprints differ; skipping candidate"
                );
            }
            None => {
                debug!(store, index, "no domain fingerprint in candidate; skipping");
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_candidates_resolves_nothing() {
        assert!(resolve_candidates("v", &[], None).is_none());
        let fp = DomainFingerprint::of("example.com");
        assert!(resolve_candidates("v", &[], Some(&fp)).is_none());
    }

    #[test]
    fn last_candidate_wins_without_fingerprint() {
        let candidates = raw(&["a=>1|||x=>A", r#"{"x":"B"}"#, "a=>3|||x=>C"]);
        let value = resolve_candidates("c", &candidates, None).unwrap();
        assert_eq!(value.field("x"), Some(&json!("C")));
        assert_eq!(value.field("a"), Some(&json!("3")));
    }

    #[test]
    fn last_candidate_may_be_scalar() {
        let candidates = raw(&[r#"{"x":"A"}"#, "plain"]);
        assert_eq!(
            resolve_candidates("c", &candidates, None),
            Some(StoreValue::from("plain"))
        );
    }

    #[test]
    fn fingerprint_match_wins_in_either_order() {
        let fp = DomainFingerprint::of("example.com");
        let good = "cdh=>b6fa4eb9|||vid=>good";
        let stale = "cdh=>57a831dc|||vid=>stale";

        for order in [[good, stale], [stale, good]] {
            let value = resolve_candidates("v", &raw(&order), Some(&fp)).unwrap();
            assert_eq!(value.field("vid"), Some(&json!("good")));
        }
    }

    #[test]
    fn first_match_wins() {
        let fp = DomainFingerprint::of("example.com");
        let candidates = raw(&[
            r#"{"cdh":"b6fa4eb9","vid":"first"}"#,
            r#"{"cdh":"b6fa4eb9","vid":"second"}"#,
        ]);
        let value = resolve_candidates("v", &candidates, Some(&fp)).unwrap();
        assert_eq!(value.field("vid"), Some(&json!("first")));
    }

    #[test]
    fn mismatches_and_unfingerprinted_are_skipped() {
        let fp = DomainFingerprint::of("example.com");
        let candidates = raw(&[
            "cdh=>57a831dc|||vid=>stale",
            r#"{"vid":"no-cdh"}"#,
            "scalar",
            "{broken:",
        ]);
        assert!(resolve_candidates("v", &candidates, Some(&fp)).is_none());
    }

    #[test]
    fn malformed_candidate_does_not_stop_resolution() {
        let fp = DomainFingerprint::of("example.com");
        let candidates = raw(&["{broken:", r#"{"cdh":"b6fa4eb9","vid":"ok"}"#]);
        let value = resolve_candidates("v", &candidates, Some(&fp)).unwrap();
        assert_eq!(value.field("vid"), Some(&json!("ok")));
    }
}
