//! Legacy pair-list encoding: `key=>value` pairs joined by `|||`.
//!
//! Neither delimiter is escaped. A value containing `=>` or `|||` does not
//! survive a round trip; previously written cookies depend on this exact
//! layout, so it is kept as is.

use serde_json::Value;
use tally_types::Fields;

use crate::error::{CodecError, CodecResult};

/// Separator between pairs.
pub const PAIR_DELIMITER: &str = "|||";

/// Separator between a key and its value.
pub const KEY_VALUE_DELIMITER: &str = "=>";

/// Codec for the legacy pair-list format.
pub struct PairListCodec;

impl PairListCodec {
    /// Encode a field map. Strings are written raw, `null` as nothing, and
    /// other values as their JSON text.
    pub fn encode(fields: &Fields) -> String {
        fields
            .iter()
            .map(|(key, value)| format!("{key}{KEY_VALUE_DELIMITER}{}", render(value)))
            .collect::<Vec<_>>()
            .join(PAIR_DELIMITER)
    }

    /// Decode pair-list text into a field map.
    ///
    /// Each pair is split on `=>`: the first piece is the key and the second
    /// the value. A pair without `=>` maps its key to `null`; pieces after
    /// the second are dropped.
    pub fn decode(text: &str) -> CodecResult<Fields> {
        if text.is_empty() {
            return Err(CodecError::EmptyPairList);
        }
        let mut fields = Fields::new();
        for pair in text.split(PAIR_DELIMITER) {
            let mut pieces = pair.split(KEY_VALUE_DELIMITER);
            let key = pieces.next().unwrap_or_default();
            let value = pieces
                .next()
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null);
            fields.insert(key.to_string(), value);
        }
        Ok(fields)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn encode_simple() {
        let map = fields(&[("a", "1"), ("b", "2")]);
        assert_eq!(PairListCodec::encode(&map), "a=>1|||b=>2");
    }

    #[test]
    fn roundtrip_simple() {
        let map = fields(&[("a", "1"), ("b", "2")]);
        let decoded = PairListCodec::decode(&PairListCodec::encode(&map)).unwrap();
        assert_eq!(decoded, map);
        let keys: Vec<&String> = decoded.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn encode_non_string_values() {
        let mut map = Fields::new();
        map.insert("n".into(), json!(5));
        map.insert("t".into(), json!(true));
        map.insert("z".into(), json!(null));
        map.insert("o".into(), json!({"x": "y"}));
        assert_eq!(
            PairListCodec::encode(&map),
            r#"n=>5|||t=>true|||z=>|||o=>{"x":"y"}"#
        );
    }

    #[test]
    fn encode_empty_map() {
        assert_eq!(PairListCodec::encode(&Fields::new()), "");
    }

    #[test]
    fn decode_empty_is_error() {
        assert!(matches!(
            PairListCodec::decode(""),
            Err(CodecError::EmptyPairList)
        ));
    }

    #[test]
    fn decode_pair_without_separator_is_null() {
        let decoded = PairListCodec::decode("a=>1|||orphan").unwrap();
        assert_eq!(decoded.get("a"), Some(&json!("1")));
        assert_eq!(decoded.get("orphan"), Some(&Value::Null));
    }

    #[test]
    fn decode_drops_extra_pieces() {
        let decoded = PairListCodec::decode("a=>1=>2|||b=>3").unwrap();
        assert_eq!(decoded.get("a"), Some(&json!("1")));
        assert_eq!(decoded.get("b"), Some(&json!("3")));
    }

    #[test]
    fn unescaped_delimiter_in_value_is_lossy() {
        let map = fields(&[("a", "x|||y")]);
        let decoded = PairListCodec::decode(&PairListCodec::encode(&map)).unwrap();
        assert_ne!(decoded, map);
        assert_eq!(decoded.get("a"), Some(&json!("x")));
        assert_eq!(decoded.get("y"), Some(&Value::Null));
    }

    #[test]
    fn decode_real_visitor_cookie() {
        let decoded =
            PairListCodec::decode("cdh=>b6fa4eb9|||vid=>1700000000123456789|||fsts=>1700000000")
                .unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.get("cdh"), Some(&json!("b6fa4eb9")));
    }

    proptest! {
        #[test]
        fn roundtrip_delimiter_free_maps(
            map in prop::collection::btree_map("[a-z_][a-z0-9_]{0,7}", "[A-Za-z0-9 .:_-]{0,12}", 1..8)
        ) {
            let fields: Fields = map
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            let decoded = PairListCodec::decode(&PairListCodec::encode(&fields)).unwrap();
            prop_assert_eq!(decoded, fields);
        }
    }
}
