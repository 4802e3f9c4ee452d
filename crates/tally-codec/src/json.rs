use serde_json::Value;
use tally_types::Fields;

use crate::error::CodecResult;

/// Codec for the JSON store format.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a field map as compact JSON object text, in field order.
    pub fn encode(fields: &Fields) -> CodecResult<String> {
        Ok(serde_json::to_string(fields)?)
    }

    /// Decode JSON text into a field map.
    ///
    /// Objects map directly. Arrays become index-keyed fields (`"0"`, `"1"`,
    /// ...), `null` becomes an empty map and any other scalar lands under
    /// key `"0"`.
    pub fn decode(text: &str) -> CodecResult<Fields> {
        let value: Value = serde_json::from_str(text)?;
        Ok(match value {
            Value::Object(fields) => fields,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
            Value::Null => Fields::new(),
            scalar => {
                let mut fields = Fields::new();
                fields.insert("0".to_string(), scalar);
                fields
            }
        })
    }
}
