//! Format sniffing for raw candidate text, and format dispatch on write.

use tally_types::{Fields, StoreFormat, StoreValue};
use tracing::debug;

use crate::error::CodecResult;
use crate::json::JsonCodec;
use crate::pair_list::{PairListCodec, PAIR_DELIMITER};

/// Encoding guessed from the shape of raw candidate text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateEncoding {
    /// Contains the `|||` pair delimiter after at least one byte of key.
    PairList,
    /// Contains a colon, as any non-empty JSON object does.
    Json,
    /// Anything else is kept as a bare string.
    Scalar,
}

impl CandidateEncoding {
    /// Guess the encoding of `raw`. Pair-list wins over JSON.
    ///
    /// Text that starts with the delimiter has no first key and is not
    /// treated as a pair list.
    pub fn sniff(raw: &str) -> Self {
        if raw.find(PAIR_DELIMITER).is_some_and(|at| at > 0) {
            Self::PairList
        } else if raw.contains(':') {
            Self::Json
        } else {
            Self::Scalar
        }
    }
}

/// Decode one raw candidate value.
///
/// Never fails: a payload that sniffs as structured but does not parse
/// decodes to an empty mapping, so the candidates after it can still be
/// considered.
pub fn decode_candidate(raw: &str) -> StoreValue {
    let decoded = match CandidateEncoding::sniff(raw) {
        CandidateEncoding::Scalar => return StoreValue::Scalar(raw.to_string()),
        CandidateEncoding::PairList => PairListCodec::decode(raw),
        CandidateEncoding::Json => JsonCodec::decode(raw),
    };
    match decoded {
        Ok(fields) => StoreValue::Fields(fields),
        Err(e) => {
            debug!(error = %e, "malformed candidate payload; treating as empty");
            StoreValue::Fields(Fields::new())
        }
    }
}

/// Encode a live value for persistence.
///
/// Mappings use the store's configured format. Scalars are written verbatim
/// whatever the format.
pub fn encode_value(format: StoreFormat, value: &StoreValue) -> CodecResult<String> {
    match value {
        StoreValue::Scalar(s) => Ok(s.clone()),
        StoreValue::Fields(fields) => match format {
            StoreFormat::Json => JsonCodec::encode(fields),
            StoreFormat::PairList => Ok(PairListCodec::encode(fields)),
        },
    }
}
