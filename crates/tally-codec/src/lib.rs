//! Payload codecs for Tally stores.
//!
//! Persisted store values travel as short strings. A mapping is written in
//! one of two formats chosen per store:
//!
//! - **JSON**: standard object text, `{"cdh":"b6fa4eb9","vid":"1"}`
//! - **Pair-list**: the legacy `cdh=>b6fa4eb9|||vid=>1` encoding
//!
//! Reading never trusts the configured format. [`decode_candidate`] sniffs
//! the text so that values written under an older configuration still load.
//!
//! The [`DomainFingerprint`] binds a value to the cookie domain it was
//! written for.

pub mod error;
pub mod fingerprint;
pub mod json;
pub mod pair_list;
pub mod sniff;

pub use error::{CodecError, CodecResult};
pub use fingerprint::{DomainFingerprint, FINGERPRINT_FIELD};
pub use json::JsonCodec;
pub use pair_list::{PairListCodec, KEY_VALUE_DELIMITER, PAIR_DELIMITER};
pub use sniff::{decode_candidate, encode_value, CandidateEncoding};
