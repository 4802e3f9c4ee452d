/// Errors from encoding or decoding store payloads.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload was not valid JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pair-list payload was empty.
    #[error("empty pair-list payload")]
    EmptyPairList,
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
