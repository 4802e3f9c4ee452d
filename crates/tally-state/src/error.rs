use tally_codec::CodecError;

/// Errors from explicit state store operations.
///
/// The everyday operations (`get`, `set`, `clear`, `persist`) never return
/// these; they log and degrade to a no-op. Only [`crate::StateStore::try_persist`]
/// surfaces them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No policy is registered under this store name.
    #[error("no store registered with name {0}")]
    UnknownStore(String),

    /// The store has no live value to persist.
    #[error("store {0} has no live value")]
    NotMaterialized(String),

    /// The live value could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Result alias for state store operations.
pub type StateResult<T> = Result<T, StateError>;
