use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown store format: {0}")]
    UnknownFormat(String),

    #[error("unknown persistence class: {0}")]
    UnknownPersistenceClass(String),
}
