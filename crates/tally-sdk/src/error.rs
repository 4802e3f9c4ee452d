use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("json config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("state error: {0}")]
    State(#[from] tally_state::StateError),
}

pub type SdkResult<T> = Result<T, SdkError>;
