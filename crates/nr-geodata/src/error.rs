use std::time::Duration;
use thiserror::Error;

/// Why a single feature fetch produced no usable value.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream HTTP {0}")]
    Status(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("upstream reported: {0}")]
    Upstream(String),
    #[error("response missing {0}")]
    MissingField(&'static str),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
