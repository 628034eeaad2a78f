use thiserror::Error;

/// Failures a fetch cycle can end in.
///
/// `Aborted` exists so transports can report a cancelled request; the
/// [`Fetcher`](crate::fetch::Fetcher) treats it as a neutral outcome and
/// never stores it in its error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request aborted")]
    Aborted,

    #[error("network error: {0}")]
    Network(String),

    #[error("http status {code}: {message}")]
    Status { code: u16, message: String },

    #[error("failed to decode response body: {0}")]
    Decode(String),
}

/// Persistence failures. Callers of [`StoredValue`](crate::storage::StoredValue)
/// never see these; they are logged and absorbed at the bridge.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode value for key '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}
