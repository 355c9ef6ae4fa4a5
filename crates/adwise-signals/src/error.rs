use thiserror::Error;

/// Errors raised while talking to signal sources.
///
/// These stay internal to the aggregator: every public fetch converts them
/// into a logged warning plus a fallback value.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The benchmark source returned a non-success status.
    #[error("benchmark source error: status {0}")]
    SourceStatus(u16),
}
