use thiserror::Error;

/// Errors from the HTTP transport layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors surfaced by the initial project load
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No reasonable recovery: the root payload cannot seed an editor state
    #[error("malformed project payload: {0}")]
    MalformedPayload(String),
}

/// Errors surfaced by the sync-to-cloud operation itself. Per-stage push
/// failures are not errors here; they travel in the sync report.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SyncError {
    #[error("a sync operation is already in flight for this project")]
    SyncInFlight,
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
