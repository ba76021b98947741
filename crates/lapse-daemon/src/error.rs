//! Daemon error types.

use thiserror::Error;

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Media error: {0}")]
    Media(#[from] lapse_media::MediaError),

    #[error("Store error: {0}")]
    Store(#[from] lapse_store::StoreError),

    #[error("Notify error: {0}")]
    Notify(#[from] lapse_notify::NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
