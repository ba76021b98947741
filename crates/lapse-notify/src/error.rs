//! Notifier error types.

use thiserror::Error;

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors that can occur talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Telegram API error ({code:?}): {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NotifyError {
    /// Create an API error from a response envelope.
    pub fn api(code: Option<i64>, description: impl Into<String>) -> Self {
        Self::Api {
            code,
            description: description.into(),
        }
    }
}
