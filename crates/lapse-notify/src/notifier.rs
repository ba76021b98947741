//! Video delivery with retries and an upload size guard.

use std::path::Path;

use tracing::{info, warn};

use lapse_models::DayKey;

use crate::client::TelegramClient;
use crate::error::NotifyResult;
use crate::retry::{retry_async, RetryConfig};

/// Default maximum upload size in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 400;

/// Delivery boundary for finished videos.
///
/// An unconfigured notifier (no token or chat id) swallows every delivery
/// with a warning so the pipeline keeps producing videos locally.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Option<TelegramClient>,
    chat_id: String,
    max_upload_mb: u64,
    retry: RetryConfig,
}

impl Notifier {
    /// Create a configured notifier.
    pub fn new(client: TelegramClient, chat_id: impl Into<String>, max_upload_mb: u64) -> Self {
        Self {
            client: Some(client),
            chat_id: chat_id.into(),
            max_upload_mb,
            retry: RetryConfig::new("telegram_delivery"),
        }
    }

    /// Create a disabled notifier that logs and skips every delivery.
    pub fn disabled() -> Self {
        Self {
            client: None,
            chat_id: String::new(),
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
            retry: RetryConfig::new("telegram_delivery"),
        }
    }

    /// Whether deliveries will actually reach Telegram.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Deliver a finished daily video.
    pub async fn send_daily(&self, day: DayKey, path: impl AsRef<Path>) -> NotifyResult<()> {
        self.send_video_file(path, &format!("Timelapse {}", day)).await
    }

    /// Deliver the rebuilt master video.
    pub async fn send_master(&self, day: DayKey, path: impl AsRef<Path>) -> NotifyResult<()> {
        self.send_video_file(path, &format!("Updated master after {}", day))
            .await
    }

    /// Upload one video file with a caption, retrying transient failures.
    ///
    /// Files over the configured size cap are skipped with a warning, not an
    /// error: Telegram rejects them anyway and the local file remains.
    pub async fn send_video_file(
        &self,
        path: impl AsRef<Path>,
        caption: &str,
    ) -> NotifyResult<()> {
        let path = path.as_ref();
        let Some(client) = &self.client else {
            warn!("Telegram not configured, skipping delivery of {}", path.display());
            return Ok(());
        };

        let size_mb = tokio::fs::metadata(path).await?.len() / 1024 / 1024;
        if size_mb > self.max_upload_mb {
            warn!(
                "Skipping send, file {} is {}MB (limit {}MB)",
                path.display(),
                size_mb,
                self.max_upload_mb
            );
            return Ok(());
        }

        retry_async(&self.retry, || {
            client.send_video(&self.chat_id, path, caption)
        })
        .await
        .into_result()?;

        info!("Delivered {} to Telegram", path.display());
        Ok(())
    }
}
