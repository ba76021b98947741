//! Daemon configuration.

use std::path::PathBuf;
use std::time::Duration;

use lapse_models::{CaptureConfig, EncodingConfig};
use lapse_notify::{Notifier, TelegramClient, DEFAULT_MAX_UPLOAD_MB};

/// Default capture interval in seconds.
pub const DEFAULT_CAPTURE_INTERVAL_SECS: u64 = 300;

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Base directory for frames and videos
    pub base_dir: PathBuf,
    /// Interval between captures
    pub capture_interval: Duration,
    /// Camera capture settings
    pub capture: CaptureConfig,
    /// Daily encode settings
    pub encoding: EncodingConfig,
    /// Bounded timeout for one capture invocation
    pub capture_timeout_secs: u64,
    /// Bounded timeout for one daily encode
    pub encode_timeout_secs: u64,
    /// Bounded timeout for one master rebuild
    pub concat_timeout_secs: u64,
    /// Telegram bot token (notifier disabled when absent)
    pub telegram_bot_token: Option<String>,
    /// Telegram chat id (notifier disabled when absent)
    pub telegram_chat_id: Option<String>,
    /// Maximum upload size in megabytes
    pub max_telegram_mb: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("/data"),
            capture_interval: Duration::from_secs(DEFAULT_CAPTURE_INTERVAL_SECS),
            capture: CaptureConfig::default(),
            encoding: EncodingConfig::default(),
            capture_timeout_secs: lapse_media::DEFAULT_CAPTURE_TIMEOUT_SECS,
            encode_timeout_secs: lapse_media::DEFAULT_ENCODE_TIMEOUT_SECS,
            concat_timeout_secs: lapse_media::DEFAULT_CONCAT_TIMEOUT_SECS,
            telegram_bot_token: None,
            telegram_chat_id: None,
            max_telegram_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl DaemonConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_dir: std::env::var("TIMELAPSE_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/data")),
            capture_interval: Duration::from_secs(
                std::env::var("CAPTURE_INTERVAL_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_CAPTURE_INTERVAL_SECS),
            ),
            capture: CaptureConfig::from_env(),
            encoding: EncodingConfig::from_env(),
            capture_timeout_secs: std::env::var("CAPTURE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(lapse_media::DEFAULT_CAPTURE_TIMEOUT_SECS),
            encode_timeout_secs: std::env::var("ENCODE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(lapse_media::DEFAULT_ENCODE_TIMEOUT_SECS),
            concat_timeout_secs: std::env::var("CONCAT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(lapse_media::DEFAULT_CONCAT_TIMEOUT_SECS),
            telegram_bot_token: std::env::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .filter(|s| !s.is_empty()),
            telegram_chat_id: std::env::var("TELEGRAM_CHAT_ID")
                .ok()
                .filter(|s| !s.is_empty()),
            max_telegram_mb: std::env::var("MAX_TELEGRAM_MB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_MB),
        }
    }

    /// Telegram client for the configured token, if any.
    pub fn telegram_client(&self) -> Option<TelegramClient> {
        self.telegram_bot_token
            .as_deref()
            .map(TelegramClient::new)
    }

    /// Build the delivery boundary from this config.
    ///
    /// Disabled unless both token and chat id are present.
    pub fn notifier(&self) -> Notifier {
        match (self.telegram_client(), self.telegram_chat_id.as_deref()) {
            (Some(client), Some(chat_id)) => Notifier::new(client, chat_id, self.max_telegram_mb),
            _ => Notifier::disabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DaemonConfig::default();
        assert_eq!(config.base_dir, PathBuf::from("/data"));
        assert_eq!(config.capture_interval, Duration::from_secs(300));
        assert_eq!(config.max_telegram_mb, 400);
        assert!(!config.notifier().is_enabled());
    }

    #[test]
    fn test_notifier_requires_token_and_chat() {
        let mut config = DaemonConfig {
            telegram_bot_token: Some("token".to_string()),
            ..Default::default()
        };
        assert!(!config.notifier().is_enabled());

        config.telegram_chat_id = Some("42".to_string());
        assert!(config.notifier().is_enabled());
    }
}
