//! Telegram Bot API client.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{NotifyError, NotifyResult};

/// Default Bot API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Extra request headroom on top of the long-poll timeout.
const POLL_HTTP_SLACK_SECS: u64 = 10;

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

/// One update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

/// An incoming message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

/// The chat a message arrived from.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Thin client over the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Create a client for the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_API_BASE.to_string(),
            token: token.into(),
        }
    }

    /// Override the API base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// Send a text message.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> NotifyResult<()> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .timeout(Duration::from_secs(30))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;

        let envelope: ApiResponse<serde_json::Value> = response.json().await?;
        check_envelope(envelope)?;
        debug!("Sent message to chat {}", chat_id);
        Ok(())
    }

    /// Upload and send a video file with a caption.
    ///
    /// The file is streamed from disk rather than buffered; daily videos can
    /// run to hundreds of megabytes.
    pub async fn send_video(
        &self,
        chat_id: &str,
        path: impl AsRef<Path>,
        caption: &str,
    ) -> NotifyResult<()> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let length = file.metadata().await?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "video.mp4".to_string());

        let part = multipart::Part::stream_with_length(reqwest::Body::from(file), length)
            .file_name(file_name)
            .mime_str("video/mp4")?;
        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("video", part);

        let response = self
            .http
            .post(self.method_url("sendVideo"))
            .multipart(form)
            .send()
            .await?;

        let envelope: ApiResponse<serde_json::Value> = response.json().await?;
        check_envelope(envelope)?;
        debug!("Sent video {} to chat {}", path.display(), chat_id);
        Ok(())
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> NotifyResult<Vec<Update>> {
        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs + POLL_HTTP_SLACK_SECS))
            .json(&json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }))
            .send()
            .await?;

        let envelope: ApiResponse<Vec<Update>> = response.json().await?;
        Ok(check_envelope(envelope)?.unwrap_or_default())
    }
}

fn check_envelope<T>(envelope: ApiResponse<T>) -> NotifyResult<Option<T>> {
    if envelope.ok {
        Ok(envelope.result)
    } else {
        Err(NotifyError::api(
            envelope.error_code,
            envelope
                .description
                .unwrap_or_else(|| "unknown Telegram API error".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> TelegramClient {
        TelegramClient::new("TEST_TOKEN").with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_send_message_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "42",
                "text": "Timelapse running."
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .send_message("42", "Timelapse running.")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_message_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .send_message("42", "hello")
            .await
            .unwrap_err();
        match err {
            NotifyError::Api { code, description } => {
                assert_eq!(code, Some(400));
                assert!(description.contains("chat not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_send_video_multipart() {
        let dir = tempfile::TempDir::new().unwrap();
        let video = dir.path().join("2024-01-05.mp4");
        tokio::fs::write(&video, b"fake video bytes").await.unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/sendVideo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": { "message_id": 2 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .send_video("42", &video, "Timelapse 2024-01-05")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_updates_parses_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST_TOKEN/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "result": [{
                    "update_id": 7,
                    "message": { "chat": { "id": 42 }, "text": "/status" }
                }]
            })))
            .mount(&server)
            .await;

        let updates = client(&server).get_updates(0, 1).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 7);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("/status"));
    }
}
