//! Telegram Bot API boundary.
//!
//! This crate provides:
//! - A thin Bot API client (sendMessage, sendVideo multipart, getUpdates)
//! - Video delivery with exponential-backoff retries and a size guard
//! - A `/status` command loop answering from the scheduler's snapshot

pub mod client;
pub mod commands;
pub mod error;
pub mod notifier;
pub mod retry;

pub use client::{Chat, Message, TelegramClient, Update, DEFAULT_API_BASE};
pub use commands::run_command_loop;
pub use error::{NotifyError, NotifyResult};
pub use notifier::{Notifier, DEFAULT_MAX_UPLOAD_MB};
pub use retry::{retry_async, RetryConfig, RetryResult};
