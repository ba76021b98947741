//! Bot command polling.
//!
//! A small long-poll loop over `getUpdates` that answers `/status` with the
//! scheduler's latest snapshot. Only messages from the configured chat are
//! answered; everything else is ignored. Poll failures back off and the loop
//! keeps going until shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use lapse_models::StatusSnapshot;

use crate::client::{TelegramClient, Update};

/// Long-poll timeout passed to `getUpdates`.
const POLL_TIMEOUT_SECS: u64 = 30;

/// Backoff after a failed poll.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Run the command loop until `shutdown` flips to true.
pub async fn run_command_loop(
    client: TelegramClient,
    chat_id: String,
    status_rx: watch::Receiver<StatusSnapshot>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Starting Telegram command loop");
    let mut offset: i64 = 0;

    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
            result = client.get_updates(offset, POLL_TIMEOUT_SECS) => {
                match result {
                    Ok(updates) => {
                        for update in updates {
                            offset = offset.max(update.update_id + 1);
                            handle_update(&client, &chat_id, &status_rx, update).await;
                        }
                    }
                    Err(e) => {
                        warn!("getUpdates failed: {}", e);
                        tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                    }
                }
            }
        }
    }

    info!("Telegram command loop stopped");
}

async fn handle_update(
    client: &TelegramClient,
    chat_id: &str,
    status_rx: &watch::Receiver<StatusSnapshot>,
    update: Update,
) {
    let Some(message) = update.message else {
        return;
    };
    if message.chat.id.to_string() != chat_id {
        debug!("Ignoring message from unknown chat {}", message.chat.id);
        return;
    }
    let Some(text) = message.text else {
        return;
    };

    if text.trim().starts_with("/status") {
        let reply = status_rx.borrow().render();
        if let Err(e) = client.send_message(chat_id, &reply).await {
            warn!("Failed to send status reply: {}", e);
        }
    }
}
