//! Re-run encoding for one day bucket.
//!
//! The daemon never retries a failed encode on its own; this binary is the
//! explicit retry path. It encodes the named day's frames, rebuilds the
//! master and, when Telegram is configured, delivers both videos.
//!
//! Usage: `encode-day 2024-01-05`

use std::sync::Arc;

use lapse_daemon::{ConcatMerger, DaemonConfig, DayFinalizer, FinalizeOutcome, TimelapseEncoder};
use lapse_models::DayKey;
use lapse_store::{FrameStore, StoreLayout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");
    dotenvy::dotenv().ok();

    let day: DayKey = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: encode-day <YYYY-MM-DD>"))?
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    lapse_media::check_ffmpeg().map_err(|e| anyhow::anyhow!("{}", e))?;

    let config = DaemonConfig::from_env();
    let store = FrameStore::new(StoreLayout::new(&config.base_dir));
    store.ensure_layout().await?;

    println!("encode-day: encoding bucket {}", day);

    let finalizer = DayFinalizer::new(
        store,
        Arc::new(TimelapseEncoder::new(
            config.encoding.clone(),
            config.encode_timeout_secs,
        )),
        Arc::new(ConcatMerger::new(config.concat_timeout_secs)),
        config.notifier(),
    );

    match finalizer.finalize_day(day).await? {
        FinalizeOutcome::Encoded {
            video,
            duration_secs,
        } => {
            println!(
                "encode-day: ok, {} ({:.1}s)",
                video.display(),
                duration_secs
            );
        }
        FinalizeOutcome::EmptyBucket => {
            println!("encode-day: bucket {} has no frames, nothing to do", day);
        }
    }

    Ok(())
}
