//! Day finalization pipeline.
//!
//! Runs once per sealed bucket: encode the day's frames into a daily video,
//! deliver it, rebuild the master from every daily video to date, deliver
//! that. Delivery failures are logged and swallowed at this boundary;
//! encode and merge failures abort the remaining stages and surface to the
//! caller for logging.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use lapse_models::DayKey;
use lapse_notify::Notifier;
use lapse_store::FrameStore;

use crate::error::DaemonResult;
use crate::ops::{BucketEncoder, MasterMerger};

/// What finalization produced for a day.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeOutcome {
    /// A daily video was encoded and the master rebuilt.
    Encoded {
        video: PathBuf,
        duration_secs: f64,
    },
    /// The bucket held no frames; nothing was produced.
    EmptyBucket,
}

/// Finalizes sealed day buckets.
pub struct DayFinalizer {
    store: FrameStore,
    encoder: Arc<dyn BucketEncoder>,
    merger: Arc<dyn MasterMerger>,
    notifier: Notifier,
}

impl DayFinalizer {
    /// Create a finalizer over the given seams.
    pub fn new(
        store: FrameStore,
        encoder: Arc<dyn BucketEncoder>,
        merger: Arc<dyn MasterMerger>,
        notifier: Notifier,
    ) -> Self {
        Self {
            store,
            encoder,
            merger,
            notifier,
        }
    }

    /// Encode, deliver and merge one sealed day bucket.
    pub async fn finalize_day(&self, day: DayKey) -> DaemonResult<FinalizeOutcome> {
        let frames = self.store.frame_count(day).await?;
        if frames == 0 {
            info!("Bucket {} has no frames, skipping encode", day);
            return Ok(FinalizeOutcome::EmptyBucket);
        }

        let frames_dir = self.store.layout().day_dir(day);
        let video = self.store.layout().daily_video_path(day);
        info!("Finalizing day {} ({} frames)", day, frames);

        self.encoder.encode_bucket(&frames_dir, &video).await?;

        let duration_secs = match lapse_media::get_duration(&video).await {
            Ok(duration) => duration,
            Err(e) => {
                warn!("Failed to probe daily video duration: {}", e);
                0.0
            }
        };
        info!(
            "Daily video ready: {} ({:.1}s)",
            video.display(),
            duration_secs
        );

        if let Err(e) = self.notifier.send_daily(day, &video).await {
            warn!("Daily video delivery failed: {}", e);
        }

        let daily_videos: Vec<PathBuf> = self
            .store
            .list_daily_videos()
            .await?
            .into_iter()
            .map(|(_, path)| path)
            .collect();
        let master = self.store.layout().master_path();
        self.merger.rebuild_master(&daily_videos, &master).await?;

        if let Err(e) = self.notifier.send_master(day, &master).await {
            warn!("Master video delivery failed: {}", e);
        }

        Ok(FinalizeOutcome::Encoded {
            video,
            duration_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use lapse_media::{MediaError, MediaResult};
    use lapse_store::StoreLayout;

    /// Encoder fake: writes a marker file, or fails on demand.
    struct FakeEncoder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeEncoder {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BucketEncoder for FakeEncoder {
        async fn encode_bucket(&self, frames_dir: &Path, output: &Path) -> MediaResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MediaError::ffmpeg_failed("encoder exploded", Some(1)));
            }
            let day = frames_dir.file_name().unwrap().to_string_lossy().to_string();
            tokio::fs::write(output, format!("enc:{day};")).await?;
            Ok(())
        }
    }

    /// Merger fake: byte-concatenates inputs, or fails on demand.
    struct FakeMerger {
        fail: bool,
    }

    #[async_trait]
    impl MasterMerger for FakeMerger {
        async fn rebuild_master(
            &self,
            daily_videos: &[PathBuf],
            master: &Path,
        ) -> MediaResult<()> {
            if self.fail {
                return Err(MediaError::ffmpeg_failed("concat exploded", Some(1)));
            }
            let mut merged = Vec::new();
            for video in daily_videos {
                merged.extend(tokio::fs::read(video).await?);
            }
            tokio::fs::write(master, merged).await?;
            Ok(())
        }
    }

    async fn seed_frames(store: &FrameStore, day: DayKey, count: usize) {
        let dir = store.ensure_day_dir(day).await.unwrap();
        for i in 0..count {
            tokio::fs::write(dir.join(format!("1200{i:02}.jpg")), b"jpeg")
                .await
                .unwrap();
        }
    }

    fn finalizer(
        store: &FrameStore,
        encoder: Arc<FakeEncoder>,
        merger: Arc<FakeMerger>,
    ) -> DayFinalizer {
        DayFinalizer::new(
            store.clone(),
            encoder,
            merger,
            Notifier::disabled(),
        )
    }

    #[tokio::test]
    async fn test_empty_bucket_produces_nothing() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(StoreLayout::new(dir.path()));
        store.ensure_layout().await.unwrap();
        let day: DayKey = "2024-01-05".parse().unwrap();

        let encoder = Arc::new(FakeEncoder::ok());
        let outcome = finalizer(&store, Arc::clone(&encoder), Arc::new(FakeMerger { fail: false }))
            .finalize_day(day)
            .await
            .unwrap();

        assert_eq!(outcome, FinalizeOutcome::EmptyBucket);
        assert_eq!(encoder.call_count(), 0);
        assert!(!store.layout().daily_video_path(day).exists());
        assert!(!store.layout().master_path().exists());
    }

    #[tokio::test]
    async fn test_finalize_encodes_and_rebuilds_master_in_date_order() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(StoreLayout::new(dir.path()));
        store.ensure_layout().await.unwrap();

        // An older daily video already exists
        let older: DayKey = "2024-01-04".parse().unwrap();
        tokio::fs::write(store.layout().daily_video_path(older), b"enc:2024-01-04;")
            .await
            .unwrap();

        let day: DayKey = "2024-01-05".parse().unwrap();
        seed_frames(&store, day, 3).await;

        let encoder = Arc::new(FakeEncoder::ok());
        let outcome = finalizer(&store, Arc::clone(&encoder), Arc::new(FakeMerger { fail: false }))
            .finalize_day(day)
            .await
            .unwrap();

        assert!(matches!(outcome, FinalizeOutcome::Encoded { .. }));
        assert_eq!(encoder.call_count(), 1);
        assert!(store.has_daily_video(day).await);

        // Master is the concatenation of both dailies, ascending by date
        let master = tokio::fs::read(store.layout().master_path()).await.unwrap();
        assert_eq!(master, b"enc:2024-01-04;enc:2024-01-05;");
    }

    #[tokio::test]
    async fn test_encode_failure_leaves_no_daily_and_master_untouched() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(StoreLayout::new(dir.path()));
        store.ensure_layout().await.unwrap();
        tokio::fs::write(store.layout().master_path(), b"previous master")
            .await
            .unwrap();

        let day: DayKey = "2024-01-05".parse().unwrap();
        seed_frames(&store, day, 2).await;

        let result = finalizer(
            &store,
            Arc::new(FakeEncoder::failing()),
            Arc::new(FakeMerger { fail: false }),
        )
        .finalize_day(day)
        .await;

        assert!(result.is_err());
        assert!(!store.has_daily_video(day).await);
        assert_eq!(
            tokio::fs::read(store.layout().master_path()).await.unwrap(),
            b"previous master"
        );
    }

    #[tokio::test]
    async fn test_merge_failure_keeps_daily_video() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(StoreLayout::new(dir.path()));
        store.ensure_layout().await.unwrap();
        tokio::fs::write(store.layout().master_path(), b"previous master")
            .await
            .unwrap();

        let day: DayKey = "2024-01-05".parse().unwrap();
        seed_frames(&store, day, 2).await;

        let result = finalizer(
            &store,
            Arc::new(FakeEncoder::ok()),
            Arc::new(FakeMerger { fail: true }),
        )
        .finalize_day(day)
        .await;

        assert!(result.is_err());
        assert!(store.has_daily_video(day).await);
        assert_eq!(
            tokio::fs::read(store.layout().master_path()).await.unwrap(),
            b"previous master"
        );
    }

    #[tokio::test]
    async fn test_finalize_same_day_twice_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let store = FrameStore::new(StoreLayout::new(dir.path()));
        store.ensure_layout().await.unwrap();

        let day: DayKey = "2024-01-05".parse().unwrap();
        seed_frames(&store, day, 2).await;

        let encoder = Arc::new(FakeEncoder::ok());
        let f = finalizer(&store, Arc::clone(&encoder), Arc::new(FakeMerger { fail: false }));

        f.finalize_day(day).await.unwrap();
        let first = tokio::fs::read(store.layout().master_path()).await.unwrap();
        f.finalize_day(day).await.unwrap();
        let second = tokio::fs::read(store.layout().master_path()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(encoder.call_count(), 2);
    }
}
