//! The capture scheduler loop.
//!
//! One timer-driven task owns the "current day" state. Every tick it checks
//! for a date rollover (sealing the previous bucket and spawning its
//! finalization exactly once), captures one frame into the current bucket,
//! and publishes a status snapshot. Capture failures skip the tick; nothing
//! escapes the loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use lapse_models::{DayKey, StatusSnapshot};
use lapse_store::FrameStore;

use crate::error::DaemonResult;
use crate::ops::FrameSource;
use crate::pipeline::{DayFinalizer, FinalizeOutcome};

/// Timer-driven capture loop.
pub struct Scheduler {
    store: FrameStore,
    source: Arc<dyn FrameSource>,
    finalizer: Arc<DayFinalizer>,
    interval: Duration,
    /// The bucket currently receiving frames. None until the first tick;
    /// afterwards only ever moves to the wall-clock date of the newest tick,
    /// in either direction, so a clock jump starts a fresh bucket instead of
    /// reopening a sealed one.
    current_day: Option<DayKey>,
    frames_today: u64,
    status_tx: watch::Sender<StatusSnapshot>,
}

impl Scheduler {
    /// Create a scheduler and the status channel it publishes to.
    pub fn new(
        store: FrameStore,
        source: Arc<dyn FrameSource>,
        finalizer: Arc<DayFinalizer>,
        interval: Duration,
    ) -> (Self, watch::Receiver<StatusSnapshot>) {
        let (status_tx, status_rx) = watch::channel(StatusSnapshot::idle(interval.as_secs()));
        (
            Self {
                store,
                source,
                finalizer,
                interval,
                current_day: None,
                frames_today: 0,
                status_tx,
            },
            status_rx,
        )
    }

    /// Run until `shutdown` flips to true.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> DaemonResult<()> {
        self.store.ensure_layout().await?;
        info!(
            "Scheduler started, capturing every {}s",
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let _ = self.tick(Local::now().naive_local()).await;
                }
            }
        }

        self.publish(false);
        info!("Scheduler stopped");
        Ok(())
    }

    /// One scheduler pass at the given wall-clock time.
    ///
    /// Returns the handle of the finalization task when this tick sealed a
    /// bucket, so callers (and tests) can await it.
    pub async fn tick(&mut self, now: NaiveDateTime) -> Option<JoinHandle<()>> {
        let today = DayKey::new(now.date());
        let mut finalize_handle = None;

        match self.current_day {
            Some(previous) if previous != today => {
                info!("Day rollover: {} sealed, starting {}", previous, today);
                // Seal before encoding starts: from here on every new frame
                // belongs to the new bucket.
                self.current_day = Some(today);
                self.frames_today = 0;
                finalize_handle = Some(self.spawn_finalize(previous));
            }
            None => {
                self.current_day = Some(today);
            }
            _ => {}
        }

        match self.capture_into_bucket(today, now.time()).await {
            Ok(path) => {
                self.frames_today += 1;
                debug!("Frame written: {}", path.display());
            }
            Err(e) => warn!("Capture failed, skipping tick: {}", e),
        }

        self.publish(true);
        finalize_handle
    }

    async fn capture_into_bucket(
        &self,
        day: DayKey,
        time: NaiveTime,
    ) -> DaemonResult<PathBuf> {
        self.store.ensure_day_dir(day).await?;
        let path = self.store.layout().frame_path(day, time);
        self.source.capture_frame(&path).await?;
        Ok(path)
    }

    fn spawn_finalize(&self, day: DayKey) -> JoinHandle<()> {
        let finalizer = Arc::clone(&self.finalizer);
        tokio::spawn(async move {
            match finalizer.finalize_day(day).await {
                Ok(FinalizeOutcome::Encoded {
                    video,
                    duration_secs,
                }) => {
                    info!(
                        "Day {} finalized: {} ({:.1}s)",
                        day,
                        video.display(),
                        duration_secs
                    );
                }
                Ok(FinalizeOutcome::EmptyBucket) => {
                    info!("Day {} had no frames, nothing encoded", day);
                }
                Err(e) => {
                    error!("Finalization of {} failed: {}", day, e);
                }
            }
        })
    }

    fn publish(&self, running: bool) {
        self.status_tx.send_replace(StatusSnapshot {
            running,
            current_day: self.current_day,
            interval_secs: self.interval.as_secs(),
            frames_today: self.frames_today,
        });
    }
}
