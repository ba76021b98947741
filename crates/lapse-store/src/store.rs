//! Frame store operations.

use std::path::PathBuf;

use tokio::fs;
use tracing::debug;

use lapse_models::DayKey;

use crate::error::{StoreError, StoreResult};
use crate::layout::{StoreLayout, MASTER_FILE_NAME};

/// Filesystem-backed store for frame buckets and finished videos.
#[derive(Debug, Clone)]
pub struct FrameStore {
    layout: StoreLayout,
}

impl FrameStore {
    /// Create a store over the given layout.
    pub fn new(layout: StoreLayout) -> Self {
        Self { layout }
    }

    /// The underlying layout.
    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    /// Create the base, images and videos directories. Idempotent.
    pub async fn ensure_layout(&self) -> StoreResult<()> {
        for dir in [
            self.layout.base_dir().to_path_buf(),
            self.layout.images_dir(),
            self.layout.videos_dir(),
        ] {
            fs::create_dir_all(&dir).await.map_err(|source| {
                StoreError::CreateDir {
                    path: dir.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Create a day's bucket directory. Idempotent.
    pub async fn ensure_day_dir(&self, day: DayKey) -> StoreResult<PathBuf> {
        let dir = self.layout.day_dir(day);
        fs::create_dir_all(&dir).await.map_err(|source| {
            StoreError::CreateDir {
                path: dir.clone(),
                source,
            }
        })?;
        Ok(dir)
    }

    /// List a bucket's frames, sorted ascending by file name (capture order).
    pub async fn list_frames(&self, day: DayKey) -> StoreResult<Vec<PathBuf>> {
        let dir = self.layout.day_dir(day);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut frames = Vec::new();
        let mut entries = fs::read_dir(&dir).await.map_err(|source| {
            StoreError::ListDir {
                path: dir.clone(),
                source,
            }
        })?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "jpg") {
                frames.push(path);
            }
        }
        frames.sort();

        debug!("Bucket {} holds {} frames", day, frames.len());
        Ok(frames)
    }

    /// Number of frames in a bucket.
    pub async fn frame_count(&self, day: DayKey) -> StoreResult<usize> {
        Ok(self.list_frames(day).await?.len())
    }

    /// List finished daily videos, sorted ascending by date.
    ///
    /// Only files named `YYYY-MM-DD.mp4` count; the master and any stray
    /// files (staging leftovers, partial downloads) are ignored.
    pub async fn list_daily_videos(&self) -> StoreResult<Vec<(DayKey, PathBuf)>> {
        let dir = self.layout.videos_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut videos = Vec::new();
        let mut entries = fs::read_dir(&dir).await.map_err(|source| {
            StoreError::ListDir {
                path: dir.clone(),
                source,
            }
        })?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == MASTER_FILE_NAME {
                continue;
            }
            let Some(stem) = name.strip_suffix(".mp4") else {
                continue;
            };
            if let Ok(day) = stem.parse::<DayKey>() {
                videos.push((day, path));
            }
        }
        videos.sort_by_key(|(day, _)| *day);
        Ok(videos)
    }

    /// Whether a daily video exists for the given day.
    pub async fn has_daily_video(&self, day: DayKey) -> bool {
        self.layout.daily_video_path(day).is_file()
    }
}
