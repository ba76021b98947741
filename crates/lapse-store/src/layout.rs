//! Deterministic filesystem layout.
//!
//! Everything lives under one base directory:
//!
//! ```text
//! <base>/images/<YYYY-MM-DD>/<HHMMSS>.jpg
//! <base>/videos/<YYYY-MM-DD>.mp4
//! <base>/videos/master.mp4
//! ```
//!
//! Frame names are the capture time-of-day, so lexicographic order within a
//! bucket equals capture order and names are unique for any capture interval
//! of one second or more.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use lapse_models::DayKey;

/// File name of the cumulative master video.
pub const MASTER_FILE_NAME: &str = "master.mp4";

/// Path layout rooted at one base directory.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    base_dir: PathBuf,
}

impl StoreLayout {
    /// Create a layout rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// The base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding all frame buckets.
    pub fn images_dir(&self) -> PathBuf {
        self.base_dir.join("images")
    }

    /// Directory holding daily videos and the master.
    pub fn videos_dir(&self) -> PathBuf {
        self.base_dir.join("videos")
    }

    /// Bucket directory for one day.
    pub fn day_dir(&self, day: DayKey) -> PathBuf {
        self.images_dir().join(day.to_string())
    }

    /// Frame path for a capture at `time` on `day`.
    pub fn frame_path(&self, day: DayKey, time: NaiveTime) -> PathBuf {
        self.day_dir(day)
            .join(format!("{}.jpg", time.format("%H%M%S")))
    }

    /// Daily video path for one day.
    pub fn daily_video_path(&self, day: DayKey) -> PathBuf {
        self.videos_dir().join(format!("{}.mp4", day))
    }

    /// The master video path.
    pub fn master_path(&self) -> PathBuf {
        self.videos_dir().join(MASTER_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> StoreLayout {
        StoreLayout::new("/data")
    }

    #[test]
    fn test_bucket_paths() {
        let day: DayKey = "2024-01-05".parse().unwrap();
        assert_eq!(
            layout().day_dir(day),
            PathBuf::from("/data/images/2024-01-05")
        );
        assert_eq!(
            layout().daily_video_path(day),
            PathBuf::from("/data/videos/2024-01-05.mp4")
        );
        assert_eq!(layout().master_path(), PathBuf::from("/data/videos/master.mp4"));
    }

    #[test]
    fn test_frame_path_orders_by_time() {
        let day: DayKey = "2024-01-05".parse().unwrap();
        let early = layout().frame_path(day, NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        let late = layout().frame_path(day, NaiveTime::from_hms_opt(23, 59, 0).unwrap());

        assert_eq!(
            early,
            PathBuf::from("/data/images/2024-01-05/090500.jpg")
        );
        assert!(early < late, "lexicographic order must match capture order");
    }

    #[test]
    fn test_same_day_frames_share_bucket() {
        let day: DayKey = "2024-01-05".parse().unwrap();
        let a = layout().frame_path(day, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let b = layout().frame_path(day, NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        assert_eq!(a.parent(), b.parent());
    }
}
