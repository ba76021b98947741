//! External process seams.
//!
//! The pipeline only ever touches the camera and FFmpeg through these three
//! narrow traits, so scheduler and pipeline logic is testable with fakes
//! returning canned success or failure.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use lapse_media::{capture_frame, encode_timelapse, rebuild_master, MediaResult};
use lapse_models::{CaptureConfig, EncodingConfig};

/// Produces one still frame on demand.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Capture a single frame into `output`.
    async fn capture_frame(&self, output: &Path) -> MediaResult<()>;
}

/// Turns one sealed bucket directory into one video file.
#[async_trait]
pub trait BucketEncoder: Send + Sync {
    /// Encode the frames in `frames_dir` into `output`.
    async fn encode_bucket(&self, frames_dir: &Path, output: &Path) -> MediaResult<()>;
}

/// Rebuilds the master video from the full list of daily videos.
#[async_trait]
pub trait MasterMerger: Send + Sync {
    /// Concatenate `daily_videos` (ascending date order) into `master`,
    /// replacing it atomically.
    async fn rebuild_master(&self, daily_videos: &[PathBuf], master: &Path) -> MediaResult<()>;
}

/// FFmpeg-backed camera capture.
#[derive(Debug, Clone)]
pub struct CameraSource {
    config: CaptureConfig,
    timeout_secs: u64,
}

impl CameraSource {
    pub fn new(config: CaptureConfig, timeout_secs: u64) -> Self {
        Self {
            config,
            timeout_secs,
        }
    }
}

#[async_trait]
impl FrameSource for CameraSource {
    async fn capture_frame(&self, output: &Path) -> MediaResult<()> {
        capture_frame(&self.config, output, self.timeout_secs).await
    }
}

/// FFmpeg-backed timelapse encoder.
#[derive(Debug, Clone)]
pub struct TimelapseEncoder {
    encoding: EncodingConfig,
    timeout_secs: u64,
}

impl TimelapseEncoder {
    pub fn new(encoding: EncodingConfig, timeout_secs: u64) -> Self {
        Self {
            encoding,
            timeout_secs,
        }
    }
}

#[async_trait]
impl BucketEncoder for TimelapseEncoder {
    async fn encode_bucket(&self, frames_dir: &Path, output: &Path) -> MediaResult<()> {
        encode_timelapse(frames_dir, output, &self.encoding, self.timeout_secs).await
    }
}

/// FFmpeg concat-demuxer master merger.
#[derive(Debug, Clone)]
pub struct ConcatMerger {
    timeout_secs: u64,
}

impl ConcatMerger {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

#[async_trait]
impl MasterMerger for ConcatMerger {
    async fn rebuild_master(&self, daily_videos: &[PathBuf], master: &Path) -> MediaResult<()> {
        rebuild_master(daily_videos, master, self.timeout_secs).await
    }
}
