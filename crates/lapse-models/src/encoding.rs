//! Video encoding configuration.

use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "ultrafast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 23;
/// Default timelapse frame rate
pub const DEFAULT_FPS: u32 = 30;
/// Default pixel format (broad player compatibility)
pub const DEFAULT_PIX_FMT: &str = "yuv420p";

/// Video encoding configuration for daily timelapse builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264", "h264_nvenc")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset (e.g., "ultrafast", "fast", "medium")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant Rate Factor (quality, 0-51, lower is better)
    #[serde(default = "default_crf")]
    pub crf: u8,

    /// Frames per second of the produced timelapse
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Pixel format
    #[serde(default = "default_pix_fmt")]
    pub pix_fmt: String,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    DEFAULT_CRF
}
fn default_fps() -> u32 {
    DEFAULT_FPS
}
fn default_pix_fmt() -> String {
    DEFAULT_PIX_FMT.to_string()
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: DEFAULT_CRF,
            fps: DEFAULT_FPS,
            pix_fmt: DEFAULT_PIX_FMT.to_string(),
        }
    }
}

impl EncodingConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            codec: std::env::var("VIDEO_CODEC").unwrap_or_else(|_| DEFAULT_VIDEO_CODEC.to_string()),
            preset: std::env::var("VIDEO_PRESET").unwrap_or_else(|_| DEFAULT_PRESET.to_string()),
            crf: std::env::var("CRF")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CRF),
            fps: std::env::var("DAILY_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FPS),
            pix_fmt: std::env::var("PIX_FMT").unwrap_or_else(|_| DEFAULT_PIX_FMT.to_string()),
        }
    }
}
