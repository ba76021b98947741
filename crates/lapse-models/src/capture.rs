//! Camera capture configuration.

use serde::{Deserialize, Serialize};

/// Default V4L2 device index
pub const DEFAULT_CAM_INDEX: u32 = 0;
/// Default frame width in pixels
pub const DEFAULT_FRAME_WIDTH: u32 = 1280;
/// Default frame height in pixels
pub const DEFAULT_FRAME_HEIGHT: u32 = 720;

/// Still-frame capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// V4L2 device index (`/dev/video<N>`)
    pub cam_index: u32,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            cam_index: DEFAULT_CAM_INDEX,
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl CaptureConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            cam_index: std::env::var("CAM_INDEX")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CAM_INDEX),
            width: std::env::var("FRAME_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FRAME_WIDTH),
            height: std::env::var("FRAME_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_FRAME_HEIGHT),
        }
    }

    /// Device path for the configured camera index.
    pub fn device_path(&self) -> String {
        format!("/dev/video{}", self.cam_index)
    }

    /// FFmpeg `-video_size` value.
    pub fn video_size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}
