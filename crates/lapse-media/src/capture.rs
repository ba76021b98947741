//! Still-frame capture from a V4L2 device.

use std::path::Path;
use tracing::{debug, info};

use lapse_models::CaptureConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Default bounded timeout for one capture invocation.
pub const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 30;

/// Capture a single frame from the configured camera into `output`.
///
/// Shells out to `ffmpeg -f v4l2 -video_size WxH -i /dev/videoN -frames:v 1`.
/// The process is killed if it exceeds `timeout_secs`; a successful exit
/// with no output file is still a failure (the device can report success
/// while delivering nothing when busy).
pub async fn capture_frame(
    config: &CaptureConfig,
    output: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    let output = output.as_ref();

    debug!(
        "Capturing frame from {} at {} -> {}",
        config.device_path(),
        config.video_size(),
        output.display()
    );

    let cmd = FfmpegCommand::new(config.device_path(), output)
        .format("v4l2")
        .video_size(config.video_size())
        .single_frame();

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    runner.run(&cmd).await?;

    if !output.exists() {
        return Err(MediaError::OutputMissing(output.to_path_buf()));
    }

    info!("Captured {}", output.display());
    Ok(())
}
