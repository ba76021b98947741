//! Daily timelapse encoding.

use std::path::Path;
use tracing::{debug, info};

use lapse_models::EncodingConfig;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::move_file;

/// Default bounded timeout for one daily encode.
pub const DEFAULT_ENCODE_TIMEOUT_SECS: u64 = 1800;

/// Encode one day's frame directory into a single video.
///
/// Frames are consumed in lexicographic order via a glob pattern
/// (`<frames_dir>/*.jpg`); timestamp-based frame names make that capture
/// order. The encode writes to a `.part` staging path and is moved into
/// place only on success, so `output` either holds a complete video or
/// does not exist.
pub async fn encode_timelapse(
    frames_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
    encoding: &EncodingConfig,
    timeout_secs: u64,
) -> MediaResult<()> {
    let frames_dir = frames_dir.as_ref();
    let output = output.as_ref();

    if !frames_dir.is_dir() {
        return Err(MediaError::FileNotFound(frames_dir.to_path_buf()));
    }

    let pattern = frames_dir.join("*.jpg");
    let staging = output.with_extension("mp4.part");

    info!(
        "Encoding timelapse: {} -> {} ({} fps, {}/{} crf {})",
        frames_dir.display(),
        output.display(),
        encoding.fps,
        encoding.codec,
        encoding.preset,
        encoding.crf
    );

    let cmd = FfmpegCommand::new(pattern.to_string_lossy(), &staging)
        .framerate(encoding.fps)
        .glob_pattern()
        .video_codec(&encoding.codec)
        .preset(&encoding.preset)
        .crf(encoding.crf)
        .pix_fmt(&encoding.pix_fmt);

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    let result = runner
        .run_with_progress(&cmd, |progress| {
            debug!(
                "Encode progress: frame={} fps={:.1} speed={:.2}x",
                progress.frame, progress.fps, progress.speed
            );
        })
        .await;

    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }

    if !staging.exists() {
        return Err(MediaError::OutputMissing(staging));
    }

    move_file(&staging, output).await?;

    info!("Timelapse written: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_encode_missing_frames_dir_fails() {
        let dir = TempDir::new().unwrap();
        let frames = dir.path().join("no-such-day");
        let out = dir.path().join("out.mp4");

        let err = encode_timelapse(&frames, &out, &EncodingConfig::default(), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
        assert!(!out.exists());
    }
}
