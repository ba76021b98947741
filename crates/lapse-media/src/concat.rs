//! Video concatenation and master rebuilds.
//!
//! The master video is rebuilt from scratch on every merge: all daily
//! videos, ascending by date, concatenated with the FFmpeg concat demuxer
//! in stream-copy mode. The rebuild lands in a staging file next to the
//! master and replaces it with a rename, so readers only ever see the
//! previous complete master or the new complete master.

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::fs_utils::move_file;

/// Default bounded timeout for one concat run.
pub const DEFAULT_CONCAT_TIMEOUT_SECS: u64 = 600;

/// Concatenate `inputs` in order into `output` without re-encoding.
///
/// Inputs must share codec parameters, which holds for daily videos built
/// with one [`lapse_models::EncodingConfig`].
pub async fn concat_videos(
    inputs: &[PathBuf],
    output: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    let output = output.as_ref();

    if inputs.is_empty() {
        return Err(MediaError::empty_input("no videos to concatenate"));
    }
    for input in inputs {
        if !input.exists() {
            return Err(MediaError::FileNotFound(input.clone()));
        }
    }

    debug!("Concatenating {} videos -> {}", inputs.len(), output.display());

    // Concat demuxer list file in a temp dir that outlives the run
    let list_dir = tempfile::tempdir()?;
    let list_path = list_dir.path().join("concat.txt");
    let mut list_file = tokio::fs::File::create(&list_path).await?;
    for input in inputs {
        let line = format!("file '{}'\n", escape_concat_path(input));
        list_file.write_all(line.as_bytes()).await?;
    }
    list_file.flush().await?;

    let cmd = FfmpegCommand::new(list_path.to_string_lossy(), output)
        .format("concat")
        .concat_unsafe()
        .codec_copy();

    let runner = FfmpegRunner::new().with_timeout(timeout_secs);
    runner.run(&cmd).await?;

    if !output.exists() {
        return Err(MediaError::OutputMissing(output.to_path_buf()));
    }

    Ok(())
}

/// Rebuild the master video as the concatenation of `daily_videos` in the
/// given order, replacing `master` atomically.
///
/// On any failure the staging file is removed and the previous master is
/// left untouched.
pub async fn rebuild_master(
    daily_videos: &[PathBuf],
    master: impl AsRef<Path>,
    timeout_secs: u64,
) -> MediaResult<()> {
    let master = master.as_ref();
    // Staging file in the master's directory keeps the final rename atomic
    let staging = master.with_extension("mp4.part");

    info!(
        "Rebuilding master from {} daily videos -> {}",
        daily_videos.len(),
        master.display()
    );

    let result = concat_videos(daily_videos, &staging, timeout_secs).await;

    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }

    move_file(&staging, master).await?;

    info!("Master updated: {}", master.display());
    Ok(())
}

/// Escape a path for an FFmpeg concat list entry.
///
/// The concat demuxer wraps paths in single quotes; embedded single quotes
/// close the quote, insert an escaped quote, and reopen.
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_concat_empty_input_fails() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("master.mp4");

        let err = concat_videos(&[], &out, 10).await.unwrap_err();
        assert!(matches!(err, MediaError::EmptyInput(_)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_concat_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("2024-01-05.mp4");
        let out = dir.path().join("master.mp4");

        let err = concat_videos(&[missing.clone()], &out, 10).await.unwrap_err();
        match err {
            MediaError::FileNotFound(path) => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rebuild_master_failure_leaves_previous_master() {
        let dir = TempDir::new().unwrap();
        let master = dir.path().join("master.mp4");
        tokio::fs::write(&master, b"previous master").await.unwrap();

        let missing = dir.path().join("2024-01-05.mp4");
        let result = rebuild_master(&[missing], &master, 10).await;

        assert!(result.is_err());
        assert_eq!(tokio::fs::read(&master).await.unwrap(), b"previous master");
        assert!(!master.with_extension("mp4.part").exists());
    }

    #[test]
    fn test_escape_concat_path() {
        let plain = PathBuf::from("/data/videos/2024-01-05.mp4");
        assert_eq!(escape_concat_path(&plain), "/data/videos/2024-01-05.mp4");

        let quoted = PathBuf::from("/data/it's here/v.mp4");
        assert_eq!(escape_concat_path(&quoted), r"/data/it'\''s here/v.mp4");
    }
}
