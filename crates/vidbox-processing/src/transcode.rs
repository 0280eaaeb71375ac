//! External transcoder invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

const STDERR_TAIL_BYTES: usize = 2048;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Transcoder exited with status {status:?}")]
    Failed {
        status: Option<i32>,
        stderr: String,
    },

    #[error("Transcoder timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Transcoder produced no output at {0}")]
    EmptyOutput(PathBuf),
}

impl TranscodeError {
    /// Exit status of the child process, when it ran to completion.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            TranscodeError::Failed { status, .. } => *status,
            _ => None,
        }
    }
}

/// Wrapper around the external ffmpeg binary.
///
/// One call, one child process, no retries; retry policy belongs to the
/// caller. The wall-clock timeout is a hard bound: on expiry the child is
/// killed and the call fails.
#[derive(Clone)]
pub struct Transcoder {
    ffmpeg_path: String,
    timeout: Duration,
}

impl Transcoder {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            timeout,
        }
    }

    /// Transcode `input` into an MP4 container at `output`.
    ///
    /// Invocation shape is fixed: overwrite flag, input path, output path.
    /// Success requires a zero exit status and a non-empty output file.
    #[tracing::instrument(skip(self), fields(ffmpeg = %self.ffmpeg_path))]
    pub async fn to_mp4(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let start = std::time::Instant::now();

        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let child_output = tokio::time::timeout(self.timeout, result)
            .await
            .map_err(|_| {
                tracing::error!(
                    input = %input.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "Transcode timed out, child killed"
                );
                TranscodeError::TimedOut(self.timeout)
            })?
            .map_err(|e| TranscodeError::Spawn {
                program: self.ffmpeg_path.clone(),
                source: e,
            })?;

        if !child_output.status.success() {
            let stderr = stderr_tail(&child_output.stderr);
            tracing::error!(
                input = %input.display(),
                status = ?child_output.status.code(),
                stderr = %stderr,
                "Transcode failed"
            );
            return Err(TranscodeError::Failed {
                status: child_output.status.code(),
                stderr,
            });
        }

        match tokio::fs::metadata(output).await {
            Ok(meta) if meta.len() > 0 => {}
            _ => return Err(TranscodeError::EmptyOutput(output.to_path_buf())),
        }

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Transcode successful"
        );

        Ok(())
    }
}

/// Last chunk of stderr, lossily decoded; the interesting part of an
/// ffmpeg failure is at the end.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    match trimmed.char_indices().nth_back(STDERR_TAIL_BYTES) {
        Some((idx, _)) => trimmed[idx..].to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn paths() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.mov");
        let output = dir.path().join("output.mp4");
        std::fs::write(&input, b"fake source").unwrap();
        (dir, input, output)
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let (_dir, input, output) = paths();
        // `false` ignores its arguments and exits 1
        let transcoder = Transcoder::new("false", Duration::from_secs(5));

        let err = transcoder.to_mp4(&input, &output).await.unwrap_err();
        match err {
            TranscodeError::Failed { status, .. } => assert_eq!(status, Some(1)),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_output_is_failure() {
        let (_dir, input, output) = paths();
        // `true` exits 0 without writing anything
        let transcoder = Transcoder::new("true", Duration::from_secs(5));

        let err = transcoder.to_mp4(&input, &output).await.unwrap_err();
        assert!(matches!(err, TranscodeError::EmptyOutput(_)));
    }

    #[tokio::test]
    async fn test_empty_output_is_failure() {
        let (_dir, input, output) = paths();
        std::fs::write(&output, b"").unwrap();
        let transcoder = Transcoder::new("true", Duration::from_secs(5));

        let err = transcoder.to_mp4(&input, &output).await.unwrap_err();
        assert!(matches!(err, TranscodeError::EmptyOutput(_)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let (_dir, input, output) = paths();
        let transcoder = Transcoder::new("definitely-not-a-transcoder", Duration::from_secs(5));

        let err = transcoder.to_mp4(&input, &output).await.unwrap_err();
        assert!(matches!(err, TranscodeError::Spawn { .. }));
        assert_eq!(err.exit_status(), None);
    }

    #[test]
    fn test_stderr_tail_truncates() {
        let long = "x".repeat(10_000);
        let tail = stderr_tail(long.as_bytes());
        assert!(tail.len() <= STDERR_TAIL_BYTES + 1);

        assert_eq!(stderr_tail(b"short message\n"), "short message");
    }
}
