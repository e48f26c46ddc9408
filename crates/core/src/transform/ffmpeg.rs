//! FFmpeg-based transformer implementation.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::fs;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::TransformConfig;
use super::error::TransformError;
use super::traits::MediaTransformer;
use super::types::FrameCapture;

/// FFmpeg-based transformer implementation.
///
/// Recordings arrive as in-memory byte buffers; each operation stages
/// them in a scratch directory, runs ffmpeg, and reads the outputs back.
pub struct FfmpegTransformer {
    config: TransformConfig,
}

impl FfmpegTransformer {
    /// Creates a new FFmpeg transformer with the given configuration.
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    /// Creates a transformer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TransformConfig::default())
    }

    /// Timestamps for sampled frames: the first frame is at offset 0,
    /// each following frame one interval later.
    fn frame_timestamps(frame_count: usize, interval_secs: u64) -> Vec<u64> {
        (0..frame_count).map(|i| i as u64 * interval_secs).collect()
    }

    async fn run_ffmpeg(&self, args: &[String]) -> Result<(), TransformError> {
        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TransformError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    TransformError::Io(e)
                }
            })?;

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(result) => result.map_err(TransformError::Io)?,
            Err(_) => {
                return Err(TransformError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(TransformError::TransformFailed {
                reason: format!(
                    "ffmpeg exited with code {:?}: {}",
                    output.status.code(),
                    tail
                ),
            });
        }

        Ok(())
    }

    async fn stage_input(dir: &Path, recording: &[u8]) -> Result<std::path::PathBuf, TransformError> {
        let input_path = dir.join("input");
        fs::write(&input_path, recording).await?;
        Ok(input_path)
    }
}

#[async_trait]
impl MediaTransformer for FfmpegTransformer {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn extract_audio(&self, recording: &[u8]) -> Result<Vec<u8>, TransformError> {
        let scratch = TempDir::new()?;
        let input_path = Self::stage_input(scratch.path(), recording).await?;
        let output_path = scratch.path().join("audio.mp3");

        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            output_path.to_string_lossy().to_string(),
        ];

        self.run_ffmpeg(&args).await?;

        let bytes = fs::read(&output_path)
            .await
            .map_err(|_| TransformError::TransformFailed {
                reason: "audio output not created".to_string(),
            })?;

        debug!(output_bytes = bytes.len(), "Audio track extracted");
        Ok(bytes)
    }

    async fn sample_frames(&self, recording: &[u8]) -> Result<Vec<FrameCapture>, TransformError> {
        let interval_secs = self.config.screenshot_interval_secs.max(1);
        let scratch = TempDir::new()?;
        let input_path = Self::stage_input(scratch.path(), recording).await?;
        let pattern = scratch.path().join("frame_%05d.jpg");

        let args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-vf".to_string(),
            format!("fps=1/{}", interval_secs),
            "-loglevel".to_string(),
            "error".to_string(),
            pattern.to_string_lossy().to_string(),
        ];

        self.run_ffmpeg(&args).await?;

        // ffmpeg numbers outputs from 00001; sorting the names recovers
        // the capture order.
        let mut frame_paths = Vec::new();
        let mut entries = fs::read_dir(scratch.path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with("frame_") && name.ends_with(".jpg") {
                frame_paths.push(entry.path());
            }
        }
        frame_paths.sort();

        let timestamps = Self::frame_timestamps(frame_paths.len(), interval_secs);
        let mut frames = Vec::with_capacity(frame_paths.len());
        for (path, timestamp_secs) in frame_paths.iter().zip(timestamps) {
            let image = fs::read(path).await?;
            frames.push(FrameCapture {
                timestamp_secs,
                image,
            });
        }

        debug!(frame_count = frames.len(), "Frames sampled");
        Ok(frames)
    }

    async fn validate(&self) -> Result<(), TransformError> {
        let ffmpeg_result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffmpeg_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(TransformError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(TransformError::Io(e));
        }

        let ffprobe_result = Command::new(&self.config.ffprobe_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffprobe_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(TransformError::FfprobeNotFound {
                    path: self.config.ffprobe_path.clone(),
                });
            }
            return Err(TransformError::Io(e));
        }

        Ok(())
    }
}
