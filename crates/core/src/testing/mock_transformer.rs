//! Mock media transformer for testing.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::transform::{FrameCapture, MediaTransformer, TransformError};

/// Mock implementation of the MediaTransformer trait returning canned
/// outputs.
pub struct MockTransformer {
    audio: Mutex<Vec<u8>>,
    frames: Mutex<Vec<FrameCapture>>,
    fail_next: Mutex<bool>,
}

impl Default for MockTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransformer {
    /// Create a mock transformer with default canned outputs: mp3 marker
    /// bytes and two frames at 0s and 10s.
    pub fn new() -> Self {
        Self {
            audio: Mutex::new(b"mock-mp3".to_vec()),
            frames: Mutex::new(vec![
                FrameCapture {
                    timestamp_secs: 0,
                    image: b"mock-jpeg-0".to_vec(),
                },
                FrameCapture {
                    timestamp_secs: 10,
                    image: b"mock-jpeg-10".to_vec(),
                },
            ]),
            fail_next: Mutex::new(false),
        }
    }

    /// Set the bytes returned by `extract_audio`.
    pub fn set_audio(&self, audio: Vec<u8>) {
        *self.audio.lock().unwrap() = audio;
    }

    /// Set the frames returned by `sample_frames`.
    pub fn set_frames(&self, frames: Vec<FrameCapture>) {
        *self.frames.lock().unwrap() = frames;
    }

    /// Make the next transformation call fail.
    pub fn set_fail_next(&self, fail: bool) {
        *self.fail_next.lock().unwrap() = fail;
    }

    fn take_failure(&self) -> Option<TransformError> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            Some(TransformError::TransformFailed {
                reason: "injected failure".to_string(),
            })
        } else {
            None
        }
    }
}

#[async_trait]
impl MediaTransformer for MockTransformer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract_audio(&self, _recording: &[u8]) -> Result<Vec<u8>, TransformError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        Ok(self.audio.lock().unwrap().clone())
    }

    async fn sample_frames(&self, _recording: &[u8]) -> Result<Vec<FrameCapture>, TransformError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        Ok(self.frames.lock().unwrap().clone())
    }

    async fn validate(&self) -> Result<(), TransformError> {
        Ok(())
    }
}
