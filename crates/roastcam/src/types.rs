//! Core data types for captures and roast results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A still frame captured from the camera and persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedImage {
    /// Path of the written image file.
    pub path: PathBuf,
    /// Capture time, seconds since the Unix epoch. Also embedded in the
    /// filename, so two captures in the same second would collide.
    pub timestamp: u64,
}

/// A generated roast tied to the image that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoastOutcome {
    /// Path of the source image.
    pub image_path: PathBuf,
    /// The generated text. Either real model output or the fixed fallback
    /// apology, never empty.
    pub text: String,
}

impl RoastOutcome {
    /// Where this roast is persisted: beside the source image, with the
    /// image extension swapped for the roast suffix.
    pub fn sibling_path(&self) -> PathBuf {
        crate::capture::roast_path_for(&self.image_path)
    }
}

/// Errors that can occur in the roastcam library.
#[derive(thiserror::Error, Debug)]
pub enum RoastError {
    /// The default camera device could not be opened.
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The camera opened but a frame could not be read or decoded.
    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    /// A required credential was absent from the environment.
    #[error("Missing configuration: {0} is not set")]
    MissingApiKey(&'static str),

    /// Transport-level failure talking to the inference endpoint.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The inference endpoint answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response parsed but carried no usable completion text.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl RoastError {
    /// Whether a retry could plausibly succeed. Covers connect failures and
    /// request timeouts; auth and malformed-response errors are not retried.
    pub fn is_transient(&self) -> bool {
        match self {
            RoastError::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Convenience result type.
pub type RoastResult<T> = Result<T, RoastError>;
