//! Webcam capture and capture-path conventions.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use image::DynamicImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::types::{CapturedImage, RoastError, RoastResult};

/// File extension written by capture and matched by the watcher.
pub const CAPTURE_EXT: &str = "jpg";

/// Suffix of the text file written beside each roasted image.
pub const ROAST_SUFFIX: &str = "_roast.txt";

/// Warm-up wait after opening the camera stream. First frames off a cold
/// sensor come back under- or over-exposed before auto-exposure settles.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(2);

/// Build the timestamped capture filename for a given Unix timestamp.
pub fn capture_filename(timestamp: u64) -> String {
    format!("capture_{timestamp}.{CAPTURE_EXT}")
}

/// Check whether a path looks like a file this toolchain captured — strictly
/// the exact capture extension, case-sensitive, nothing else.
pub fn is_capture_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == CAPTURE_EXT)
        .unwrap_or(false)
}

/// Derive the sibling roast file path from an image path: same directory,
/// image extension replaced by the `_roast.txt` suffix.
pub fn roast_path_for(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("capture");
    image.with_file_name(format!("{stem}{ROAST_SUFFIX}"))
}

/// Capture one still frame from the default camera and write it as a JPEG
/// under `output_dir`, creating the directory if needed.
///
/// Blocks for the warm-up delay plus the frame read; call through
/// `spawn_blocking` from async contexts. The device is released on every
/// path, including failures.
pub fn capture_photo(output_dir: &Path, warmup: Duration) -> RoastResult<CapturedImage> {
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
    let mut camera = Camera::new(CameraIndex::Index(0), requested)
        .map_err(|e| RoastError::CameraUnavailable(e.to_string()))?;

    camera
        .open_stream()
        .map_err(|e| RoastError::CameraUnavailable(e.to_string()))?;

    std::thread::sleep(warmup);

    let frame = read_one_frame(&mut camera);

    // Release the device before acting on the frame result.
    if let Err(e) = camera.stop_stream() {
        tracing::warn!("Failed to stop camera stream: {e}");
    }
    drop(camera);

    let frame = frame?;

    std::fs::create_dir_all(output_dir)?;

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let path = output_dir.join(capture_filename(timestamp));

    DynamicImage::ImageRgb8(frame).save(&path)?;
    tracing::info!("Captured frame written to {}", path.display());

    Ok(CapturedImage { path, timestamp })
}

fn read_one_frame(camera: &mut Camera) -> RoastResult<image::RgbImage> {
    let buffer = camera
        .frame()
        .map_err(|e| RoastError::CaptureFailed(e.to_string()))?;
    let decoded = buffer
        .decode_image::<RgbFormat>()
        .map_err(|e| RoastError::CaptureFailed(e.to_string()))?;

    let (width, height) = (decoded.width(), decoded.height());
    image::RgbImage::from_raw(width, height, decoded.into_raw())
        .ok_or_else(|| RoastError::CaptureFailed("frame buffer size mismatch".to_string()))
}
