//! Roastcam — webcam capture, roast personas, a vision-model client, and a
//! directory watcher that roasts new images as they appear.

pub mod capture;
pub mod client;
pub mod persona;
pub mod types;
pub mod watcher;

pub use capture::{
    capture_filename, capture_photo, is_capture_image, roast_path_for, CAPTURE_EXT,
    DEFAULT_WARMUP, ROAST_SUFFIX,
};
pub use client::{RoastClient, DEFAULT_BASE_URL, DEFAULT_MODEL, FALLBACK_ROAST};
pub use persona::RoastPersona;
pub use types::*;
pub use watcher::{DirectoryWatcher, ImageSink, RoastSink};
