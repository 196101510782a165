//! Application constants and configuration

use std::time::Duration;

pub const APP_NAME: &str = "PixelPoet";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Caption server used when no endpoint is configured
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/generate";

/// Environment variable that overrides the configured endpoint
pub const ENDPOINT_ENV_VAR: &str = "PIXELPOET_ENDPOINT";

/// How long a copied card keeps its check mark
pub const COPIED_FLASH: Duration = Duration::from_secs(2);

/// Long-side cap for preview textures
pub const PREVIEW_MAX_SIDE: u32 = 2048;

/// Extensions offered by the file dialog filter (advisory only)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mkv", "avi", "m4v"];
