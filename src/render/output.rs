use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use image::RgbImage;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use super::types::RenderResult;

/// Prefix for data URLs carrying PNG bytes
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Generate a timestamp string in YYYYMMDD_HHMMSS format
pub fn generate_timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Sanitize a record id for use in filenames
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if cleaned.is_empty() {
        "record".to_string()
    } else {
        cleaned
    }
}

/// File name for a rendered overlay
pub fn overlay_filename(record_id: &str, timestamp: &str) -> String {
    format!("overlay_{}_{}.png", sanitize_name(record_id), timestamp)
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbImage) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

/// Wrap PNG bytes in a `data:` URL
pub fn to_data_url(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png))
}

/// Write PNG bytes into `dir`, creating it if needed. Returns the written path.
pub fn write_overlay(dir: &Path, record_id: &str, png: &[u8]) -> RenderResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(overlay_filename(record_id, &generate_timestamp()));
    fs::write(&path, png)?;
    tracing::info!(path = %path.display(), bytes = png.len(), "overlay written");
    Ok(path)
}
