// Types for overlay rendering

use serde::Serialize;
use std::path::PathBuf;

use crate::annotate::Primitive;
use crate::coords::{CoordError, Size};
use crate::record::Action;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Error types for rendering operations
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Decoding or encoding an image failed
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Geometry could not be computed
    #[error("coordinate error: {0}")]
    Coord(#[from] CoordError),

    /// The record's image is absent and no size was declared to draw on
    #[error("image not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// Display scale is zero, negative or not finite
    #[error("invalid display scale {0}")]
    InvalidScale(f64),

    /// Requested canvas exceeds the allocation limit
    #[error("canvas {width}x{height} exceeds the {max} pixel side limit", max = super::overlay::MAX_CANVAS_SIDE)]
    CanvasTooLarge { width: f64, height: f64 },

    /// Pixel buffer does not match its dimensions
    #[error("pixel buffer does not match canvas dimensions")]
    BufferSize,
}

/// Options for rendering a record's overlay
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Display scale applied to the source image
    pub scale: f64,
    /// Use this image instead of the record's own
    pub image_override: Option<PathBuf>,
    /// Background for records whose image file is missing but whose size is declared
    pub placeholder_color: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            image_override: None,
            placeholder_color: [32, 32, 32],
        }
    }
}

impl RenderOptions {
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_override = Some(path.into());
        self
    }
}

/// A rendered overlay plus what went into it
#[derive(Debug, Clone, Serialize)]
pub struct RenderedOverlay {
    #[serde(skip)]
    pub png: Vec<u8>,
    /// Declared `metadata.image_size`, else the decoded image size
    pub image_size: Size,
    /// Canvas dimensions in pixels
    pub canvas_size: (u32, u32),
    pub action: Option<Action>,
    pub primitives: Vec<Primitive>,
    /// True when drawn on a placeholder because the image file was missing
    pub placeholder: bool,
}
