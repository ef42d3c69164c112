//! Draw a record's action overlay on top of its screenshot.

use image::imageops::FilterType;
use image::RgbImage;

use super::canvas::Canvas;
use super::types::{RenderError, RenderOptions, RenderResult, RenderedOverlay};
use crate::annotate::{compute_annotation_primitives, Primitive};
use crate::coords::{Point, Size};
use crate::dataset::Dataset;
use crate::record::Record;

/// Rasterize primitives onto a copy of `image`
pub fn render_overlay(image: &RgbImage, primitives: &[Primitive]) -> RgbImage {
    let mut canvas = Canvas::from_image(image.clone());
    canvas.draw_primitives(primitives);
    // dimensions are carried over from `image`, so the buffer always fits
    canvas.into_image().unwrap_or_else(|_| image.clone())
}

/// Largest canvas side, in pixels, that rendering will allocate
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Load the record's image, compute its action geometry and draw it.
///
/// RU coordinates are resolved against the pixels actually drawn on: the
/// decoded image, or a flat placeholder of the declared `metadata.image_size`
/// when the file is missing. Each axis maps independently, so a declared
/// size whose aspect ratio differs from the file cannot skew the overlay.
/// The reported `image_size` is the declared size when present.
pub fn render_record(dataset: &Dataset, record: &Record, options: &RenderOptions) -> RenderResult<RenderedOverlay> {
    if !(options.scale > 0.0 && options.scale.is_finite()) {
        return Err(RenderError::InvalidScale(options.scale));
    }

    let image_path = options
        .image_override
        .clone()
        .unwrap_or_else(|| dataset.image_path(&record.image));

    let (source, placeholder) = match image::open(&image_path) {
        Ok(img) => (img.to_rgb8(), false),
        Err(image::ImageError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            let size = record
                .image_size()
                .ok_or_else(|| RenderError::MissingImage(image_path.clone()))?
                .validate()?;
            let (width, height) = canvas_dimensions(size, 1.0)?;
            tracing::warn!(path = %image_path.display(), width, height, "image missing, drawing on placeholder");
            let canvas = Canvas::with_color(width, height, options.placeholder_color);
            (canvas.into_image()?, true)
        }
        Err(e) => return Err(e.into()),
    };

    let source_size = Size::from(source.dimensions());
    let image_size = match record.image_size() {
        Some(declared) => declared.validate()?,
        None => source_size,
    };
    if !placeholder && image_size != source_size {
        tracing::debug!(
            id = %record.id,
            declared = ?image_size,
            decoded = ?source_size,
            "declared image size differs from file"
        );
    }

    let (width, height) = canvas_dimensions(source_size, options.scale)?;
    let base = if (width, height) == source.dimensions() {
        source
    } else {
        image::imageops::resize(&source, width, height, FilterType::Triangle)
    };

    let action = record.action();
    let primitives = match &action {
        Some(action) => compute_annotation_primitives(
            action,
            Size::new(f64::from(width), f64::from(height)),
            1.0,
            Point::ORIGIN,
            record.metadata.tolerance,
        )?,
        None => Vec::new(),
    };

    let rendered = render_overlay(&base, &primitives);
    let png = super::output::encode_png(&rendered)?;

    tracing::debug!(
        id = %record.id,
        primitives = primitives.len(),
        width,
        height,
        "overlay rendered"
    );

    Ok(RenderedOverlay {
        png,
        image_size,
        canvas_size: (width, height),
        action,
        primitives,
        placeholder,
    })
}

/// Pixel dimensions of `size` shown at `scale`, at least 1 and at most
/// [`MAX_CANVAS_SIDE`] per side
fn canvas_dimensions(size: Size, scale: f64) -> RenderResult<(u32, u32)> {
    let width = (size.width * scale).round().max(1.0);
    let height = (size.height * scale).round().max(1.0);
    let limit = f64::from(MAX_CANVAS_SIDE);
    if width > limit || height > limit {
        return Err(RenderError::CanvasTooLarge { width, height });
    }
    Ok((width as u32, height as u32))
}
