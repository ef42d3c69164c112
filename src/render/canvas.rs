//! Pixel canvas for rasterizing annotation primitives.
//!
//! Provides a small drawing API over an RGB buffer:
//! - `fill()` / `draw_rect()` - solid fills
//! - `draw_line()` - strokes with a square brush
//! - `draw_rect_outline()` - solid or dashed rectangle borders
//! - `draw_circle()` - filled discs and rings
//! - `draw_text()` - font8x8 glyphs, integer scaled
//!
//! All drawing is clipped to the canvas; coordinates may be negative or past
//! the edges.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{ImageBuffer, RgbImage};

use super::types::{RenderError, RenderResult};
use crate::annotate::{Primitive, Rgb};

/// Glyph cell size before scaling
pub const GLYPH_SIZE: u32 = 8;
/// Integer scale applied to label glyphs
pub const TEXT_SCALE: u32 = 2;
/// Background behind label text
pub const LABEL_BACKGROUND: Rgb = [0, 0, 0];
/// Padding around label text
const LABEL_PADDING: i64 = 4;
/// Dash and gap length for dashed outlines
const DASH: i64 = 6;

/// An RGB pixel buffer
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// Row-major, 3 bytes per pixel
    buffer: Vec<u8>,
}

impl Canvas {
    /// Create a canvas initialized to black
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; (width as usize) * (height as usize) * 3],
        }
    }

    /// Create a canvas filled with a color
    pub fn with_color(width: u32, height: u32, color: Rgb) -> Self {
        let mut canvas = Self::new(width, height);
        canvas.fill(color);
        canvas
    }

    /// Take ownership of an existing image
    pub fn from_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            buffer: image.into_raw(),
        }
    }

    /// Decode PNG (or any format `image` understands) bytes
    pub fn from_png_bytes(data: &[u8]) -> RenderResult<Self> {
        let img = image::load_from_memory(data)?;
        Ok(Self::from_image(img.to_rgb8()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the entire canvas with a color
    pub fn fill(&mut self, color: Rgb) {
        for chunk in self.buffer.chunks_exact_mut(3) {
            chunk.copy_from_slice(&color);
        }
    }

    /// Get the color of a pixel; out of bounds reads as black
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgb {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        [self.buffer[idx], self.buffer[idx + 1], self.buffer[idx + 2]]
    }

    /// Set the color of a pixel; out of bounds writes are dropped
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 3;
        self.buffer[idx..idx + 3].copy_from_slice(&color);
    }

    /// Draw a filled rectangle
    pub fn draw_rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(i64::from(self.width));
        let y1 = (y + h).min(i64::from(self.height));
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Stamp a `width`-sized square centered on a point
    fn stamp(&mut self, x: i64, y: i64, width: i64, color: Rgb) {
        let half = width / 2;
        self.draw_rect(x - half, y - half, width.max(1), width.max(1), color);
    }

    /// Draw a straight stroke (Bresenham with a square brush)
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
        let brush = width.round().max(1.0) as i64;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x0, y0, brush, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Draw a one-pixel rectangle border, optionally dashed
    pub fn draw_rect_outline(&mut self, min: (f64, f64), max: (f64, f64), color: Rgb, dashed: bool) {
        let (x0, y0) = (min.0.round() as i64, min.1.round() as i64);
        let (x1, y1) = (max.0.round() as i64, max.1.round() as i64);
        let on = |i: i64| !dashed || (i / DASH) % 2 == 0;

        for (i, x) in (x0..=x1).enumerate() {
            if on(i as i64) {
                self.set_pixel(x, y0, color);
                self.set_pixel(x, y1, color);
            }
        }
        for (i, y) in (y0..=y1).enumerate() {
            if on(i as i64) {
                self.set_pixel(x0, y, color);
                self.set_pixel(x1, y, color);
            }
        }
    }

    /// Draw a filled disc or a two-pixel ring
    pub fn draw_circle(&mut self, center: (f64, f64), radius: f64, color: Rgb, filled: bool) {
        let r = radius.max(0.0);
        let extent = r.ceil() as i64 + 1;
        let (cx, cy) = (center.0.round() as i64, center.1.round() as i64);
        for dy in -extent..=extent {
            for dx in -extent..=extent {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                let inside = if filled { d <= r } else { (d - r).abs() <= 1.0 };
                if inside {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw text using font8x8 glyphs at an integer scale. Text does not wrap.
    pub fn draw_text(&mut self, x: i64, y: i64, text: &str, fg: Rgb, bg: Rgb, scale: u32) {
        let step = i64::from(GLYPH_SIZE * scale.max(1));
        let mut cursor_x = x;
        for ch in text.chars() {
            if cursor_x >= i64::from(self.width) {
                break;
            }
            self.draw_char(cursor_x, y, ch, fg, bg, scale.max(1));
            cursor_x += step;
        }
    }

    /// Draw a single glyph; characters without a glyph render as background
    fn draw_char(&mut self, x: i64, y: i64, ch: char, fg: Rgb, bg: Rgb, scale: u32) {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .unwrap_or([0u8; 8]);
        let scale = i64::from(scale);
        for (row_idx, row) in glyph.iter().enumerate() {
            for bit in 0..8u32 {
                // font8x8 stores LSB as leftmost pixel
                let color = if (row >> bit) & 1 == 1 { fg } else { bg };
                let px = x + i64::from(bit) * scale;
                let py = y + row_idx as i64 * scale;
                self.draw_rect(px, py, scale, scale, color);
            }
        }
    }

    /// Rasterize one primitive
    pub fn draw_primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Line {
                from,
                to,
                color,
                width,
            } => self.draw_line((from.x, from.y), (to.x, to.y), *width, *color),
            Primitive::Circle {
                center,
                radius,
                color,
                filled,
            } => self.draw_circle((center.x, center.y), *radius, *color, *filled),
            Primitive::Rect {
                min,
                max,
                color,
                dashed,
            } => self.draw_rect_outline((min.x, min.y), (max.x, max.y), *color, *dashed),
            Primitive::Label { at, text, color } => {
                let (x, y) = (at.x.round() as i64, at.y.round() as i64);
                let glyph = i64::from(GLYPH_SIZE * TEXT_SCALE);
                let w = glyph * text.chars().count() as i64 + 2 * LABEL_PADDING;
                let h = glyph + 2 * LABEL_PADDING;
                self.draw_rect(x, y, w, h, LABEL_BACKGROUND);
                self.draw_text(x + LABEL_PADDING, y + LABEL_PADDING, text, *color, LABEL_BACKGROUND, TEXT_SCALE);
            }
        }
    }

    /// Rasterize primitives in order
    pub fn draw_primitives(&mut self, primitives: &[Primitive]) {
        for primitive in primitives {
            self.draw_primitive(primitive);
        }
    }

    /// Get the raw RGB buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Convert to an image buffer
    pub fn into_image(self) -> RenderResult<RgbImage> {
        ImageBuffer::from_raw(self.width, self.height, self.buffer).ok_or(RenderError::BufferSize)
    }

    /// Encode the canvas as PNG bytes
    pub fn to_png(&self) -> RenderResult<Vec<u8>> {
        super::output::encode_png(&self.clone().into_image()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Point;

    const RED: Rgb = [255, 0, 0];

    #[test]
    fn test_fill_and_rect() {
        let mut canvas = Canvas::with_color(20, 20, [10, 10, 10]);
        canvas.draw_rect(5, 5, 4, 4, RED);
        assert_eq!(canvas.get_pixel(6, 6), RED);
        assert_eq!(canvas.get_pixel(9, 9), [10, 10, 10]);
    }

    #[test]
    fn test_drawing_is_clipped() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_rect(-5, -5, 8, 8, RED);
        canvas.draw_line((-20.0, 5.0), (40.0, 5.0), 1.0, RED);
        canvas.draw_circle((100.0, 100.0), 5.0, RED, true);
        assert_eq!(canvas.get_pixel(0, 0), RED);
        assert_eq!(canvas.get_pixel(9, 5), RED);
        assert_eq!(canvas.get_pixel(9, 9), [0, 0, 0]);
    }

    #[test]
    fn test_line_endpoints_are_painted() {
        let mut canvas = Canvas::new(50, 50);
        canvas.draw_line((3.0, 4.0), (40.0, 30.0), 1.0, RED);
        assert_eq!(canvas.get_pixel(3, 4), RED);
        assert_eq!(canvas.get_pixel(40, 30), RED);
    }

    #[test]
    fn test_dashed_outline_has_gaps() {
        let mut canvas = Canvas::new(64, 64);
        canvas.draw_rect_outline((2.0, 2.0), (60.0, 60.0), RED, true);
        let top: Vec<bool> = (2..=60).map(|x| canvas.get_pixel(x, 2) == RED).collect();
        assert!(top.iter().any(|on| *on));
        assert!(top.iter().any(|on| !*on));

        let mut solid = Canvas::new(64, 64);
        solid.draw_rect_outline((2.0, 2.0), (60.0, 60.0), RED, false);
        assert!((2..=60).all(|x| solid.get_pixel(x, 60) == RED));
    }

    #[test]
    fn test_ring_is_hollow() {
        let mut canvas = Canvas::new(40, 40);
        canvas.draw_circle((20.0, 20.0), 10.0, RED, false);
        assert_eq!(canvas.get_pixel(20, 20), [0, 0, 0]);
        assert_eq!(canvas.get_pixel(30, 20), RED);
    }

    #[test]
    fn test_label_draws_glyphs_over_background() {
        let mut canvas = Canvas::with_color(200, 40, [255, 255, 255]);
        canvas.draw_primitive(&Primitive::Label {
            at: Point::new(0.0, 0.0),
            text: "A".to_string(),
            color: RED,
        });
        let box_pixels: Vec<Rgb> = (0..24)
            .flat_map(|y| (0..24).map(move |x| (x, y)))
            .map(|(x, y)| canvas.get_pixel(x, y))
            .collect();
        assert!(box_pixels.contains(&RED));
        assert!(box_pixels.contains(&LABEL_BACKGROUND));
        assert_eq!(canvas.get_pixel(150, 30), [255, 255, 255]);
    }

    #[test]
    fn test_png_roundtrip_keeps_dimensions() {
        let canvas = Canvas::with_color(30, 12, [1, 2, 3]);
        let png = canvas.to_png().unwrap();
        let back = Canvas::from_png_bytes(&png).unwrap();
        assert_eq!((back.width(), back.height()), (30, 12));
        assert_eq!(back.get_pixel(29, 11), [1, 2, 3]);
    }
}
