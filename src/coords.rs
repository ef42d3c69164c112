//! Conversions between RU space, source-image pixels and canvas space.
//!
//! RU (Resolution Unit) coordinates run from 0 to 1000 on each axis
//! independently of the image's aspect ratio. Every conversion here scales
//! the two axes separately; annotation geometry goes through the same
//! functions so overlays land on the same pixels on non-square images.
//!
//! Rounding is `f64::round`, i.e. half away from zero.

use serde::{Deserialize, Serialize};

/// Upper bound of the RU range on each axis
pub const RU_MAX: f64 = 1000.0;

/// Result type for coordinate conversions
pub type CoordResult<T> = Result<T, CoordError>;

/// Errors raised by coordinate conversions
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordError {
    /// Image width or height is zero, negative or not finite
    #[error("invalid image dimension {width}x{height}")]
    InvalidDimension { width: f64, height: f64 },
}

/// A point in RU, pixel or canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Fail unless both dimensions are strictly positive
    pub fn validate(self) -> CoordResult<Self> {
        let positive = |v: f64| v > 0.0 && v.is_finite();
        if !positive(self.width) || !positive(self.height) {
            return Err(CoordError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl From<[f64; 2]> for Size {
    fn from([width, height]: [f64; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Size> for [f64; 2] {
    fn from(s: Size) -> Self {
        [s.width, s.height]
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(f64::from(width), f64::from(height))
    }
}

/// Map an RU coordinate to source-image pixels
pub fn ru_to_pixel(ru: Point, size: Size) -> CoordResult<Point> {
    let size = size.validate()?;
    Ok(Point::new(
        (ru.x / RU_MAX * size.width).round(),
        (ru.y / RU_MAX * size.height).round(),
    ))
}

/// Map a pixel coordinate back to RU space
pub fn pixel_to_ru(pixel: Point, size: Size) -> CoordResult<Point> {
    let size = size.validate()?;
    Ok(Point::new(
        (pixel.x / size.width * RU_MAX).round(),
        (pixel.y / size.height * RU_MAX).round(),
    ))
}

/// Map an RU coordinate to canvas space: `pixel * scale + offset` per axis
pub fn ru_to_canvas(ru: Point, size: Size, scale: f64, offset: Point) -> CoordResult<Point> {
    let pixel = ru_to_pixel(ru, size)?;
    Ok(Point::new(
        pixel.x * scale + offset.x,
        pixel.y * scale + offset.y,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: Size = Size {
        width: 1920.0,
        height: 1080.0,
    };

    #[test]
    fn test_ru_center_maps_to_pixel_center() {
        let p = ru_to_pixel(Point::new(500.0, 500.0), HD).unwrap();
        assert_eq!(p, Point::new(960.0, 540.0));
    }

    #[test]
    fn test_pixel_to_ru_boundaries() {
        for size in [HD, Size::new(1.0, 1.0), Size::new(333.0, 7.0)] {
            assert_eq!(pixel_to_ru(Point::ORIGIN, size).unwrap(), Point::ORIGIN);
            assert_eq!(
                pixel_to_ru(Point::new(size.width, size.height), size).unwrap(),
                Point::new(1000.0, 1000.0)
            );
        }
    }

    #[test]
    fn test_round_trip_within_one_pixel() {
        for size in [HD, Size::new(1366.0, 768.0), Size::new(2000.0, 17.0), Size::new(7.0, 7.0)] {
            let mut x = 0.0;
            while x <= size.width {
                let mut y = 0.0;
                while y <= size.height {
                    let p = Point::new(x, y);
                    let back = ru_to_pixel(pixel_to_ru(p, size).unwrap(), size).unwrap();
                    assert!((back.x - p.x).abs() <= 1.0, "{:?} -> {:?} at {:?}", p, back, size);
                    assert!((back.y - p.y).abs() <= 1.0, "{:?} -> {:?} at {:?}", p, back, size);
                    y += (size.height / 13.0).max(1.0).floor();
                }
                x += (size.width / 17.0).max(1.0).floor();
            }
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        let zero_w = ru_to_pixel(Point::ORIGIN, Size::new(0.0, 100.0));
        let zero_h = ru_to_pixel(Point::ORIGIN, Size::new(100.0, 0.0));
        assert!(matches!(zero_w, Err(CoordError::InvalidDimension { .. })));
        assert!(matches!(zero_h, Err(CoordError::InvalidDimension { .. })));
        assert!(pixel_to_ru(Point::ORIGIN, Size::new(-5.0, 10.0)).is_err());
        assert!(ru_to_canvas(Point::ORIGIN, Size::new(f64::NAN, 10.0), 1.0, Point::ORIGIN).is_err());
    }

    #[test]
    fn test_axes_scale_independently() {
        let p = ru_to_pixel(Point::new(1000.0, 1000.0), Size::new(800.0, 200.0)).unwrap();
        assert_eq!(p, Point::new(800.0, 200.0));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        let p = ru_to_pixel(Point::new(500.0, 500.0), Size::new(1.0, 3.0)).unwrap();
        assert_eq!(p, Point::new(1.0, 2.0));
        let n = ru_to_pixel(Point::new(-500.0, 0.0), Size::new(1.0, 1.0)).unwrap();
        assert_eq!(n, Point::new(-1.0, 0.0));
    }

    #[test]
    fn test_ru_to_canvas_applies_scale_then_offset() {
        let p = ru_to_canvas(Point::new(500.0, 500.0), HD, 0.5, Point::new(10.0, 20.0)).unwrap();
        assert_eq!(p, Point::new(490.0, 290.0));
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let p: Point = serde_json::from_str("[12, 34.5]").unwrap();
        assert_eq!(p, Point::new(12.0, 34.5));
        assert_eq!(serde_json::to_string(&p).unwrap(), "[12.0,34.5]");
    }
}
