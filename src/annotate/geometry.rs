//! Annotation geometry for a decoded action.
//!
//! The action's RU coordinate is mapped with [`crate::coords::ru_to_canvas`]
//! (independent per-axis scaling, then display scale and offset) and becomes
//! the anchor every shape is drawn around. Shape sizes are fixed in canvas
//! pixels so markers stay legible at any zoom.

use crate::coords::{ru_to_canvas, CoordResult, Point, Size};
use crate::record::{Action, ActionKind};

use super::types::{Primitive, Rgb};

/// Half-length of each crosshair arm
pub const CROSSHAIR_HALF_LENGTH: f64 = 14.0;
/// Radius of the filled dot at the crosshair center
pub const CENTER_DOT_RADIUS: f64 = 3.0;
/// Total length of a scroll arrow
pub const SCROLL_ARROW_LENGTH: f64 = 60.0;
/// Length of each arrowhead tick
pub const ARROW_HEAD_LENGTH: f64 = 10.0;
/// Radius of the open circle marking a drag start
pub const DRAG_START_RADIUS: f64 = 10.0;
/// Fixed displacement of the drag arrow's end from its start
pub const DRAG_VECTOR: (f64, f64) = (48.0, 36.0);
/// Maximum characters shown in a text label before truncation
pub const LABEL_MAX_CHARS: usize = 40;
/// Distance of the text label from the visible region's top-left corner
pub const LABEL_MARGIN: f64 = 10.0;
/// Stroke width for lines
pub const STROKE_WIDTH: f64 = 2.0;
/// Color for actions without an entry in the table
pub const DEFAULT_COLOR: Rgb = [160, 160, 160];

/// What gets drawn for an action kind
#[derive(Debug, Clone, Copy)]
enum Shape {
    Crosshair,
    Arrow { dx: f64, dy: f64 },
    Drag,
    Label,
    Nothing,
}

/// Fixed color per action kind
pub fn action_color(kind: &ActionKind) -> Rgb {
    match kind {
        ActionKind::LeftClick => [255, 59, 48],
        ActionKind::RightClick => [255, 149, 0],
        ActionKind::MiddleClick => [255, 204, 0],
        ActionKind::DoubleClick => [175, 82, 222],
        ActionKind::TripleClick => [88, 86, 214],
        ActionKind::MouseMove => [90, 200, 250],
        ActionKind::LeftClickDrag => [255, 45, 85],
        ActionKind::Scroll => [0, 122, 255],
        ActionKind::HScroll => [0, 199, 190],
        ActionKind::Type => [52, 199, 89],
        ActionKind::Key => [162, 132, 94],
        ActionKind::Wait => [99, 99, 102],
        ActionKind::Terminate => [255, 255, 255],
        ActionKind::Answer => [191, 90, 242],
        ActionKind::Ocr => [48, 176, 199],
        ActionKind::Other(_) => DEFAULT_COLOR,
    }
}

fn shape_for(action: &Action) -> Shape {
    let args = &action.arguments;
    // pixels > 0 scrolls up / right; zero or missing is treated as positive
    let positive = args.pixels.unwrap_or(0.0) >= 0.0;
    match &args.action {
        ActionKind::LeftClick
        | ActionKind::RightClick
        | ActionKind::MiddleClick
        | ActionKind::DoubleClick
        | ActionKind::TripleClick
        | ActionKind::MouseMove => Shape::Crosshair,
        ActionKind::Scroll => Shape::Arrow {
            dx: 0.0,
            dy: if positive { -1.0 } else { 1.0 },
        },
        ActionKind::HScroll => Shape::Arrow {
            dx: if positive { 1.0 } else { -1.0 },
            dy: 0.0,
        },
        ActionKind::LeftClickDrag => Shape::Drag,
        ActionKind::Type => Shape::Label,
        ActionKind::Key
        | ActionKind::Wait
        | ActionKind::Terminate
        | ActionKind::Answer
        | ActionKind::Ocr
        | ActionKind::Other(_) => Shape::Nothing,
    }
}

/// Shorten text to [`LABEL_MAX_CHARS`] characters, marking the cut with `...`
pub fn truncate_label(text: &str) -> String {
    if text.chars().count() <= LABEL_MAX_CHARS {
        return text.to_string();
    }
    let mut short: String = text.chars().take(LABEL_MAX_CHARS).collect();
    short.push_str("...");
    short
}

/// Drawable primitives for `action` on an image of `image_size` pixels shown
/// at `scale` and shifted by `offset`.
///
/// `tolerance` is a +/- extent in RU around the action's coordinate. The
/// output is ordered bottom to top: tolerance box, shape, label.
pub fn compute_annotation_primitives(
    action: &Action,
    image_size: Size,
    scale: f64,
    offset: Point,
    tolerance: Option<Point>,
) -> CoordResult<Vec<Primitive>> {
    let image_size = image_size.validate()?;
    let args = &action.arguments;
    let color = action_color(&args.action);
    let mut primitives = Vec::new();

    let anchor = args
        .coordinate
        .map(|ru| ru_to_canvas(ru, image_size, scale, offset))
        .transpose()?;

    if let (Some(ru), Some(tol)) = (args.coordinate, tolerance) {
        let a = ru_to_canvas(Point::new(ru.x - tol.x, ru.y - tol.y), image_size, scale, offset)?;
        let b = ru_to_canvas(Point::new(ru.x + tol.x, ru.y + tol.y), image_size, scale, offset)?;
        primitives.push(Primitive::Rect {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
            color,
            dashed: true,
        });
    }

    match (shape_for(action), anchor) {
        (Shape::Crosshair, Some(at)) => push_crosshair(&mut primitives, at, color),
        (Shape::Arrow { dx, dy }, Some(at)) => {
            let half = SCROLL_ARROW_LENGTH / 2.0;
            let tail = at.offset(-dx * half, -dy * half);
            let tip = at.offset(dx * half, dy * half);
            push_arrow(&mut primitives, tail, tip, (dx, dy), color);
        }
        (Shape::Drag, Some(at)) => push_drag(&mut primitives, at, color),
        (Shape::Label, _) => {
            if let Some(text) = args.text.as_deref().filter(|t| !t.is_empty()) {
                primitives.push(Primitive::Label {
                    at: offset.offset(LABEL_MARGIN, LABEL_MARGIN),
                    text: truncate_label(text),
                    color,
                });
            }
        }
        _ => {}
    }

    Ok(primitives)
}

fn push_crosshair(out: &mut Vec<Primitive>, at: Point, color: Rgb) {
    let h = CROSSHAIR_HALF_LENGTH;
    out.push(line(at.offset(-h, 0.0), at.offset(h, 0.0), color));
    out.push(line(at.offset(0.0, -h), at.offset(0.0, h), color));
    out.push(Primitive::Circle {
        center: at,
        radius: CENTER_DOT_RADIUS,
        color,
        filled: true,
    });
}

fn push_drag(out: &mut Vec<Primitive>, at: Point, color: Rgb) {
    let (vx, vy) = DRAG_VECTOR;
    let len = vx.hypot(vy);
    let dir = (vx / len, vy / len);
    out.push(Primitive::Circle {
        center: at,
        radius: DRAG_START_RADIUS,
        color,
        filled: false,
    });
    let tail = at.offset(dir.0 * DRAG_START_RADIUS, dir.1 * DRAG_START_RADIUS);
    push_arrow(out, tail, at.offset(vx, vy), dir, color);
}

/// Shaft from `tail` to `tip` plus two head ticks; `dir` is the unit direction
fn push_arrow(out: &mut Vec<Primitive>, tail: Point, tip: Point, dir: (f64, f64), color: Rgb) {
    out.push(line(tail, tip, color));
    let (dx, dy) = dir;
    let (px, py) = (-dy, dx);
    let back = ARROW_HEAD_LENGTH * std::f64::consts::FRAC_1_SQRT_2;
    for side in [1.0, -1.0] {
        let end = tip.offset(-dx * back + side * px * back, -dy * back + side * py * back);
        out.push(line(tip, end, color));
    }
}

fn line(from: Point, to: Point, color: Rgb) -> Primitive {
    Primitive::Line {
        from,
        to,
        color,
        width: STROKE_WIDTH,
    }
}
