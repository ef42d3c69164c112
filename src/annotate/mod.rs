pub mod geometry;
pub mod types;

pub use geometry::{action_color, compute_annotation_primitives, truncate_label, DEFAULT_COLOR, LABEL_MAX_CHARS};
pub use types::{Primitive, Rgb};
