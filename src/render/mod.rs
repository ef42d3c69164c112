pub mod canvas;
pub mod output;
pub mod overlay;
pub mod types;

pub use canvas::Canvas;
pub use output::{encode_png, generate_timestamp, overlay_filename, to_data_url, write_overlay};
pub use overlay::{render_overlay, render_record};
pub use types::{RenderError, RenderOptions, RenderResult, RenderedOverlay};
