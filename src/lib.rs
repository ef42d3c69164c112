//! Dataset Viewer - read-only browser for JSONL training datasets.
//!
//! This crate provides:
//! - Streaming JSONL reader that skips malformed lines
//! - Paged queries with category filter, free-text search and total count
//! - Fetch-by-index and directional next/prev scans over filtered records
//! - Category discovery, from a catalog file or a full scan
//! - Action parsing from `<tool_call>` blocks in assistant turns
//! - RU (0..1000) to pixel to canvas coordinate transforms
//! - Annotation geometry and PNG overlay rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use dataset_viewer::{Dataset, Query, read_records};
//!
//! let dataset = Dataset::new("/datasets/clicks");
//! let page = read_records(&Query::new(dataset, 20).task_types("click,scroll")).unwrap();
//! println!("{} of {} records", page.records.len(), page.total);
//! ```

pub mod annotate;
pub mod config;
pub mod coords;
pub mod dataset;
pub mod query;
pub mod record;
pub mod render;

// Re-export coordinate transforms
pub use coords::{CoordError, CoordResult, Point, RU_MAX, Size, pixel_to_ru, ru_to_canvas, ru_to_pixel};

// Re-export record types
pub use record::{Action, ActionKind, Metadata, Record, RecordStream, Speaker, Turn, parse_action};

// Re-export dataset and query operations
pub use dataset::{Dataset, FileVariant};
pub use query::{
    CategoryFilter, DatasetError, DatasetResult, Direction, Page, Query, RecordIndex, discover_categories,
    find_filtered_index, read_record_by_index, read_records,
};

// Re-export annotation and rendering
pub use annotate::{Primitive, compute_annotation_primitives};
pub use render::{Canvas, RenderError, RenderOptions, RenderResult, render_overlay, render_record};
