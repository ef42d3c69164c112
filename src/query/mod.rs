pub mod engine;
pub mod index;
pub mod types;

pub use engine::{discover_categories, find_filtered_index, read_record_by_index, read_records};
pub use index::RecordIndex;
pub use types::{CategoryFilter, DatasetError, DatasetResult, Direction, Page, Query};
