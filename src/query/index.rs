//! Position index built with one forward scan.
//!
//! Stores the byte offset and category of every valid record so that
//! filtered navigation works in both directions without rescanning, and a
//! record can be fetched by seeking straight to its line. Answers match the
//! streaming operations in [`super::engine`] as long as the file is not
//! modified after the index was built.

use std::collections::HashMap;
use std::path::PathBuf;

use super::types::{CategoryFilter, DatasetResult, Direction};
use crate::dataset::{Dataset, FileVariant};
use crate::record::{Record, RecordStream};

/// Per-file table of record offsets grouped by category
#[derive(Debug, Clone)]
pub struct RecordIndex {
    path: PathBuf,
    offsets: Vec<u64>,
    /// Ascending logical positions per category
    by_category: HashMap<String, Vec<usize>>,
}

impl RecordIndex {
    /// Scan a dataset file once and index every valid record
    pub fn build(dataset: &Dataset, file: FileVariant) -> DatasetResult<Self> {
        let path = dataset.file_path(file);
        let mut stream = RecordStream::open(&path)?;
        let mut offsets = Vec::new();
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();

        while let Some(entry) = stream.next_entry() {
            let entry = entry?;
            by_category
                .entry(entry.record.metadata.task_type)
                .or_default()
                .push(offsets.len());
            offsets.push(entry.offset);
        }

        tracing::info!(
            path = %path.display(),
            records = offsets.len(),
            categories = by_category.len(),
            skipped = stream.skipped(),
            "record index built"
        );

        Ok(Self {
            path,
            offsets,
            by_category,
        })
    }

    /// Number of valid records
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Indexed categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.by_category.keys().cloned().collect();
        categories.sort();
        categories
    }

    /// Count of records per category
    pub fn category_count(&self, task_type: &str) -> usize {
        self.by_category.get(task_type).map_or(0, Vec::len)
    }

    /// Same answer as [`super::engine::find_filtered_index`], via binary search
    pub fn find(&self, current: usize, direction: Direction, filter: &CategoryFilter) -> Option<usize> {
        if filter.is_empty() {
            return match direction {
                Direction::Next => current.checked_add(1).filter(|&i| i < self.len()),
                Direction::Prev => current.min(self.len()).checked_sub(1),
            };
        }

        let lists = filter.iter().filter_map(|c| self.by_category.get(c));
        match direction {
            Direction::Next => lists
                .filter_map(|positions| {
                    let at = positions.partition_point(|&p| p <= current);
                    positions.get(at).copied()
                })
                .min(),
            Direction::Prev => lists
                .filter_map(|positions| {
                    let at = positions.partition_point(|&p| p < current);
                    at.checked_sub(1).map(|i| positions[i])
                })
                .max(),
        }
    }

    /// Fetch the record at a logical position by seeking to its line
    pub fn record(&self, index: usize) -> DatasetResult<Option<Record>> {
        let Some(&offset) = self.offsets.get(index) else {
            return Ok(None);
        };
        match RecordStream::open_at(&self.path, offset)?.next() {
            Some(record) => Ok(Some(record?)),
            None => Ok(None),
        }
    }
}
