//! Streaming read patterns over a dataset file.
//!
//! Every operation opens its own [`RecordStream`], scans forward and drops
//! the stream (closing the file) on return, early or not. Nothing is cached
//! between calls.

use std::collections::BTreeSet;
use std::path::Path;

use super::types::{CategoryFilter, DatasetResult, Direction, Page, Query};
use crate::dataset::{Dataset, FileVariant};
use crate::record::{Record, RecordStream};

/// Paged fetch with category filter, free-text search and total count.
///
/// Scans the whole file: `total` counts every record that survives the
/// filters, not just the returned page.
pub fn read_records(query: &Query) -> DatasetResult<Page> {
    query.validate()?;

    let path = query.dataset.file_path(query.file);
    let search = query.search_term();
    let end = query.offset.saturating_add(query.limit);

    let mut stream = RecordStream::open(&path)?;
    let mut records = Vec::new();
    let mut total = 0usize;

    while let Some(entry) = stream.next_entry() {
        let entry = entry?;
        if !query.task_types.matches(entry.record.task_type()) {
            continue;
        }
        if let Some(term) = &search {
            if !entry.text.to_lowercase().contains(term.as_str()) {
                continue;
            }
        }
        if total >= query.offset && total < end {
            records.push(entry.record);
        }
        total += 1;
    }

    tracing::debug!(
        path = %path.display(),
        total,
        returned = records.len(),
        skipped = stream.skipped(),
        "paged read complete"
    );

    Ok(Page {
        records,
        total,
        offset: query.offset,
        limit: query.limit,
    })
}

/// Record at logical position `index` (0-based among valid records).
/// Stops reading as soon as it is found.
pub fn read_record_by_index(
    dataset: &Dataset,
    index: usize,
    file: FileVariant,
) -> DatasetResult<Option<Record>> {
    for (position, record) in RecordStream::open(&dataset.file_path(file))?.enumerate() {
        let record = record?;
        if position == index {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// Nearest position before or after `current` whose category passes `filter`.
///
/// `Next` stops at the first hit past `current`. `Prev` has to walk forward
/// from the start remembering the latest hit, and stops once it reaches
/// `current`.
pub fn find_filtered_index(
    dataset: &Dataset,
    current: usize,
    direction: Direction,
    filter: &CategoryFilter,
    file: FileVariant,
) -> DatasetResult<Option<usize>> {
    let stream = RecordStream::open(&dataset.file_path(file))?;

    match direction {
        Direction::Next => {
            for (index, record) in stream.enumerate() {
                let record = record?;
                if index > current && filter.matches(record.task_type()) {
                    return Ok(Some(index));
                }
            }
            Ok(None)
        }
        Direction::Prev => {
            let mut last = None;
            for (index, record) in stream.enumerate() {
                if index >= current {
                    break;
                }
                let record = record?;
                if filter.matches(record.task_type()) {
                    last = Some(index);
                }
            }
            Ok(last)
        }
    }
}

/// Distinct `task_type` values in a file, sorted. Used when a dataset has
/// no pre-computed category catalog.
pub fn discover_categories(path: &Path) -> DatasetResult<Vec<String>> {
    let mut seen = BTreeSet::new();
    for record in RecordStream::open(path)? {
        seen.insert(record?.metadata.task_type);
    }
    tracing::debug!(path = %path.display(), categories = seen.len(), "category discovery complete");
    Ok(seen.into_iter().collect())
}
