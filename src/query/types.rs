// Query value objects, results and errors

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::dataset::{Dataset, FileVariant};
use crate::record::Record;

/// Result type for dataset reads
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors surfaced by the reader and query engine. Missing files and
/// malformed lines never show up here.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Read failure other than "file not found"
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The query itself is unusable (e.g. `limit == 0`)
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A category catalog exists but is not valid JSON of the expected shape
    #[error("invalid category catalog: {0}")]
    Catalog(serde_json::Error),
}

/// Set of accepted categories; empty means "no restriction"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter(BTreeSet<String>);

impl CategoryFilter {
    /// Accept every category
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a comma-joined list; entries are trimmed and empties dropped
    pub fn parse(joined: &str) -> Self {
        joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, task_type: &str) -> bool {
        self.0.is_empty() || self.0.contains(task_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

/// Direction of a filtered navigation scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Next,
    Prev,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "next" => Ok(Direction::Next),
            "prev" | "previous" => Ok(Direction::Prev),
            other => Err(format!("unknown direction '{}' (expected next or prev)", other)),
        }
    }
}

/// One paged read request
#[derive(Debug, Clone)]
pub struct Query {
    pub dataset: Dataset,
    pub file: FileVariant,
    /// Position of the first wanted record among matching records
    pub offset: usize,
    /// Maximum records returned; must be at least 1
    pub limit: usize,
    pub task_types: CategoryFilter,
    /// Case-insensitive substring over the record's JSON text
    pub search: Option<String>,
}

impl Query {
    /// Query for the first `limit` records of a dataset's default file
    pub fn new(dataset: Dataset, limit: usize) -> Self {
        Self {
            dataset,
            file: FileVariant::default(),
            offset: 0,
            limit,
            task_types: CategoryFilter::any(),
            search: None,
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn file(mut self, file: FileVariant) -> Self {
        self.file = file;
        self
    }

    /// Restrict to a comma-joined list of task types
    pub fn task_types(mut self, joined: &str) -> Self {
        self.task_types = CategoryFilter::parse(joined);
        self
    }

    pub fn filter(mut self, filter: CategoryFilter) -> Self {
        self.task_types = filter;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Reject queries the engine cannot answer
    pub fn validate(&self) -> DatasetResult<()> {
        if self.limit == 0 {
            return Err(DatasetError::InvalidQuery("limit must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Lowercased search term, `None` when absent or empty.
    /// Whitespace is part of the term.
    pub(crate) fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// A page of matching records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub records: Vec<Record>,
    /// Number of records matching the filters across the whole file
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_parse() {
        let filter = CategoryFilter::parse(" click, type ,,scroll,");
        assert_eq!(filter.to_string(), "click,scroll,type");
        assert!(filter.matches("type"));
        assert!(!filter.matches("drag"));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CategoryFilter::parse(" , ");
        assert!(filter.is_empty());
        assert!(filter.matches("anything"));
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("next".parse::<Direction>(), Ok(Direction::Next));
        assert_eq!("Prev".parse::<Direction>(), Ok(Direction::Prev));
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_query_builder_and_validation() {
        let query = Query::new(Dataset::new("/tmp/ds"), 20)
            .offset(40)
            .task_types("click")
            .search("  OK Button ")
            .file(FileVariant::Val);
        assert!(query.validate().is_ok());
        assert_eq!(query.offset, 40);
        assert_eq!(query.file, FileVariant::Val);
        assert_eq!(query.search_term().as_deref(), Some("  ok button "));

        let empty = Query::new(Dataset::new("/tmp/ds"), 1).search("");
        assert_eq!(empty.search_term(), None);

        let zero = Query::new(Dataset::new("/tmp/ds"), 0);
        assert!(matches!(zero.validate(), Err(DatasetError::InvalidQuery(_))));
        let message = zero.validate().unwrap_err().to_string();
        assert_eq!(message, "invalid query: limit must be at least 1");
    }
}
