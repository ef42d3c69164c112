//! Dataset handles: where a dataset's JSONL variants and category catalog live.
//!
//! A dataset is a directory holding up to three record files:
//!
//! | Variant | File |
//! |---------|------|
//! | `data`  | `data.jsonl` |
//! | `train` | `train.jsonl` |
//! | `val`   | `val.jsonl` |
//!
//! plus an optional pre-computed category catalog (default
//! `categories.json`). Image paths inside records are relative to the
//! dataset directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config;
use crate::query::{discover_categories, DatasetError, DatasetResult};

/// Which record file of a dataset to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileVariant {
    #[default]
    Data,
    Train,
    Val,
}

impl FileVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            FileVariant::Data => "data",
            FileVariant::Train => "train",
            FileVariant::Val => "val",
        }
    }

    /// File name inside the dataset directory
    pub fn file_name(self) -> String {
        format!("{}.jsonl", self.as_str())
    }
}

impl FromStr for FileVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "data" => Ok(FileVariant::Data),
            "train" => Ok(FileVariant::Train),
            "val" => Ok(FileVariant::Val),
            other => Err(format!("unknown file variant '{}' (expected data, train or val)", other)),
        }
    }
}

impl fmt::Display for FileVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dataset directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub dir: PathBuf,
}

/// On-disk shape of a category catalog
#[derive(Deserialize)]
#[serde(untagged)]
enum Catalog {
    List(Vec<String>),
    Object { task_types: Vec<String> },
}

impl Dataset {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve a dataset name under `root`; absolute paths are used as-is
    pub fn resolve(root: impl AsRef<Path>, name: &str) -> Self {
        let path = Path::new(name);
        if path.is_absolute() {
            Self::new(path)
        } else {
            Self::new(root.as_ref().join(path))
        }
    }

    /// Resolve a dataset name under the configured data directory
    pub fn from_config(name: &str) -> Self {
        Self::resolve(&config::get().datasets.data_dir, name)
    }

    /// Display name (last path component)
    pub fn name(&self) -> String {
        self.dir
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.dir.display().to_string())
    }

    /// Path of a record file variant
    pub fn file_path(&self, variant: FileVariant) -> PathBuf {
        self.dir.join(variant.file_name())
    }

    /// Resolve an image path from a record against the dataset directory
    pub fn image_path(&self, image: &str) -> PathBuf {
        let path = Path::new(image);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// Path of the category catalog file
    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(&config::get().datasets.catalog_file)
    }

    /// Read the pre-computed category catalog, if the file exists
    pub fn read_catalog(&self) -> DatasetResult<Option<Vec<String>>> {
        read_catalog_file(&self.catalog_path())
    }

    /// Distinct categories for a variant, sorted: catalog first, scan as fallback
    pub fn categories(&self, variant: FileVariant) -> DatasetResult<Vec<String>> {
        match self.read_catalog() {
            Ok(Some(categories)) => return Ok(categories),
            Ok(None) => {}
            Err(DatasetError::Catalog(e)) => {
                tracing::warn!(
                    path = %self.catalog_path().display(),
                    error = %e,
                    "unreadable category catalog, scanning records instead"
                );
            }
            Err(e) => return Err(e),
        }
        discover_categories(&self.file_path(variant))
    }
}

/// Parse a catalog file; `Ok(None)` when it does not exist
pub fn read_catalog_file(path: &Path) -> DatasetResult<Option<Vec<String>>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let catalog: Catalog = serde_json::from_slice(&bytes).map_err(DatasetError::Catalog)?;
    let mut categories = match catalog {
        Catalog::List(list) => list,
        Catalog::Object { task_types } => task_types,
    };
    categories.sort();
    categories.dedup();
    Ok(Some(categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_variant_parse() {
        assert_eq!("data".parse::<FileVariant>(), Ok(FileVariant::Data));
        assert_eq!(" TRAIN ".parse::<FileVariant>(), Ok(FileVariant::Train));
        assert_eq!("val".parse::<FileVariant>(), Ok(FileVariant::Val));
        assert!("test".parse::<FileVariant>().is_err());
    }

    #[test]
    fn test_file_paths() {
        let ds = Dataset::resolve("/datasets", "clicks-v2");
        assert_eq!(ds.dir, PathBuf::from("/datasets/clicks-v2"));
        assert_eq!(ds.name(), "clicks-v2");
        assert_eq!(ds.file_path(FileVariant::Train), PathBuf::from("/datasets/clicks-v2/train.jsonl"));
        assert_eq!(ds.image_path("images/a.png"), PathBuf::from("/datasets/clicks-v2/images/a.png"));
    }

    #[test]
    fn test_absolute_dataset_path_is_kept() {
        let ds = Dataset::resolve("/datasets", "/mnt/other/ds");
        assert_eq!(ds.dir, PathBuf::from("/mnt/other/ds"));
    }

    #[test]
    fn test_catalog_formats() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.json");
        let object = dir.path().join("object.json");
        std::fs::write(&list, r#"["type","click","click"]"#).unwrap();
        std::fs::write(&object, r#"{"task_types":["scroll","drag"]}"#).unwrap();

        assert_eq!(read_catalog_file(&list).unwrap(), Some(vec!["click".to_string(), "type".to_string()]));
        assert_eq!(read_catalog_file(&object).unwrap(), Some(vec!["drag".to_string(), "scroll".to_string()]));
        assert_eq!(read_catalog_file(&dir.path().join("missing.json")).unwrap(), None);
    }

    #[test]
    fn test_bad_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{oops").unwrap();
        assert!(matches!(read_catalog_file(&path), Err(DatasetError::Catalog(_))));
    }
}
