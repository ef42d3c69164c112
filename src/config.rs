//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for the dataset viewer:
//! - Environment variables for all configurable values
//! - Defaults matching a container deployment with datasets mounted at `/datasets`
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATASET_VIEWER_DATA_DIR` | Root directory holding dataset directories | `/datasets` |
//! | `DATASET_VIEWER_PAGE_SIZE` | Default page size for list views | `20` |
//! | `DATASET_VIEWER_DEFAULT_FILE` | Default file variant (`data`, `train`, `val`) | `data` |
//! | `DATASET_VIEWER_CATALOG_FILE` | Per-dataset category catalog file name | `categories.json` |
//! | `DATASET_VIEWER_OUTPUT_DIR` | Directory for rendered overlays | `/tmp/dataset-viewer` |
//!
//! # Example
//!
//! ```bash
//! export DATASET_VIEWER_DATA_DIR="$HOME/datasets"
//! export DATASET_VIEWER_PAGE_SIZE=50
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::dataset::FileVariant;

// ============================================================================
// Default Values
// ============================================================================

/// Default root directory for datasets
pub const DEFAULT_DATA_DIR: &str = "/datasets";

/// Default page size
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Default file variant
pub const DEFAULT_FILE: FileVariant = FileVariant::Data;

/// Default category catalog file name
pub const DEFAULT_CATALOG_FILE: &str = "categories.json";

/// Default overlay output directory
pub const DEFAULT_OUTPUT_DIR: &str = "/tmp/dataset-viewer";

// ============================================================================
// Environment Variable Names
// ============================================================================

pub const ENV_DATA_DIR: &str = "DATASET_VIEWER_DATA_DIR";
pub const ENV_PAGE_SIZE: &str = "DATASET_VIEWER_PAGE_SIZE";
pub const ENV_DEFAULT_FILE: &str = "DATASET_VIEWER_DEFAULT_FILE";
pub const ENV_CATALOG_FILE: &str = "DATASET_VIEWER_CATALOG_FILE";
pub const ENV_OUTPUT_DIR: &str = "DATASET_VIEWER_OUTPUT_DIR";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Where datasets live
    pub datasets: DatasetSettings,
    /// Default values for CLI arguments
    pub defaults: DefaultSettings,
    /// Rendered overlay output
    pub output: OutputSettings,
}

/// Dataset location settings
#[derive(Debug, Clone)]
pub struct DatasetSettings {
    /// Root directory; dataset names are resolved beneath it
    pub data_dir: PathBuf,
    /// Catalog file name inside each dataset directory
    pub catalog_file: String,
}

/// Default values for CLI arguments
#[derive(Debug, Clone)]
pub struct DefaultSettings {
    pub page_size: usize,
    pub file: FileVariant,
}

/// Overlay output settings
#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            datasets: DatasetSettings::from_env(),
            defaults: DefaultSettings::from_env(),
            output: OutputSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            datasets: DatasetSettings::defaults(),
            defaults: DefaultSettings::defaults(),
            output: OutputSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DatasetSettings {
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            catalog_file: env::var(ENV_CATALOG_FILE)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATALOG_FILE.to_string()),
        }
    }

    pub fn defaults() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
        }
    }
}

impl DefaultSettings {
    pub fn from_env() -> Self {
        Self::from_values(
            env::var(ENV_PAGE_SIZE).ok().as_deref(),
            env::var(ENV_DEFAULT_FILE).ok().as_deref(),
        )
    }

    /// Build from raw variable values; missing or unparseable values use the defaults
    pub fn from_values(page_size: Option<&str>, file: Option<&str>) -> Self {
        let file = file.map(|raw| {
            raw.trim().parse().unwrap_or_else(|e| {
                tracing::warn!(value = raw, error = %e, "ignoring {}", ENV_DEFAULT_FILE);
                DEFAULT_FILE
            })
        });
        let page_size = page_size.map(|raw| {
            parse_page_size(raw).unwrap_or_else(|| {
                tracing::warn!(value = raw, "ignoring {}", ENV_PAGE_SIZE);
                DEFAULT_PAGE_SIZE
            })
        });
        Self {
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            file: file.unwrap_or(DEFAULT_FILE),
        }
    }

    pub fn defaults() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            file: DEFAULT_FILE,
        }
    }
}

impl OutputSettings {
    pub fn from_env() -> Self {
        Self {
            dir: env::var(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        }
    }

    pub fn defaults() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Page sizes must be positive
fn parse_page_size(s: &str) -> Option<usize> {
    s.trim().parse().ok().filter(|n| *n > 0)
}

/// Get the default page size (convenience function)
pub fn page_size() -> usize {
    get().defaults.page_size
}

/// Get the default file variant (convenience function)
pub fn default_file() -> FileVariant {
    get().defaults.file
}

/// Get the overlay output directory (convenience function)
pub fn output_dir() -> PathBuf {
    get().output.dir.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("50"), Some(50));
        assert_eq!(parse_page_size(" 7 "), Some(7));
        assert_eq!(parse_page_size("0"), None);
        assert_eq!(parse_page_size("-3"), None);
        assert_eq!(parse_page_size("many"), None);
    }

    #[test]
    fn test_unparseable_defaults_fall_back() {
        let settings = DefaultSettings::from_values(Some("0"), Some("bogus"));
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.file, DEFAULT_FILE);

        let settings = DefaultSettings::from_values(Some("many"), None);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);

        let settings = DefaultSettings::from_values(Some("50"), Some("Train"));
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.file, FileVariant::Train);

        let settings = DefaultSettings::from_values(None, None);
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.file, DEFAULT_FILE);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert_eq!(config.datasets.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(config.datasets.catalog_file, DEFAULT_CATALOG_FILE);
        assert_eq!(config.defaults.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.defaults.file, FileVariant::Data);
        assert_eq!(config.output.dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }
}
