//! Configuration management and validation.
//!
//! Provides the processing configuration shared by the CLI commands:
//! table locations, the display UTC offset and progress reporting.

use crate::constants::{
    DATA_DIR_NAME, DEFAULT_CANONICAL_TABLE, DEFAULT_SOURCE_TABLES, DEFAULT_UTC_OFFSET_HOURS,
};
use crate::error::{NotamError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest UTC offset in use anywhere (Line Islands, +14:00)
const MAX_UTC_OFFSET_HOURS: f64 = 14.0;

/// Main configuration for the NOTAM processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Offset added to UTC before calendar rendering, in hours
    pub utc_offset_hours: f64,

    /// Consolidated notice table rewritten by every merge
    pub canonical_table: PathBuf,

    /// Source tables merged when no inputs are named explicitly
    pub source_tables: Vec<PathBuf>,

    /// Base directory for relative table paths
    pub data_dir: Option<PathBuf>,

    /// Show progress bars for long operations
    pub show_progress: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            canonical_table: PathBuf::from(DEFAULT_CANONICAL_TABLE),
            source_tables: DEFAULT_SOURCE_TABLES.iter().map(PathBuf::from).collect(),
            data_dir: None,
            show_progress: true,
        }
    }
}

impl ProcessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform data directory for the processor's tables
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(DATA_DIR_NAME))
            .ok_or_else(|| NotamError::Configuration {
                message: "Could not determine user data directory".to_string(),
            })
    }

    pub fn with_utc_offset(mut self, hours: f64) -> Self {
        self.utc_offset_hours = hours;
        self
    }

    pub fn with_canonical_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.canonical_table = path.into();
        self
    }

    pub fn with_source_tables(mut self, tables: Vec<PathBuf>) -> Self {
        self.source_tables = tables;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Disable progress bars (quiet runs and tests)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Resolve a table path against `data_dir` when it is relative
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn canonical_path(&self) -> PathBuf {
        self.resolve(&self.canonical_table)
    }

    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.source_tables
            .iter()
            .map(|table| self.resolve(table))
            .collect()
    }

    /// Check that the settings can be used
    pub fn validate(&self) -> Result<()> {
        if !self.utc_offset_hours.is_finite()
            || self.utc_offset_hours.abs() > MAX_UTC_OFFSET_HOURS
        {
            return Err(NotamError::Configuration {
                message: format!(
                    "UTC offset {} is outside -{max}..={max} hours",
                    self.utc_offset_hours,
                    max = MAX_UTC_OFFSET_HOURS
                ),
            });
        }

        if self.canonical_table.as_os_str().is_empty() {
            return Err(NotamError::Configuration {
                message: "Canonical table path is empty".to_string(),
            });
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}
