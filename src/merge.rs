//! Multi-source NOTAM merge and deduplication.
//!
//! Fresh source tables are concatenated, the existing canonical table is
//! appended after them, and rows are consolidated by (ICAO, NOTAM number).
//! For each key the first row encountered is kept, except that a row with a
//! translation always displaces a kept row without one.

use crate::error::{NotamError, Result};
use crate::models::{MergeStats, NoticeKey, NoticeRecord};
use crate::table::{read_notice_table, validate_notice_table, write_notices};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Result of consolidating a sequence of rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidated {
    /// One row per key, in order of first appearance
    pub records: Vec<NoticeRecord>,
    pub duplicates_removed: usize,
    pub translations_preserved: usize,
}

/// True when `candidate` should replace the row already kept for its key
pub fn prefers(kept: &NoticeRecord, candidate: &NoticeRecord) -> bool {
    !kept.has_translation() && candidate.has_translation()
}

/// Deduplicate notice rows by (ICAO, NOTAM number)
///
/// Rows are consumed in order:
/// 1. The first row for a key is kept at the position it first appeared
/// 2. A later duplicate replaces it only when [`prefers`] says so
/// 3. Every other duplicate is dropped and counted
///
/// # Arguments
///
/// * `rows` - Rows in precedence order (fresh sources first)
/// * `progress_bar` - Optional progress bar advanced once per row
///
/// # Returns
///
/// The consolidated rows with duplicate and translation counts
pub fn deduplicate_notices<I>(rows: I, progress_bar: Option<&ProgressBar>) -> Consolidated
where
    I: IntoIterator<Item = NoticeRecord>,
{
    let mut positions: HashMap<NoticeKey, usize> = HashMap::new();
    let mut result = Consolidated::default();

    for row in rows {
        let key = row.key();
        match positions.get(&key).copied() {
            Some(position) => {
                result.duplicates_removed += 1;
                let kept = &mut result.records[position];
                if prefers(kept, &row) {
                    debug!(
                        "Translated row replaces untranslated {} {}",
                        row.icao, row.notam_number
                    );
                    *kept = row;
                    result.translations_preserved += 1;
                }
            }
            None => {
                positions.insert(key, result.records.len());
                result.records.push(row);
            }
        }

        if let Some(pb) = progress_bar {
            pb.inc(1);
        }
    }

    result
}

/// Concatenate fresh tables, then the existing canonical rows, and deduplicate
///
/// # Arguments
///
/// * `fresh` - Rows of each fresh source table, in source order
/// * `existing` - Rows of the current canonical table
/// * `progress_bar` - Optional progress bar for tracking progress
///
/// # Returns
///
/// See [`deduplicate_notices`]
pub fn merge_records(
    fresh: Vec<Vec<NoticeRecord>>,
    existing: Vec<NoticeRecord>,
    progress_bar: Option<&ProgressBar>,
) -> Consolidated {
    let rows = fresh.into_iter().flatten().chain(existing);
    deduplicate_notices(rows, progress_bar)
}

/// Merges source tables into the canonical table on disk
#[derive(Debug, Clone)]
pub struct MergeDeduplicator {
    canonical: PathBuf,
    show_progress: bool,
}

impl MergeDeduplicator {
    pub fn new(canonical: impl Into<PathBuf>) -> Self {
        Self {
            canonical: canonical.into(),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn canonical(&self) -> &Path {
        &self.canonical
    }

    /// Merge `sources` into the canonical table and rewrite it.
    ///
    /// Every input is validated before anything is read in full, so a
    /// table with missing columns aborts the run and leaves the canonical
    /// table untouched.
    ///
    /// # Arguments
    ///
    /// * `sources` - Fresh source tables; an empty slice just re-deduplicates
    ///   the canonical table
    ///
    /// # Returns
    ///
    /// Row counts for the run, or the first structural or I/O error
    pub fn merge_files(&self, sources: &[PathBuf]) -> Result<MergeStats> {
        for source in sources {
            validate_notice_table(source)?;
        }
        let has_existing = self.canonical.exists();
        if has_existing {
            validate_notice_table(&self.canonical)?;
        }

        let mut stats = MergeStats::default();
        let mut fresh = Vec::with_capacity(sources.len());
        for source in sources {
            let records = read_notice_table(source)?;
            info!("Loaded {} rows from {}", records.len(), source.display());
            stats.source_rows.push((source.clone(), records.len()));
            fresh.push(records);
        }

        let existing = if has_existing {
            read_notice_table(&self.canonical)?
        } else {
            debug!(
                "No canonical table at {}, starting empty",
                self.canonical.display()
            );
            Vec::new()
        };
        stats.existing_rows = existing.len();

        let progress_bar = self.create_progress_bar(stats.total_input_rows() as u64);
        let consolidated = merge_records(fresh, existing, progress_bar.as_ref());
        if let Some(pb) = &progress_bar {
            pb.finish_and_clear();
        }

        self.persist(&consolidated.records, has_existing)?;

        stats.rows_written = consolidated.records.len();
        stats.duplicates_removed = consolidated.duplicates_removed;
        stats.translations_preserved = consolidated.translations_preserved;

        info!(
            "Merge complete: {} rows in, {} written, {} duplicates removed, {} translations preserved",
            stats.total_input_rows(),
            stats.rows_written,
            stats.duplicates_removed,
            stats.translations_preserved
        );

        Ok(stats)
    }

    /// Write to a sibling temporary file, then rename over the canonical table.
    ///
    /// The staging file is created owner-only, so it takes over the
    /// permissions of the table it replaces.
    fn persist(&self, records: &[NoticeRecord], replaces_existing: bool) -> Result<()> {
        let directory = match self.canonical.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut staging = NamedTempFile::new_in(&directory)?;
        write_notices(staging.as_file_mut(), records)?;
        if replaces_existing {
            let permissions = fs::metadata(&self.canonical)?.permissions();
            staging.as_file().set_permissions(permissions)?;
        }
        staging
            .persist(&self.canonical)
            .map_err(|error| NotamError::Io(error.error))?;

        debug!(
            "Persisted {} rows to {}",
            records.len(),
            self.canonical.display()
        );
        Ok(())
    }

    fn create_progress_bar(&self, total: u64) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message("Deduplicating notices");
        Some(pb)
    }
}
