//! merge command implementation

use super::shared::expand_input_patterns;
use crate::cli::args::MergeArgs;
use crate::config::ProcessorConfig;
use crate::merge::MergeDeduplicator;
use crate::models::MergeStats;
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

/// Resolve the source tables and canonical path for a merge run
pub fn plan_merge(args: &MergeArgs, config: &ProcessorConfig) -> Result<(Vec<PathBuf>, PathBuf)> {
    let sources = if args.inputs.is_empty() {
        config.source_paths()
    } else {
        expand_input_patterns(&args.inputs)?
            .iter()
            .map(|path| config.resolve(path))
            .collect()
    };

    let canonical = match &args.canonical {
        Some(path) => config.resolve(path),
        None => config.canonical_path(),
    };

    Ok((sources, canonical))
}

pub fn run_merge(args: MergeArgs, config: &ProcessorConfig) -> Result<MergeStats> {
    let (sources, canonical) = plan_merge(&args, config)?;

    let stats = MergeDeduplicator::new(&canonical)
        .with_progress(config.show_progress)
        .merge_files(&sources)
        .with_context(|| format!("Merge into {} aborted", canonical.display()))?;

    print_summary(&stats, &canonical);
    Ok(stats)
}

fn print_summary(stats: &MergeStats, canonical: &std::path::Path) {
    println!("{}", "Merge summary".bright_green().bold());
    for (path, rows) in &stats.source_rows {
        println!(
            "  {} {}",
            format!("{:>6}", rows).bright_yellow(),
            path.display().to_string().bright_black()
        );
    }
    println!(
        "  {} existing rows",
        format!("{:>6}", stats.existing_rows).bright_yellow()
    );
    println!(
        "  {} duplicates removed",
        format!("{:>6}", stats.duplicates_removed).bright_yellow()
    );
    println!(
        "  {} translations preserved",
        format!("{:>6}", stats.translations_preserved).bright_yellow()
    );
    println!(
        "{} {} rows written to {}",
        "✓".bright_green().bold(),
        stats.rows_written.to_string().bright_yellow().bold(),
        canonical.display().to_string().bright_cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_merge_defaults() {
        let args = MergeArgs {
            canonical: None,
            inputs: Vec::new(),
        };
        let config = ProcessorConfig::default().with_data_dir("/data");

        let (sources, canonical) = plan_merge(&args, &config).unwrap();

        assert_eq!(
            sources,
            vec![
                PathBuf::from("/data/notam_fetch_ourairports.csv"),
                PathBuf::from("/data/notam_fetch_faa.csv"),
            ]
        );
        assert_eq!(canonical, PathBuf::from("/data/notam_data.csv"));
    }

    #[test]
    fn test_plan_merge_explicit_paths() {
        let args = MergeArgs {
            canonical: Some(PathBuf::from("/srv/notams.csv")),
            inputs: vec!["/nonexistent/dir/fresh.csv".to_string()],
        };

        let (sources, canonical) = plan_merge(&args, &ProcessorConfig::default()).unwrap();

        assert_eq!(sources, vec![PathBuf::from("/nonexistent/dir/fresh.csv")]);
        assert_eq!(canonical, PathBuf::from("/srv/notams.csv"));
    }
}
