//! extract-notams command implementation

use crate::cli::args::ExtractArgs;
use crate::config::ProcessorConfig;
use crate::models::NoticeRecord;
use crate::notam::{NotamFieldExtractor, split_notice_blocks};
use crate::table::{write_notice_table, write_notices};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Collect raw notice blocks from a file or a directory of `.txt` files
pub fn read_raw_notices(input: &Path) -> Result<Vec<String>> {
    if input.is_dir() {
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(input) {
            let entry = entry.context("Failed to walk input directory")?;
            if entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "txt")
            {
                files.push(entry.into_path());
            }
        }
        files.sort();

        files
            .iter()
            .map(|file| {
                fs::read_to_string(file)
                    .with_context(|| format!("Failed to read {}", file.display()))
            })
            .filter(|text| text.as_ref().map_or(true, |t| !t.trim().is_empty()))
            .collect()
    } else {
        let content = fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        Ok(split_notice_blocks(&content))
    }
}

/// Run the extractor over every block
pub fn extract_notices(blocks: &[String], icao: Option<&str>) -> Vec<NoticeRecord> {
    let extractor = NotamFieldExtractor::new();
    blocks
        .iter()
        .map(|block| match icao {
            Some(icao) => extractor.extract_for(icao, block),
            None => extractor.extract(block),
        })
        .inspect(|record| {
            if record.notam_number.is_empty() {
                warn!("Notice for {} has no NOTAM number", record.icao);
            }
        })
        .collect()
}

/// Relative input and output paths resolve against the configured data directory
pub fn run_extract(args: ExtractArgs, config: &ProcessorConfig) -> Result<()> {
    let input = config.resolve(&args.input);
    let blocks = read_raw_notices(&input)?;
    info!("Read {} raw notices from {}", blocks.len(), input.display());

    let records = extract_notices(&blocks, args.icao.as_deref());

    match args.output.as_deref().map(|output| config.resolve(output)) {
        Some(path) => {
            write_notice_table(&path, &records)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Extracted {} notices to {}",
                "✓".bright_green().bold(),
                records.len().to_string().bright_yellow(),
                path.display().to_string().bright_cyan()
            );
        }
        None => write_notices(std::io::stdout().lock(), &records)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_raw_notices_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("oiii");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("b.txt"), "B0002/24 E) TWO").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "A0001/24 E) ONE").unwrap();
        fs::write(temp_dir.path().join("empty.txt"), "  \n").unwrap();
        fs::write(temp_dir.path().join("notes.md"), "ignored").unwrap();

        let blocks = read_raw_notices(temp_dir.path()).unwrap();

        assert_eq!(blocks, vec!["A0001/24 E) ONE", "B0002/24 E) TWO"]);
    }

    #[test]
    fn test_extract_notices_with_override() {
        let blocks = vec![
            "A0001/24 A) OIIX E) ONE".to_string(),
            "A0002/24 A) OIMM E) TWO".to_string(),
        ];

        let fixed = extract_notices(&blocks, Some("OIII"));
        assert!(fixed.iter().all(|record| record.icao == "OIII"));

        let from_text = extract_notices(&blocks, None);
        assert_eq!(from_text[1].icao, "OIMM");
        assert_eq!(from_text[1].text, "TWO");
    }

    #[test]
    fn test_run_extract_resolves_paths_in_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("oiii.txt"),
            "A0001/24 NOTAMN\nE) RWY CLSD\n\nA0002/24 NOTAMN\nE) TWY CLSD\n",
        )
        .unwrap();
        let config = ProcessorConfig::default()
            .with_data_dir(temp_dir.path())
            .without_progress();
        let args = ExtractArgs {
            icao: Some("OIII".to_string()),
            input: PathBuf::from("oiii.txt"),
            output: Some(PathBuf::from("notam_fetch_faa.csv")),
        };

        run_extract(args, &config).unwrap();

        let table = crate::table::read_notice_table(&temp_dir.path().join("notam_fetch_faa.csv"))
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[1].notam_number, "A0002/24");
        assert_eq!(table[1].icao, "OIII");
    }
}
