//! metar command implementation

use crate::cli::args::{MetarArgs, WeatherFormat};
use crate::config::ProcessorConfig;
use crate::constants::DEFAULT_METAR_TABLE;
use crate::export::write_weather_parquet;
use crate::metar::MetarFieldExtractor;
use crate::table::write_weather_table;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output path: `METAR_data.<ext>` for the chosen format
pub fn default_output(format: WeatherFormat) -> PathBuf {
    Path::new(DEFAULT_METAR_TABLE).with_extension(format.extension())
}

pub fn run_metar(args: MetarArgs, config: &ProcessorConfig) -> Result<()> {
    let input = config.resolve(&args.input);
    let content = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let records = MetarFieldExtractor::new().parse_lines(&content, args.latest_only);
    let unkeyed = records.iter().filter(|record| !record.is_keyed()).count();

    let output = config.resolve(
        &args
            .output
            .clone()
            .unwrap_or_else(|| default_output(args.format)),
    );

    match args.format {
        WeatherFormat::Csv => write_weather_table(&output, &records),
        WeatherFormat::Parquet => write_weather_parquet(&output, &records).map(|_| ()),
    }
    .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} Parsed {} METAR reports to {}",
        "✓".bright_green().bold(),
        records.len().to_string().bright_yellow(),
        output.display().to_string().bright_cyan()
    );
    if unkeyed > 0 {
        println!(
            "  {} {} reports have no station identifier",
            "!".bright_red().bold(),
            unkeyed
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_follows_format() {
        assert_eq!(default_output(WeatherFormat::Csv), PathBuf::from("METAR_data.csv"));
        assert_eq!(
            default_output(WeatherFormat::Parquet),
            PathBuf::from("METAR_data.parquet")
        );
    }
}
