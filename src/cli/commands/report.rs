//! report command implementation

use crate::calendar::CalendarConverter;
use crate::cli::args::ReportArgs;
use crate::config::ProcessorConfig;
use crate::report::{AirportDirectory, NoticeReport, is_valid_icao};
use crate::table::read_notice_table;
use anyhow::{Context, Result, bail};
use colored::*;

pub fn run_report(args: ReportArgs, config: &ProcessorConfig) -> Result<NoticeReport> {
    let icao = args.icao.trim().to_uppercase();
    if !is_valid_icao(&icao) {
        bail!(
            "Invalid ICAO code format '{}'. Please enter a 4-letter ICAO code (e.g., OIII).",
            args.icao
        );
    }

    let canonical = match &args.canonical {
        Some(path) => config.resolve(path),
        None => config.canonical_path(),
    };
    let records = read_notice_table(&canonical)
        .with_context(|| format!("Failed to load {}", canonical.display()))?;

    let directory = match &args.airports {
        Some(path) => AirportDirectory::load(&config.resolve(path))
            .with_context(|| format!("Failed to load airport names from {}", path.display()))?,
        None => AirportDirectory::default(),
    };

    let report = NoticeReport::for_airport(
        &records,
        &icao,
        &directory,
        &CalendarConverter::default(),
        config.utc_offset_hours,
    );

    let messages = report.messages(args.max_chars);
    let total = messages.len();
    for (index, message) in messages.iter().enumerate() {
        if total > 1 {
            println!(
                "{}",
                format!("[message {}/{}]", index + 1, total).bright_black()
            );
        }
        println!("{}", message);
    }

    Ok(report)
}
