//! Command implementations for the NOTAM processor CLI
//!
//! Each command is implemented in its own module; this module dispatches
//! to them after logging and configuration are set up.

pub mod date;
pub mod extract;
pub mod merge;
pub mod metar;
pub mod report;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Main command runner.
///
/// Returns an error when no subcommand was given; `main` shows help first.
pub fn run(args: Args) -> Result<()> {
    let config = shared::load_configuration(&args.global)?;

    match args.command {
        Some(Commands::ExtractNotams(extract_args)) => extract::run_extract(extract_args, &config),
        Some(Commands::Merge(merge_args)) => merge::run_merge(merge_args, &config).map(|_| ()),
        Some(Commands::Metar(metar_args)) => metar::run_metar(metar_args, &config),
        Some(Commands::Date(date_args)) => date::run_date(date_args, &config).map(|_| ()),
        Some(Commands::Report(report_args)) => {
            report::run_report(report_args, &config).map(|_| ())
        }
        None => anyhow::bail!("No command given"),
    }
}
