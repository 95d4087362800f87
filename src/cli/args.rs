//! Command-line argument definitions for the NOTAM processor
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::constants::MAX_MESSAGE_CHARS;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the NOTAM and METAR processor
#[derive(Debug, Clone, Parser)]
#[command(
    name = "notam-processor",
    version,
    about = "Extract, merge and render NOTAM and METAR data",
    long_about = "Extracts structured fields from raw NOTAM and METAR text, merges NOTAM tables \
                  from several sources into one canonical table without losing translations, \
                  and renders validity dates in the Persian (Jalali) calendar."
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Parser)]
pub struct GlobalArgs {
    /// Base directory for relative table paths
    #[arg(
        long = "data-dir",
        value_name = "PATH",
        global = true,
        help = "Base directory for relative table paths"
    )]
    pub data_dir: Option<PathBuf>,

    /// Keep tables in the per-user data directory
    #[arg(
        long = "user-data-dir",
        global = true,
        conflicts_with = "data_dir",
        help = "Use the per-user data directory (e.g. ~/.local/share/notam-processor) for relative table paths"
    )]
    pub user_data_dir: bool,

    /// Offset from UTC for rendered dates, in hours (fractions allowed)
    #[arg(
        long = "offset",
        value_name = "HOURS",
        global = true,
        allow_negative_numbers = true,
        help = "UTC offset in hours for rendered dates [default: 3.5]"
    )]
    pub utc_offset: Option<f64>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress output except errors"
    )]
    pub quiet: bool,
}

impl GlobalArgs {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Extract notices from raw NOTAM text into a source table
    ExtractNotams(ExtractArgs),
    /// Merge source tables into the canonical NOTAM table
    Merge(MergeArgs),
    /// Parse raw METAR lines into a weather table
    Metar(MetarArgs),
    /// Render a compact timestamp in the Persian calendar
    Date(DateArgs),
    /// Render all notices for one airport
    Report(ReportArgs),
}

/// Arguments for the extract-notams command
#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// Airport the notices were fetched for; overrides the A) field
    #[arg(long = "icao", value_name = "ICAO")]
    pub icao: Option<String>,

    /// A text file of blank-line separated notices, or a directory of
    /// `.txt` files holding one notice each
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Output CSV; written to stdout when omitted
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the merge command
#[derive(Debug, Clone, Parser)]
pub struct MergeArgs {
    /// Canonical table to update [default: notam_data.csv]
    #[arg(long = "canonical", value_name = "FILE")]
    pub canonical: Option<PathBuf>,

    /// Source tables or glob patterns, merged in the given order.
    /// Defaults to the OurAirports and FAA fetch tables.
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<String>,
}

/// Output format for the weather table
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeatherFormat {
    /// Comma separated values
    Csv,
    /// Apache Parquet with Snappy compression
    Parquet,
}

impl WeatherFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            WeatherFormat::Csv => "csv",
            WeatherFormat::Parquet => "parquet",
        }
    }
}

/// Arguments for the metar command
#[derive(Debug, Clone, Parser)]
pub struct MetarArgs {
    /// Text file with one METAR report per line
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// Output file [default: METAR_data.<format>]
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: WeatherFormat,

    /// Keep only the last report in the input
    #[arg(long = "latest-only")]
    pub latest_only: bool,
}

/// Arguments for the date command
#[derive(Debug, Clone, Parser)]
pub struct DateArgs {
    /// Compact timestamp such as `2503202200`, `2503202200 EST` or `PERM`
    #[arg(
        value_name = "TOKEN",
        num_args = 1..,
        required_unless_present = "now",
        conflicts_with = "now"
    )]
    pub token: Vec<String>,

    /// Render the current time instead of a token
    #[arg(long = "now")]
    pub now: bool,
}

impl DateArgs {
    /// The token words joined back into one string
    pub fn joined_token(&self) -> String {
        self.token.join(" ")
    }
}

/// Arguments for the report command
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Four-letter airport code
    #[arg(long = "icao", value_name = "ICAO")]
    pub icao: String,

    /// Canonical table to read [default: notam_data.csv]
    #[arg(long = "canonical", value_name = "FILE")]
    pub canonical: Option<PathBuf>,

    /// `ICAO,Name` table used for airport names
    #[arg(long = "airports", value_name = "FILE")]
    pub airports: Option<PathBuf>,

    /// Split the report into messages of at most this many characters
    #[arg(long = "max-chars", value_name = "COUNT", default_value_t = MAX_MESSAGE_CHARS)]
    pub max_chars: usize,
}
