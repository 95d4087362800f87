//! NOTAM Processor Library
//!
//! Turns raw aeronautical notices (NOTAMs) and weather reports (METARs)
//! into structured tables.
//!
//! This library provides tools for:
//! - Extracting lettered NOTAM fields from free-flowing notice text
//! - Parsing METAR reports into typed weather records
//! - Rendering compact validity timestamps in the Persian (Jalali) calendar
//! - Merging notice tables from several sources without losing translations
//! - Rendering per-airport notice reports for chat delivery

pub mod calendar;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod merge;
pub mod metar;
pub mod models;
pub mod notam;
pub mod report;
pub mod table;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use calendar::{CalendarConverter, JalaliDate, LocalizedDate, to_local_calendar};
pub use config::ProcessorConfig;
pub use error::{NotamError, Result};
pub use merge::{MergeDeduplicator, merge_records};
pub use metar::MetarFieldExtractor;
pub use models::{MergeStats, NoticeKey, NoticeRecord, WeatherRecord, pending_translations};
pub use notam::NotamFieldExtractor;
pub use report::{AirportDirectory, NoticeReport, split_message};
