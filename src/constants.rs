//! Application constants for the NOTAM processor
//!
//! This module contains the table schemas, unit conversion factors,
//! calendar name tables and default values used throughout the crate.

// =============================================================================
// File Defaults
// =============================================================================

/// Canonical NOTAM table rewritten by every merge
pub const DEFAULT_CANONICAL_TABLE: &str = "notam_data.csv";

/// Source tables produced by the fetch collaborators, in merge order
pub const DEFAULT_SOURCE_TABLES: &[&str] = &["notam_fetch_ourairports.csv", "notam_fetch_faa.csv"];

/// Weather table written by the METAR command
pub const DEFAULT_METAR_TABLE: &str = "METAR_data.csv";

/// Directory name used under the platform data directory
pub const DATA_DIR_NAME: &str = "notam-processor";

/// Iran Standard Time, the offset the presentation layer renders in
pub const DEFAULT_UTC_OFFSET_HOURS: f64 = 3.5;

// =============================================================================
// Table Schemas
// =============================================================================

/// Column names of the NOTAM table, in output order
pub mod notice_columns {
    pub const ICAO: &str = "ICAO";
    pub const NOTAM_NO: &str = "NOTAM No";
    pub const Q_CODE: &str = "Q Code";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const SCHEDULE: &str = "Schedule";
    pub const TEXT: &str = "Text";
    pub const LOWER_LIMIT: &str = "Lower Limit";
    pub const UPPER_LIMIT: &str = "Upper Limit";
    pub const CREATED_TIME: &str = "Created Time";
    pub const TRANSLATION: &str = "Farsi";

    /// Every column a merge input must carry
    pub const ALL: &[&str] = &[
        ICAO,
        NOTAM_NO,
        Q_CODE,
        FROM,
        TO,
        SCHEDULE,
        TEXT,
        LOWER_LIMIT,
        UPPER_LIMIT,
        CREATED_TIME,
        TRANSLATION,
    ];
}

/// Column names of the METAR table, in output order
pub mod weather_columns {
    pub const ICAO: &str = "ICAO";
    pub const DATE_TIME: &str = "DateTime";
    pub const WIND_DIR: &str = "WIND_DIR";
    pub const WIND_SPEED: &str = "WIND_SPEED";
    pub const WIND_GUST: &str = "WIND_GUST";
    pub const WIND_VAR: &str = "WIND_VAR";
    pub const VIS: &str = "VIS";
    pub const CLOUD1: &str = "CLOUD1";
    pub const CLOUD2: &str = "CLOUD2";
    pub const CLOUD3: &str = "CLOUD3";
    pub const CLOUD4: &str = "CLOUD4";
    pub const TEMP: &str = "TEMP";
    pub const DEW: &str = "DEW";
    pub const HUMIDITY: &str = "HUMIDITY";
    pub const PRESSURE_HPA: &str = "PRESSURE_HPA";
    pub const PRESSURE_INCH: &str = "PRESSURE_INCH";
    pub const WX_PHENOMENA: &str = "WX_PHENOMENA";
    pub const INTENSITY: &str = "INTENSITY";
    pub const REMARKS: &str = "REMARKS";
    pub const RAW_METAR: &str = "RAW_METAR";

    pub const ALL: &[&str] = &[
        ICAO,
        DATE_TIME,
        WIND_DIR,
        WIND_SPEED,
        WIND_GUST,
        WIND_VAR,
        VIS,
        CLOUD1,
        CLOUD2,
        CLOUD3,
        CLOUD4,
        TEMP,
        DEW,
        HUMIDITY,
        PRESSURE_HPA,
        PRESSURE_INCH,
        WX_PHENOMENA,
        INTENSITY,
        REMARKS,
        RAW_METAR,
    ];
}

// =============================================================================
// METAR Conversion Constants
// =============================================================================

/// Meters per statute mile, truncated the way the reports have always been stored
pub const METERS_PER_STATUTE_MILE: u32 = 1609;

/// Hectopascals per inch of mercury
pub const HPA_PER_INHG: f64 = 33.8639;

/// Maximum number of cloud layers kept per observation
pub const MAX_CLOUD_LAYERS: usize = 4;

/// Magnus approximation coefficients for saturation vapour pressure
pub mod magnus {
    pub const BASE_HPA: f64 = 6.112;
    pub const A: f64 = 17.67;
    pub const B_CELSIUS: f64 = 243.5;
}

// =============================================================================
// Compact Timestamp Constants
// =============================================================================

/// Two-digit years below this pivot belong to the 2000s, the rest to the 1900s
pub const YEAR_PIVOT: u32 = 50;

/// Literal used for notices without an end of validity
pub const PERMANENT_TOKEN: &str = "PERM";

/// Suffix marking an estimated end of validity
pub const ESTIMATED_SUFFIX: &str = "EST";

// =============================================================================
// Persian Calendar Rendering
// =============================================================================

/// Localised names for calendar rendering.
///
/// Weekdays are indexed with Saturday as day zero, months from Farvardin.
#[derive(Debug)]
pub struct CalendarNames {
    pub weekdays: [&'static str; 7],
    pub months: [&'static str; 12],
    pub time_label: &'static str,
    pub local_label: &'static str,
    pub estimated_suffix: &'static str,
    pub permanent: &'static str,
}

pub static PERSIAN_NAMES: CalendarNames = CalendarNames {
    weekdays: [
        "شنبه",
        "یک‌شنبه",
        "دوشنبه",
        "سه‌شنبه",
        "چهارشنبه",
        "پنج‌شنبه",
        "جمعه",
    ],
    months: [
        "فروردین",
        "اردیبهشت",
        "خرداد",
        "تیر",
        "مرداد",
        "شهریور",
        "مهر",
        "آبان",
        "آذر",
        "دی",
        "بهمن",
        "اسفند",
    ],
    time_label: "ساعت",
    local_label: "محلی",
    estimated_suffix: " - تخمینی",
    permanent: "دائمی",
};

// =============================================================================
// Report Rendering
// =============================================================================

/// Substituted for a From/To value the calendar converter rejects
pub const INVALID_DATE_PLACEHOLDER: &str = "Invalid date";

/// Substituted for empty fields in rendered notices
pub const MISSING_FIELD_PLACEHOLDER: &str = "N/A";

/// Longest message chunk accepted by the chat transport
pub const MAX_MESSAGE_CHARS: usize = 4000;

/// Separator line between rendered notices
pub const NOTICE_SEPARATOR: &str = "---------------------------";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_schema_order() {
        assert_eq!(notice_columns::ALL.len(), 11);
        assert_eq!(notice_columns::ALL[0], "ICAO");
        assert_eq!(notice_columns::ALL[10], "Farsi");
    }

    #[test]
    fn test_weather_schema_order() {
        assert_eq!(weather_columns::ALL.len(), 20);
        assert_eq!(weather_columns::ALL.first(), Some(&"ICAO"));
        assert_eq!(weather_columns::ALL.last(), Some(&"RAW_METAR"));
    }

    #[test]
    fn test_name_tables_are_complete() {
        assert!(PERSIAN_NAMES.weekdays.iter().all(|name| !name.is_empty()));
        assert!(PERSIAN_NAMES.months.iter().all(|name| !name.is_empty()));
        assert_eq!(PERSIAN_NAMES.months[0], "فروردین");
        assert_eq!(PERSIAN_NAMES.weekdays[0], "شنبه");
    }
}
