//! Core data structures for NOTAM and METAR processing.
//!
//! Defines the notice and weather records produced by the extractors,
//! the merge key, and the statistics reported by table operations.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Identity of a notice within a canonical table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeKey {
    pub icao: String,
    pub notam_number: String,
}

/// One NOTAM as stored in a notice table.
///
/// Every field defaults to the empty string; extraction only fills the
/// fields whose markers are present in the raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeRecord {
    #[serde(rename = "ICAO")]
    pub icao: String,
    #[serde(rename = "NOTAM No")]
    pub notam_number: String,
    #[serde(rename = "Q Code")]
    pub q_code: String,
    #[serde(rename = "From")]
    pub effective_from: String,
    #[serde(rename = "To")]
    pub effective_to: String,
    #[serde(rename = "Schedule")]
    pub schedule: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Lower Limit")]
    pub lower_limit: String,
    #[serde(rename = "Upper Limit")]
    pub upper_limit: String,
    #[serde(rename = "Created Time")]
    pub created_time: String,
    #[serde(rename = "Farsi")]
    pub translation: String,
}

impl NoticeRecord {
    pub fn key(&self) -> NoticeKey {
        NoticeKey {
            icao: self.icao.clone(),
            notam_number: self.notam_number.clone(),
        }
    }

    pub fn has_translation(&self) -> bool {
        !self.translation.trim().is_empty()
    }

    /// True when a translation collaborator still has to process this notice
    pub fn needs_translation(&self) -> bool {
        !self.has_translation()
    }

    /// Store a translation, refusing blank text.
    ///
    /// Returns false when the value was rejected, leaving any existing
    /// translation in place.
    pub fn set_translation(&mut self, translation: &str) -> bool {
        let trimmed = translation.trim();
        if trimmed.is_empty() {
            warn!(
                "Ignoring empty translation for {} {}",
                self.icao, self.notam_number
            );
            return false;
        }

        self.translation = trimmed.to_string();
        true
    }
}

/// Rows a translation collaborator has yet to fill, in table order
pub fn pending_translations(records: &[NoticeRecord]) -> Vec<&NoticeRecord> {
    records
        .iter()
        .filter(|record| record.needs_translation())
        .collect()
}

/// Sky coverage reported for a cloud layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudCoverage {
    Few,
    Scattered,
    Broken,
    Overcast,
}

impl CloudCoverage {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FEW" => Some(CloudCoverage::Few),
            "SCT" => Some(CloudCoverage::Scattered),
            "BKN" => Some(CloudCoverage::Broken),
            "OVC" => Some(CloudCoverage::Overcast),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CloudCoverage::Few => "FEW",
            CloudCoverage::Scattered => "SCT",
            CloudCoverage::Broken => "BKN",
            CloudCoverage::Overcast => "OVC",
        }
    }
}

/// A cloud layer: coverage plus base height in hundreds of feet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudLayer {
    pub coverage: CloudCoverage,
    pub height_hundreds_ft: u16,
}

impl CloudLayer {
    pub fn height_ft(&self) -> u32 {
        u32::from(self.height_hundreds_ft) * 100
    }
}

impl fmt::Display for CloudLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.coverage.code(), self.height_hundreds_ft)
    }
}

impl Serialize for CloudLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Weather phenomena recognised in METAR text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phenomenon {
    Rain,
    Snow,
    Fog,
    Mist,
    Thunderstorm,
    Haze,
    Drizzle,
}

impl Phenomenon {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "RA" => Some(Phenomenon::Rain),
            "SN" => Some(Phenomenon::Snow),
            "FG" => Some(Phenomenon::Fog),
            "BR" => Some(Phenomenon::Mist),
            "TS" => Some(Phenomenon::Thunderstorm),
            "HZ" => Some(Phenomenon::Haze),
            "DZ" => Some(Phenomenon::Drizzle),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Phenomenon::Rain => "RA",
            Phenomenon::Snow => "SN",
            Phenomenon::Fog => "FG",
            Phenomenon::Mist => "BR",
            Phenomenon::Thunderstorm => "TS",
            Phenomenon::Haze => "HZ",
            Phenomenon::Drizzle => "DZ",
        }
    }
}

/// Intensity qualifier preceding a phenomenon code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intensity {
    Heavy,
    Light,
}

impl Intensity {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "+" => Some(Intensity::Heavy),
            "-" => Some(Intensity::Light),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Intensity::Heavy => "+",
            Intensity::Light => "-",
        }
    }
}

impl Serialize for Intensity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.marker())
    }
}

/// One METAR observation.
///
/// Absent fields are `None` and serialise as empty cells. `raw` always
/// holds the untouched input line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherRecord {
    #[serde(rename = "ICAO")]
    pub icao: Option<String>,
    #[serde(rename = "DateTime")]
    pub observed_at: Option<String>,
    #[serde(rename = "WIND_DIR")]
    pub wind_direction: Option<u16>,
    #[serde(rename = "WIND_SPEED")]
    pub wind_speed_kt: Option<u16>,
    #[serde(rename = "WIND_GUST")]
    pub wind_gust_kt: Option<String>,
    #[serde(rename = "WIND_VAR")]
    pub wind_variable: Option<String>,
    #[serde(rename = "VIS")]
    pub visibility_m: Option<u32>,
    #[serde(rename = "CLOUD1")]
    pub cloud1: Option<CloudLayer>,
    #[serde(rename = "CLOUD2")]
    pub cloud2: Option<CloudLayer>,
    #[serde(rename = "CLOUD3")]
    pub cloud3: Option<CloudLayer>,
    #[serde(rename = "CLOUD4")]
    pub cloud4: Option<CloudLayer>,
    #[serde(rename = "TEMP")]
    pub temperature_c: Option<i32>,
    #[serde(rename = "DEW")]
    pub dew_point_c: Option<i32>,
    #[serde(rename = "HUMIDITY")]
    pub relative_humidity: Option<f64>,
    #[serde(rename = "PRESSURE_HPA")]
    pub pressure_hpa: Option<f64>,
    #[serde(rename = "PRESSURE_INCH")]
    pub pressure_inhg: Option<f64>,
    #[serde(rename = "WX_PHENOMENA", serialize_with = "serialize_phenomena")]
    pub phenomena: Vec<Phenomenon>,
    #[serde(rename = "INTENSITY")]
    pub intensity: Option<Intensity>,
    #[serde(rename = "REMARKS")]
    pub remarks: Option<String>,
    #[serde(rename = "RAW_METAR")]
    pub raw: String,
}

impl WeatherRecord {
    /// Cloud layers in report order
    pub fn clouds(&self) -> impl Iterator<Item = &CloudLayer> {
        [&self.cloud1, &self.cloud2, &self.cloud3, &self.cloud4]
            .into_iter()
            .flatten()
    }

    /// Comma separated phenomenon codes, empty when none were reported
    pub fn phenomena_codes(&self) -> String {
        self.phenomena
            .iter()
            .map(Phenomenon::code)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// A record without an ICAO cannot be keyed by the caller
    pub fn is_keyed(&self) -> bool {
        self.icao.is_some()
    }
}

fn serialize_phenomena<S: Serializer>(
    phenomena: &[Phenomenon],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let joined = phenomena
        .iter()
        .map(Phenomenon::code)
        .collect::<Vec<_>>()
        .join(", ");
    serializer.serialize_str(&joined)
}

/// Statistics reported by a merge run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Rows read from each fresh source, in input order
    pub source_rows: Vec<(PathBuf, usize)>,
    /// Rows read from the pre-existing canonical table
    pub existing_rows: usize,
    /// Rows in the consolidated table
    pub rows_written: usize,
    /// Rows dropped because their key was already present
    pub duplicates_removed: usize,
    /// Keys where a translated row displaced an untranslated one
    pub translations_preserved: usize,
}

impl MergeStats {
    pub fn fresh_rows(&self) -> usize {
        self.source_rows.iter().map(|(_, rows)| rows).sum()
    }

    pub fn total_input_rows(&self) -> usize {
        self.fresh_rows() + self.existing_rows
    }
}
