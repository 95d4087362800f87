//! Notice report rendering for chat and console presentation.
//!
//! Reports use light Markdown (`**label:**`) and render validity dates
//! through the calendar converter. A date that cannot be converted turns
//! into a placeholder; it never aborts the report.

use crate::calendar::CalendarConverter;
use crate::constants::{MISSING_FIELD_PLACEHOLDER, NOTICE_SEPARATOR};
use crate::error::{NotamError, Result};
use crate::models::NoticeRecord;
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, warn};

const LOCAL_FROM_LABEL: &str = "از :";
const LOCAL_TO_LABEL: &str = "تا :";
const TRANSLATION_HEADING: &str = "شرح مختصر :";

/// Exactly four ASCII uppercase letters
pub fn is_valid_icao(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// ICAO code to airport name lookup
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    names: BTreeMap<String, String>,
}

impl AirportDirectory {
    /// Load an `ICAO,Name` table. The header row is skipped and rows with
    /// fewer than two columns are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(NotamError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_path(path)?;

        let mut names = BTreeMap::new();
        for record in reader.records() {
            let record = record?;
            if record.len() < 2 {
                continue;
            }
            names.insert(record[0].to_uppercase(), record[1].to_string());
        }

        debug!("Loaded {} airport names from {}", names.len(), path.display());
        Ok(Self { names })
    }

    pub fn insert(&mut self, icao: &str, name: &str) {
        self.names
            .insert(icao.trim().to_uppercase(), name.trim().to_string());
    }

    pub fn name_for(&self, icao: &str) -> String {
        self.names
            .get(icao)
            .cloned()
            .unwrap_or_else(|| format!("Unknown Airport ({})", icao))
    }

    /// Known codes in sorted order
    pub fn icaos(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn or_placeholder(value: &str) -> &str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        MISSING_FIELD_PLACEHOLDER
    } else {
        trimmed
    }
}

fn render_date(converter: &CalendarConverter, token: &str, utc_offset_hours: f64) -> String {
    if token.trim().is_empty() {
        MISSING_FIELD_PLACEHOLDER.to_string()
    } else {
        converter.render_or_placeholder(token, utc_offset_hours)
    }
}

/// Render one notice block, framed by separator lines
pub fn render_notice(
    record: &NoticeRecord,
    converter: &CalendarConverter,
    utc_offset_hours: f64,
) -> String {
    let mut entry = String::new();
    let fields = [
        ("NOTAM No", record.notam_number.as_str()),
        ("Q Code", record.q_code.as_str()),
        ("From", record.effective_from.as_str()),
        ("To", record.effective_to.as_str()),
        ("Schedule", record.schedule.as_str()),
        ("Text", record.text.as_str()),
        ("Lower Limit", record.lower_limit.as_str()),
        ("Upper Limit", record.upper_limit.as_str()),
    ];

    // Writing into a String cannot fail
    let _ = writeln!(entry, "{}", NOTICE_SEPARATOR);
    for (label, value) in fields {
        let _ = writeln!(entry, "**{}:** {}", label, or_placeholder(value));
    }
    let _ = writeln!(entry);
    let _ = writeln!(
        entry,
        "**{}** ({})",
        LOCAL_FROM_LABEL,
        render_date(converter, &record.effective_from, utc_offset_hours)
    );
    let _ = writeln!(
        entry,
        "**{}** ({})",
        LOCAL_TO_LABEL,
        render_date(converter, &record.effective_to, utc_offset_hours)
    );

    if record.has_translation() {
        let _ = write!(
            entry,
            "\n**{}**\n\n{}\n",
            TRANSLATION_HEADING,
            record.translation.trim()
        );
    }

    let _ = writeln!(entry, "{}", NOTICE_SEPARATOR);
    entry
}

/// All notices for one airport, rendered for presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeReport {
    pub icao: String,
    pub airport_name: String,
    pub entries: Vec<String>,
}

impl NoticeReport {
    /// Select rows whose ICAO matches case-insensitively and render them
    pub fn for_airport(
        records: &[NoticeRecord],
        icao: &str,
        directory: &AirportDirectory,
        converter: &CalendarConverter,
        utc_offset_hours: f64,
    ) -> Self {
        let icao = icao.trim().to_uppercase();
        if !is_valid_icao(&icao) {
            warn!("Rendering report for non-standard ICAO code '{}'", icao);
        }

        let entries: Vec<String> = records
            .iter()
            .filter(|record| record.icao.trim().eq_ignore_ascii_case(&icao))
            .map(|record| render_notice(record, converter, utc_offset_hours))
            .collect();

        debug!("Rendered {} notices for {}", entries.len(), icao);

        Self {
            airport_name: directory.name_for(&icao),
            icao,
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return format!("No NOTAMs found for {}.", self.icao);
        }

        format!(
            "**NOTAM(s) for {} ({})**\n\n{}",
            self.airport_name,
            self.icao,
            self.entries.join("\n")
        )
    }

    /// The rendered report split into transport-sized messages
    pub fn messages(&self, max_chars: usize) -> Vec<String> {
        split_message(&self.render(), max_chars)
    }
}

/// Split text into chunks of at most `max_chars` characters.
///
/// Counting is by `char`, so multi-byte text is never cut mid-character.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
