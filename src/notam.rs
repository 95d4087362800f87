//! NOTAM text field extraction.
//!
//! Raw notices arrive as free-flowing text with ICAO lettered fields
//! (`A)` location, `Q)` qualifier, `B)`/`C)` validity, `D)` schedule,
//! `E)` text, `F)`/`G)` limits). The text is collapsed to a single line,
//! scanned once for `<Letter>)` markers, and each field is the slice
//! between its marker and the next one (or the end of the text).

use crate::models::NoticeRecord;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

static NOTAM_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]\d{4}/\d{2}").expect("valid NOTAM number regex"));

static CREATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"CREATED:\s*(\d{2}\s\w{3}\s\d{4}\s\d{2}:\d{2}:\d{2})")
        .expect("valid creation time regex")
});

static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{10})(?:\s|$)").expect("valid From regex"));

static TO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{10}(?:\sEST)?|PERM)(?:\s|$)").expect("valid To regex")
});

/// Position of a `<Letter>)` marker in the collapsed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    letter: char,
    start: usize,
}

/// Collapse every whitespace run, including newlines, to one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find every uppercase letter immediately followed by `)`.
///
/// Whatever precedes the letter is ignored, so markers glued to the
/// previous token (`NOTAMNQ)`, `E005A)`) are still found. The flip side is
/// that an abbreviation such as `AGL)` inside a value also ends it.
fn scan_markers(text: &str) -> Vec<Marker> {
    text.as_bytes()
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].is_ascii_uppercase() && pair[1] == b')')
        .map(|(start, pair)| Marker {
            letter: pair[0] as char,
            start,
        })
        .collect()
}

/// Slice the text into `letter -> value` using marker positions.
///
/// The first occurrence of each letter wins. Values run to the next marker
/// of any letter, so parentheses inside a value never extend it.
fn split_fields(text: &str) -> HashMap<char, &str> {
    let markers = scan_markers(text);
    let mut fields = HashMap::new();

    for (index, marker) in markers.iter().enumerate() {
        let value_start = marker.start + 2;
        let value_end = markers
            .get(index + 1)
            .map_or(text.len(), |next| next.start);
        let value = if value_start < value_end {
            text[value_start..value_end].trim()
        } else {
            ""
        };
        fields.entry(marker.letter).or_insert(value);
    }

    fields
}

fn first_token(value: &str) -> &str {
    value.split_whitespace().next().unwrap_or("")
}

/// Parses raw NOTAM text into notice records
#[derive(Debug, Clone, Copy, Default)]
pub struct NotamFieldExtractor;

impl NotamFieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a notice, taking ICAO from the `A)` location field
    pub fn extract(&self, raw_text: &str) -> NoticeRecord {
        let text = collapse_whitespace(raw_text);
        let fields = split_fields(&text);

        let mut record = NoticeRecord {
            icao: fields
                .get(&'A')
                .map(|value| first_token(value).to_string())
                .unwrap_or_default(),
            ..Default::default()
        };

        if let Some(number) = NOTAM_NUMBER_RE.find(&text) {
            record.notam_number = number.as_str().to_string();
        }

        for (letter, value) in &fields {
            match letter {
                'Q' => record.q_code = value.to_string(),
                'B' => {
                    if let Some(caps) = FROM_RE.captures(value) {
                        record.effective_from = caps[1].to_string();
                    }
                }
                'C' => {
                    if let Some(caps) = TO_RE.captures(value) {
                        record.effective_to = caps[1].to_string();
                    }
                }
                'D' => record.schedule = value.to_string(),
                'E' => record.text = value.to_string(),
                'F' => record.lower_limit = first_token(value).to_string(),
                'G' => record.upper_limit = first_token(value).to_string(),
                _ => {}
            }
        }

        if let Some(caps) = CREATED_RE.captures(&text) {
            record.created_time = caps[1].to_string();
        }

        debug!(
            "Extracted NOTAM {:?} with {} lettered fields",
            record.notam_number,
            fields.len()
        );

        record
    }

    /// Extract a notice fetched for a known airport; the queried ICAO
    /// replaces whatever the `A)` field carried.
    pub fn extract_for(&self, icao: &str, raw_text: &str) -> NoticeRecord {
        let mut record = self.extract(raw_text);
        record.icao = icao.trim().to_uppercase();
        record
    }
}

/// Split a text file of notices into blocks separated by blank lines
pub fn split_notice_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_NOTICE: &str = "A1234/24 NOTAMN\n\
        Q) OIIX/QMRLC/IV/NBO/A/000/999/3541N05109E005\n\
        A) OIII B) 2403150630 C) 2403201430 EST\n\
        D) DAILY 0630-1430\n\
        E) RWY 11L/29R CLSD DUE TO WIP (PHASE 2).\n\
        F) SFC G) FL100\n\
        CREATED: 14 Mar 2024 10:15:00 SOURCE: OIIIYNYX";

    #[test]
    fn test_extract_all_fields() {
        let record = NotamFieldExtractor::new().extract(FULL_NOTICE);

        assert_eq!(record.icao, "OIII");
        assert_eq!(record.notam_number, "A1234/24");
        assert_eq!(record.q_code, "OIIX/QMRLC/IV/NBO/A/000/999/3541N05109E005");
        assert_eq!(record.effective_from, "2403150630");
        assert_eq!(record.effective_to, "2403201430 EST");
        assert_eq!(record.schedule, "DAILY 0630-1430");
        assert_eq!(record.text, "RWY 11L/29R CLSD DUE TO WIP (PHASE 2).");
        assert_eq!(record.lower_limit, "SFC");
        assert_eq!(record.upper_limit, "FL100");
        assert_eq!(record.created_time, "14 Mar 2024 10:15:00");
        assert_eq!(record.translation, "");
    }

    #[test]
    fn test_missing_markers_leave_fields_empty() {
        let record = NotamFieldExtractor::new()
            .extract("B0456/24 NOTAMN Q) OIIX/QFALC A) OIMM B) 2404010000 C) PERM E) AD CLSD");

        assert_eq!(record.notam_number, "B0456/24");
        assert_eq!(record.effective_to, "PERM");
        assert_eq!(record.text, "AD CLSD");
        assert_eq!(record.schedule, "");
        assert_eq!(record.lower_limit, "");
        assert_eq!(record.upper_limit, "");
        assert_eq!(record.created_time, "");
    }

    #[test]
    fn test_no_notam_number_does_not_abort() {
        let record = NotamFieldExtractor::new().extract("E) TWY A CLSD F) GND G) UNL");

        assert_eq!(record.notam_number, "");
        assert_eq!(record.text, "TWY A CLSD");
        assert_eq!(record.lower_limit, "GND");
        assert_eq!(record.upper_limit, "UNL");
    }

    #[test]
    fn test_value_stops_at_next_marker_despite_punctuation() {
        let record =
            NotamFieldExtractor::new().extract("E) OBST (CRANE, 45M, LGTD). F) SFC");
        assert_eq!(record.text, "OBST (CRANE, 45M, LGTD).");
        assert_eq!(record.lower_limit, "SFC");

        // A lone letter before ')' is a marker and ends the value
        let record = NotamFieldExtractor::new().extract("E) SEE ANNEX B) FOR DETAILS");
        assert_eq!(record.text, "SEE ANNEX");
    }

    #[test]
    fn test_letter_closing_a_word_is_a_marker() {
        // `L)` of `AGL)` ends the text just like any other marker
        let record =
            NotamFieldExtractor::new().extract("E) OBST (CRANE, 45M AGL) ERECTED. F) SFC");
        assert_eq!(record.text, "OBST (CRANE, 45M AG");
        assert_eq!(record.lower_limit, "SFC");
    }

    #[test]
    fn test_marker_glued_to_previous_word_is_found() {
        // Scraped pages concatenate tags without a separator
        let record = NotamFieldExtractor::new()
            .extract("A1234/24 NOTAMNQ) OIIX/QMRLC A) OIII B) 2503202200 E) RWY CLSD");
        assert_eq!(record.notam_number, "A1234/24");
        assert_eq!(record.q_code, "OIIX/QMRLC");
        assert_eq!(record.icao, "OIII");
        assert_eq!(record.effective_from, "2503202200");
        assert_eq!(record.text, "RWY CLSD");
    }

    #[test]
    fn test_from_requires_ten_digits() {
        let extractor = NotamFieldExtractor::new();
        assert_eq!(extractor.extract("B) 240315063000 C) PERM").effective_from, "");
        assert_eq!(extractor.extract("B) 24031506 C) PERM").effective_from, "");
        assert_eq!(extractor.extract("B) 2403150630").effective_from, "2403150630");
    }

    #[test]
    fn test_to_without_suffix() {
        let record = NotamFieldExtractor::new().extract("C) 2412312359 E) TEXT");
        assert_eq!(record.effective_to, "2412312359");
    }

    #[test]
    fn test_extract_for_overrides_location() {
        let text = FULL_NOTICE.replace("A) OIII", "A) OIIX");
        let record = NotamFieldExtractor::new().extract_for(" oiii ", &text);
        assert_eq!(record.icao, "OIII");
    }

    #[test]
    fn test_marker_at_end_of_text() {
        let record = NotamFieldExtractor::new().extract("E) RWY CLSD G)");
        assert_eq!(record.text, "RWY CLSD");
        assert_eq!(record.upper_limit, "");
    }

    #[test]
    fn test_markers_glued_to_digits_are_found() {
        let record = NotamFieldExtractor::new()
            .extract("Q) OIIX/QMRLC/IV/NBO/A/000/999/3541N05109E005A) OIII");
        assert_eq!(record.q_code, "OIIX/QMRLC/IV/NBO/A/000/999/3541N05109E005");
        assert_eq!(record.icao, "OIII");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  A)\tOIII\n\nB)  2401010000 "),
            "A) OIII B) 2401010000"
        );
    }

    #[test]
    fn test_split_notice_blocks() {
        let content = "A0001/24\nE) ONE\n\n\n  \nA0002/24\nE) TWO\n";
        let blocks = split_notice_blocks(content);
        assert_eq!(blocks, vec!["A0001/24\nE) ONE", "A0002/24\nE) TWO"]);
    }
}
