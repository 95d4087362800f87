//! CSV table input and output.
//!
//! Tables are mapped by header name, so column order in an input file does
//! not matter. Output always uses the fixed column order from
//! [`crate::constants`], and the header row is written even for empty tables.

use crate::constants::{notice_columns, weather_columns};
use crate::error::{NotamError, Result};
use crate::models::{NoticeRecord, WeatherRecord};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Columns from `required` that the header row does not carry
pub fn missing_columns(headers: &StringRecord, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|column| !headers.iter().any(|header| header == **column))
        .map(|column| column.to_string())
        .collect()
}

/// Read only the header row and fail if any notice column is absent
pub fn validate_notice_table(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(NotamError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_path(path)?;
    let missing = missing_columns(reader.headers()?, notice_columns::ALL);
    if !missing.is_empty() {
        return Err(NotamError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    Ok(())
}

/// Load a notice table, rejecting it if any required column is missing.
///
/// Columns beyond the notice schema are ignored.
pub fn read_notice_table(path: &Path) -> Result<Vec<NoticeRecord>> {
    validate_notice_table(path)?;

    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_path(path)?;
    let records = reader
        .deserialize::<NoticeRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    debug!("Read {} notices from {}", records.len(), path.display());
    Ok(records)
}

/// Resolve a command-line ICAO argument.
///
/// An existing file is read as a CSV with an `ICAO` column; anything else
/// is taken as a single code.
pub fn load_icao_list(path_or_code: &str) -> Result<Vec<String>> {
    let path = Path::new(path_or_code);
    if !path.is_file() {
        return Ok(vec![path_or_code.trim().to_uppercase()]);
    }

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
    let missing = missing_columns(reader.headers()?, &[notice_columns::ICAO]);
    if !missing.is_empty() {
        return Err(NotamError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut codes = Vec::new();
    for record in reader.deserialize::<IcaoRow>() {
        let code = record?.icao.to_uppercase();
        if !code.is_empty() {
            codes.push(code);
        }
    }

    debug!("Loaded {} ICAO codes from {}", codes.len(), path.display());
    Ok(codes)
}

#[derive(Debug, Deserialize)]
struct IcaoRow {
    #[serde(rename = "ICAO")]
    icao: String,
}

fn write_rows<W: Write, T: Serialize>(sink: W, columns: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);
    writer.write_record(columns)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write notices in canonical column order to any sink
pub fn write_notices<W: Write>(sink: W, records: &[NoticeRecord]) -> Result<()> {
    write_rows(sink, notice_columns::ALL, records)
}

pub fn write_notice_table(path: &Path, records: &[NoticeRecord]) -> Result<()> {
    write_notices(File::create(path)?, records)?;
    debug!("Wrote {} notices to {}", records.len(), path.display());
    Ok(())
}

/// Write observations as a CSV table, one row per report
pub fn write_weather_table(path: &Path, records: &[WeatherRecord]) -> Result<()> {
    write_rows(File::create(path)?, weather_columns::ALL, records)?;
    debug!("Wrote {} METAR rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metar::MetarFieldExtractor;
    use std::fs;
    use tempfile::TempDir;

    fn notice(icao: &str, number: &str, translation: &str) -> NoticeRecord {
        NoticeRecord {
            icao: icao.to_string(),
            notam_number: number.to_string(),
            text: "RWY 11L/29R CLSD, WIP".to_string(),
            translation: translation.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_notice_table_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notam_data.csv");
        let records = vec![notice("OIII", "A0001/24", ""), notice("OIMM", "B0002/24", "بسته")];

        write_notice_table(&path, &records).unwrap();
        let loaded = read_notice_table(&path).unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");

        write_notice_table(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("ICAO,NOTAM No,Q Code,From,To"));
        assert!(read_notice_table(&path).unwrap().is_empty());
    }

    #[test]
    fn test_columns_are_mapped_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reordered.csv");
        fs::write(
            &path,
            "Farsi,Text,ICAO,NOTAM No,Q Code,From,To,Schedule,Lower Limit,Upper Limit,Created Time,Extra\n\
             ترجمه,AD CLSD,OIII,A0001/24,,2401010000,PERM,,,,,ignored\n",
        )
        .unwrap();

        let loaded = read_notice_table(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].icao, "OIII");
        assert_eq!(loaded[0].translation, "ترجمه");
        assert_eq!(loaded[0].effective_to, "PERM");
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.csv");
        fs::write(&path, "ICAO,Text\nOIII,AD CLSD\n").unwrap();

        match read_notice_table(&path) {
            Err(NotamError::MissingColumns { missing, .. }) => {
                assert!(missing.contains(&"NOTAM No".to_string()));
                assert!(missing.contains(&"Farsi".to_string()));
                assert!(!missing.contains(&"ICAO".to_string()));
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = read_notice_table(&temp_dir.path().join("absent.csv"));
        assert!(matches!(result, Err(NotamError::InputNotFound { .. })));
    }

    #[test]
    fn test_load_icao_list_from_file_or_code() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("IRAN_AIRPORTS.csv");
        fs::write(&path, "ICAO,Name\noiii,Mehrabad\n,Blank\nOIMM,Mashhad\n").unwrap();

        let codes = load_icao_list(path.to_str().unwrap()).unwrap();
        assert_eq!(codes, vec!["OIII", "OIMM"]);

        assert_eq!(load_icao_list(" oikb ").unwrap(), vec!["OIKB"]);
    }

    #[test]
    fn test_weather_table_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("METAR_data.csv");
        let record = MetarFieldExtractor::new()
            .parse("METAR OIII 151030Z 24015G25KT 10SM FEW030 M05/M10 A2992 -RA BR RMK AO2");

        write_weather_table(&path, &[record]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(weather_columns::ALL.join(",").as_str()));

        let row = lines.next().unwrap();
        assert!(row.starts_with("OIII,151030,240,15,25,,16090,FEW030,,,,-5,-10,"));
        assert!(row.contains(",1013.2,29.92,\"RA, BR\",-,AO2,"));
    }
}
