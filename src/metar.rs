//! METAR observation parsing.
//!
//! Each field is located independently with its own pattern, so a report
//! missing one group still yields every other group it carries.

use crate::constants::{HPA_PER_INHG, MAX_CLOUD_LAYERS, METERS_PER_STATUTE_MILE, magnus};
use crate::models::{CloudCoverage, CloudLayer, Intensity, Phenomenon, WeatherRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static STATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:METAR|SPECI)\s([A-Z]{4})").expect("valid station regex")
});

static OBSERVATION_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(\d{6})Z").expect("valid observation time regex"));

static WIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3})(\d{2})(?:G(\d{2}))?KT").expect("valid wind regex"));

static VARIABLE_WIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{3}V\d{3})").expect("valid variable wind regex"));

static VISIBILITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,4})SM").expect("valid visibility regex"));

static CLOUD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(FEW|SCT|BKN|OVC)(\d{3})").expect("valid cloud regex"));

static TEMPERATURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(M?\d{2})/(M?\d{2})").expect("valid temperature regex"));

static ALTIMETER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"A(\d{4})").expect("valid altimeter regex"));

static PHENOMENON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([+-])?(RA|SN|FG|BR|TS|HZ|DZ)").expect("valid phenomenon regex")
});

static REMARKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RMK\s(.+)$").expect("valid remarks regex"));

/// Relative humidity in percent from temperature and dew point (Magnus),
/// rounded to one decimal.
pub fn relative_humidity(temperature_c: i32, dew_point_c: i32) -> f64 {
    let saturation = |celsius: f64| {
        magnus::BASE_HPA * ((magnus::A * celsius) / (celsius + magnus::B_CELSIUS)).exp()
    };
    let humidity =
        100.0 * saturation(f64::from(dew_point_c)) / saturation(f64::from(temperature_c));
    round_one_decimal(humidity)
}

/// Convert a four digit altimeter group (`2992`) to `(hPa, inHg)`
pub fn altimeter_to_pressure(hundredths_inhg: u16) -> (f64, f64) {
    let inhg = f64::from(hundredths_inhg) / 100.0;
    (round_one_decimal(inhg * HPA_PER_INHG), inhg)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `M05` is minus five
fn parse_signed_celsius(group: &str) -> Option<i32> {
    match group.strip_prefix('M') {
        Some(magnitude) => magnitude.parse::<i32>().ok().map(|value| -value),
        None => group.parse().ok(),
    }
}

/// Parses raw METAR lines into weather records
#[derive(Debug, Clone, Copy, Default)]
pub struct MetarFieldExtractor;

impl MetarFieldExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw_metar: &str) -> WeatherRecord {
        let mut record = WeatherRecord {
            raw: raw_metar.to_string(),
            ..Default::default()
        };

        record.icao = STATION_RE
            .captures(raw_metar)
            .map(|caps| caps[1].to_string());

        record.observed_at = OBSERVATION_TIME_RE
            .captures(raw_metar)
            .map(|caps| caps[1].to_string());

        if let Some(caps) = WIND_RE.captures(raw_metar) {
            record.wind_direction = caps[1].parse().ok();
            record.wind_speed_kt = caps[2].parse().ok();
            record.wind_gust_kt = caps.get(3).map(|gust| gust.as_str().to_string());
        }

        record.wind_variable = VARIABLE_WIND_RE
            .captures(raw_metar)
            .map(|caps| caps[1].to_string());

        record.visibility_m = VISIBILITY_RE
            .captures(raw_metar)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .map(|miles| miles * METERS_PER_STATUTE_MILE);

        let mut layers = CLOUD_RE
            .captures_iter(raw_metar)
            .filter_map(|caps| {
                Some(CloudLayer {
                    coverage: CloudCoverage::from_code(&caps[1])?,
                    height_hundreds_ft: caps[2].parse().ok()?,
                })
            })
            .take(MAX_CLOUD_LAYERS);
        record.cloud1 = layers.next();
        record.cloud2 = layers.next();
        record.cloud3 = layers.next();
        record.cloud4 = layers.next();

        if let Some(caps) = TEMPERATURE_RE.captures(raw_metar) {
            record.temperature_c = parse_signed_celsius(&caps[1]);
            record.dew_point_c = parse_signed_celsius(&caps[2]);
        }

        // Zero degrees is a valid reading
        if let (Some(temperature), Some(dew_point)) = (record.temperature_c, record.dew_point_c) {
            record.relative_humidity = Some(relative_humidity(temperature, dew_point));
        }

        if let Some(group) = ALTIMETER_RE
            .captures(raw_metar)
            .and_then(|caps| caps[1].parse::<u16>().ok())
        {
            let (hpa, inhg) = altimeter_to_pressure(group);
            record.pressure_hpa = Some(hpa);
            record.pressure_inhg = Some(inhg);
        }

        for (index, caps) in PHENOMENON_RE.captures_iter(raw_metar).enumerate() {
            if let Some(phenomenon) = Phenomenon::from_code(&caps[2]) {
                record.phenomena.push(phenomenon);
            }
            // Only the first phenomenon carries the reported intensity
            if index == 0 {
                record.intensity = caps
                    .get(1)
                    .and_then(|marker| Intensity::from_marker(marker.as_str()));
            }
        }

        record.remarks = REMARKS_RE
            .captures(raw_metar)
            .map(|caps| caps[1].to_string());

        debug!(
            "Parsed METAR for {:?}: {} cloud layers, {} phenomena",
            record.icao,
            record.clouds().count(),
            record.phenomena.len()
        );

        record
    }

    /// Parse every non-blank line; with `latest_only` only the last one.
    pub fn parse_lines(&self, content: &str, latest_only: bool) -> Vec<WeatherRecord> {
        let lines: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        let selected = if latest_only {
            lines.last().map_or(&[][..], std::slice::from_ref)
        } else {
            &lines[..]
        };

        selected
            .iter()
            .map(|line| {
                let record = self.parse(line);
                if !record.is_keyed() {
                    warn!("METAR line has no station identifier: {}", line);
                }
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_METAR: &str = "METAR OIII 151030Z 24015G25KT 200V280 10SM FEW030 SCT100 BKN200 \
        OVC250 BKN300 M05/M10 A2992 -RA BR RMK AO2 SLP132";

    #[test]
    fn test_parse_full_report() {
        let record = MetarFieldExtractor::new().parse(FULL_METAR);

        assert_eq!(record.icao.as_deref(), Some("OIII"));
        assert_eq!(record.observed_at.as_deref(), Some("151030"));
        assert_eq!(record.wind_direction, Some(240));
        assert_eq!(record.wind_speed_kt, Some(15));
        assert_eq!(record.wind_gust_kt.as_deref(), Some("25"));
        assert_eq!(record.wind_variable.as_deref(), Some("200V280"));
        assert_eq!(record.visibility_m, Some(16090));
        assert_eq!(record.temperature_c, Some(-5));
        assert_eq!(record.dew_point_c, Some(-10));
        assert_eq!(record.pressure_inhg, Some(29.92));
        assert_eq!(record.pressure_hpa, Some(1013.2));
        assert_eq!(record.phenomena, vec![Phenomenon::Rain, Phenomenon::Mist]);
        assert_eq!(record.phenomena_codes(), "RA, BR");
        assert_eq!(record.intensity, Some(Intensity::Light));
        assert_eq!(record.remarks.as_deref(), Some("AO2 SLP132"));
        assert_eq!(record.raw, FULL_METAR);
    }

    #[test]
    fn test_only_four_cloud_layers_kept() {
        let record = MetarFieldExtractor::new().parse(FULL_METAR);
        let layers: Vec<String> = record.clouds().map(ToString::to_string).collect();
        assert_eq!(layers, vec!["FEW030", "SCT100", "BKN200", "OVC250"]);
    }

    #[test]
    fn test_humidity_below_freezing_is_a_percentage() {
        let record = MetarFieldExtractor::new().parse(FULL_METAR);
        let humidity = record.relative_humidity.expect("humidity computed");
        assert!(humidity > 60.0 && humidity < 75.0, "humidity {humidity}");
    }

    #[test]
    fn test_zero_degree_readings_still_yield_humidity() {
        let record =
            MetarFieldExtractor::new().parse("METAR OIMM 020000Z 00000KT 5SM BR 00/00 A3001");

        assert_eq!(record.temperature_c, Some(0));
        assert_eq!(record.dew_point_c, Some(0));
        assert_eq!(record.relative_humidity, Some(100.0));
        assert_eq!(record.wind_direction, Some(0));
        assert_eq!(record.wind_gust_kt, None);
        assert_eq!(record.visibility_m, Some(8045));
        assert_eq!(record.pressure_inhg, Some(30.01));
        assert_eq!(record.pressure_hpa, Some(1016.3));
        assert_eq!(record.intensity, None);
    }

    #[test]
    fn test_missing_groups_stay_empty() {
        let record = MetarFieldExtractor::new().parse("METAR OIKB 151000Z 09008KT");

        assert_eq!(record.icao.as_deref(), Some("OIKB"));
        assert_eq!(record.wind_speed_kt, Some(8));
        assert_eq!(record.visibility_m, None);
        assert_eq!(record.cloud1, None);
        assert_eq!(record.temperature_c, None);
        assert_eq!(record.relative_humidity, None);
        assert_eq!(record.pressure_hpa, None);
        assert!(record.phenomena.is_empty());
        assert_eq!(record.remarks, None);
    }

    #[test]
    fn test_missing_station_is_unkeyed() {
        let record = MetarFieldExtractor::new().parse("OIII 151030Z 24015KT");
        assert!(!record.is_keyed());
        assert_eq!(record.wind_direction, Some(240));
    }

    #[test]
    fn test_speci_reports_are_keyed() {
        let record = MetarFieldExtractor::new().parse("SPECI OISS 151045Z 27030G45KT +TS");
        assert_eq!(record.icao.as_deref(), Some("OISS"));
        assert_eq!(record.intensity, Some(Intensity::Heavy));
        assert_eq!(record.phenomena, vec![Phenomenon::Thunderstorm]);
    }

    #[test]
    fn test_intensity_comes_from_first_phenomenon_only() {
        let record = MetarFieldExtractor::new().parse("METAR OIII 151030Z BR -RA");
        assert_eq!(record.phenomena, vec![Phenomenon::Mist, Phenomenon::Rain]);
        assert_eq!(record.intensity, None);
    }

    #[test]
    fn test_parse_lines_latest_only() {
        let content = "METAR OIII 151000Z 24010KT\n\nMETAR OIII 151030Z 25012KT\n";
        let extractor = MetarFieldExtractor::new();

        assert_eq!(extractor.parse_lines(content, false).len(), 2);

        let latest = extractor.parse_lines(content, true);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].observed_at.as_deref(), Some("151030"));
        assert!(extractor.parse_lines("   \n", true).is_empty());
    }

    #[test]
    fn test_parse_lines_keeps_raw_line_verbatim() {
        let content = "  METAR OIII 151000Z 24010KT 5SM  \n\t\n";
        let records = MetarFieldExtractor::new().parse_lines(content, false);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].raw, "  METAR OIII 151000Z 24010KT 5SM  ");
        assert_eq!(records[0].icao.as_deref(), Some("OIII"));
        assert_eq!(records[0].observed_at.as_deref(), Some("151000"));
    }

    #[test]
    fn test_relative_humidity_saturated_air() {
        assert_eq!(relative_humidity(20, 20), 100.0);
        assert!(relative_humidity(30, 10) < 40.0);
    }
}
