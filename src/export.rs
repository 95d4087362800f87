//! Parquet export of METAR observations.
//!
//! Builds one typed column per weather field, keeping absent values as nulls,
//! and writes a Snappy-compressed Parquet file.

use crate::constants::weather_columns;
use crate::error::Result;
use crate::models::{CloudLayer, WeatherRecord};
use polars::prelude::{Column, DataFrame, ParquetCompression, ParquetWriter};
use std::fs::File;
use std::path::Path;
use tracing::debug;

fn string_column<F>(name: &str, records: &[WeatherRecord], extractor: F) -> Column
where
    F: Fn(&WeatherRecord) -> Option<String>,
{
    let values: Vec<Option<String>> = records.iter().map(extractor).collect();
    Column::new(name.into(), values)
}

fn int_column<F>(name: &str, records: &[WeatherRecord], extractor: F) -> Column
where
    F: Fn(&WeatherRecord) -> Option<i32>,
{
    let values: Vec<Option<i32>> = records.iter().map(extractor).collect();
    Column::new(name.into(), values)
}

fn float_column<F>(name: &str, records: &[WeatherRecord], extractor: F) -> Column
where
    F: Fn(&WeatherRecord) -> Option<f64>,
{
    let values: Vec<Option<f64>> = records.iter().map(extractor).collect();
    Column::new(name.into(), values)
}

fn cloud_text(layer: &Option<CloudLayer>) -> Option<String> {
    layer.as_ref().map(ToString::to_string)
}

/// Convert observations into a frame with the weather table's column order
pub fn weather_frame(records: &[WeatherRecord]) -> Result<DataFrame> {
    use weather_columns::*;

    let columns = vec![
        string_column(ICAO, records, |r| r.icao.clone()),
        string_column(DATE_TIME, records, |r| r.observed_at.clone()),
        int_column(WIND_DIR, records, |r| r.wind_direction.map(i32::from)),
        int_column(WIND_SPEED, records, |r| r.wind_speed_kt.map(i32::from)),
        string_column(WIND_GUST, records, |r| r.wind_gust_kt.clone()),
        string_column(WIND_VAR, records, |r| r.wind_variable.clone()),
        int_column(VIS, records, |r| {
            r.visibility_m.and_then(|meters| i32::try_from(meters).ok())
        }),
        string_column(CLOUD1, records, |r| cloud_text(&r.cloud1)),
        string_column(CLOUD2, records, |r| cloud_text(&r.cloud2)),
        string_column(CLOUD3, records, |r| cloud_text(&r.cloud3)),
        string_column(CLOUD4, records, |r| cloud_text(&r.cloud4)),
        int_column(TEMP, records, |r| r.temperature_c),
        int_column(DEW, records, |r| r.dew_point_c),
        float_column(HUMIDITY, records, |r| r.relative_humidity),
        float_column(PRESSURE_HPA, records, |r| r.pressure_hpa),
        float_column(PRESSURE_INCH, records, |r| r.pressure_inhg),
        string_column(WX_PHENOMENA, records, |r| {
            Some(r.phenomena_codes()).filter(|codes| !codes.is_empty())
        }),
        string_column(INTENSITY, records, |r| {
            r.intensity.map(|intensity| intensity.marker().to_string())
        }),
        string_column(REMARKS, records, |r| r.remarks.clone()),
        string_column(RAW_METAR, records, |r| Some(r.raw.clone())),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Write observations to a Snappy-compressed Parquet file
pub fn write_weather_parquet(path: &Path, records: &[WeatherRecord]) -> Result<u64> {
    let mut frame = weather_frame(records)?;
    let file = File::create(path)?;
    let bytes = ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(&mut frame)?;

    debug!(
        "Wrote {} METAR rows ({} bytes) to {}",
        frame.height(),
        bytes,
        path.display()
    );
    Ok(bytes)
}
