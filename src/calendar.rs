//! Compact timestamp to Persian (Solar Hijri) calendar rendering.
//!
//! NOTAM validity fields carry `YYMMDDhhmm[ss]` tokens in UTC, optionally
//! followed by a suffix such as `EST`, or the literal `PERM`. The converter
//! shifts them to local time and renders weekday, day, month and year in
//! the Solar Hijri calendar with localised names.

use crate::constants::{
    CalendarNames, ESTIMATED_SUFFIX, INVALID_DATE_PLACEHOLDER, PERMANENT_TOKEN, PERSIAN_NAMES,
    YEAR_PIVOT,
};
use crate::error::{NotamError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use std::fmt;
use tracing::debug;

/// A date in the Solar Hijri calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JalaliDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl JalaliDate {
    /// Convert a Gregorian date using the 33-year arithmetic cycle
    pub fn from_gregorian(date: NaiveDate) -> Self {
        const CUMULATIVE_DAYS: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

        let gy = i64::from(date.year());
        let gm = date.month() as usize;
        let gd = i64::from(date.day());

        let gy2 = if gm > 2 { gy + 1 } else { gy };
        let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
            + gd
            + CUMULATIVE_DAYS[gm - 1];

        let mut year = -1595 + 33 * (days / 12_053);
        days %= 12_053;
        year += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            year += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let (month, day) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year: year as i32,
            month: month as u32,
            day: day as u32,
        }
    }
}

/// A localised rendering of a compact timestamp.
///
/// Not persisted; produced on demand and formatted through `Display`.
#[derive(Debug, Clone)]
pub enum LocalizedDate {
    Permanent {
        names: &'static CalendarNames,
    },
    At {
        names: &'static CalendarNames,
        local: NaiveDateTime,
        date: JalaliDate,
        /// Index into the weekday table, Saturday = 0
        weekday: usize,
        estimated: bool,
    },
}

impl LocalizedDate {
    pub fn is_permanent(&self) -> bool {
        matches!(self, LocalizedDate::Permanent { .. })
    }

    pub fn jalali(&self) -> Option<JalaliDate> {
        match self {
            LocalizedDate::Permanent { .. } => None,
            LocalizedDate::At { date, .. } => Some(*date),
        }
    }

    pub fn local_time(&self) -> Option<NaiveDateTime> {
        match self {
            LocalizedDate::Permanent { .. } => None,
            LocalizedDate::At { local, .. } => Some(*local),
        }
    }
}

impl fmt::Display for LocalizedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalizedDate::Permanent { names } => f.write_str(names.permanent),
            LocalizedDate::At {
                names,
                local,
                date,
                weekday,
                estimated,
            } => {
                write!(
                    f,
                    "{} {} {} ({}) {} {} {:02}:{:02}:{:02} {}",
                    names.weekdays[*weekday],
                    date.day,
                    names.months[(date.month - 1) as usize],
                    date.month,
                    date.year,
                    names.time_label,
                    local.hour(),
                    local.minute(),
                    local.second(),
                    names.local_label,
                )?;
                if *estimated {
                    f.write_str(names.estimated_suffix)?;
                }
                Ok(())
            }
        }
    }
}

/// Converts compact timestamps into localised calendar dates
#[derive(Debug, Clone, Copy)]
pub struct CalendarConverter {
    names: &'static CalendarNames,
}

impl Default for CalendarConverter {
    fn default() -> Self {
        Self::new(&PERSIAN_NAMES)
    }
}

impl CalendarConverter {
    pub fn new(names: &'static CalendarNames) -> Self {
        Self { names }
    }

    /// Convert a compact validity token to a local calendar date
    ///
    /// `PERM` maps straight to the permanent marker. Otherwise the token is
    /// `YYMMDDhhmm` or `YYMMDDhhmmss`, optionally followed by a space and a
    /// suffix; only `EST` adds the estimated qualifier.
    ///
    /// # Arguments
    ///
    /// * `token` - Compact timestamp as found in the B) or C) field
    /// * `utc_offset_hours` - Hours added to UTC, fractions allowed
    ///
    /// # Returns
    ///
    /// The localized date, or `InvalidTimestamp`/`InvalidDate` for tokens
    /// that cannot be read as a date
    pub fn convert(&self, token: &str, utc_offset_hours: f64) -> Result<LocalizedDate> {
        let token = token.trim().to_uppercase();

        if token == PERMANENT_TOKEN {
            return Ok(LocalizedDate::Permanent { names: self.names });
        }

        let (date_part, suffix) = match token.split_once(char::is_whitespace) {
            Some((date_part, suffix)) => (date_part, suffix.trim()),
            None => (token.as_str(), ""),
        };

        let utc = parse_compact_timestamp(date_part)?;
        let local = apply_offset(utc, utc_offset_hours, &token)?;

        debug!("Converted compact timestamp {} to local {}", token, local);

        Ok(self.localize(local, suffix == ESTIMATED_SUFFIX))
    }

    /// Render an arbitrary instant, e.g. the current time
    pub fn convert_instant(
        &self,
        instant: DateTime<Utc>,
        utc_offset_hours: f64,
    ) -> Result<LocalizedDate> {
        let local = apply_offset(instant.naive_utc(), utc_offset_hours, &instant.to_rfc3339())?;
        Ok(self.localize(local, false))
    }

    /// Convert and format, substituting the invalid-date placeholder on failure
    pub fn render_or_placeholder(&self, token: &str, utc_offset_hours: f64) -> String {
        match self.convert(token, utc_offset_hours) {
            Ok(date) => date.to_string(),
            Err(e) => {
                debug!("Rendering placeholder for '{}': {}", token, e);
                INVALID_DATE_PLACEHOLDER.to_string()
            }
        }
    }

    fn localize(&self, local: NaiveDateTime, estimated: bool) -> LocalizedDate {
        LocalizedDate::At {
            names: self.names,
            local,
            date: JalaliDate::from_gregorian(local.date()),
            weekday: saturday_based_weekday(local.date()),
            estimated,
        }
    }
}

/// Persian week starts on Saturday: Saturday = 0 .. Friday = 6
fn saturday_based_weekday(date: NaiveDate) -> usize {
    (date.weekday().num_days_from_monday() as usize + 2) % 7
}

/// Convert a compact token to a formatted local date string
pub fn to_local_calendar(token: &str, utc_offset_hours: f64) -> Result<String> {
    CalendarConverter::default()
        .convert(token, utc_offset_hours)
        .map(|date| date.to_string())
}

/// Parse `YYMMDDhhmm` or `YYMMDDhhmmss` into a UTC civil date/time
pub fn parse_compact_timestamp(date_part: &str) -> Result<NaiveDateTime> {
    let invalid = || NotamError::InvalidTimestamp {
        token: date_part.to_string(),
    };

    if !matches!(date_part.len(), 10 | 12) || !date_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let field = |start: usize| -> u32 {
        // Digits were checked above, so every two-byte slice parses.
        date_part[start..start + 2].parse().unwrap_or_default()
    };

    let year = expand_two_digit_year(field(0));
    let second = if date_part.len() == 12 { field(10) } else { 0 };

    NaiveDate::from_ymd_opt(year, field(2), field(4))
        .and_then(|date| date.and_hms_opt(field(6), field(8), second))
        .ok_or_else(|| NotamError::InvalidDate {
            token: date_part.to_string(),
            reason: "month, day or time out of range".to_string(),
        })
}

/// Two-digit years below the pivot are 20xx, the rest 19xx
pub fn expand_two_digit_year(year: u32) -> i32 {
    if year < YEAR_PIVOT {
        2000 + year as i32
    } else {
        1900 + year as i32
    }
}

fn apply_offset(utc: NaiveDateTime, utc_offset_hours: f64, token: &str) -> Result<NaiveDateTime> {
    let out_of_range = || NotamError::InvalidDate {
        token: token.to_string(),
        reason: format!("UTC offset {} hours is out of range", utc_offset_hours),
    };

    if !utc_offset_hours.is_finite() {
        return Err(out_of_range());
    }

    let offset = TimeDelta::try_seconds((utc_offset_hours * 3600.0).round() as i64)
        .ok_or_else(out_of_range)?;
    utc.checked_add_signed(offset).ok_or_else(out_of_range)
}
