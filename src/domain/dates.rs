// src/domain/dates.rs

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A date with year/month/day only. Pickup dates never carry a time of day.
pub type CalendarDay = NaiveDate;

/// The store's wrapped timestamp: whole seconds since the Unix epoch plus
/// a sub-second remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

/// Every shape a last-pickup date arrives in, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    Absent,
    Timestamp(Timestamp),
    /// `YYYY-MM-DD` from forms, or an RFC 3339 timestamp from older rows.
    Text(String),
    Instant(DateTime<FixedOffset>),
    Day(CalendarDay),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {input:?}")]
pub struct InvalidDate {
    pub input: String,
}

impl InvalidDate {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// The zone used to decide which calendar day an instant falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayZone {
    Local,
    Fixed(FixedOffset),
}

impl DayZone {
    pub fn utc() -> Self {
        DayZone::Fixed(Utc.fix())
    }

    pub fn today(&self) -> CalendarDay {
        self.day_of(&Utc::now())
    }

    pub fn day_of<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> CalendarDay {
        match self {
            DayZone::Local => instant.with_timezone(&Local).date_naive(),
            DayZone::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// First instant of `day` in this zone.
    pub fn start_of_day(&self, day: CalendarDay) -> DateTime<Utc> {
        match self {
            DayZone::Local => first_instant(&Local, day),
            DayZone::Fixed(offset) => first_instant(offset, day),
        }
    }
}

// Midnight can be skipped by a DST jump in some zones; take the first hour that exists.
fn first_instant<Tz: TimeZone>(tz: &Tz, day: CalendarDay) -> DateTime<Utc> {
    (0..24)
        .find_map(|hour| {
            let local = day.and_hms_opt(hour, 0, 0)?;
            tz.from_local_datetime(&local).earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN).and_utc())
}

/// Convert any supported date shape into a calendar day in `zone`.
///
/// `Absent` is `Ok(None)`. Strings in `YYYY-MM-DD` form are taken as that
/// day without any zone conversion; timestamps and RFC 3339 strings are
/// converted to the day they fall on in `zone`.
pub fn normalize_in(input: &DateInput, zone: &DayZone) -> Result<Option<CalendarDay>, InvalidDate> {
    match input {
        DateInput::Absent => Ok(None),
        DateInput::Day(day) => Ok(Some(*day)),
        DateInput::Instant(instant) => Ok(Some(zone.day_of(instant))),
        DateInput::Timestamp(ts) => {
            let millis = ts
                .seconds
                .checked_mul(1000)
                .and_then(|ms| ms.checked_add(i64::from(ts.nanos / 1_000_000)))
                .ok_or_else(|| InvalidDate::new(format!("{}s", ts.seconds)))?;

            let instant = DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| InvalidDate::new(format!("{}s", ts.seconds)))?;

            Ok(Some(zone.day_of(&instant)))
        }
        DateInput::Text(raw) => {
            let text = raw.trim();
            if text.is_empty() {
                return Ok(None);
            }
            if let Some(day) = parse_iso_day(text) {
                return Ok(Some(day));
            }
            DateTime::parse_from_rfc3339(text)
                .map(|instant| Some(zone.day_of(&instant)))
                .map_err(|_| InvalidDate::new(raw.as_str()))
        }
    }
}

/// Like [`normalize_in`], but an unparseable date counts as "never picked up".
pub fn normalize_or_never(input: &DateInput, zone: &DayZone) -> Option<CalendarDay> {
    match normalize_in(input, zone) {
        Ok(day) => day,
        Err(err) => {
            tracing::warn!(error = %err, "treating unparseable pickup date as never picked up");
            None
        }
    }
}

/// Parse a form or query field holding an optional `YYYY-MM-DD` day.
pub fn parse_day_field(raw: &str) -> Result<Option<CalendarDay>, InvalidDate> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_iso_day(text)
        .map(Some)
        .ok_or_else(|| InvalidDate::new(raw))
}

fn parse_iso_day(text: &str) -> Option<CalendarDay> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

pub fn to_iso(day: CalendarDay) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Write-side inverse of the normalizer: the stored timestamp for `day`.
pub fn to_timestamp(day: CalendarDay, zone: &DayZone) -> Timestamp {
    Timestamp {
        seconds: zone.start_of_day(day).timestamp(),
        nanos: 0,
    }
}
