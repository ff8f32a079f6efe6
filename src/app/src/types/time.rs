use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Timelike,
};
use serde::{Deserialize, Serialize};

pub use chrono_tz::Tz;

/// An instant as observed by the shell: UTC epoch seconds, the local UTC
/// offset in effect at that instant and, when known, the local time zone.
///
/// The core never reads a clock itself. Every event that needs "now" carries
/// one of these, captured by the shell when the event happened.
///
/// With a time zone, entered times are resolved with the zone rules of the
/// date they fall on. Without one, the captured offset is used for every date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocalTimestamp {
    pub epoch_seconds: i64,
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub time_zone: Option<Tz>,
}

impl LocalTimestamp {
    pub fn new(epoch_seconds: i64, utc_offset_seconds: i32) -> Self {
        Self {
            epoch_seconds,
            utc_offset_seconds,
            time_zone: None,
        }
    }

    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    pub fn offset(&self) -> Result<FixedOffset, String> {
        FixedOffset::east_opt(self.utc_offset_seconds)
            .ok_or_else(|| format!("invalid UTC offset: {}s", self.utc_offset_seconds))
    }

    /// The instant expressed in local wall-clock time.
    pub fn local_date_time(&self) -> Result<DateTime<FixedOffset>, String> {
        let utc = DateTime::from_timestamp(self.epoch_seconds, 0)
            .ok_or_else(|| format!("timestamp out of range: {}", self.epoch_seconds))?;

        match self.time_zone {
            Some(zone) => Ok(utc.with_timezone(&zone).fixed_offset()),
            None => Ok(utc.with_timezone(&self.offset()?)),
        }
    }

    /// The local calendar date of the instant.
    pub fn local_date(&self) -> Result<NaiveDate, String> {
        self.local_date_time().map(|local| local.date_naive())
    }
}

/// How time fields are read from the forms.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimeInputMode {
    /// Structured time-of-day picker (`HH:MM` or `HH:MM:SS`) on today's date.
    #[default]
    Picker,
    /// Free text: local date time, RFC 3339 timestamp, or a bare time of day.
    RawText,
}

impl TimeInputMode {
    /// Convert a user-entered time to absolute epoch seconds. Bare times of day
    /// land on the local date of `now`. Sub-second input is floored.
    pub fn to_epoch_seconds(self, input: &str, now: &LocalTimestamp) -> Result<i64, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("no time entered".to_string());
        }

        match self {
            TimeInputMode::Picker => time_of_day_to_epoch(input, now),
            TimeInputMode::RawText => raw_text_to_epoch(input, now),
        }
    }

    /// Placeholder shown next to time fields.
    pub fn hint(self) -> &'static str {
        match self {
            TimeInputMode::Picker => "HH:MM",
            TimeInputMode::RawText => "YYYY-MM-DDTHH:MM or HH:MM",
        }
    }
}

/// Format a wall-clock time as `h:mm AM/PM`.
pub fn format_clock(time: &impl Timelike) -> String {
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { "PM" } else { "AM" };
    format!("{hour}:{:02} {suffix}", time.minute())
}

const TIME_OF_DAY_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const LOCAL_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_time_of_day(input: &str) -> Option<NaiveTime> {
    TIME_OF_DAY_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(input, format).ok())
}

fn time_of_day_to_epoch(input: &str, now: &LocalTimestamp) -> Result<i64, String> {
    let time = parse_time_of_day(input).ok_or_else(|| format!("invalid time of day: {input}"))?;
    local_to_epoch(now.local_date()?.and_time(time), now)
}

fn raw_text_to_epoch(input: &str, now: &LocalTimestamp) -> Result<i64, String> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Ok(with_offset.timestamp());
    }

    if let Some(local) = LOCAL_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
    {
        return local_to_epoch(local, now);
    }

    time_of_day_to_epoch(input, now).map_err(|_| format!("invalid date or time: {input}"))
}

fn local_to_epoch(local: NaiveDateTime, now: &LocalTimestamp) -> Result<i64, String> {
    match now.time_zone {
        Some(zone) => zoned_to_epoch(local, zone),
        None => now
            .offset()?
            .from_local_datetime(&local)
            .single()
            .map(|date_time| date_time.timestamp())
            .ok_or_else(|| format!("ambiguous local time: {local}")),
    }
}

// longer than any forward shift in the tz database
const GAP_LOOKBACK: TimeDelta = TimeDelta::hours(3);

/// Repeated wall-clock times take the earlier instant. Skipped ones are read
/// with the offset in effect before the shift, so 02:30 on a spring-forward
/// night becomes 03:30.
fn zoned_to_epoch(local: NaiveDateTime, zone: Tz) -> Result<i64, String> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(date_time) => Ok(date_time.timestamp()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp()),
        LocalResult::None => {
            let before = zone
                .from_local_datetime(&(local - GAP_LOOKBACK))
                .earliest()
                .ok_or_else(|| format!("nonexistent local time in {zone}: {local}"))?;
            let offset = before.offset().fix().local_minus_utc();
            Ok(local.and_utc().timestamp() - i64::from(offset))
        }
    }
}
