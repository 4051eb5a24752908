//! Timezone-aware normalization of birth date/time strings.
//!
//! Turns an ISO date, a 24h clock time and an optional IANA zone name into
//! the date/time/offset triple the chart engine is constructed from. The
//! offset is computed for the exact instant, so historical DST rules apply.

use chrono::{Datelike, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::CoreError;
use crate::formatting::format_utc_offset;

/// Zone name used when the request does not carry one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted input shapes; `0` stands for any ASCII digit.
const DATE_SHAPE: &str = "0000-00-00";
const TIME_SHAPE: &str = "00:00";

/// Longest spring-forward gap searched backwards, in hours.
const MAX_GAP_HOURS: i64 = 48;

/// How unrecognized timezone names are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimezonePolicy {
    /// Substitute UTC and log a warning.
    #[default]
    Lenient,
    /// Reject with [`CoreError::UnknownTimezone`].
    Strict,
}

/// The exact date/time/offset triple a chart is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedInstant {
    /// Calendar date, `YYYY/MM/DD`.
    pub date: String,
    /// Wall-clock time, `HH:MM`.
    pub time: String,
    /// Offset in force at that instant, `±HH:MM`.
    pub utc_offset: String,
    /// Name of the zone actually used.
    pub timezone: String,
}

/// Resolve a zone name against the IANA database.
///
/// Missing or blank names resolve to UTC. Unrecognized names resolve to UTC
/// under [`TimezonePolicy::Lenient`] and are rejected under
/// [`TimezonePolicy::Strict`].
pub fn resolve_timezone(name: Option<&str>, policy: TimezonePolicy) -> Result<Tz, CoreError> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(Tz::UTC);
    };

    if let Ok(tz) = name.parse::<Tz>() {
        return Ok(tz);
    }
    if let Ok(tz) = Tz::from_str_insensitive(name) {
        return Ok(tz);
    }

    match policy {
        TimezonePolicy::Lenient => {
            tracing::warn!(timezone = name, "Unknown timezone, falling back to UTC");
            Ok(Tz::UTC)
        }
        TimezonePolicy::Strict => Err(CoreError::UnknownTimezone(name.to_string())),
    }
}

fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'0' => v.is_ascii_digit(),
            _ => v == s,
        })
}

/// Parse `"<date>T<time>:00"` as a naive local timestamp.
///
/// The date must be exactly `YYYY-MM-DD` with a year from 1 and the time
/// exactly `HH:MM`. Signs, single-digit fields and surrounding whitespace
/// are rejected.
pub fn parse_local_timestamp(
    birthdate_iso: &str,
    birthtime_24: &str,
) -> Result<NaiveDateTime, CoreError> {
    if !has_shape(birthdate_iso, DATE_SHAPE) || !has_shape(birthtime_24, TIME_SHAPE) {
        return Err(CoreError::InvalidInput(format!(
            "Invalid date/time: expected YYYY-MM-DD and HH:MM, got '{birthdate_iso}' '{birthtime_24}'"
        )));
    }

    let stamp = format!("{birthdate_iso}T{birthtime_24}:00");
    let local = NaiveDateTime::parse_from_str(&stamp, NAIVE_TIMESTAMP_FORMAT)
        .map_err(|e| CoreError::InvalidInput(format!("Invalid date/time: {e}")))?;
    if local.year() < 1 {
        return Err(CoreError::InvalidInput(
            "Invalid date/time: year 0 is out of range".to_string(),
        ));
    }
    Ok(local)
}

/// UTC offset of `tz` at the wall-clock time `local`.
///
/// - Ambiguous wall-clock times (the autumn fold) resolve to standard time,
///   the later of the two instants.
/// - Wall-clock times inside a spring-forward gap keep the offset in force
///   before the gap. This is approximated by the offset at the nearest
///   valid wall-clock time found by stepping back in whole hours; it
///   differs from the true pre-gap offset only if another transition falls
///   within those hours.
pub fn utc_offset_at(tz: Tz, local: NaiveDateTime) -> FixedOffset {
    match tz.offset_from_local_datetime(&local) {
        LocalResult::Single(offset) => offset.fix(),
        LocalResult::Ambiguous(_, standard) => standard.fix(),
        LocalResult::None => (1..=MAX_GAP_HOURS)
            .find_map(|h| {
                tz.offset_from_local_datetime(&(local - TimeDelta::hours(h)))
                    .latest()
            })
            .unwrap_or_else(|| tz.offset_from_utc_datetime(&local))
            .fix(),
    }
}

/// Normalize birth data into the engine's date/time/offset triple.
pub fn normalize(
    birthdate_iso: &str,
    birthtime_24: &str,
    timezone_name: Option<&str>,
    policy: TimezonePolicy,
) -> Result<NormalizedInstant, CoreError> {
    let tz = resolve_timezone(timezone_name, policy)?;
    let local = parse_local_timestamp(birthdate_iso, birthtime_24)?;

    let offset = utc_offset_at(tz, local);
    let offset_hours = f64::from(offset.local_minus_utc()) / 3600.0;

    Ok(NormalizedInstant {
        date: local.format("%Y/%m/%d").to_string(),
        time: local.format("%H:%M").to_string(),
        utc_offset: format_utc_offset(offset_hours),
        timezone: tz.name().to_string(),
    })
}
