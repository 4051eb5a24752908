//! Chart engine contract.
//!
//! The chart facade talks to an engine only through the types in this
//! module: the engine receives the encoded date/time/offset triple and the
//! degree-minute coordinate strings, and hands back a [`Chart`] holding one
//! [`ChartObject`] per requested body plus a house table.
//!
//! [`analytic::AnalyticEngine`] is the built-in implementation.

pub mod analytic;
pub mod houses;
pub mod orbits;
pub mod time;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::formatting::{parse_degree_minute, Axis};
use crate::types::{Body, ZodiacSign};

pub use analytic::AnalyticEngine;
pub use houses::HouseTable;

/* --------------------------------------------------------------------------
Errors
-------------------------------------------------------------------------- */

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid engine datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid engine position: {0}")]
    InvalidPosition(String),

    #[error("House cusps unavailable: {0}")]
    HousesUnavailable(String),

    #[error("Non-finite value computed for {0}")]
    NonFinite(&'static str),
}

/* --------------------------------------------------------------------------
Engine inputs
-------------------------------------------------------------------------- */

/// Date, time and UTC offset in the engine's string encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineDatetime {
    date: String,
    time: String,
    utc_offset: String,
    utc: NaiveDateTime,
}

impl EngineDatetime {
    /// Build from `"YYYY/MM/DD"`, `"HH:MM"` and `"±HH:MM"`.
    pub fn new(date: &str, time: &str, utc_offset: &str) -> Result<Self, EngineError> {
        let day = NaiveDate::parse_from_str(date, "%Y/%m/%d")
            .map_err(|e| EngineError::InvalidDatetime(format!("date '{date}': {e}")))?;
        let clock = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|e| EngineError::InvalidDatetime(format!("time '{time}': {e}")))?;
        let offset_minutes = parse_offset_minutes(utc_offset).ok_or_else(|| {
            EngineError::InvalidDatetime(format!("utc offset '{utc_offset}'"))
        })?;

        let utc = day.and_time(clock) - TimeDelta::minutes(offset_minutes);

        Ok(Self {
            date: date.to_string(),
            time: time.to_string(),
            utc_offset: utc_offset.to_string(),
            utc,
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn utc_offset(&self) -> &str {
        &self.utc_offset
    }

    /// The instant as a naive UTC timestamp.
    pub fn utc(&self) -> NaiveDateTime {
        self.utc
    }

    /// Julian Day (UT) of the instant.
    pub fn julian_day(&self) -> f64 {
        time::julian_day(self.utc)
    }
}

fn parse_offset_minutes(offset: &str) -> Option<i64> {
    let (sign, rest) = match offset.as_bytes().first()? {
        b'+' => (1, &offset[1..]),
        b'-' => (-1, &offset[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

/// Geographic position from degree-minute strings such as `"48n18"` and
/// `"14e17"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPos {
    /// Latitude in decimal degrees, north positive.
    pub lat: f64,
    /// Longitude in decimal degrees, east positive.
    pub lon: f64,
}

impl GeoPos {
    pub fn new(lat: &str, lon: &str) -> Result<Self, EngineError> {
        let lat_deg = match parse_degree_minute(lat) {
            Some((value, Axis::Latitude)) if value.abs() <= 90.0 => value,
            _ => return Err(EngineError::InvalidPosition(format!("latitude '{lat}'"))),
        };
        let lon_deg = match parse_degree_minute(lon) {
            Some((value, Axis::Longitude)) if value.abs() <= 180.0 => value,
            _ => return Err(EngineError::InvalidPosition(format!("longitude '{lon}'"))),
        };
        Ok(Self {
            lat: lat_deg,
            lon: lon_deg,
        })
    }
}

/* --------------------------------------------------------------------------
Engine outputs
-------------------------------------------------------------------------- */

/// A body placed in a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartObject {
    pub body: Body,
    /// Geocentric ecliptic longitude, degrees in [0, 360).
    pub lon: f64,
    /// Geocentric ecliptic latitude, degrees.
    pub lat: f64,
    pub sign: ZodiacSign,
    /// Right ascension in degrees, when the engine exposes it.
    pub ra: Option<f64>,
    /// Declination in degrees, when the engine exposes it.
    pub decl: Option<f64>,
}

/// A computed chart: the requested bodies, the angles and the house table.
#[derive(Debug, Clone)]
pub struct Chart {
    datetime: EngineDatetime,
    pos: GeoPos,
    objects: Vec<ChartObject>,
    ascendant: f64,
    midheaven: f64,
    houses: HouseTable,
}

impl Chart {
    pub fn new(
        datetime: EngineDatetime,
        pos: GeoPos,
        objects: Vec<ChartObject>,
        ascendant: f64,
        midheaven: f64,
        houses: HouseTable,
    ) -> Self {
        Self {
            datetime,
            pos,
            objects,
            ascendant,
            midheaven,
            houses,
        }
    }

    /// Look up a body; `None` if it was not requested.
    pub fn get(&self, body: Body) -> Option<&ChartObject> {
        self.objects.iter().find(|o| o.body == body)
    }

    pub fn objects(&self) -> &[ChartObject] {
        &self.objects
    }

    pub fn datetime(&self) -> &EngineDatetime {
        &self.datetime
    }

    pub fn pos(&self) -> GeoPos {
        self.pos
    }

    /// Ecliptic longitude of the Ascendant, degrees.
    pub fn ascendant(&self) -> f64 {
        self.ascendant
    }

    /// Ecliptic longitude of the Midheaven, degrees.
    pub fn midheaven(&self) -> f64 {
        self.midheaven
    }

    pub fn houses(&self) -> &HouseTable {
        &self.houses
    }

    /// House of `object` counted in equal 30-degree sectors from the
    /// Ascendant. Independent of the cusp table.
    pub fn house_of(&self, object: &ChartObject) -> Result<u8, EngineError> {
        houses::equal_house(self.ascendant, object.lon)
    }
}

/* --------------------------------------------------------------------------
Engine trait
-------------------------------------------------------------------------- */

/// Anything that can place bodies and houses for an instant and location.
pub trait ChartEngine: Send + Sync {
    fn chart(
        &self,
        datetime: &EngineDatetime,
        pos: &GeoPos,
        bodies: &[Body],
    ) -> Result<Chart, EngineError>;
}
