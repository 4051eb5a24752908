//! Built-in chart engine based on mean orbital elements.
//!
//! Positions are good to a few arc-minutes for the Sun and inner planets
//! and to about a degree for the outer planets over several centuries
//! around J2000, well inside the sign and house resolution a natal chart
//! needs.

use super::houses::{self, HouseTable};
use super::orbits::{ecliptic_to_equatorial, geocentric_position};
use super::time::{day_number, local_sidereal_time_rad, obliquity_deg};
use super::{Chart, ChartEngine, ChartObject, EngineDatetime, EngineError, GeoPos};
use crate::types::{Body, ZodiacSign};

#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticEngine;

impl AnalyticEngine {
    pub fn new() -> Self {
        Self
    }
}

fn place(body: Body, d: f64, obliquity: f64) -> Result<ChartObject, EngineError> {
    let ecliptic = geocentric_position(body, d);
    if !ecliptic.lon.is_finite() || !ecliptic.lat.is_finite() {
        return Err(EngineError::NonFinite("ecliptic position"));
    }
    let equatorial = ecliptic_to_equatorial(&ecliptic, obliquity);

    // rem_euclid can land exactly on 360.0 for tiny negative inputs.
    let lon = match ecliptic.lon.rem_euclid(360.0) {
        l if l >= 360.0 => 0.0,
        l => l,
    };

    Ok(ChartObject {
        body,
        lon,
        lat: ecliptic.lat,
        sign: ZodiacSign::from_longitude(lon),
        ra: Some(equatorial.ra).filter(|v| v.is_finite()),
        decl: Some(equatorial.decl).filter(|v| v.is_finite()),
    })
}

impl ChartEngine for AnalyticEngine {
    fn chart(
        &self,
        datetime: &EngineDatetime,
        pos: &GeoPos,
        bodies: &[Body],
    ) -> Result<Chart, EngineError> {
        let jd = datetime.julian_day();
        let d = day_number(jd);
        let obliquity = obliquity_deg(d);

        let objects = bodies
            .iter()
            .map(|&body| place(body, d, obliquity))
            .collect::<Result<Vec<_>, _>>()?;

        let ramc = local_sidereal_time_rad(jd, pos.lon);
        let (ascendant, midheaven) = houses::angles(ramc, pos.lat, obliquity);
        if !ascendant.is_finite() || !midheaven.is_finite() {
            return Err(EngineError::NonFinite("chart angles"));
        }
        let table = HouseTable::from_result(houses::alcabitius(ramc, pos.lat, obliquity));

        tracing::debug!(
            jd,
            ascendant,
            midheaven,
            houses_available = table.cusps().is_some(),
            bodies = objects.len(),
            "Chart computed"
        );

        Ok(Chart::new(
            datetime.clone(),
            *pos,
            objects,
            ascendant,
            midheaven,
            table,
        ))
    }
}
