//! Chart angles and house cusps.
//!
//! Cusps follow the Alcabitius system: the diurnal and nocturnal
//! semi-arcs of the Ascendant are trisected along the equator and the
//! division points are projected onto the ecliptic through hour circles.
//! Inside the polar circles the construction breaks down and the table is
//! marked unavailable; callers then fall back to equal houses from the
//! Ascendant.

use std::f64::consts::PI;

use super::{ChartObject, EngineError};

/// Ecliptic longitudes of the Ascendant and Midheaven, degrees in [0, 360).
pub fn angles(ramc_rad: f64, latitude_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let eps = obliquity_deg.to_radians();
    let phi = latitude_deg.to_radians();

    let asc = ramc_rad
        .cos()
        .atan2(-(ramc_rad.sin() * eps.cos() + phi.tan() * eps.sin()));
    let mc = ramc_rad.sin().atan2(ramc_rad.cos() * eps.cos());

    (normalize_deg(asc.to_degrees()), normalize_deg(mc.to_degrees()))
}

/// Forward arc from `from` to `to` along the zodiac, degrees in [0, 360).
pub fn arc_forward(from: f64, to: f64) -> f64 {
    (to - from).rem_euclid(360.0)
}

fn normalize_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Ecliptic point sharing a right ascension with the equator point `ra_rad`.
fn ecliptic_of_ra(ra_rad: f64, eps: f64) -> f64 {
    normalize_deg(ra_rad.sin().atan2(ra_rad.cos() * eps.cos()).to_degrees())
}

/// Alcabitius cusps 1..=12, in order.
pub fn alcabitius(
    ramc_rad: f64,
    latitude_deg: f64,
    obliquity_deg: f64,
) -> Result<[f64; 12], EngineError> {
    if latitude_deg.abs() >= 90.0 - obliquity_deg {
        return Err(EngineError::HousesUnavailable(format!(
            "latitude {latitude_deg:.2} is inside the polar circle"
        )));
    }

    let eps = obliquity_deg.to_radians();
    let phi = latitude_deg.to_radians();
    let (asc, mc) = angles(ramc_rad, latitude_deg, obliquity_deg);

    let asc_decl = (eps.sin() * asc.to_radians().sin()).asin();
    let cos_semi_arc = -asc_decl.tan() * phi.tan();
    if !cos_semi_arc.is_finite() || cos_semi_arc.abs() > 1.0 {
        return Err(EngineError::HousesUnavailable(format!(
            "ascendant does not rise at latitude {latitude_deg:.2}"
        )));
    }

    let day_arc = cos_semi_arc.acos();
    let night_arc = PI - day_arc;

    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[1] = ecliptic_of_ra(ramc_rad + day_arc + night_arc / 3.0, eps);
    cusps[2] = ecliptic_of_ra(ramc_rad + day_arc + 2.0 * night_arc / 3.0, eps);
    cusps[9] = mc;
    cusps[10] = ecliptic_of_ra(ramc_rad + day_arc / 3.0, eps);
    cusps[11] = ecliptic_of_ra(ramc_rad + 2.0 * day_arc / 3.0, eps);
    for i in [0, 1, 2, 9, 10, 11] {
        cusps[(i + 6) % 12] = normalize_deg(cusps[i] + 180.0);
    }

    if cusps.iter().any(|c| !c.is_finite()) {
        return Err(EngineError::NonFinite("house cusps"));
    }
    Ok(cusps)
}

/// House by equal 30-degree sectors counted from the Ascendant.
pub fn equal_house(ascendant: f64, longitude: f64) -> Result<u8, EngineError> {
    if !ascendant.is_finite() {
        return Err(EngineError::NonFinite("ascendant"));
    }
    if !longitude.is_finite() {
        return Err(EngineError::NonFinite("object longitude"));
    }
    let sector = (arc_forward(ascendant, longitude) / 30.0).floor() as u8;
    Ok(sector.min(11) + 1)
}

/// The house cusps of a chart, or the reason they could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub enum HouseTable {
    Cusps([f64; 12]),
    Unavailable(String),
}

impl HouseTable {
    pub fn from_result(result: Result<[f64; 12], EngineError>) -> Self {
        match result {
            Ok(cusps) => Self::Cusps(cusps),
            Err(e) => Self::Unavailable(e.to_string()),
        }
    }

    pub fn cusps(&self) -> Option<&[f64; 12]> {
        match self {
            Self::Cusps(cusps) => Some(cusps),
            Self::Unavailable(_) => None,
        }
    }

    /// The house (1..=12) whose cusp arc contains the object's longitude.
    pub fn object_house(&self, object: &ChartObject) -> Result<u8, EngineError> {
        let cusps = match self {
            Self::Cusps(cusps) => cusps,
            Self::Unavailable(reason) => {
                return Err(EngineError::HousesUnavailable(reason.clone()))
            }
        };
        if !object.lon.is_finite() {
            return Err(EngineError::NonFinite("object longitude"));
        }

        (0..12)
            .find(|&i| {
                let start = cusps[i];
                arc_forward(start, object.lon) < arc_forward(start, cusps[(i + 1) % 12])
            })
            .map(|i| i as u8 + 1)
            .ok_or_else(|| EngineError::HousesUnavailable("degenerate cusp table".to_string()))
    }
}
