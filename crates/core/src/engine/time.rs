//! Julian dates, sidereal time and the obliquity of the ecliptic.
//!
//! UT is used directly in place of UT1; the sub-second difference is far
//! below the precision of the orbital model.

use std::f64::consts::TAU;

use chrono::{NaiveDate, NaiveDateTime};

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of 2000 Jan 0.0 UT, the epoch of the orbital elements.
pub const ELEMENTS_EPOCH_JD: f64 = 2_451_543.5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

fn j2000_noon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

/// Julian Date of a naive UTC timestamp (proleptic Gregorian calendar).
pub fn julian_day(utc: NaiveDateTime) -> f64 {
    let millis = (utc - j2000_noon()).num_milliseconds() as f64;
    J2000_JD + millis / MILLIS_PER_DAY
}

/// Days since the orbital-element epoch (2000 Jan 0.0 UT).
pub fn day_number(jd: f64) -> f64 {
    jd - ELEMENTS_EPOCH_JD
}

/// Mean obliquity of the ecliptic in degrees for a day number.
pub fn obliquity_deg(d: f64) -> f64 {
    23.4393 - 3.563e-7 * d
}

/// Greenwich Mean Sidereal Time in radians, range [0, 2π).
///
/// GMST = ERA + polynomial(T), T in Julian centuries from J2000.
pub fn gmst_rad(jd: f64) -> f64 {
    let du = jd - J2000_JD;
    let era = TAU * (0.779_057_273_264_0 + 1.002_737_811_911_354_6 * du);

    let t = du / 36_525.0;
    let poly_arcsec = 0.014506 + 4612.156534 * t + 1.3915817 * t * t;
    let arcsec_to_rad = std::f64::consts::PI / (180.0 * 3600.0);

    (era + poly_arcsec * arcsec_to_rad).rem_euclid(TAU)
}

/// Local sidereal time (the RAMC) in radians for an east-positive longitude.
pub fn local_sidereal_time_rad(jd: f64, longitude_east_deg: f64) -> f64 {
    (gmst_rad(jd) + longitude_east_deg.to_radians()).rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn julian_day_reference_dates() {
        assert!((julian_day(at(2000, 1, 1, 12, 0)) - 2_451_545.0).abs() < 1e-9);
        // Meeus example 7.a: 1957 October 4.81
        let jd = julian_day(at(1957, 10, 4, 19, 26)) + 24.0 / 86_400.0;
        assert!((jd - 2_436_116.31).abs() < 1e-4);
        assert!((julian_day(at(1990, 4, 19, 0, 0)) - 2_448_000.5).abs() < 1e-9);
    }

    #[test]
    fn day_number_matches_element_epoch() {
        assert!((day_number(2_448_000.5) + 3543.0).abs() < 1e-9);
    }

    #[test]
    fn gmst_j2000_midnight() {
        // 2000-Jan-01 0h UT: GMST ≈ 6h 39m 52s ≈ 99.97°
        let gmst = gmst_rad(2_451_544.5).to_degrees();
        assert!((gmst - 99.97).abs() < 0.1, "GMST = {gmst}");
    }

    #[test]
    fn lst_adds_east_longitude() {
        let jd = 2_451_544.5;
        let lst = local_sidereal_time_rad(jd, 90.0);
        let expected = (gmst_rad(jd) + std::f64::consts::FRAC_PI_2).rem_euclid(TAU);
        assert!((lst - expected).abs() < 1e-12);
        assert!((0.0..TAU).contains(&local_sidereal_time_rad(jd, -179.0)));
    }

    #[test]
    fn obliquity_near_j2000_value() {
        assert!((obliquity_deg(0.0) - 23.4393).abs() < 1e-9);
        assert!(obliquity_deg(36_525.0) < obliquity_deg(0.0));
    }
}
