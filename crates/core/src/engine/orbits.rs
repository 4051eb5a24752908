//! Low-precision geocentric positions from mean orbital elements.
//!
//! Each body is described by six elements with linear secular rates
//! measured from 2000 Jan 0.0 UT (day number `d`):
//!
//! | Element | Meaning                           |
//! |---------|-----------------------------------|
//! | `N`     | longitude of the ascending node   |
//! | `i`     | inclination to the ecliptic       |
//! | `w`     | argument of perihelion            |
//! | `a`     | semi-major axis (AU, Earth radii for the Moon) |
//! | `e`     | eccentricity                      |
//! | `M`     | mean anomaly                      |
//!
//! The Moon, Jupiter, Saturn and Uranus get their largest periodic
//! perturbation terms. Pluto has no useful osculating elements and uses a
//! periodic fit instead. Angles are of date, referred to the mean equinox.
//! Accuracy is on the order of arcminutes for 1800–2100.

use crate::types::Body;

const MAX_KEPLER_ITERATIONS: usize = 20;
const KEPLER_TOLERANCE: f64 = 1e-12;

/// Annual general precession in longitude, degrees per day.
const PRECESSION_DEG_PER_DAY: f64 = 3.82394e-5;

/// Day number of J2000.0 on the element epoch scale.
const J2000_DAY: f64 = 1.5;

/// Spherical ecliptic position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    /// Longitude in degrees, range [0, 360).
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Distance (AU; Earth radii for the Moon).
    pub distance: f64,
}

/// Equatorial position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquatorialPosition {
    /// Right ascension in degrees, range [0, 360).
    pub ra: f64,
    /// Declination in degrees.
    pub decl: f64,
}

#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    node: f64,
    incl: f64,
    peri: f64,
    axis: f64,
    ecc: f64,
    anomaly: f64,
}

/* --------------------------------------------------------------------------
Elements
-------------------------------------------------------------------------- */

/// Elements of the Sun's apparent orbit around the Earth.
fn sun_elements(d: f64) -> OrbitalElements {
    OrbitalElements {
        node: 0.0,
        incl: 0.0,
        peri: 282.9404 + 4.70935e-5 * d,
        axis: 1.0,
        ecc: 0.016709 - 1.151e-9 * d,
        anomaly: 356.0470 + 0.985_600_258_5 * d,
    }
}

/// Geocentric lunar elements; the axis is in Earth radii.
fn moon_elements(d: f64) -> OrbitalElements {
    OrbitalElements {
        node: 125.1228 - 0.052_953_808_3 * d,
        incl: 5.1454,
        peri: 318.0634 + 0.164_357_322_3 * d,
        axis: 60.2666,
        ecc: 0.054900,
        anomaly: 115.3654 + 13.064_992_950_9 * d,
    }
}

/// Heliocentric elements, Mercury through Neptune.
fn planet_elements(body: Body, d: f64) -> Option<OrbitalElements> {
    let el = match body {
        Body::Mercury => OrbitalElements {
            node: 48.3313 + 3.24587e-5 * d,
            incl: 7.0047 + 5.00e-8 * d,
            peri: 29.1241 + 1.01444e-5 * d,
            axis: 0.387098,
            ecc: 0.205635 + 5.59e-10 * d,
            anomaly: 168.6562 + 4.092_334_436_8 * d,
        },
        Body::Venus => OrbitalElements {
            node: 76.6799 + 2.46590e-5 * d,
            incl: 3.3946 + 2.75e-8 * d,
            peri: 54.8910 + 1.38374e-5 * d,
            axis: 0.723330,
            ecc: 0.006773 - 1.302e-9 * d,
            anomaly: 48.0052 + 1.602_130_224_4 * d,
        },
        Body::Mars => OrbitalElements {
            node: 49.5574 + 2.11081e-5 * d,
            incl: 1.8497 - 1.78e-8 * d,
            peri: 286.5016 + 2.92961e-5 * d,
            axis: 1.523688,
            ecc: 0.093405 + 2.516e-9 * d,
            anomaly: 18.6021 + 0.524_020_776_6 * d,
        },
        Body::Jupiter => OrbitalElements {
            node: 100.4542 + 2.76854e-5 * d,
            incl: 1.3030 - 1.557e-7 * d,
            peri: 273.8777 + 1.64505e-5 * d,
            axis: 5.20256,
            ecc: 0.048498 + 4.469e-9 * d,
            anomaly: 19.8950 + 0.083_085_300_1 * d,
        },
        Body::Saturn => OrbitalElements {
            node: 113.6634 + 2.38980e-5 * d,
            incl: 2.4886 - 1.081e-7 * d,
            peri: 339.3939 + 2.97661e-5 * d,
            axis: 9.55475,
            ecc: 0.055546 - 9.499e-9 * d,
            anomaly: 316.9670 + 0.033_444_228_2 * d,
        },
        Body::Uranus => OrbitalElements {
            node: 74.0005 + 1.3978e-5 * d,
            incl: 0.7733 + 1.9e-8 * d,
            peri: 96.6612 + 3.0565e-5 * d,
            axis: 19.18171 - 1.55e-8 * d,
            ecc: 0.047318 + 7.45e-9 * d,
            anomaly: 142.5905 + 0.011_725_806 * d,
        },
        Body::Neptune => OrbitalElements {
            node: 131.7806 + 3.0173e-5 * d,
            incl: 1.7700 - 2.55e-7 * d,
            peri: 272.8461 - 6.027e-6 * d,
            axis: 30.05826 + 3.313e-8 * d,
            ecc: 0.008606 + 2.15e-9 * d,
            anomaly: 260.2471 + 0.005_995_147 * d,
        },
        Body::Sun | Body::Moon | Body::Pluto => return None,
    };
    Some(el)
}

fn mean_anomaly(body: Body, d: f64) -> f64 {
    planet_elements(body, d).map_or(0.0, |el| el.anomaly)
}

/* --------------------------------------------------------------------------
Orbit geometry
-------------------------------------------------------------------------- */

/// Solve Kepler's equation `E - e sin E = M` by Newton iteration (radians).
pub fn eccentric_anomaly(mean_anomaly_rad: f64, ecc: f64) -> f64 {
    let m = mean_anomaly_rad;
    let mut ea = m + ecc * m.sin() * (1.0 + ecc * m.cos());
    for _ in 0..MAX_KEPLER_ITERATIONS {
        let delta = (ea - ecc * ea.sin() - m) / (1.0 - ecc * ea.cos());
        ea -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }
    ea
}

/// Rectangular ecliptic coordinates of a body in its orbit, centred on the
/// body it orbits.
fn orbit_position(el: &OrbitalElements) -> [f64; 3] {
    let m = el.anomaly.rem_euclid(360.0).to_radians();
    let e = el.ecc;
    let ea = eccentric_anomaly(m, e);

    let xv = el.axis * (ea.cos() - e);
    let yv = el.axis * ((1.0 - e * e).sqrt() * ea.sin());
    let v = yv.atan2(xv);
    let r = xv.hypot(yv);

    let n = el.node.to_radians();
    let i = el.incl.to_radians();
    let vw = v + el.peri.to_radians();

    [
        r * (n.cos() * vw.cos() - n.sin() * vw.sin() * i.cos()),
        r * (n.sin() * vw.cos() + n.cos() * vw.sin() * i.cos()),
        r * (vw.sin() * i.sin()),
    ]
}

fn to_spherical(xyz: [f64; 3]) -> EclipticPosition {
    let [x, y, z] = xyz;
    let distance = (x * x + y * y + z * z).sqrt();
    if distance == 0.0 {
        return EclipticPosition {
            lon: 0.0,
            lat: 0.0,
            distance: 0.0,
        };
    }
    EclipticPosition {
        lon: y.atan2(x).to_degrees().rem_euclid(360.0),
        lat: z.atan2(x.hypot(y)).to_degrees(),
        distance,
    }
}

fn to_rectangular(pos: &EclipticPosition) -> [f64; 3] {
    let lon = pos.lon.to_radians();
    let lat = pos.lat.to_radians();
    [
        pos.distance * lon.cos() * lat.cos(),
        pos.distance * lon.sin() * lat.cos(),
        pos.distance * lat.sin(),
    ]
}

/* --------------------------------------------------------------------------
Perturbations
-------------------------------------------------------------------------- */

fn sind(deg: f64) -> f64 {
    deg.to_radians().sin()
}

fn cosd(deg: f64) -> f64 {
    deg.to_radians().cos()
}

/// Lunar longitude/latitude corrections in degrees.
fn moon_perturbations(d: f64, moon: &OrbitalElements) -> (f64, f64) {
    let sun_el = sun_elements(d);
    let sun = sun_el.anomaly + sun_el.peri;
    let ms = sun_el.anomaly;
    let mm = moon.anomaly;
    let lm = moon.anomaly + moon.peri + moon.node;
    let dd = lm - sun;
    let f = lm - moon.node;

    let dlon = -1.274 * sind(mm - 2.0 * dd) + 0.658 * sind(2.0 * dd) - 0.186 * sind(ms)
        - 0.059 * sind(2.0 * mm - 2.0 * dd)
        - 0.057 * sind(mm - 2.0 * dd + ms)
        + 0.053 * sind(mm + 2.0 * dd)
        + 0.046 * sind(2.0 * dd - ms)
        + 0.041 * sind(mm - ms)
        - 0.035 * sind(dd)
        - 0.031 * sind(mm + ms)
        - 0.015 * sind(2.0 * f - 2.0 * dd)
        + 0.011 * sind(mm - 4.0 * dd);

    let dlat = -0.173 * sind(f - 2.0 * dd) - 0.055 * sind(mm - f - 2.0 * dd)
        - 0.046 * sind(mm + f - 2.0 * dd)
        + 0.033 * sind(f + 2.0 * dd)
        + 0.017 * sind(2.0 * mm + f);

    (dlon, dlat)
}

/// Heliocentric longitude/latitude corrections for the giant planets.
fn giant_planet_perturbations(body: Body, d: f64) -> (f64, f64) {
    let mj = mean_anomaly(Body::Jupiter, d);
    let ms = mean_anomaly(Body::Saturn, d);
    let mu = mean_anomaly(Body::Uranus, d);

    match body {
        Body::Jupiter => (
            -0.332 * sind(2.0 * mj - 5.0 * ms - 67.6) - 0.056 * sind(2.0 * mj - 2.0 * ms + 21.0)
                + 0.042 * sind(3.0 * mj - 5.0 * ms + 21.0)
                - 0.036 * sind(mj - 2.0 * ms)
                + 0.022 * cosd(mj - ms)
                + 0.023 * sind(2.0 * mj - 3.0 * ms + 52.0)
                - 0.016 * sind(mj - 5.0 * ms - 69.0),
            0.0,
        ),
        Body::Saturn => (
            0.812 * sind(2.0 * mj - 5.0 * ms - 67.6) - 0.229 * cosd(2.0 * mj - 4.0 * ms - 2.0)
                + 0.119 * sind(mj - 2.0 * ms - 3.0)
                + 0.046 * sind(2.0 * mj - 6.0 * ms - 69.0)
                + 0.014 * sind(mj - 3.0 * ms + 32.0),
            -0.020 * cosd(2.0 * mj - 4.0 * ms - 2.0) + 0.018 * sind(2.0 * mj - 6.0 * ms - 49.0),
        ),
        Body::Uranus => (
            0.040 * sind(ms - 2.0 * mu + 6.0) + 0.035 * sind(ms - 3.0 * mu + 33.0)
                - 0.015 * sind(mj - mu + 20.0),
            0.0,
        ),
        _ => (0.0, 0.0),
    }
}

/// Heliocentric position of Pluto from a periodic fit, precessed to the
/// equinox of date.
fn pluto_heliocentric(d: f64) -> EclipticPosition {
    let s = 50.03 + 0.033_459_652 * d;
    let p = 238.95 + 0.003_968_789 * d;

    let lon = 238.9508 + 0.004_007_03 * d - 19.799 * sind(p) + 19.848 * cosd(p)
        + 0.897 * sind(2.0 * p)
        - 4.956 * cosd(2.0 * p)
        + 0.610 * sind(3.0 * p)
        + 1.211 * cosd(3.0 * p)
        - 0.341 * sind(4.0 * p)
        - 0.190 * cosd(4.0 * p)
        + 0.128 * sind(5.0 * p)
        - 0.034 * cosd(5.0 * p)
        - 0.038 * sind(6.0 * p)
        + 0.031 * cosd(6.0 * p)
        + 0.020 * sind(s - p)
        - 0.010 * cosd(s - p);

    let lat = -3.9082 - 5.453 * sind(p) - 14.975 * cosd(p) + 3.527 * sind(2.0 * p)
        + 1.673 * cosd(2.0 * p)
        - 1.051 * sind(3.0 * p)
        + 0.328 * cosd(3.0 * p)
        + 0.179 * sind(4.0 * p)
        - 0.292 * cosd(4.0 * p)
        + 0.019 * sind(5.0 * p)
        + 0.100 * cosd(5.0 * p)
        - 0.031 * sind(6.0 * p)
        - 0.026 * cosd(6.0 * p)
        + 0.011 * cosd(s - p);

    let distance = 40.72 + 6.68 * sind(p) + 6.90 * cosd(p) - 1.18 * sind(2.0 * p)
        - 0.03 * cosd(2.0 * p)
        + 0.15 * sind(3.0 * p)
        - 0.14 * cosd(3.0 * p);

    EclipticPosition {
        lon: (lon + PRECESSION_DEG_PER_DAY * (d - J2000_DAY)).rem_euclid(360.0),
        lat,
        distance,
    }
}

/// Geocentric rectangular ecliptic position of the Sun (AU).
fn sun_rectangular(d: f64) -> [f64; 3] {
    orbit_position(&sun_elements(d))
}

fn heliocentric(body: Body, d: f64) -> EclipticPosition {
    let Some(el) = planet_elements(body, d) else {
        return pluto_heliocentric(d);
    };
    let mut pos = to_spherical(orbit_position(&el));
    let (dlon, dlat) = giant_planet_perturbations(body, d);
    pos.lon = (pos.lon + dlon).rem_euclid(360.0);
    pos.lat += dlat;
    pos
}

/* --------------------------------------------------------------------------
Public API
-------------------------------------------------------------------------- */

/// Geocentric ecliptic position of `body` at day number `d`.
pub fn geocentric_position(body: Body, d: f64) -> EclipticPosition {
    match body {
        Body::Sun => to_spherical(sun_rectangular(d)),
        Body::Moon => {
            let el = moon_elements(d);
            let mut pos = to_spherical(orbit_position(&el));
            let (dlon, dlat) = moon_perturbations(d, &el);
            pos.lon = (pos.lon + dlon).rem_euclid(360.0);
            pos.lat += dlat;
            pos
        }
        _ => {
            let helio = to_rectangular(&heliocentric(body, d));
            let sun = sun_rectangular(d);
            to_spherical([helio[0] + sun[0], helio[1] + sun[1], helio[2] + sun[2]])
        }
    }
}

/// Rotate an ecliptic position into equatorial coordinates.
pub fn ecliptic_to_equatorial(pos: &EclipticPosition, obliquity_deg: f64) -> EquatorialPosition {
    let [x, y, z] = to_rectangular(&EclipticPosition {
        distance: 1.0,
        ..*pos
    });
    let eps = obliquity_deg.to_radians();
    let ye = y * eps.cos() - z * eps.sin();
    let ze = y * eps.sin() + z * eps.cos();

    EquatorialPosition {
        ra: ye.atan2(x).to_degrees().rem_euclid(360.0),
        decl: ze.atan2(x.hypot(ye)).to_degrees(),
    }
}
