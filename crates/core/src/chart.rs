//! Chart query facade.
//!
//! Normalizes birth data, asks a [`ChartEngine`] for the ten fixed bodies
//! and assembles the evaluation payload: per-body positions, a templated
//! summary and the placeholder astrocartography line records.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::engine::{Chart, ChartEngine, ChartObject, EngineDatetime, EngineError, GeoPos};
use crate::error::CoreError;
use crate::formatting::{decimal_to_degree_minute, Axis};
use crate::temporal::{self, TimezonePolicy, DEFAULT_TIMEZONE};
use crate::types::{Body, LineType, ZodiacSign};

/* --------------------------------------------------------------------------
Request / response types
-------------------------------------------------------------------------- */

/// Birth data as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BirthInput {
    /// Calendar date, `YYYY-MM-DD`.
    pub birthdate_iso: String,
    /// Wall-clock time, `HH:MM` (24h).
    pub birthtime_24: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// IANA zone name; UTC when absent.
    #[serde(default)]
    pub timezone_name: Option<String>,
    /// Free-text place label, echoed back unchanged.
    #[serde(default)]
    pub birthplace_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetPosition {
    pub planet: Body,
    pub lon_ecl: f64,
    pub lat_ecl: f64,
    pub sign: ZodiacSign,
    pub house: Option<u8>,
    pub ra: f64,
    pub decl: f64,
}

/// Astrocartography line record. Geometry is not computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstroLine {
    pub planet: Body,
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub polyline_geojson: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AstroEvaluation {
    pub astro_eval_summary: String,
    pub natal_planets: Vec<PlanetPosition>,
    pub astro_lines: Vec<AstroLine>,
    pub birthplace_text: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// The engine inputs derived from a request, without running the engine.
#[derive(Debug, Clone, Serialize)]
pub struct DebugReport {
    pub date: String,
    pub time: String,
    pub utcoffset: String,
    pub lat_str: String,
    pub lon_str: String,
    pub timezone_name: String,
    pub planets_used: Vec<Body>,
}

/* --------------------------------------------------------------------------
House lookup
-------------------------------------------------------------------------- */

type HouseStrategy = fn(&Chart, &ChartObject) -> Result<u8, EngineError>;

fn by_cusp_table(chart: &Chart, object: &ChartObject) -> Result<u8, EngineError> {
    chart.houses().object_house(object)
}

fn by_equal_houses(chart: &Chart, object: &ChartObject) -> Result<u8, EngineError> {
    chart.house_of(object)
}

/// Tried in order; the first success wins.
const HOUSE_STRATEGIES: &[(&str, HouseStrategy)] = &[
    ("cusp table", by_cusp_table),
    ("equal houses", by_equal_houses),
];

/// House of `object`, or `None` when every strategy fails.
pub fn safe_house(chart: &Chart, object: &ChartObject) -> Option<u8> {
    HOUSE_STRATEGIES.iter().find_map(|(name, lookup)| {
        lookup(chart, object)
            .inspect_err(|e| {
                tracing::debug!(
                    body = object.body.name(),
                    strategy = name,
                    error = %e,
                    "House lookup failed"
                );
            })
            .ok()
    })
}

/* --------------------------------------------------------------------------
Assembly
-------------------------------------------------------------------------- */

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}

fn planet_position(chart: &Chart, object: &ChartObject) -> PlanetPosition {
    PlanetPosition {
        planet: object.body,
        lon_ecl: round4(object.lon),
        lat_ecl: round4(object.lat),
        sign: object.sign,
        house: safe_house(chart, object),
        ra: round4(object.ra.unwrap_or(0.0)),
        decl: round4(object.decl.unwrap_or(0.0)),
    }
}

pub fn summary(sun: ZodiacSign, moon: ZodiacSign) -> String {
    let (sun, moon) = (sun.name(), moon.name());
    format!(
        "Sonne in {sun}, Mond in {moon}. Fokus auf {sun} (Selbstausdruck) & {moon} (Gefühle)."
    )
}

/// One record per body and line type, body-major.
pub fn placeholder_lines() -> Vec<AstroLine> {
    Body::ALL
        .iter()
        .flat_map(|&planet| {
            LineType::ALL.iter().map(move |&line_type| AstroLine {
                planet,
                line_type,
                polyline_geojson: None,
            })
        })
        .collect()
}

fn validate(input: &BirthInput) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

fn engine_failure(err: EngineError) -> CoreError {
    tracing::warn!(error = %err, "Chart computation failed");
    CoreError::computation("chart computation", &err)
}

/// Compute the natal chart for `input` and assemble the response payload.
pub fn evaluate(
    engine: &dyn ChartEngine,
    input: &BirthInput,
    policy: TimezonePolicy,
) -> Result<AstroEvaluation, CoreError> {
    validate(input)?;

    let instant = temporal::normalize(
        &input.birthdate_iso,
        &input.birthtime_24,
        input.timezone_name.as_deref(),
        policy,
    )?;
    let lat_str = decimal_to_degree_minute(input.latitude, Axis::Latitude);
    let lon_str = decimal_to_degree_minute(input.longitude, Axis::Longitude);

    let datetime = EngineDatetime::new(&instant.date, &instant.time, &instant.utc_offset)
        .map_err(engine_failure)?;
    let pos = GeoPos::new(&lat_str, &lon_str).map_err(engine_failure)?;
    let chart = engine.chart(&datetime, &pos, &Body::ALL).map_err(engine_failure)?;

    let mut natal_planets = Vec::with_capacity(Body::ALL.len());
    for body in Body::ALL {
        let object = chart.get(body).ok_or_else(|| {
            CoreError::Computation {
                message: format!("Engine returned no position for {}", body.name()),
                trace: vec!["chart lookup".to_string(), body.name().to_string()],
            }
        })?;
        natal_planets.push(planet_position(&chart, object));
    }

    let sign_of = |body: Body| natal_planets[body as usize].sign;
    let astro_eval_summary = summary(sign_of(Body::Sun), sign_of(Body::Moon));

    Ok(AstroEvaluation {
        astro_eval_summary,
        natal_planets,
        astro_lines: placeholder_lines(),
        birthplace_text: input.birthplace_text.clone(),
        latitude: input.latitude,
        longitude: input.longitude,
    })
}

/// The normalized engine inputs for `input`, without computing a chart.
pub fn debug_report(input: &BirthInput, policy: TimezonePolicy) -> Result<DebugReport, CoreError> {
    validate(input)?;

    let instant = temporal::normalize(
        &input.birthdate_iso,
        &input.birthtime_24,
        input.timezone_name.as_deref(),
        policy,
    )?;

    Ok(DebugReport {
        date: instant.date,
        time: instant.time,
        utcoffset: instant.utc_offset,
        lat_str: decimal_to_degree_minute(input.latitude, Axis::Latitude),
        lon_str: decimal_to_degree_minute(input.longitude, Axis::Longitude),
        timezone_name: input
            .timezone_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()),
        planets_used: Body::ALL.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::engine::{AnalyticEngine, HouseTable};

    fn linz() -> BirthInput {
        BirthInput {
            birthdate_iso: "1983-07-04".to_string(),
            birthtime_24: "12:10".to_string(),
            latitude: 48.3069,
            longitude: 14.2858,
            timezone_name: Some("Europe/Vienna".to_string()),
            birthplace_text: Some("Linz, Austria".to_string()),
        }
    }

    /// Engine stub that always fails.
    struct BrokenEngine;

    impl ChartEngine for BrokenEngine {
        fn chart(&self, _: &EngineDatetime, _: &GeoPos, _: &[Body]) -> Result<Chart, EngineError> {
            Err(EngineError::NonFinite("ecliptic position"))
        }
    }

    /// Engine stub that leaves out the Moon.
    struct MoonlessEngine;

    impl ChartEngine for MoonlessEngine {
        fn chart(&self, dt: &EngineDatetime, pos: &GeoPos, bodies: &[Body]) -> Result<Chart, EngineError> {
            let full = AnalyticEngine.chart(dt, pos, bodies)?;
            let objects = full
                .objects()
                .iter()
                .filter(|o| o.body != Body::Moon)
                .cloned()
                .collect();
            Ok(Chart::new(
                dt.clone(),
                *pos,
                objects,
                full.ascendant(),
                full.midheaven(),
                full.houses().clone(),
            ))
        }
    }

    fn sample_chart(houses: HouseTable, ascendant: f64) -> Chart {
        Chart::new(
            EngineDatetime::new("2000/01/01", "12:00", "+00:00").unwrap(),
            GeoPos::new("0n00", "0e00").unwrap(),
            Vec::new(),
            ascendant,
            0.0,
            houses,
        )
    }

    fn object_at(lon: f64) -> ChartObject {
        ChartObject {
            body: Body::Mars,
            lon,
            lat: 0.0,
            sign: ZodiacSign::from_longitude(lon),
            ra: None,
            decl: None,
        }
    }

    // -- evaluate --

    #[test]
    fn evaluation_has_ten_planets_and_forty_lines() {
        let eval = evaluate(&AnalyticEngine, &linz(), TimezonePolicy::Lenient).unwrap();
        assert_eq!(eval.natal_planets.len(), 10);
        assert_eq!(eval.astro_lines.len(), 40);

        let order: Vec<Body> = eval.natal_planets.iter().map(|p| p.planet).collect();
        assert_eq!(order, Body::ALL.to_vec());

        for p in &eval.natal_planets {
            assert!(p.house.map_or(true, |h| (1..=12).contains(&h)));
            assert_eq!(p.lon_ecl, round4(p.lon_ecl));
        }
        assert!(eval.astro_lines.iter().all(|l| l.polyline_geojson.is_none()));
        assert_eq!(eval.birthplace_text.as_deref(), Some("Linz, Austria"));
        assert_eq!(eval.latitude, 48.3069);
    }

    #[test]
    fn summary_uses_sun_and_moon_signs() {
        let eval = evaluate(&AnalyticEngine, &linz(), TimezonePolicy::Lenient).unwrap();
        let sun = eval.natal_planets[0].sign.name();
        let moon = eval.natal_planets[1].sign.name();
        assert_eq!(sun, "Cancer");
        assert_eq!(
            eval.astro_eval_summary,
            format!("Sonne in {sun}, Mond in {moon}. Fokus auf {sun} (Selbstausdruck) & {moon} (Gefühle).")
        );
    }

    #[test]
    fn polar_birthplace_still_gets_houses() {
        let mut input = linz();
        input.latitude = 78.2232;
        input.longitude = 15.6267;
        let eval = evaluate(&AnalyticEngine, &input, TimezonePolicy::Lenient).unwrap();
        assert!(eval.natal_planets.iter().all(|p| p.house.is_some()));
    }

    #[test]
    fn engine_failure_is_computation_error() {
        let result = evaluate(&BrokenEngine, &linz(), TimezonePolicy::Lenient);
        assert_matches!(result, Err(CoreError::Computation { message, trace }) => {
            assert!(message.contains("ecliptic position"));
            assert!(!trace.is_empty() && trace.len() <= 4);
        });
    }

    #[test]
    fn missing_body_is_computation_error() {
        let result = evaluate(&MoonlessEngine, &linz(), TimezonePolicy::Lenient);
        assert_matches!(result, Err(CoreError::Computation { message, .. }) if message.contains("Moon"));
    }

    #[test]
    fn malformed_date_is_input_error() {
        let mut input = linz();
        input.birthdate_iso = "1983-13-99".to_string();
        let err = evaluate(&AnalyticEngine, &input, TimezonePolicy::Lenient).unwrap_err();
        assert!(err.is_input_error());
        assert_matches!(err, CoreError::InvalidInput(_));
    }

    #[test]
    fn out_of_range_latitude_is_validation_error() {
        let mut input = linz();
        input.latitude = 91.0;
        assert_matches!(
            evaluate(&BrokenEngine, &input, TimezonePolicy::Lenient),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn strict_policy_rejects_unknown_zone() {
        let mut input = linz();
        input.timezone_name = Some("Mars/Olympus_Mons".to_string());
        assert_matches!(
            evaluate(&AnalyticEngine, &input, TimezonePolicy::Strict),
            Err(CoreError::UnknownTimezone(_))
        );
        assert!(evaluate(&AnalyticEngine, &input, TimezonePolicy::Lenient).is_ok());
    }

    // -- round4 --

    #[test]
    fn round4_ties_to_even() {
        // 1.03125 * 10^4 = 10312.5 exactly.
        assert_eq!(round4(1.03125), 1.0312);
        assert_eq!(round4(-1.03125), -1.0312);
        assert_eq!(round4(280.38149), 280.3815);
    }

    // -- safe_house --

    #[test]
    fn safe_house_prefers_cusp_table() {
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = i as f64 * 30.0 + 15.0;
        }
        let chart = sample_chart(HouseTable::Cusps(cusps), 0.0);
        // Equal houses from an Ascendant at 0 would put 10 degrees in house 1.
        assert_eq!(safe_house(&chart, &object_at(20.0)), Some(1));
        assert_eq!(safe_house(&chart, &object_at(10.0)), Some(12));
    }

    #[test]
    fn safe_house_falls_back_to_equal_houses() {
        let chart = sample_chart(HouseTable::Unavailable("polar".into()), 100.0);
        assert_eq!(safe_house(&chart, &object_at(140.0)), Some(2));
    }

    #[test]
    fn safe_house_absent_when_all_strategies_fail() {
        let chart = sample_chart(HouseTable::Unavailable("polar".into()), f64::NAN);
        assert_eq!(safe_house(&chart, &object_at(140.0)), None);
    }

    // -- placeholder_lines --

    #[test]
    fn lines_are_body_major() {
        let lines = placeholder_lines();
        assert_eq!(lines.len(), 40);
        assert_eq!(lines[0].planet, Body::Sun);
        assert_eq!(lines[0].line_type, LineType::Ac);
        assert_eq!(lines[3].line_type, LineType::Ic);
        assert_eq!(lines[4].planet, Body::Moon);
        assert_eq!(lines[39].planet, Body::Pluto);
    }

    #[test]
    fn line_serializes_type_key() {
        let json = serde_json::to_value(&placeholder_lines()[2]).unwrap();
        assert_eq!(json["planet"], "Sun");
        assert_eq!(json["type"], "MC");
        assert!(json["polyline_geojson"].is_null());
    }

    // -- debug_report --

    #[test]
    fn debug_report_shows_engine_inputs() {
        let report = debug_report(&linz(), TimezonePolicy::Lenient).unwrap();
        assert_eq!(report.date, "1983/07/04");
        assert_eq!(report.time, "12:10");
        assert_eq!(report.utcoffset, "+02:00");
        assert_eq!(report.lat_str, "48n18");
        assert_eq!(report.lon_str, "14e17");
        assert_eq!(report.timezone_name, "Europe/Vienna");
        assert_eq!(report.planets_used.len(), 10);
    }

    #[test]
    fn debug_report_defaults_zone_name() {
        let mut input = linz();
        input.timezone_name = None;
        let report = debug_report(&input, TimezonePolicy::Lenient).unwrap();
        assert_eq!(report.timezone_name, "UTC");
        assert_eq!(report.utcoffset, "+00:00");
    }
}
