//! Integration tests for `POST /astro_eval`.

mod common;

use axum::http::StatusCode;
use common::{body_json, linz_birth, post_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: full evaluation has 10 planets and 40 placeholder lines
// ---------------------------------------------------------------------------

#[tokio::test]
async fn astro_eval_returns_planets_and_lines() {
    let app = common::build_test_app();
    let response = post_json(app, "/astro_eval", linz_birth()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let planets = json["natal_planets"].as_array().unwrap();
    assert_eq!(planets.len(), 10);
    let names: Vec<&str> = planets.iter().map(|p| p["planet"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        ["Sun", "Moon", "Mercury", "Venus", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Pluto"]
    );

    for p in planets {
        let lon = p["lon_ecl"].as_f64().unwrap();
        assert!((0.0..360.0).contains(&lon));
        assert!(p["sign"].is_string());
        assert!(p["ra"].is_number() && p["decl"].is_number());
        match &p["house"] {
            serde_json::Value::Null => {}
            house => assert!((1..=12).contains(&house.as_u64().unwrap())),
        }
    }

    let lines = json["astro_lines"].as_array().unwrap();
    assert_eq!(lines.len(), 40);
    assert!(lines.iter().all(|l| l["polyline_geojson"].is_null()));
    assert_eq!(lines[0]["planet"], "Sun");
    assert_eq!(lines[0]["type"], "AC");
    assert_eq!(lines[1]["type"], "DC");
    assert_eq!(lines[2]["type"], "MC");
    assert_eq!(lines[3]["type"], "IC");
    assert_eq!(lines[39]["planet"], "Pluto");
}

// ---------------------------------------------------------------------------
// Test: request fields are echoed back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn astro_eval_echoes_place_and_coordinates() {
    let app = common::build_test_app();
    let json = body_json(post_json(app, "/astro_eval", linz_birth()).await).await;

    assert_eq!(json["birthplace_text"], "Linz, Austria");
    assert_eq!(json["latitude"], 48.3069);
    assert_eq!(json["longitude"], 14.2858);
}

// ---------------------------------------------------------------------------
// Test: summary interpolates the Sun and Moon signs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn astro_eval_summary_template() {
    let app = common::build_test_app();
    let json = body_json(post_json(app, "/astro_eval", linz_birth()).await).await;

    let sun = json["natal_planets"][0]["sign"].as_str().unwrap();
    let moon = json["natal_planets"][1]["sign"].as_str().unwrap();
    assert_eq!(sun, "Cancer");
    assert_eq!(
        json["astro_eval_summary"],
        format!("Sonne in {sun}, Mond in {moon}. Fokus auf {sun} (Selbstausdruck) & {moon} (Gefühle).")
    );
}

// ---------------------------------------------------------------------------
// Test: J2000 in UTC with optional fields omitted
// ---------------------------------------------------------------------------

#[tokio::test]
async fn astro_eval_j2000_without_optional_fields() {
    let app = common::build_test_app();
    let body = json!({
        "birthdate_iso": "2000-01-01",
        "birthtime_24": "12:00",
        "latitude": 51.4779,
        "longitude": -0.0015
    });
    let response = post_json(app, "/astro_eval", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert!(json["birthplace_text"].is_null());
    assert_eq!(json["natal_planets"][0]["sign"], "Capricorn");
    assert_eq!(json["natal_planets"][5]["planet"], "Jupiter");
    assert_eq!(json["natal_planets"][5]["sign"], "Aries");

    let sun_lon = json["natal_planets"][0]["lon_ecl"].as_f64().unwrap();
    assert!((sun_lon - 280.4).abs() < 0.2, "Sun at {sun_lon}");
}

// ---------------------------------------------------------------------------
// Test: polar birthplace still gets houses through the fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn astro_eval_polar_latitude_uses_fallback_houses() {
    let app = common::build_test_app();
    let mut body = linz_birth();
    body["latitude"] = json!(78.2232);
    body["longitude"] = json!(15.6267);
    body["timezone_name"] = json!("Arctic/Longyearbyen");

    let response = post_json(app, "/astro_eval", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    for p in json["natal_planets"].as_array().unwrap() {
        let house = p["house"].as_u64().unwrap();
        assert!((1..=12).contains(&house));
    }
}

// ---------------------------------------------------------------------------
// Test: unknown timezone falls back to UTC in lenient mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn astro_eval_unknown_timezone_is_lenient_by_default() {
    let app = common::build_test_app();
    let mut body = linz_birth();
    body["timezone_name"] = json!("Europe/Atlantis");

    let response = post_json(app, "/astro_eval", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}
