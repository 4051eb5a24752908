//! Handlers for natal chart evaluation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use planet_lines_core::chart::{self, AstroEvaluation, BirthInput, DebugReport};

use crate::error::AppResult;
use crate::state::AppState;

/// POST /astro_eval
///
/// Compute planet positions, signs and houses for the submitted birth data.
pub async fn astro_eval(
    State(state): State<AppState>,
    payload: Result<Json<BirthInput>, JsonRejection>,
) -> AppResult<Json<AstroEvaluation>> {
    let Json(input) = payload?;
    let policy = state.config.timezone_policy();

    let evaluation = chart::evaluate(state.engine.as_ref(), &input, policy)?;

    tracing::info!(
        birthdate = %input.birthdate_iso,
        timezone = input.timezone_name.as_deref().unwrap_or("UTC"),
        sun = evaluation.natal_planets.first().map(|p| p.sign.name()),
        houses = evaluation.natal_planets.iter().filter(|p| p.house.is_some()).count(),
        "Chart evaluated",
    );

    Ok(Json(evaluation))
}

/// POST /debug
///
/// Echo the normalized engine inputs without computing a chart.
pub async fn debug(
    State(state): State<AppState>,
    payload: Result<Json<BirthInput>, JsonRejection>,
) -> AppResult<Json<DebugReport>> {
    let Json(input) = payload?;
    let report = chart::debug_report(&input, state.config.timezone_policy())?;

    tracing::debug!(
        date = %report.date,
        time = %report.time,
        utcoffset = %report.utcoffset,
        "Debug report built",
    );

    Ok(Json(report))
}
