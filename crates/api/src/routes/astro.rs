//! Route definitions for chart evaluation.

use axum::routing::post;
use axum::Router;

use crate::handlers::astro;
use crate::state::AppState;

/// Chart routes mounted at the root.
///
/// ```text
/// POST /astro_eval -> astro_eval
/// POST /debug      -> debug
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/astro_eval", post(astro::astro_eval))
        .route("/debug", post(astro::debug))
}
