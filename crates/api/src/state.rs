use std::sync::Arc;

use planet_lines_core::engine::ChartEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Chart engine used by `/astro_eval`. Stateless, shared across requests.
    pub engine: Arc<dyn ChartEngine>,
}
