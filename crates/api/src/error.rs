use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use planet_lines_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Input problems answer with `{ "detail": ... }`; computation failures with
/// `{ "error": ..., "trace": [...] }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `planet_lines_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request body could not be read as JSON of the expected shape.
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::InvalidInput(msg) | CoreError::Validation(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, json!({ "detail": msg }))
                }
                CoreError::UnknownTimezone(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({ "detail": core.to_string() }),
                ),
                CoreError::Computation { message, trace } => {
                    tracing::error!(error = %message, ?trace, "Chart computation error");
                    (
                        StatusCode::BAD_REQUEST,
                        json!({ "error": message, "trace": trace }),
                    )
                }
            },

            // --- Body extraction ---
            AppError::Json(rejection) => (
                rejection.status(),
                json!({ "detail": rejection.body_text() }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
