//! Request handlers.
//!
//! Handlers extract the request, delegate to `planet_lines_core` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod astro;
