//! Natal chart domain logic for the planet lines service.
//!
//! No HTTP here: the API crate hands a [`chart::BirthInput`] to
//! [`chart::evaluate`] together with a [`engine::ChartEngine`] and maps the
//! resulting [`error::CoreError`] to a status code.

pub mod chart;
pub mod engine;
pub mod error;
pub mod formatting;
pub mod temporal;
pub mod types;
