//! Core module for the grade-aggregation rule engine

pub mod catalog;
pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod session;

/// Returns the current version of the `moyenne` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
