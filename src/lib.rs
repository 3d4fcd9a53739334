//! Shared library for `moyenne`
//! Contains the rule tables, averaging engine and grading-session state
//! machine used by the CLI.

pub mod core;
pub mod logger;

pub use self::core::*;
