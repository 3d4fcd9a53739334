//! CLI command handlers for `moyenne`.
//!
//! This module provides handlers for various CLI subcommands.
//! Each command is implemented in its own submodule.

pub mod calc;
pub mod catalog;
pub mod config;
pub mod stats;
