//! Core foundation types.
//!
//! This module has no internal dependencies.

pub mod types;
