//! Public API module.
//!
//! This module contains the high-level user-facing API for the `wpars` crate.

pub mod models;
pub mod supplicant;
