//! Type definitions and constants.
//!
//! This module contains wpa_supplicant control interface constants.

pub(crate) mod constants;
