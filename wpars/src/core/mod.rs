//! Core internal logic for the supplicant client.
//!
//! This module contains the internal implementation details for parsing
//! daemon output, caching scan results and issuing commands.

pub(crate) mod cache;
pub(crate) mod flags;
pub(crate) mod network;
pub(crate) mod scan;
pub(crate) mod session;
pub(crate) mod status;
