//! Real-time handling of daemon events.
//!
//! This module drains the event stream of the control channel and drives
//! the connection state machine from it.

pub(crate) mod events;
