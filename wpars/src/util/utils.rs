//! Utility functions for control interface text handling.
//!
//! Provides helpers for pulling values out of `key=value` reply lines,
//! formatting SET_NETWORK values and displaying SSIDs.

use std::borrow::Cow;

use crate::types::constants::{event, reply};

/// Returns the value of a `key=value` line if it starts with `prefix`.
///
/// `prefix` includes the `=`, e.g. `"bssid="`.
pub(crate) fn field_value<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)
}

/// Strips the fixed-width `<N>` priority tag from an event line and trims it.
///
/// Lines shorter than the tag yield an empty string.
pub(crate) fn strip_priority_tag(line: &str) -> &str {
    line.get(event::PRIORITY_TAG_LEN..).unwrap_or("").trim()
}

/// Formats a SET_NETWORK value, quoting it unless `raw` is requested.
///
/// Enumerated variables such as `key_mgmt` must be sent unquoted.
pub(crate) fn format_network_value(value: &str, raw: bool) -> Cow<'_, str> {
    if raw {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("\"{value}\""))
    }
}

/// Returns whether a reply is the affirmative acknowledgement.
pub(crate) fn is_ok_reply(payload: &str) -> bool {
    payload.contains(reply::OK)
}

/// Returns whether a reply is the daemon's failure marker.
///
/// Covers `FAIL`, `FAIL-BUSY` and friends.
pub(crate) fn is_fail_reply(payload: &str) -> bool {
    payload.trim_start().starts_with(reply::FAIL)
}

/// Display form of an SSID, defaulting to `<Hidden Network>` if empty.
pub(crate) fn ssid_or_hidden(ssid: &str) -> Cow<'_, str> {
    if ssid.is_empty() {
        Cow::Borrowed("<Hidden Network>")
    } else {
        Cow::Borrowed(ssid)
    }
}
