//! Capability flag parsing.
//!
//! Turns the bracketed capability string of a BSS (e.g.
//! `[WPA2-PSK-CCMP+TKIP][ESS]`) into the security fields used when
//! configuring a network slot.

use crate::api::models::SecurityFields;
use crate::types::constants::security;

/// Parses a raw capability string into security fields.
///
/// Groups are evaluated in order and a later group may overwrite what an
/// earlier one set. `protocol_suite` is set to `WPA RSN` as soon as anything
/// is parsed, even for an `[ESS]`-only (open) network.
///
/// Input that is not wrapped in brackets is treated as one empty group and
/// yields only the protocol label.
pub(crate) fn parse_flags(raw: &str) -> SecurityFields {
    let mut fields = SecurityFields {
        protocol_suite: Some(security::PROTOCOL_SUITE.to_string()),
        ..Default::default()
    };

    let inner = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or("");

    for group in inner.split("][") {
        apply_group(&mut fields, group);
    }

    fields
}

fn apply_group(fields: &mut SecurityFields, group: &str) {
    // WPA covers WPA2 and later
    if group.starts_with("WPA") {
        fields.key_management = Some(security::KEY_MGMT_PSK.to_string());
        fields.auth_algorithm = Some(security::AUTH_OPEN.to_string());
    } else if group.starts_with("WPS") || group.starts_with("ESS") {
        return;
    }

    let cipher = if group.contains("CCMP+TKIP") {
        security::CIPHER_CCMP_TKIP
    } else if group.contains("CCMP") {
        security::CIPHER_CCMP
    } else if group.contains("TKIP") {
        security::CIPHER_TKIP
    } else {
        return;
    };

    fields.pairwise_cipher = Some(cipher.to_string());
    fields.group_cipher = Some(cipher.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wpa2_mixed_cipher() {
        let f = parse_flags("[WPA2-PSK-CCMP+TKIP][ESS]");
        assert_eq!(f.key_management.as_deref(), Some("WPA-PSK"));
        assert_eq!(f.auth_algorithm.as_deref(), Some("OPEN"));
        assert_eq!(f.pairwise_cipher.as_deref(), Some("CCMP TKIP"));
        assert_eq!(f.group_cipher.as_deref(), Some("CCMP TKIP"));
        assert_eq!(f.protocol_suite.as_deref(), Some("WPA RSN"));
    }

    #[test]
    fn ccmp_only() {
        let f = parse_flags("[WPA2-PSK-CCMP][ESS]");
        assert_eq!(f.pairwise_cipher.as_deref(), Some("CCMP"));
        assert_eq!(f.group_cipher.as_deref(), Some("CCMP"));
    }

    #[test]
    fn tkip_only() {
        let f = parse_flags("[WPA-PSK-TKIP]");
        assert_eq!(f.pairwise_cipher.as_deref(), Some("TKIP"));
        assert_eq!(f.group_cipher.as_deref(), Some("TKIP"));
        assert_eq!(f.key_management.as_deref(), Some("WPA-PSK"));
    }

    #[test]
    fn ess_only_still_gets_protocol_label() {
        let f = parse_flags("[ESS]");
        assert_eq!(f.protocol_suite.as_deref(), Some("WPA RSN"));
        assert_eq!(f.key_management, None);
        assert_eq!(f.auth_algorithm, None);
        assert_eq!(f.pairwise_cipher, None);
        assert_eq!(f.group_cipher, None);
    }

    #[test]
    fn wps_group_is_inert() {
        let f = parse_flags("[WPS][ESS]");
        assert_eq!(f.key_management, None);
        assert_eq!(f.pairwise_cipher, None);
    }

    #[test]
    fn later_group_overwrites_earlier() {
        let f = parse_flags("[WPA-PSK-TKIP][WPA2-PSK-CCMP][ESS]");
        assert_eq!(f.pairwise_cipher.as_deref(), Some("CCMP"));
        assert_eq!(f.group_cipher.as_deref(), Some("CCMP"));
    }

    #[test]
    fn malformed_input_does_not_panic() {
        for raw in ["WPA2-PSK-CCMP", "[", "]", "[WPA2", "é", "[é]"] {
            let f = parse_flags(raw);
            assert_eq!(f.protocol_suite.as_deref(), Some("WPA RSN"));
        }

        let f = parse_flags("WPA2-PSK-CCMP");
        assert_eq!(f.key_management, None);
        assert_eq!(f.pairwise_cipher, None);
    }

    #[test]
    fn unknown_groups_are_inert() {
        let f = parse_flags("[IBSS][P2P]");
        assert_eq!(f.key_management, None);
        assert_eq!(f.pairwise_cipher, None);
    }
}
