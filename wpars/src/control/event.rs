//! Classification of unsolicited event lines.

use crate::types::constants::event;
use crate::util::utils::strip_priority_tag;

/// Event lines the client reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DaemonEvent {
    /// `CTRL-EVENT-SCAN-RESULTS`
    ScanResults,
    /// `CTRL-EVENT-CONNECTED ...`
    Connected,
    /// `CTRL-EVENT-DISCONNECTED ...`
    Disconnected,
    /// `WPA: ... pre-shared key may be incorrect ...`
    PskIncorrect,
    /// Any other line; carries the text after the priority tag.
    Ignored(String),
}

impl DaemonEvent {
    /// Classifies one raw event line, priority tag included.
    pub(crate) fn parse(line: &str) -> Self {
        let text = strip_priority_tag(line);

        if let Some(ctrl) = text.strip_prefix(event::CTRL_PREFIX) {
            if ctrl == event::SCAN_RESULTS {
                return Self::ScanResults;
            }
            if ctrl.starts_with(event::DISCONNECTED) {
                return Self::Disconnected;
            }
            if ctrl.starts_with(event::CONNECTED) {
                return Self::Connected;
            }
        } else if let Some(wpa) = text.strip_prefix(event::WPA_PREFIX)
            && wpa.contains(event::PSK_INCORRECT)
        {
            return Self::PskIncorrect;
        }

        Self::Ignored(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_results() {
        assert_eq!(
            DaemonEvent::parse("<2>CTRL-EVENT-SCAN-RESULTS "),
            DaemonEvent::ScanResults
        );
    }

    #[test]
    fn scan_started_is_ignored() {
        assert!(matches!(
            DaemonEvent::parse("<2>CTRL-EVENT-SCAN-STARTED "),
            DaemonEvent::Ignored(_)
        ));
    }

    #[test]
    fn connected_and_disconnected() {
        assert_eq!(
            DaemonEvent::parse(
                "<3>CTRL-EVENT-CONNECTED - Connection to 00:11:22:33:44:55 completed [id=0 id_str=]"
            ),
            DaemonEvent::Connected
        );
        assert_eq!(
            DaemonEvent::parse("<3>CTRL-EVENT-DISCONNECTED bssid=00:11:22:33:44:55 reason=3"),
            DaemonEvent::Disconnected
        );
    }

    #[test]
    fn psk_warning() {
        assert_eq!(
            DaemonEvent::parse(
                "<3>WPA: 4-Way Handshake failed - pre-shared key may be incorrect"
            ),
            DaemonEvent::PskIncorrect
        );
        assert!(matches!(
            DaemonEvent::parse("<3>WPA: Key negotiation completed"),
            DaemonEvent::Ignored(_)
        ));
    }

    #[test]
    fn unknown_prefix_is_ignored() {
        assert_eq!(
            DaemonEvent::parse("<3>Trying to associate with 00:11:22:33:44:55"),
            DaemonEvent::Ignored("Trying to associate with 00:11:22:33:44:55".into())
        );
        assert_eq!(DaemonEvent::parse(""), DaemonEvent::Ignored(String::new()));
    }
}
