//! Constants for the wpa_supplicant control interface.
//!
//! These are the literal command names, reply markers, event prefixes and
//! `key=value` field names used on the control socket, plus the defaults
//! the client falls back to.

/// Filesystem locations.
pub mod paths {
    /// Directory where wpa_supplicant creates one control socket per interface.
    pub const CTRL_DIR: &str = "/var/run/wpa_supplicant";
    /// Directory where the client binds its own end of the datagram socket.
    pub const LOCAL_DIR: &str = "/tmp";
    /// Prefix of the client-side socket file name.
    pub const LOCAL_PREFIX: &str = "wpars_";
}

/// Control interface commands.
pub mod command {
    pub const ATTACH: &str = "ATTACH";
    pub const STATUS: &str = "STATUS";
    pub const SCAN: &str = "SCAN";
    /// Dumps every BSS with the id, bssid, freq, level, tsf, flags and ssid fields.
    pub const BSS_DUMP: &str = "BSS RANGE=ALL MASK=0x21986";
    pub const AP_SCAN: &str = "AP_SCAN";
    pub const ADD_NETWORK: &str = "ADD_NETWORK";
    pub const SELECT_NETWORK: &str = "SELECT_NETWORK";
    pub const ENABLE_NETWORK: &str = "ENABLE_NETWORK";
    pub const DISABLE_NETWORK: &str = "DISABLE_NETWORK";
    pub const REMOVE_NETWORK: &str = "REMOVE_NETWORK";
    pub const SET_NETWORK: &str = "SET_NETWORK";
    pub const GET_NETWORK: &str = "GET_NETWORK";
    pub const LIST_NETWORKS: &str = "LIST_NETWORKS";
    pub const DISCONNECT: &str = "DISCONNECT";
    pub const SAVE_CONFIG: &str = "SAVE_CONFIG";
}

/// Reply markers.
pub mod reply {
    /// Affirmative acknowledgement, including the trailing newline.
    pub const OK: &str = "OK\n";
    pub const FAIL: &str = "FAIL";
    /// Record separator in a BSS dump.
    pub const BSS_SEPARATOR: &str = "====";
    /// Filler line in a BSS dump, ignored.
    pub const BSS_FILLER: &str = "####";
}

/// Unsolicited event prefixes.
pub mod event {
    /// Width of the `<N>` priority tag in front of every event line.
    pub const PRIORITY_TAG_LEN: usize = 3;
    /// First byte of every unsolicited datagram.
    pub const PRIORITY_TAG_START: u8 = b'<';
    pub const CTRL_PREFIX: &str = "CTRL-EVENT-";
    pub const SCAN_RESULTS: &str = "SCAN-RESULTS";
    pub const CONNECTED: &str = "CONNECTED";
    pub const DISCONNECTED: &str = "DISCONNECTED";
    pub const WPA_PREFIX: &str = "WPA: ";
    pub const PSK_INCORRECT: &str = "pre-shared key may be incorrect";
}

/// `key=value` field names in STATUS replies and BSS dumps.
pub mod field {
    pub const BSSID: &str = "bssid=";
    pub const FREQ: &str = "freq=";
    pub const LEVEL: &str = "level=";
    pub const TSF: &str = "tsf=";
    pub const FLAGS: &str = "flags=";
    pub const SSID: &str = "ssid=";
    pub const ID: &str = "id=";
    pub const WPA_STATE: &str = "wpa_state=";
    pub const ADDRESS: &str = "address=";
    pub const PAIRWISE_CIPHER: &str = "pairwise_cipher=";
    pub const GROUP_CIPHER: &str = "group_cipher=";
    pub const KEY_MGMT: &str = "key_mgmt=";
}

/// Per-network variable names for SET_NETWORK / GET_NETWORK.
pub mod variable {
    pub const SSID: &str = "ssid";
    pub const PSK: &str = "psk";
    pub const KEY_MGMT: &str = "key_mgmt";
    pub const PAIRWISE: &str = "pairwise";
    pub const GROUP: &str = "group";
}

/// Values derived from capability flags.
pub mod security {
    /// Protocol label applied whenever any capability flags are parsed.
    pub const PROTOCOL_SUITE: &str = "WPA RSN";
    pub const KEY_MGMT_PSK: &str = "WPA-PSK";
    /// Key management used when connecting to a network with none derived.
    pub const KEY_MGMT_NONE: &str = "NONE";
    pub const AUTH_OPEN: &str = "OPEN";
    pub const CIPHER_CCMP_TKIP: &str = "CCMP TKIP";
    pub const CIPHER_CCMP: &str = "CCMP";
    pub const CIPHER_TKIP: &str = "TKIP";
    /// Marker returned when no pre-shared key has been configured.
    pub const PSK_PLACEHOLDER: &str = "00000000";
}

/// Defaults for [`SupplicantConfig`](crate::SupplicantConfig).
pub mod defaults {
    use std::time::Duration;

    /// Maximum number of access points kept in the scan cache.
    pub const CACHE_CAPACITY: usize = 20;

    /// Maximum time to wait for a reply to a single command (10 seconds).
    ///
    /// Matches the request timeout used by `wpa_cli`.
    const COMMAND_TIMEOUT_SECS: u64 = 10;

    /// Capacity of the notification broadcast channel.
    pub const NOTIFICATION_CAPACITY: usize = 64;

    /// Largest datagram the daemon sends in one reply.
    pub const MAX_DATAGRAM: usize = 16 * 1024;

    /// Returns the default command timeout.
    pub fn command_timeout() -> Duration {
        Duration::from_secs(COMMAND_TIMEOUT_SECS)
    }
}
