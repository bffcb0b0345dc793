use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::core::flags::parse_flags;
use crate::types::constants::{defaults, paths, security};
use crate::util::utils::ssid_or_hidden;

/// wpa_supplicant connection state.
///
/// These values mirror the `wpa_state=` field of a STATUS reply. States the
/// client does not act on (e.g. `ASSOCIATING`, `4WAY_HANDSHAKE`) are kept
/// verbatim in [`Other`](ConnectionState::Other).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    /// The client has not yet learned the daemon's state.
    Initialized,
    /// No network is enabled.
    Inactive,
    /// The daemon is scanning for a network.
    Scanning,
    /// Association and key negotiation are complete.
    Completed,
    /// Not associated with any network.
    Disconnected,
    /// Any other state string reported by the daemon.
    Other(String),
}

impl From<&str> for ConnectionState {
    fn from(state: &str) -> Self {
        match state {
            "INITIALIZED" => Self::Initialized,
            "INACTIVE" => Self::Inactive,
            "SCANNING" => Self::Scanning,
            "COMPLETED" => Self::Completed,
            "DISCONNECTED" => Self::Disconnected,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized => write!(f, "INITIALIZED"),
            Self::Inactive => write!(f, "INACTIVE"),
            Self::Scanning => write!(f, "SCANNING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Disconnected => write!(f, "DISCONNECTED"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Identifier of a daemon-side network slot.
///
/// The daemon hands these out from ADD_NETWORK; the token is treated as
/// opaque and only ever passed back to the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Default)]
pub enum NetworkId {
    /// No slot has been allocated yet.
    #[default]
    Unassigned,
    /// Slot allocated by the daemon.
    Assigned(String),
}

impl NetworkId {
    /// Returns the daemon token, if one has been assigned.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Unassigned => None,
            Self::Assigned(id) => Some(id),
        }
    }

    /// Returns whether the daemon has allocated this slot.
    #[must_use]
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

impl Display for NetworkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unassigned => write!(f, "-1"),
            Self::Assigned(id) => write!(f, "{id}"),
        }
    }
}

/// AP_SCAN mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ApScanMode {
    /// No scanning.
    Disabled = 0,
    /// wpa_supplicant requests scans and uses the results to select the AP.
    Supplicant = 1,
    /// The driver associates and takes care of AP selection.
    Driver = 2,
}

/// One raw record of a BSS dump, before any flag parsing.
///
/// All values are kept exactly as the daemon printed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanRecord {
    /// Access point MAC address
    pub bssid: String,
    /// Frequency in MHz
    pub freq: String,
    /// Signal level in dBm
    pub level: String,
    /// Timing synchronization function value
    pub tsf: String,
    /// Bracketed capability string, e.g. `[WPA2-PSK-CCMP][ESS]`
    pub flags: String,
    /// Network SSID, empty for hidden networks
    pub ssid: String,
}

/// Security parameters derived from a capability string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SecurityFields {
    /// Protocol label (`proto` network variable)
    pub protocol_suite: Option<String>,
    /// Key management (`key_mgmt` network variable)
    pub key_management: Option<String>,
    /// Authentication algorithm (`auth_alg` network variable)
    pub auth_algorithm: Option<String>,
    /// Pairwise cipher (`pairwise` network variable)
    pub pairwise_cipher: Option<String>,
    /// Group cipher (`group` network variable)
    pub group_cipher: Option<String>,
}

/// An access point as seen by the client.
///
/// Descriptors are only created from a [`ScanRecord`] or as the empty shell
/// that tracks the current network, so every descriptor passed to
/// [`Supplicant::connect`](crate::Supplicant::connect) went through flag parsing.
///
/// # Example
///
/// ```rust
/// use wpars::{NetworkDescriptor, ScanRecord};
///
/// let net = NetworkDescriptor::from_record(ScanRecord {
///     bssid: "00:11:22:33:44:55".into(),
///     flags: "[WPA2-PSK-CCMP][ESS]".into(),
///     ssid: "home".into(),
///     ..Default::default()
/// });
///
/// assert_eq!(net.key_management(), Some("WPA-PSK"));
/// assert_eq!(net.pairwise_cipher(), Some("CCMP"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkDescriptor {
    bssid: String,
    ssid: String,
    frequency: String,
    signal_level: String,
    timestamp: String,
    flags: String,
    security: SecurityFields,
    network_id: NetworkId,
    #[serde(skip)]
    psk: Option<String>,
}

impl NetworkDescriptor {
    /// Builds a descriptor from a raw scan record, parsing its flags.
    #[must_use]
    pub fn from_record(record: ScanRecord) -> Self {
        let security = if record.flags.is_empty() {
            SecurityFields::default()
        } else {
            parse_flags(&record.flags)
        };

        Self {
            bssid: record.bssid,
            ssid: record.ssid,
            frequency: record.freq,
            signal_level: record.level,
            timestamp: record.tsf,
            flags: record.flags,
            security,
            network_id: NetworkId::Unassigned,
            psk: None,
        }
    }

    /// Empty shell later filled in by status merges.
    pub(crate) fn shell() -> Self {
        Self::from_record(ScanRecord::default())
    }

    /// Overwrites every scan-derived field with a newer sighting.
    ///
    /// The network id and pre-shared key are local state and survive.
    pub(crate) fn merge_sighting(&mut self, newer: NetworkDescriptor) {
        self.bssid = newer.bssid;
        self.ssid = newer.ssid;
        self.frequency = newer.frequency;
        self.signal_level = newer.signal_level;
        self.timestamp = newer.timestamp;
        self.flags = newer.flags;
        self.security = newer.security;
    }

    /// Merges a STATUS/GET_NETWORK result into this descriptor.
    ///
    /// A field is only overwritten when it already holds a non-empty value,
    /// so a fresh shell keeps most of its fields empty after the first merge.
    // NOTE: this under-populates the current network and is probably a latent
    // defect, but hosts may depend on it.
    pub(crate) fn update_from_status(&mut self, update: StatusMerge) {
        if let Some(id) = update.network_id {
            self.assign_network_id(id);
        }
        overwrite_if_set(&mut self.bssid, update.bssid);
        overwrite_if_set(&mut self.ssid, update.ssid);
        overwrite_if_set(&mut self.frequency, update.freq);
        overwrite_option_if_set(&mut self.security.pairwise_cipher, update.pairwise);
        overwrite_option_if_set(&mut self.security.group_cipher, update.group);
        overwrite_option_if_set(&mut self.security.key_management, update.key_mgmt);
    }

    /// Records the daemon slot; an assigned id is never replaced.
    pub(crate) fn assign_network_id(&mut self, id: String) {
        if !self.network_id.is_assigned() {
            self.network_id = NetworkId::Assigned(id);
        }
    }

    /// Sets the pre-shared key used by `connect`.
    pub fn set_preshared_key(&mut self, psk: impl Into<String>) {
        self.psk = Some(psk.into());
    }

    /// Returns the pre-shared key, or the `00000000` placeholder if none was set.
    #[must_use]
    pub fn preshared_key(&self) -> &str {
        self.psk.as_deref().unwrap_or(security::PSK_PLACEHOLDER)
    }

    /// Returns whether a pre-shared key has been configured.
    #[must_use]
    pub fn has_preshared_key(&self) -> bool {
        self.psk.is_some()
    }

    /// Access point MAC address.
    #[must_use]
    pub fn bssid(&self) -> &str {
        &self.bssid
    }

    /// Network SSID; empty for hidden networks.
    #[must_use]
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Frequency as reported by the daemon.
    #[must_use]
    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    /// Signal level as reported by the daemon.
    #[must_use]
    pub fn signal_level(&self) -> &str {
        &self.signal_level
    }

    /// TSF timestamp as reported by the daemon.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Raw capability string.
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// All derived security fields.
    #[must_use]
    pub fn security(&self) -> &SecurityFields {
        &self.security
    }

    #[must_use]
    pub fn protocol_suite(&self) -> Option<&str> {
        self.security.protocol_suite.as_deref()
    }

    #[must_use]
    pub fn key_management(&self) -> Option<&str> {
        self.security.key_management.as_deref()
    }

    #[must_use]
    pub fn auth_algorithm(&self) -> Option<&str> {
        self.security.auth_algorithm.as_deref()
    }

    #[must_use]
    pub fn pairwise_cipher(&self) -> Option<&str> {
        self.security.pairwise_cipher.as_deref()
    }

    #[must_use]
    pub fn group_cipher(&self) -> Option<&str> {
        self.security.group_cipher.as_deref()
    }

    /// Daemon slot for this network, if one was allocated.
    #[must_use]
    pub fn network_id(&self) -> &NetworkId {
        &self.network_id
    }
}

impl Display for NetworkDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", ssid_or_hidden(&self.ssid), self.bssid)
    }
}

fn overwrite_if_set(dst: &mut String, src: Option<String>) {
    if let Some(value) = src
        && !dst.is_empty()
    {
        *dst = value;
    }
}

fn overwrite_option_if_set(dst: &mut Option<String>, src: Option<String>) {
    if let Some(value) = src
        && dst.as_deref().is_some_and(|d| !d.is_empty())
    {
        *dst = Some(value);
    }
}

/// Values collected from STATUS and GET_NETWORK for a status merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StatusMerge {
    pub network_id: Option<String>,
    pub bssid: Option<String>,
    pub ssid: Option<String>,
    pub freq: Option<String>,
    pub pairwise: Option<String>,
    pub group: Option<String>,
    pub key_mgmt: Option<String>,
}

/// Parsed STATUS reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// Daemon connection state
    pub wpa_state: ConnectionState,
    /// Interface MAC address
    pub address: Option<String>,
    /// Associated access point
    pub bssid: Option<String>,
    /// Associated network SSID
    pub ssid: Option<String>,
    /// Operating frequency
    pub freq: Option<String>,
    /// Network slot in use
    pub id: Option<String>,
    pub pairwise_cipher: Option<String>,
    pub group_cipher: Option<String>,
    pub key_mgmt: Option<String>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            wpa_state: ConnectionState::Initialized,
            address: None,
            bssid: None,
            ssid: None,
            freq: None,
            id: None,
            pairwise_cipher: None,
            group_cipher: None,
            key_mgmt: None,
        }
    }
}

/// One row of a LIST_NETWORKS reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfiguredNetwork {
    /// Slot id
    pub id: NetworkId,
    pub ssid: String,
    /// Pinned BSSID or `any`
    pub bssid: String,
    /// Raw flags column, e.g. `[CURRENT]`
    pub flags: String,
    /// Whether this slot is the one in use
    pub current: bool,
    /// Whether this slot is disabled
    pub disabled: bool,
}

/// Notification emitted by a [`Supplicant`](crate::Supplicant).
///
/// Events may arrive while a command is in flight; they are delivered in the
/// order the daemon sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Notification {
    /// The tracked connection state was (re)published.
    StateChanged(ConnectionState),
    /// The scan cache was refreshed from a BSS dump.
    Discovery,
    /// An error condition reported by the daemon.
    Error(Fault),
}

/// Error conditions surfaced through the notification stream.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum Fault {
    /// SCAN was not accepted.
    #[error("SCAN failed because the supplicant is busy")]
    ScanBusy,

    /// The BSS dump following a scan failed.
    #[error("scan results unavailable: BSS dump failed")]
    ScanResultsUnavailable,

    /// The daemon reported a likely wrong pre-shared key.
    #[error("WPA pre-shared key may be incorrect")]
    PskIncorrect,
}

/// Errors that can occur while talking to wpa_supplicant.
#[derive(Debug, Error)]
pub enum WpaError {
    /// An I/O error on the control socket.
    #[error("control socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The control directory is missing or holds no sockets.
    #[error("unable to open connection to supplicant on {}", path.display())]
    NoControlSocket {
        /// Directory that was searched
        path: PathBuf,
    },

    /// ATTACH was not acknowledged.
    #[error("failed to attach to event stream: {0}")]
    AttachFailed(String),

    /// No reply arrived within the configured timeout.
    #[error("command {command} timed out")]
    Timeout {
        /// Command that was sent
        command: String,
    },

    /// The socket reader stopped before a reply arrived.
    #[error("control channel closed")]
    ChannelClosed,

    /// The daemon answered a command with a failure reply.
    #[error("command {command} rejected: {reply}")]
    CommandRejected {
        /// Command that was sent
        command: String,
        /// Trimmed reply
        reply: String,
    },

    /// SCAN was not accepted.
    #[error("SCAN failed because the supplicant is busy")]
    ScanBusy,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The event is recognised but has no handling yet.
    #[error("{0} handling is not implemented")]
    NotImplemented(&'static str),
}

/// Client configuration.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use wpars::SupplicantConfig;
///
/// let config = SupplicantConfig::new()
///     .with_interface("wlan0")
///     .with_cache_capacity(50)
///     .with_command_timeout(Duration::from_secs(3));
///
/// assert_eq!(config.cache_capacity, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplicantConfig {
    /// Directory holding the daemon's per-interface sockets
    pub ctrl_dir: PathBuf,
    /// Interface to control; the first socket in `ctrl_dir` when `None`
    pub interface: Option<String>,
    /// Directory for the client's own socket
    pub local_dir: PathBuf,
    /// Maximum number of access points kept in the scan cache
    pub cache_capacity: usize,
    /// Maximum wait for a single command reply
    pub command_timeout: Duration,
}

impl SupplicantConfig {
    /// Returns the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ctrl_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.ctrl_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interface = Some(interface.into());
        self
    }

    #[must_use]
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Rejects values the client cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.cache_capacity == 0 {
            return Err(WpaError::InvalidConfig(
                "cache capacity must be at least 1".into(),
            ));
        }
        if self.command_timeout.is_zero() {
            return Err(WpaError::InvalidConfig(
                "command timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SupplicantConfig {
    /// Defaults:
    /// - `ctrl_dir`: `/var/run/wpa_supplicant`
    /// - `interface`: `None` (first socket found)
    /// - `local_dir`: `/tmp`
    /// - `cache_capacity`: 20
    /// - `command_timeout`: 10 seconds
    fn default() -> Self {
        Self {
            ctrl_dir: PathBuf::from(paths::CTRL_DIR),
            interface: None,
            local_dir: PathBuf::from(paths::LOCAL_DIR),
            cache_capacity: defaults::CACHE_CAPACITY,
            command_timeout: defaults::command_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bssid: &str, ssid: &str, flags: &str) -> ScanRecord {
        ScanRecord {
            bssid: bssid.into(),
            freq: "2437".into(),
            level: "-40".into(),
            tsf: "0000001234".into(),
            flags: flags.into(),
            ssid: ssid.into(),
        }
    }

    #[test]
    fn connection_state_from_str() {
        assert_eq!(ConnectionState::from("COMPLETED"), ConnectionState::Completed);
        assert_eq!(ConnectionState::from("SCANNING"), ConnectionState::Scanning);
        assert_eq!(ConnectionState::from("INACTIVE"), ConnectionState::Inactive);
        assert_eq!(
            ConnectionState::from("4WAY_HANDSHAKE"),
            ConnectionState::Other("4WAY_HANDSHAKE".into())
        );
    }

    #[test]
    fn connection_state_display_round_trips_wire_name() {
        for s in ["INITIALIZED", "INACTIVE", "SCANNING", "COMPLETED", "DISCONNECTED", "ASSOCIATING"] {
            assert_eq!(ConnectionState::from(s).to_string(), s);
        }
    }

    #[test]
    fn descriptor_from_record_parses_flags() {
        let net = NetworkDescriptor::from_record(record("aa", "home", "[WPA2-PSK-CCMP+TKIP][ESS]"));
        assert_eq!(net.protocol_suite(), Some("WPA RSN"));
        assert_eq!(net.key_management(), Some("WPA-PSK"));
        assert_eq!(net.auth_algorithm(), Some("OPEN"));
        assert_eq!(net.pairwise_cipher(), Some("CCMP TKIP"));
        assert_eq!(net.group_cipher(), Some("CCMP TKIP"));
        assert_eq!(net.network_id(), &NetworkId::Unassigned);
    }

    #[test]
    fn descriptor_without_flags_has_no_security() {
        let net = NetworkDescriptor::from_record(record("aa", "open", ""));
        assert_eq!(net.security(), &SecurityFields::default());
    }

    #[test]
    fn psk_defaults_to_placeholder() {
        let mut net = NetworkDescriptor::from_record(record("aa", "home", "[ESS]"));
        assert_eq!(net.preshared_key(), "00000000");
        assert!(!net.has_preshared_key());

        net.set_preshared_key("hunter22");
        assert_eq!(net.preshared_key(), "hunter22");
    }

    #[test]
    fn psk_is_not_serialized() {
        let mut net = NetworkDescriptor::from_record(record("aa", "home", "[ESS]"));
        net.set_preshared_key("hunter22");
        let json = serde_json::to_string(&net).unwrap();
        assert!(!json.contains("hunter22"));
    }

    #[test]
    fn merge_sighting_keeps_local_state() {
        let mut net = NetworkDescriptor::from_record(record("aa", "home", "[WPA2-PSK-CCMP]"));
        net.assign_network_id("3".into());
        net.set_preshared_key("hunter22");

        net.merge_sighting(NetworkDescriptor::from_record(record("aa", "home", "[ESS]")));

        assert_eq!(net.network_id(), &NetworkId::Assigned("3".into()));
        assert_eq!(net.preshared_key(), "hunter22");
        assert_eq!(net.key_management(), None);
        assert_eq!(net.protocol_suite(), Some("WPA RSN"));
    }

    #[test]
    fn network_id_is_assigned_once() {
        let mut net = NetworkDescriptor::shell();
        net.assign_network_id("1".into());
        net.assign_network_id("2".into());
        assert_eq!(net.network_id().as_str(), Some("1"));
    }

    #[test]
    fn status_merge_into_shell_only_sets_network_id() {
        let mut net = NetworkDescriptor::shell();
        net.update_from_status(StatusMerge {
            network_id: Some("0".into()),
            bssid: Some("aa:bb".into()),
            ssid: Some("home".into()),
            freq: Some("2412".into()),
            pairwise: Some("CCMP".into()),
            group: Some("CCMP".into()),
            key_mgmt: Some("WPA-PSK".into()),
        });

        assert_eq!(net.network_id().as_str(), Some("0"));
        assert_eq!(net.bssid(), "");
        assert_eq!(net.ssid(), "");
        assert_eq!(net.frequency(), "");
        assert_eq!(net.pairwise_cipher(), None);
        assert_eq!(net.key_management(), None);
    }

    #[test]
    fn status_merge_overwrites_populated_fields() {
        let mut net = NetworkDescriptor::from_record(record("aa", "home", "[WPA-PSK-TKIP]"));
        net.update_from_status(StatusMerge {
            bssid: Some("bb".into()),
            freq: Some("5180".into()),
            pairwise: Some("CCMP".into()),
            ..Default::default()
        });

        assert_eq!(net.bssid(), "bb");
        assert_eq!(net.ssid(), "home");
        assert_eq!(net.frequency(), "5180");
        assert_eq!(net.pairwise_cipher(), Some("CCMP"));
        assert_eq!(net.group_cipher(), Some("TKIP"));
    }

    #[test]
    fn descriptor_display_hides_empty_ssid() {
        let net = NetworkDescriptor::from_record(record("aa:bb", "", ""));
        assert_eq!(net.to_string(), "<Hidden Network> (aa:bb)");
    }

    #[test]
    fn network_id_display() {
        assert_eq!(NetworkId::Unassigned.to_string(), "-1");
        assert_eq!(NetworkId::Assigned("7".into()).to_string(), "7");
    }

    #[test]
    fn config_defaults() {
        let config = SupplicantConfig::default();
        assert_eq!(config.ctrl_dir, PathBuf::from("/var/run/wpa_supplicant"));
        assert_eq!(config.cache_capacity, 20);
        assert_eq!(config.command_timeout, Duration::from_secs(10));
        assert!(config.interface.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_capacity_and_timeout() {
        assert!(matches!(
            SupplicantConfig::new().with_cache_capacity(0).validate(),
            Err(WpaError::InvalidConfig(_))
        ));
        assert!(matches!(
            SupplicantConfig::new()
                .with_command_timeout(Duration::ZERO)
                .validate(),
            Err(WpaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn fault_messages() {
        assert_eq!(
            Fault::PskIncorrect.to_string(),
            "WPA pre-shared key may be incorrect"
        );
        assert_eq!(
            Fault::ScanBusy.to_string(),
            "SCAN failed because the supplicant is busy"
        );
    }
}
