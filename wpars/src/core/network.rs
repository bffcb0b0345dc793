//! Network slot management and association.
//!
//! These commands are sent one at a time and are not transactional: if a
//! step of [`connect`] fails, the slot allocated before it stays configured
//! as far as it got, and the caller is left to inspect status and clean up.

use log::{debug, warn};

use crate::api::models::{
    ApScanMode, ConfiguredNetwork, ConnectionState, NetworkDescriptor, NetworkId, WpaError,
};
use crate::core::session::Session;
use crate::types::constants::{command, security, variable};
use crate::util::utils::format_network_value;
use crate::Result;

/// Sends a command whose acknowledgement is not acted on.
///
/// A non-OK reply is logged and otherwise ignored.
async fn send_unchecked(session: &Session, cmd: &str) -> Result<()> {
    let reply = session.write(cmd).await?;
    if !reply.is_ok() {
        warn!("{cmd} not acknowledged: {reply}");
    }
    Ok(())
}

pub(crate) async fn set_ap_scan_mode(session: &Session, mode: ApScanMode) -> Result<()> {
    send_unchecked(session, &format!("{} {}", command::AP_SCAN, mode as u8)).await
}

/// Allocates a new network slot.
pub(crate) async fn add_network(session: &Session) -> Result<NetworkId> {
    let reply = session.write(command::ADD_NETWORK).await?;
    if reply.is_fail() {
        return Err(WpaError::CommandRejected {
            command: command::ADD_NETWORK.into(),
            reply: reply.trimmed().into(),
        });
    }

    let id = reply.trimmed().to_string();
    debug!("Allocated network slot {id}");
    Ok(NetworkId::Assigned(id))
}

pub(crate) async fn select_network(session: &Session, id: &NetworkId) -> Result<()> {
    send_unchecked(session, &format!("{} {id}", command::SELECT_NETWORK)).await
}

pub(crate) async fn enable_network(session: &Session, id: &NetworkId) -> Result<()> {
    send_unchecked(session, &format!("{} {id}", command::ENABLE_NETWORK)).await
}

pub(crate) async fn disable_network(session: &Session, id: &NetworkId) -> Result<()> {
    send_unchecked(session, &format!("{} {id}", command::DISABLE_NETWORK)).await
}

pub(crate) async fn remove_network(session: &Session, id: &NetworkId) -> Result<()> {
    send_unchecked(session, &format!("{} {id}", command::REMOVE_NETWORK)).await
}

/// Sets one network variable, quoting the value unless `raw` is set.
pub(crate) async fn set_network_variable(
    session: &Session,
    id: &NetworkId,
    name: &str,
    value: &str,
    raw: bool,
) -> Result<()> {
    let value = format_network_value(value, raw);
    send_unchecked(
        session,
        &format!("{} {id} {name} {value}", command::SET_NETWORK),
    )
    .await
}

/// Reads one network variable; the reply is returned trimmed.
pub(crate) async fn get_network_variable(
    session: &Session,
    id: &str,
    name: &str,
) -> Result<String> {
    let reply = session
        .write(&format!("{} {id} {name}", command::GET_NETWORK))
        .await?;
    Ok(reply.trimmed().to_string())
}

/// Parses a LIST_NETWORKS table.
///
/// Columns are tab separated: `network id / ssid / bssid / flags`.
pub(crate) fn parse_network_list(payload: &str) -> Vec<ConfiguredNetwork> {
    payload
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with("network id"))
        .filter_map(|line| {
            let mut cols = line.split('\t');
            let id = cols.next()?.trim();
            if id.is_empty() {
                return None;
            }
            let ssid = cols.next().unwrap_or_default().to_string();
            let bssid = cols.next().unwrap_or_default().to_string();
            let flags = cols.next().unwrap_or_default().to_string();

            Some(ConfiguredNetwork {
                id: NetworkId::Assigned(id.to_string()),
                current: flags.contains("[CURRENT]"),
                disabled: flags.contains("[DISABLED]"),
                ssid,
                bssid,
                flags,
            })
        })
        .collect()
}

pub(crate) async fn list_networks(session: &Session) -> Result<Vec<ConfiguredNetwork>> {
    let reply = session.write(command::LIST_NETWORKS).await?;
    if reply.is_fail() {
        return Err(WpaError::CommandRejected {
            command: command::LIST_NETWORKS.into(),
            reply: reply.trimmed().into(),
        });
    }
    Ok(parse_network_list(reply.as_str()))
}

/// Configures a new slot for `network` and selects it.
///
/// Sequence: ADD_NETWORK, AP_SCAN 1, SET_NETWORK ssid/psk/key_mgmt,
/// SELECT_NETWORK. Networks without a derived key management are
/// configured with `NONE`.
pub(crate) async fn connect(session: &Session, network: &NetworkDescriptor) -> Result<NetworkId> {
    let id = add_network(session).await?;
    set_ap_scan_mode(session, ApScanMode::Supplicant).await?;

    set_network_variable(session, &id, variable::SSID, network.ssid(), false).await?;
    set_network_variable(session, &id, variable::PSK, network.preshared_key(), false).await?;
    let key_mgmt = network
        .key_management()
        .unwrap_or(security::KEY_MGMT_NONE);
    set_network_variable(session, &id, variable::KEY_MGMT, key_mgmt, true).await?;

    select_network(session, &id).await?;
    debug!("Selected network {id} for {network}");
    Ok(id)
}

/// Sends DISCONNECT and moves to `Disconnected` whatever the daemon replies.
pub(crate) async fn disconnect(session: &Session) -> Result<()> {
    let result = send_unchecked(session, command::DISCONNECT).await;
    session
        .publish_state(Some(ConnectionState::Disconnected))
        .await;
    result
}

pub(crate) async fn save(session: &Session) -> Result<()> {
    send_unchecked(session, command::SAVE_CONFIG).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_network_table() {
        let payload = "network id / ssid / bssid / flags\n\
0\thome\tany\t[CURRENT]\n\
1\tcafe\t00:11:22:33:44:55\t[DISABLED]\n\
2\toffice\tany\t\n";
        let nets = parse_network_list(payload);
        assert_eq!(nets.len(), 3);

        assert_eq!(nets[0].id, NetworkId::Assigned("0".into()));
        assert_eq!(nets[0].ssid, "home");
        assert!(nets[0].current);
        assert!(!nets[0].disabled);

        assert_eq!(nets[1].bssid, "00:11:22:33:44:55");
        assert!(nets[1].disabled);

        assert_eq!(nets[2].flags, "");
        assert!(!nets[2].current);
    }

    #[test]
    fn empty_network_table() {
        assert!(parse_network_list("network id / ssid / bssid / flags\n").is_empty());
        assert!(parse_network_list("").is_empty());
    }
}
