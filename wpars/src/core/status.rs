//! STATUS queries.
//!
//! Two flavours: the seeding query run at init, which folds the active
//! network into the tracked descriptor, and the full report returned to
//! callers.

use log::{debug, warn};

use crate::api::models::{ConnectionState, Status, StatusMerge, WpaError};
use crate::control::transport::Reply;
use crate::core::network::get_network_variable;
use crate::core::session::Session;
use crate::types::constants::{command, field, variable};
use crate::util::utils::field_value;
use crate::Result;

/// Parses every field of a STATUS reply the client knows about.
pub(crate) fn parse_status(reply: &Reply) -> Status {
    let mut status = Status::default();

    for line in reply.lines() {
        if let Some(v) = field_value(line, field::WPA_STATE) {
            status.wpa_state = ConnectionState::from(v);
        } else if let Some(v) = field_value(line, field::ADDRESS) {
            status.address = Some(v.to_string());
        } else if let Some(v) = field_value(line, field::BSSID) {
            status.bssid = Some(v.to_string());
        } else if let Some(v) = field_value(line, field::FREQ) {
            status.freq = Some(v.to_string());
        } else if let Some(v) = field_value(line, field::SSID) {
            status.ssid = Some(v.to_string());
        } else if let Some(v) = field_value(line, field::ID) {
            status.id = Some(v.to_string());
        } else if let Some(v) = field_value(line, field::PAIRWISE_CIPHER) {
            status.pairwise_cipher = Some(v.to_string());
        } else if let Some(v) = field_value(line, field::GROUP_CIPHER) {
            status.group_cipher = Some(v.to_string());
        } else if let Some(v) = field_value(line, field::KEY_MGMT) {
            status.key_mgmt = Some(v.to_string());
        }
    }

    status
}

/// Seeds state and address from STATUS and, once associated, merges the
/// active network into the current descriptor.
///
/// The per-network `pairwise`, `group` and `key_mgmt` variables are read
/// with GET_NETWORK for the active slot.
pub(crate) async fn query_status(session: &Session) -> Result<()> {
    let reply = session.write(command::STATUS).await?;
    if reply.is_fail() {
        warn!("STATUS rejected: {reply}");
        return Ok(());
    }

    let status = parse_status(&reply);
    let completed = status.wpa_state == ConnectionState::Completed;
    {
        let mut state = session.state().await;
        state.wpa_state = status.wpa_state.clone();
        if status.address.is_some() {
            state.address = status.address.clone();
        }
    }

    if !completed {
        debug!("Not associated ({}), skipping network merge", status.wpa_state);
        return Ok(());
    }

    let mut merge = StatusMerge {
        network_id: status.id.clone(),
        bssid: status.bssid,
        ssid: status.ssid,
        freq: status.freq,
        ..Default::default()
    };

    if let Some(id) = &status.id {
        merge.pairwise = Some(get_network_variable(session, id, variable::PAIRWISE).await?);
        merge.group = Some(get_network_variable(session, id, variable::GROUP).await?);
        merge.key_mgmt = Some(get_network_variable(session, id, variable::KEY_MGMT).await?);
    }

    session.state().await.current.update_from_status(merge);
    Ok(())
}

/// Returns the full STATUS report, updating tracked state and address.
///
/// A `FAIL` reply is an error and leaves the tracked state alone.
pub(crate) async fn status(session: &Session) -> Result<Status> {
    let reply = session.write(command::STATUS).await?;
    if reply.is_fail() {
        return Err(WpaError::CommandRejected {
            command: command::STATUS.into(),
            reply: reply.trimmed().into(),
        });
    }
    let status = parse_status(&reply);

    let mut state = session.state().await;
    state.wpa_state = status.wpa_state.clone();
    if status.address.is_some() {
        state.address = status.address.clone();
    }

    Ok(status)
}
