//! Event dispatch.
//!
//! Events arrive on their own channel and may interleave with commands in
//! flight. Each event is handled to completion before the next one is read,
//! so notifications go out in the order the daemon sent the events.

use log::{debug, warn};
use std::sync::Weak;
use tokio::sync::mpsc;

use crate::api::models::{ConnectionState, Fault, Notification, WpaError};
use crate::control::event::DaemonEvent;
use crate::core::scan::refresh_scan_results;
use crate::core::session::Session;
use crate::Result;

/// Handles one raw event line.
///
/// `CTRL-EVENT-DISCONNECTED` is recognised but has no handling yet and
/// returns [`WpaError::NotImplemented`].
pub(crate) async fn handle_event(session: &Session, line: &str) -> Result<()> {
    match DaemonEvent::parse(line) {
        DaemonEvent::ScanResults => refresh_scan_results(session).await,
        DaemonEvent::Connected => {
            session
                .publish_state(Some(ConnectionState::Completed))
                .await;
            Ok(())
        }
        DaemonEvent::Disconnected => Err(WpaError::NotImplemented("CTRL-EVENT-DISCONNECTED")),
        DaemonEvent::PskIncorrect => {
            warn!("Daemon reports the pre-shared key may be incorrect");
            session.notify(Notification::Error(Fault::PskIncorrect));
            Ok(())
        }
        DaemonEvent::Ignored(text) => {
            debug!("Ignoring event: {text}");
            Ok(())
        }
    }
}

/// Spawns the task that feeds events into [`handle_event`].
///
/// The task only holds a weak reference to the session and stops once the
/// event channel closes or the last client handle is dropped.
pub(crate) fn spawn_event_loop(
    session: Weak<Session>,
    mut events: mpsc::UnboundedReceiver<String>,
) {
    tokio::spawn(async move {
        while let Some(line) = events.recv().await {
            let Some(session) = session.upgrade() else {
                break;
            };

            match handle_event(&session, &line).await {
                Ok(()) => {}
                Err(WpaError::NotImplemented(what)) => {
                    debug!("{what} received, handling not implemented");
                }
                Err(e) => warn!("Failed to handle event {}: {e}", line.trim()),
            }
        }
        debug!("Event loop finished");
    });
}
