//! State shared between a client handle and its event loop.

use log::debug;
use tokio::sync::{Mutex, MutexGuard, broadcast};

use crate::api::models::{ConnectionState, NetworkDescriptor, Notification};
use crate::control::transport::{Reply, Transport};
use crate::core::cache::ScanCache;
use crate::types::constants::defaults;
use crate::Result;

/// Mutable client state. Only the client mutates it; callers get copies.
#[derive(Debug)]
pub(crate) struct ClientState {
    pub wpa_state: ConnectionState,
    pub address: Option<String>,
    pub current: NetworkDescriptor,
    pub cache: ScanCache,
}

pub(crate) struct Session {
    transport: Box<dyn Transport>,
    interface: Option<String>,
    state: Mutex<ClientState>,
    notifier: broadcast::Sender<Notification>,
}

impl Session {
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        interface: Option<String>,
        cache_capacity: usize,
    ) -> Self {
        let (notifier, _) = broadcast::channel(defaults::NOTIFICATION_CAPACITY);
        let cache = ScanCache::new(cache_capacity);
        debug!("Scan cache holds up to {} access points", cache.capacity());

        Self {
            transport,
            interface,
            state: Mutex::new(ClientState {
                wpa_state: ConnectionState::Initialized,
                address: None,
                current: NetworkDescriptor::shell(),
                cache,
            }),
            notifier,
        }
    }

    pub(crate) async fn write(&self, command: &str) -> Result<Reply> {
        self.transport.write(command).await
    }

    pub(crate) fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    pub(crate) async fn state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().await
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub(crate) fn notify(&self, notification: Notification) {
        debug!("Notify: {notification:?}");
        if self.notifier.send(notification).is_err() {
            debug!("No subscribers for notification");
        }
    }

    /// Publishes the current state if it differs from `before`.
    pub(crate) async fn publish_if_changed(&self, before: &ConnectionState) {
        let current = self.state.lock().await.wpa_state.clone();
        if &current != before {
            debug!("State {before} -> {current}");
            self.notify(Notification::StateChanged(current));
        }
    }

    /// Optionally moves to `state`, then publishes the current state.
    pub(crate) async fn publish_state(&self, state: Option<ConnectionState>) {
        let current = {
            let mut guard = self.state.lock().await;
            if let Some(state) = state {
                debug!("State {} -> {state}", guard.wpa_state);
                guard.wpa_state = state;
            }
            guard.wpa_state.clone()
        };
        self.notify(Notification::StateChanged(current));
    }
}
