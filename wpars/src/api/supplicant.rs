use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::api::models::{
    ApScanMode, ConfiguredNetwork, ConnectionState, NetworkDescriptor, NetworkId, Notification,
    Status, SupplicantConfig,
};
use crate::control::socket::{ControlSocket, discover};
use crate::control::transport::Transport;
use crate::core::network::{
    add_network, connect, disable_network, disconnect, enable_network, get_network_variable,
    list_networks, remove_network, save, select_network, set_ap_scan_mode, set_network_variable,
};
use crate::core::scan::{refresh_scan_results, scan, scan_results};
use crate::core::session::Session;
use crate::core::status::{query_status, status};
use crate::monitoring::events::{handle_event, spawn_event_loop};
use crate::Result;

/// High-level interface to wpa_supplicant over its control socket.
///
/// This is the main entry point of the crate. A `Supplicant` owns the
/// control channel, tracks the daemon's connection state, caches scan
/// results and publishes [`Notification`]s as events arrive.
///
/// # Creating an Instance
///
/// ```no_run
/// use wpars::Supplicant;
///
/// # async fn example() -> wpars::Result<()> {
/// let supplicant = Supplicant::new().await?;
/// println!("state: {}", supplicant.state().await);
/// # Ok(())
/// # }
/// ```
///
/// To observe the notifications emitted during initialization, open the
/// channel first, subscribe, then run [`init`](Supplicant::init):
///
/// ```no_run
/// use wpars::{Supplicant, SupplicantConfig};
///
/// # async fn example() -> wpars::Result<()> {
/// let supplicant = Supplicant::open(SupplicantConfig::default()).await?;
/// let mut notifications = supplicant.subscribe();
/// supplicant.init().await?;
///
/// while let Ok(n) = notifications.recv().await {
///     println!("{n:?}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Scanning
///
/// ```no_run
/// use wpars::{Notification, Supplicant};
///
/// # async fn example() -> wpars::Result<()> {
/// let supplicant = Supplicant::new().await?;
/// let mut notifications = supplicant.subscribe();
///
/// supplicant.scan().await?;
/// while let Ok(n) = notifications.recv().await {
///     if n == Notification::Discovery {
///         break;
///     }
/// }
///
/// for net in supplicant.scan_results().await.unwrap_or_default() {
///     println!("{net} {} dBm", net.signal_level());
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `Supplicant` is `Clone` and can be shared across tasks. Clones share the
/// same control channel, state and scan cache. Commands are serialized on
/// the channel; only one is in flight at a time.
#[derive(Clone)]
pub struct Supplicant {
    session: Arc<Session>,
}

impl Supplicant {
    /// Connects to the first interface under `/var/run/wpa_supplicant` and
    /// initializes state.
    pub async fn new() -> Result<Self> {
        Self::with_config(SupplicantConfig::default()).await
    }

    /// Like [`new`](Supplicant::new) with a custom configuration.
    pub async fn with_config(config: SupplicantConfig) -> Result<Self> {
        let supplicant = Self::open(config).await?;
        supplicant.init().await?;
        Ok(supplicant)
    }

    /// Locates and binds the control socket and starts listening for events,
    /// without querying the daemon.
    ///
    /// # Errors
    ///
    /// Returns `WpaError::NoControlSocket` if the control directory is
    /// missing or empty. This is fatal: there is no retry.
    pub async fn open(config: SupplicantConfig) -> Result<Self> {
        config.validate()?;
        let (path, interface) = discover(&config)?;
        let socket = ControlSocket::bind(&path, &config.local_dir, config.command_timeout).await?;
        Self::attach(socket, Some(interface), &config).await
    }

    /// Runs the client over a caller-supplied transport.
    ///
    /// Like [`open`](Supplicant::open), this does not query the daemon;
    /// call [`init`](Supplicant::init) next.
    pub async fn with_transport<T: Transport>(transport: T, config: SupplicantConfig) -> Result<Self> {
        config.validate()?;
        Self::attach(transport, None, &config).await
    }

    async fn attach<T: Transport>(
        mut transport: T,
        interface: Option<String>,
        config: &SupplicantConfig,
    ) -> Result<Self> {
        let events = transport.start().await?;
        let session = Arc::new(Session::new(
            Box::new(transport),
            interface,
            config.cache_capacity,
        ));
        spawn_event_loop(Arc::downgrade(&session), events);
        Ok(Self { session })
    }

    /// Seeds state from the daemon.
    ///
    /// Publishes the current state, queries STATUS, then publishes the state
    /// again.
    pub async fn init(&self) -> Result<()> {
        self.session.publish_state(None).await;
        query_status(&self.session).await?;
        self.session.publish_state(None).await;
        Ok(())
    }

    /// Subscribes to state changes, discoveries and error conditions.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.session.subscribe()
    }

    /// Feeds one raw event line into the state machine.
    ///
    /// Events from the transport are dispatched automatically; this is for
    /// hosts that receive daemon events by other means.
    pub async fn handle_event(&self, line: &str) -> Result<()> {
        handle_event(&self.session, line).await
    }

    /// Returns the tracked connection state.
    pub async fn state(&self) -> ConnectionState {
        self.session.state().await.wpa_state.clone()
    }

    /// Returns the interface MAC address from the last STATUS.
    pub async fn address(&self) -> Option<String> {
        self.session.state().await.address.clone()
    }

    /// Returns the interface name, if the channel was located by discovery.
    #[must_use]
    pub fn interface(&self) -> Option<&str> {
        self.session.interface()
    }

    /// Returns a copy of the descriptor tracking the active network.
    pub async fn current_network(&self) -> NetworkDescriptor {
        self.session.state().await.current.clone()
    }

    /// Re-reads STATUS and merges the active network into
    /// [`current_network`](Supplicant::current_network).
    ///
    /// Only fields that already hold a value are overwritten by the merge.
    /// Publishes [`Notification::StateChanged`] if the state moved.
    pub async fn query_status(&self) -> Result<()> {
        let before = self.state().await;
        query_status(&self.session).await?;
        self.session.publish_if_changed(&before).await;
        Ok(())
    }

    /// Returns the full STATUS report.
    ///
    /// Publishes [`Notification::StateChanged`] if the state moved. A `FAIL`
    /// reply returns `WpaError::CommandRejected` and changes nothing.
    pub async fn status(&self) -> Result<Status> {
        let before = self.state().await;
        let report = status(&self.session).await?;
        self.session.publish_if_changed(&before).await;
        Ok(report)
    }

    /// Requests a scan.
    ///
    /// Results are fetched automatically when the daemon reports them and
    /// announced with [`Notification::Discovery`].
    ///
    /// # Errors
    ///
    /// Returns `WpaError::ScanBusy`, and emits [`Fault::ScanBusy`](crate::Fault::ScanBusy),
    /// if the daemon does not accept the request.
    pub async fn scan(&self) -> Result<()> {
        scan(&self.session).await
    }

    /// Dumps the daemon's BSS table into the scan cache now.
    pub async fn refresh_scan_results(&self) -> Result<()> {
        refresh_scan_results(&self.session).await
    }

    /// Lists cached access points, or `None` if none were seen yet.
    pub async fn scan_results(&self) -> Option<Vec<NetworkDescriptor>> {
        scan_results(&self.session).await
    }

    /// Configures a new network slot for `network` and selects it.
    ///
    /// Returns the allocated slot. Steps are not rolled back if one fails.
    ///
    /// Only descriptors built from scan results or
    /// [`NetworkDescriptor::from_record`] are accepted:
    ///
    /// ```compile_fail
    /// # async fn example(supplicant: wpars::Supplicant) {
    /// supplicant.connect(&"MyNetwork").await;
    /// # }
    /// ```
    pub async fn connect(&self, network: &NetworkDescriptor) -> Result<NetworkId> {
        connect(&self.session, network).await
    }

    /// Disconnects and marks the client `Disconnected` without waiting for
    /// the daemon to confirm.
    pub async fn disconnect(&self) -> Result<()> {
        disconnect(&self.session).await
    }

    /// Asks the daemon to write its configuration file.
    pub async fn save(&self) -> Result<()> {
        save(&self.session).await
    }

    pub async fn set_ap_scan_mode(&self, mode: ApScanMode) -> Result<()> {
        set_ap_scan_mode(&self.session, mode).await
    }

    pub async fn add_network(&self) -> Result<NetworkId> {
        add_network(&self.session).await
    }

    pub async fn select_network(&self, id: &NetworkId) -> Result<()> {
        select_network(&self.session, id).await
    }

    pub async fn enable_network(&self, id: &NetworkId) -> Result<()> {
        enable_network(&self.session, id).await
    }

    pub async fn disable_network(&self, id: &NetworkId) -> Result<()> {
        disable_network(&self.session, id).await
    }

    pub async fn remove_network(&self, id: &NetworkId) -> Result<()> {
        remove_network(&self.session, id).await
    }

    /// Sets a network variable. The value is quoted unless `raw` is set;
    /// enumerated variables such as `key_mgmt` need `raw`.
    pub async fn set_network_variable(
        &self,
        id: &NetworkId,
        name: &str,
        value: &str,
        raw: bool,
    ) -> Result<()> {
        set_network_variable(&self.session, id, name, value, raw).await
    }

    pub async fn get_network_variable(&self, id: &NetworkId, name: &str) -> Result<String> {
        get_network_variable(&self.session, &id.to_string(), name).await
    }

    /// Lists the network slots configured in the daemon.
    pub async fn list_networks(&self) -> Result<Vec<ConfiguredNetwork>> {
        list_networks(&self.session).await
    }
}

impl Debug for Supplicant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supplicant")
            .field("interface", &self.session.interface())
            .finish_non_exhaustive()
    }
}
