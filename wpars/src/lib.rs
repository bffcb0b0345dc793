//! A Rust client for the wpa_supplicant control interface.
//!
//! This crate talks to wpa_supplicant over its Unix control socket and
//! provides a high-level async API for common Wi-Fi operations:
//!
//! - Scanning and listing nearby access points
//! - Tracking the daemon's connection state
//! - Connecting to open and WPA-PSK networks, disconnecting
//! - Managing the daemon's network slots
//!
//! # Example
//!
//! ```no_run
//! use wpars::Supplicant;
//!
//! # async fn example() -> wpars::Result<()> {
//! let supplicant = Supplicant::new().await?;
//!
//! // Results arrive once the daemon reports CTRL-EVENT-SCAN-RESULTS
//! supplicant.scan().await?;
//!
//! if let Some(networks) = supplicant.scan_results().await {
//!     for net in &networks {
//!         println!("{} {} dBm", net.ssid(), net.signal_level());
//!     }
//!
//!     // Connect to the first one
//!     let mut net = networks[0].clone();
//!     net.set_preshared_key("password123");
//!     supplicant.connect(&net).await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Commands return `Result<T, WpaError>`. Conditions the daemon reports on
//! its own, such as a wrong pre-shared key, are published as
//! [`Notification::Error`] on the stream returned by
//! [`Supplicant::subscribe`].
//!
//! # Events
//!
//! wpa_supplicant pushes event lines on the same socket that carries
//! command replies. The control socket separates the two, so an event can
//! never be mistaken for a reply. Events are handled in the background and
//! drive the connection state, the scan cache and the notification stream.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod core;
mod monitoring;
mod types;
mod util;

// Public API modules
pub mod api;
pub mod control;

// Re-exported public API
pub use api::models::{
    ApScanMode, ConfiguredNetwork, ConnectionState, Fault, NetworkDescriptor, NetworkId,
    Notification, ScanRecord, SecurityFields, Status, SupplicantConfig, WpaError,
};
pub use api::supplicant::Supplicant;
pub use control::{ControlSocket, Reply, Transport};

/// A specialized `Result` type for supplicant operations.
pub type Result<T> = std::result::Result<T, WpaError>;
