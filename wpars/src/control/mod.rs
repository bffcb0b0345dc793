//! Control channel to wpa_supplicant.
//!
//! This module contains the transport abstraction, the Unix datagram socket
//! implementation and event line classification.

pub(crate) mod event;
pub(crate) mod socket;
pub(crate) mod transport;

pub use socket::ControlSocket;
pub use transport::{Reply, Transport};
