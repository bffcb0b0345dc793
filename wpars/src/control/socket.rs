//! Unix datagram control socket.
//!
//! wpa_supplicant listens on one datagram socket per interface under its
//! control directory. The client binds its own socket, connects to the
//! daemon's and sends `ATTACH` so that events are pushed on the same socket.
//!
//! # Demultiplexing
//!
//! A background reader owns the receive side. Datagrams starting with the
//! `<N>` priority tag are events and go to the event channel; anything else
//! completes the single outstanding command. Commands are serialised by an
//! async mutex, so at most one is outstanding.
//!
//! A command that times out still owes a reply. The reader drops the next
//! reply it sees for each such command, so a late answer is never handed to
//! the command sent after it.

use async_trait::async_trait;
use futures::{FutureExt, select};
use futures_timer::Delay;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixDatagram;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::models::{SupplicantConfig, WpaError};
use crate::control::transport::{Reply, Transport};
use crate::types::constants::{command, defaults, event, paths};
use crate::Result;

/// Reply bookkeeping shared by `write` and the reader task.
#[derive(Debug, Default)]
struct PendingReply {
    /// Completes the outstanding command.
    reply: Option<oneshot::Sender<String>>,
    /// Replies still due for commands that timed out.
    stale: usize,
    /// Set once the reader has stopped.
    closed: bool,
}

impl PendingReply {
    /// Routes one reply datagram.
    fn deliver(&mut self, msg: String) {
        if self.stale > 0 {
            self.stale -= 1;
            debug!("Dropping late reply: {}", msg.trim());
        } else if let Some(tx) = self.reply.take() {
            let _ = tx.send(msg);
        } else {
            debug!("Dropping reply with no outstanding command: {}", msg.trim());
        }
    }

    /// Gives up on the outstanding command.
    ///
    /// If its reply has not arrived yet, the next reply is marked stale.
    fn abandon(&mut self) {
        if self.reply.take().is_some() {
            self.stale += 1;
        }
    }

    /// Fails the outstanding command and every later one with `ChannelClosed`.
    fn close(&mut self) {
        self.closed = true;
        self.reply.take();
    }
}

/// Finds the daemon socket to talk to.
///
/// Returns the socket path and interface name. Uses the configured interface
/// if one is set, otherwise the first entry of the control directory in
/// lexical order.
pub(crate) fn discover(config: &SupplicantConfig) -> Result<(PathBuf, String)> {
    let no_socket = || WpaError::NoControlSocket {
        path: config.ctrl_dir.clone(),
    };

    let mut interfaces: Vec<String> = std::fs::read_dir(&config.ctrl_dir)
        .map_err(|e| {
            warn!("Cannot read {}: {e}", config.ctrl_dir.display());
            no_socket()
        })?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    interfaces.sort();

    let interface = match &config.interface {
        Some(wanted) => interfaces
            .into_iter()
            .find(|i| i == wanted)
            .ok_or_else(no_socket)?,
        None => interfaces.into_iter().next().ok_or_else(no_socket)?,
    };

    debug!("Using control socket for interface {interface}");
    Ok((config.ctrl_dir.join(&interface), interface))
}

/// Client end of a wpa_supplicant control socket.
#[derive(Debug)]
pub struct ControlSocket {
    socket: Arc<UnixDatagram>,
    local_path: PathBuf,
    remote_path: PathBuf,
    pending: Arc<Mutex<PendingReply>>,
    command_lock: Mutex<()>,
    timeout: Duration,
    reader: Option<JoinHandle<()>>,
}

impl ControlSocket {
    /// Binds a fresh local socket in `local_dir` and connects it to `remote`.
    pub async fn bind(remote: &Path, local_dir: &Path, timeout: Duration) -> Result<Self> {
        let local_path = local_dir.join(format!(
            "{}{}",
            paths::LOCAL_PREFIX,
            Uuid::new_v4().simple()
        ));

        let socket = UnixDatagram::bind(&local_path)?;
        if let Err(e) = socket.connect(remote) {
            let _ = std::fs::remove_file(&local_path);
            return Err(e.into());
        }

        debug!(
            "Bound {} to {}",
            local_path.display(),
            remote.display()
        );

        Ok(Self {
            socket: Arc::new(socket),
            local_path,
            remote_path: remote.to_path_buf(),
            pending: Arc::new(Mutex::new(PendingReply::default())),
            command_lock: Mutex::new(()),
            timeout,
            reader: None,
        })
    }

    /// Path of the daemon socket this client is connected to.
    #[must_use]
    pub fn remote_path(&self) -> &Path {
        &self.remote_path
    }

    fn spawn_reader(&mut self, events: mpsc::UnboundedSender<String>) {
        let socket = Arc::clone(&self.socket);
        let pending = Arc::clone(&self.pending);

        self.reader = Some(tokio::spawn(async move {
            let mut buf = vec![0u8; defaults::MAX_DATAGRAM];
            loop {
                let n = match socket.recv(&mut buf).await {
                    Ok(0) => continue,
                    Ok(n) => n,
                    Err(e) => {
                        warn!("Control socket read failed: {e}");
                        pending.lock().await.close();
                        break;
                    }
                };

                let msg = String::from_utf8_lossy(&buf[..n]).into_owned();

                if buf[0] == event::PRIORITY_TAG_START {
                    if events.send(msg).is_err() {
                        debug!("Event receiver dropped, discarding event");
                    }
                } else {
                    pending.lock().await.deliver(msg);
                }
            }
        }));
    }
}

#[async_trait]
impl Transport for ControlSocket {
    async fn start(&mut self) -> Result<mpsc::UnboundedReceiver<String>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.spawn_reader(tx);

        let reply = self.write(command::ATTACH).await?;
        if !reply.is_ok() {
            return Err(WpaError::AttachFailed(reply.trimmed().to_string()));
        }

        debug!("Attached to {}", self.remote_path.display());
        Ok(rx)
    }

    async fn write(&self, command: &str) -> Result<Reply> {
        let _guard = self.command_lock.lock().await;

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if pending.closed {
                return Err(WpaError::ChannelClosed);
            }
            pending.reply = Some(tx);
        }

        debug!("-> {command}");
        if let Err(e) = self.socket.send(command.as_bytes()).await {
            self.pending.lock().await.reply.take();
            return Err(e.into());
        }

        let mut reply = pin!(rx.fuse());
        let mut timeout_delay = pin!(Delay::new(self.timeout).fuse());

        select! {
            payload = reply => match payload {
                Ok(payload) => {
                    debug!("<- {}", payload.trim_end());
                    Ok(Reply::new(payload))
                }
                Err(_) => Err(WpaError::ChannelClosed),
            },
            _ = timeout_delay => {
                self.pending.lock().await.abandon();
                warn!("{command} timed out after {:?}", self.timeout);
                Err(WpaError::Timeout { command: command.to_string() })
            }
        }
    }
}

impl Drop for ControlSocket {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Err(e) = std::fs::remove_file(&self.local_path) {
            debug!("Failed to remove {}: {e}", self.local_path.display());
        }
    }
}
