use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use tokio::sync::mpsc;

use crate::util::utils::{is_fail_reply, is_ok_reply};
use crate::Result;

/// Raw reply payload to one control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply(String);

impl Reply {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    /// Returns the payload exactly as received.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether the payload contains the `OK\n` acknowledgement.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        is_ok_reply(&self.0)
    }

    /// Returns whether the payload is a `FAIL...` reply.
    #[must_use]
    pub fn is_fail(&self) -> bool {
        is_fail_reply(&self.0)
    }

    /// Returns the payload with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }

    /// Iterates the payload line by line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.trimmed())
    }
}

/// A control channel to wpa_supplicant.
///
/// Implementations must keep unsolicited event lines out of command replies:
/// `write` only ever resolves with the reply to the command it sent, and
/// events are handed out through the receiver returned by `start`. At most
/// one command may be outstanding at a time.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Begins listening for events. Called once, before any `write`.
    async fn start(&mut self) -> Result<mpsc::UnboundedReceiver<String>>;

    /// Sends one command and waits for its reply.
    async fn write(&self, command: &str) -> Result<Reply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_classification() {
        assert!(Reply::new("OK\n").is_ok());
        assert!(!Reply::new("FAIL-BUSY\n").is_ok());
        assert!(Reply::new("FAIL-BUSY\n").is_fail());
        assert_eq!(Reply::new(" 3\n").trimmed(), "3");
        assert_eq!(Reply::new("a=1\nb=2\n").lines().count(), 2);
    }
}
