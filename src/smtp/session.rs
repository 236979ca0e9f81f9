use lettre::address::Envelope;
use tracing::{debug, info, warn};

use super::Transport;
use crate::{error::Result, message::EmailMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Connected,
    DebugEnabled,
    Sent,
    Closed,
    Failed,
}

/// Drives a transport through a single delivery, the transport is closed on
/// every path once a connection was attempted
pub struct Session<T: Transport> {
    transport: T,
    state: SessionState,
    debug: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: SessionState::Unconnected,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;

        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// deliver a message to all of its recipients in one transaction, no
    /// retries; a send error takes precedence over a close error
    pub fn deliver(&mut self, host: &str, message: &EmailMessage) -> Result<()> {
        // nothing is opened when the message itself is unusable
        let envelope = message.envelope()?;
        let payload = message.formatted();

        let sent = self.transmit(host, &envelope, &payload);
        let closed = self.transport.close();

        match (sent, closed) {
            (Ok(()), Ok(())) => {
                self.transition(SessionState::Closed);

                Ok(())
            }
            (Err(e), closed) => {
                if let Err(close_error) = closed {
                    warn!("Closing the session failed as well: {close_error}");
                }
                self.transition(SessionState::Failed);

                Err(e)
            }
            (Ok(()), Err(e)) => {
                self.transition(SessionState::Failed);

                Err(e)
            }
        }
    }

    fn transmit(
        &mut self,
        host: &str,
        envelope: &Envelope,
        payload: &[u8],
    ) -> Result<()> {
        self.transport.connect(host)?;
        self.transition(SessionState::Connected);

        if self.debug {
            self.transport.enable_debug();
            self.transition(SessionState::DebugEnabled);
        }

        self.transport.send(envelope, payload)?;
        self.transition(SessionState::Sent);

        info!(
            "Sent message from {:?} to {} recipient(s)",
            envelope.from().map(ToString::to_string),
            envelope.to().len()
        );

        Ok(())
    }

    fn transition(&mut self, state: SessionState) {
        debug!("Session {:?} -> {:?}", self.state, state);

        self.state = state;
    }
}
