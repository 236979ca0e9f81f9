use std::time::Duration;

use lettre::{
    address::Envelope,
    transport::smtp::{client::SmtpConnection, extension::ClientId, SMTP_PORT},
};
use tracing::{debug, info, warn};

use super::Transport;
use crate::error::{Error, Result};

const TIMEOUT: Duration = Duration::from_secs(60);

/// Plain relay on the default SMTP port unless the host names one, no TLS and
/// no authentication
pub struct SmtpRelay {
    hello_name: ClientId,
    connection: Option<SmtpConnection>,
    debug: bool,
}

impl SmtpRelay {
    pub fn new() -> Self {
        Self {
            hello_name: ClientId::default(),
            connection: None,
            debug: false,
        }
    }
}

impl Default for SmtpRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SmtpRelay {
    fn connect(&mut self, host: &str) -> Result<()> {
        let (server, port) = split_host(host)?;

        info!("Connecting to SMTP host {server}:{port}");

        let connection =
            SmtpConnection::connect((server, port), Some(TIMEOUT), &self.hello_name, None, None)
                .map_err(|e| Error::Smtp(format!("could not connect to {host}: {e}")))?;

        self.connection = Some(connection);

        Ok(())
    }

    fn enable_debug(&mut self) {
        self.debug = true;

        debug!("SMTP conversation logging enabled");
    }

    fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<()> {
        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| Error::Smtp("not connected".to_owned()))?;

        if self.debug {
            debug!("Sending {} byte(s) to {:?}", message.len(), envelope.to());
        }

        let response = connection
            .send(envelope, message)
            .map_err(|e| Error::Smtp(e.to_string()))?;

        info!(
            "Message accepted: {} {}",
            response.code(),
            response.message().collect::<Vec<&str>>().join(" ")
        );

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(mut connection) = self.connection.take() else {
            return Ok(());
        };

        if connection.has_broken() {
            warn!("Connection broken, dropping it without QUIT");
            connection.abort();

            return Ok(());
        }

        connection
            .quit()
            .map_err(|e| Error::Smtp(format!("could not close session: {e}")))?;

        debug!("Connection closed");

        Ok(())
    }
}

/// split `host`, `host:port` or `[v6]:port`, a bare IPv6 address keeps the
/// default port
fn split_host(host: &str) -> Result<(&str, u16)> {
    let invalid = || Error::Host(host.to_owned());

    let (server, port) = if let Some(rest) = host.strip_prefix('[') {
        let (server, rest) = rest.split_once(']').ok_or_else(invalid)?;

        match rest.strip_prefix(':') {
            Some(port) => (server, Some(port)),
            None if rest.is_empty() => (server, None),
            None => return Err(invalid()),
        }
    } else {
        match host.split_once(':') {
            Some((server, port)) if !port.contains(':') => (server, Some(port)),
            _ => (host, None),
        }
    };

    if server.is_empty() {
        return Err(invalid());
    }

    match port {
        Some(port) => Ok((server, port.parse().map_err(|_| invalid())?)),
        None => Ok((server, SMTP_PORT)),
    }
}
