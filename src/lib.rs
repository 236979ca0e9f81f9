use tracing::debug;

mod config;
mod error;
mod message;
mod report;
mod resolve;
mod smtp;

#[cfg(test)]
mod tests;

/// retrieve the version from Cargo.toml, note that this will yield an error
/// when compiling without cargo
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const RELEASE_STAGE: &str = "General Availability (GA)";

pub use config::{Config, Resolved};
pub use error::{Error, ErrorKind, Result};
pub use message::{compose, compose_at, Draft, EmailMessage};
pub use report::{version_details, Stopwatch};
pub use resolve::{resolve, Cardinality, ResolvedField};
pub use smtp::{Session, SessionState, SmtpRelay, Transport};

/// Resolve the configured fields, compose the message and deliver it over a
/// plain SMTP relay
pub fn run(config: &Config) -> Result<()> {
    send_with(config, SmtpRelay::new())
}

/// same as [`run`] over any transport
pub fn send_with<T: Transport>(config: &Config, transport: T) -> Result<()> {
    let Resolved { smtp_host, draft } = config.resolve()?;
    let message = compose(&draft)?;

    debug!("Delivering message dated {}", message.date().to_rfc2822());

    Session::new(transport)
        .with_debug(config.debug)
        .deliver(&smtp_host, &message)
}
