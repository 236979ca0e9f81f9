use lettre::address::Envelope;

use crate::error::Result;

mod relay;
mod session;

pub use relay::SmtpRelay;
pub use session::{Session, SessionState};

/// One outbound SMTP session: connect, optionally log the conversation, hand
/// over a single message and close again
pub trait Transport {
    fn connect(&mut self, host: &str) -> Result<()>;

    /// purely observational, must not change the protocol exchange
    fn enable_debug(&mut self);

    fn send(&mut self, envelope: &Envelope, message: &[u8]) -> Result<()>;

    /// close the session, a no-op when it was never opened
    fn close(&mut self) -> Result<()>;
}
