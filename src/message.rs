use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use chrono::{DateTime, FixedOffset, Local};
use lettre::{
    address::Envelope,
    message::{
        header::{HeaderName, HeaderValue},
        Mailbox, Mailboxes, MultiPart, SinglePart,
    },
    Address, Message,
};
use tracing::debug;

use crate::error::Result;

pub const CRLF: &str = "\r\n";
pub const COMMA_SPACE: &str = ", ";

/// Resolved fields a message is composed from
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Draft {
    pub from: String,
    /// one or more addresses per entry, entries may be comma separated lists
    pub to: Vec<String>,
    pub subject: String,
    pub body: Vec<String>,
    pub cc: Option<Vec<String>>,
    /// reserved for blind carbon copies, extends the envelope only
    pub bcc: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct EmailMessage {
    date: DateTime<FixedOffset>,
    from: Mailbox,
    to: Vec<Mailbox>,
    cc: Option<Vec<Mailbox>>,
    bcc: Option<Vec<Mailbox>>,
    subject: String,
    body: String,
    message: Message,
}

/// compose a message dated now, in local time
pub fn compose(draft: &Draft) -> Result<EmailMessage> {
    compose_at(draft, Local::now().fixed_offset())
}

/// compose a message with an explicit date, identical inputs yield an
/// identical message
pub fn compose_at(draft: &Draft, date: DateTime<FixedOffset>) -> Result<EmailMessage> {
    let from: Mailbox = draft.from.parse()?;
    let to = parse_mailboxes(&draft.to)?;
    let cc = draft.cc.as_deref().map(parse_mailboxes).transpose()?;
    let bcc = draft.bcc.as_deref().map(parse_mailboxes).transpose()?;
    let body = draft.body.join(CRLF);

    let mut builder = Message::builder()
        .from(from.clone())
        .subject(draft.subject.clone());

    for mailbox in &to {
        builder = builder.to(mailbox.clone());
    }

    for mailbox in cc.iter().flatten() {
        builder = builder.cc(mailbox.clone());
    }

    // a container even for a single part, attachments would go next to it
    let multipart = MultiPart::mixed()
        .boundary(boundary(draft, &date))
        .singlepart(SinglePart::plain(body.clone()));

    let mut message = builder.multipart(multipart)?;

    // lettre only writes UTC dates, keep the local offset
    message.headers_mut().insert_raw(HeaderValue::new(
        HeaderName::new_from_ascii_str("Date"),
        date.to_rfc2822(),
    ));

    debug!(
        "Composed message for {} recipient(s), {} body byte(s)",
        to.len() + cc.as_ref().map_or(0, Vec::len),
        body.len()
    );

    Ok(EmailMessage {
        date,
        from,
        to,
        cc,
        bcc,
        subject: draft.subject.clone(),
        body,
        message,
    })
}

impl EmailMessage {
    pub fn date(&self) -> &DateTime<FixedOffset> {
        &self.date
    }

    pub fn from(&self) -> &Mailbox {
        &self.from
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// the text of the single body part, lines separated by CRLF
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn to_header(&self) -> String {
        join(&self.to)
    }

    /// only present when carbon copies were requested
    pub fn cc_header(&self) -> Option<String> {
        self.cc.as_deref().map(join)
    }

    /// the SMTP recipients: To, then Cc (then Bcc), appended as given
    pub fn recipients(&self) -> Vec<Address> {
        self.to
            .iter()
            .chain(self.cc.iter().flatten())
            .chain(self.bcc.iter().flatten())
            .map(|mailbox| mailbox.email.clone())
            .collect()
    }

    pub fn envelope(&self) -> Result<Envelope> {
        Ok(Envelope::new(
            Some(self.from.email.clone()),
            self.recipients(),
        )?)
    }

    /// the full message as sent over the wire
    pub fn formatted(&self) -> Vec<u8> {
        self.message.formatted()
    }
}

fn parse_mailboxes(entries: &[String]) -> Result<Vec<Mailbox>> {
    let mut mailboxes = Vec::with_capacity(entries.len());

    for entry in entries.iter().filter(|entry| !entry.trim().is_empty()) {
        let parsed: Mailboxes = entry.parse()?;
        mailboxes.extend(parsed);
    }

    Ok(mailboxes)
}

fn join(mailboxes: &[Mailbox]) -> String {
    mailboxes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join(COMMA_SPACE)
}

// derived from the content so composition stays deterministic
fn boundary(draft: &Draft, date: &DateTime<FixedOffset>) -> String {
    let mut hasher = DefaultHasher::new();
    draft.hash(&mut hasher);
    date.timestamp_nanos_opt().hash(&mut hasher);

    format!("sendemail-{:016x}", hasher.finish())
}
