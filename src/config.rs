use tracing::debug;

use crate::{
    error::{Error, Result},
    message::Draft,
    resolve::{resolve, Cardinality},
};

/// Everything a single invocation needs, constructed once by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub smtp_host: String,
    pub cc: Option<String>,
    /// reserved for blind carbon copies, not populated yet
    pub bcc: Option<String>,
    /// log the SMTP conversation
    pub debug: bool,
    /// print the execution duration after delivery
    pub duration: bool,
}

/// The effective values of all slots after file/literal resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub smtp_host: String,
    pub draft: Draft,
}

impl Config {
    /// resolve every slot, fails before any network activity when a required
    /// slot has no effective value
    pub fn resolve(&self) -> Result<Resolved> {
        // the body may legitimately resolve to no lines (an empty file), but
        // it has to be supplied
        if self.body.trim().is_empty() {
            return Err(Error::Configuration("body"));
        }

        let from = required("from", resolve(&self.from, Cardinality::Single)?.into_single())?;
        let subject = required(
            "subject",
            resolve(&self.subject, Cardinality::Single)?.into_single(),
        )?;
        let smtp_host = required(
            "smtp host",
            resolve(&self.smtp_host, Cardinality::Single)?.into_single(),
        )?;

        let to = resolve(&self.to, Cardinality::Multiple)?;
        if to.is_empty() {
            return Err(Error::Configuration("to"));
        }
        let to = to.into_lines();

        let body = resolve(&self.body, Cardinality::Multiple)?.into_lines();
        let cc = optional(self.cc.as_deref())?;
        let bcc = optional(self.bcc.as_deref())?;

        debug!(
            "Resolved {} to line(s), {} body line(s), cc: {}",
            to.len(),
            body.len(),
            cc.is_some()
        );

        Ok(Resolved {
            smtp_host,
            draft: Draft {
                from,
                to,
                subject,
                body,
                cc,
                bcc,
            },
        })
    }
}

fn required(name: &'static str, value: String) -> Result<String> {
    if value.is_empty() {
        Err(Error::Configuration(name))
    } else {
        Ok(value)
    }
}

fn optional(value: Option<&str>) -> Result<Option<Vec<String>>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let resolved = resolve(value, Cardinality::Multiple)?;

    if resolved.is_empty() {
        Ok(None)
    } else {
        Ok(Some(resolved.into_lines()))
    }
}
