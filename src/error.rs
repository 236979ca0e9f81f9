use std::{fmt, io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing value for {0}")]
    Configuration(&'static str),
    #[error("could not read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is empty, expected at least one line", .0.display())]
    EmptyFile(PathBuf),
    #[error("invalid address {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message {0}")]
    Message(#[from] lettre::error::Error),
    #[error("invalid SMTP host {0}")]
    Host(String),
    #[error("mail transport error {0}")]
    Smtp(String),
}

/// Broad classes of failure, each one fatal for the invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    FileAccess,
    Composition,
    Transport,
}

impl Error {
    /// process exit status for any runtime failure, command line errors (2)
    /// are reported by the argument parser before the core runs
    pub const EXIT_GENERAL_ERROR: i32 = 1;

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) | Error::Host(_) => ErrorKind::Configuration,
            Error::FileAccess { .. } | Error::EmptyFile(_) => ErrorKind::FileAccess,
            Error::Address(_) | Error::Message(_) => ErrorKind::Composition,
            Error::Smtp(_) => ErrorKind::Transport,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration error",
            ErrorKind::FileAccess => "file access error",
            ErrorKind::Composition => "composition error",
            ErrorKind::Transport => "transport error",
        };

        f.write_str(name)
    }
}
