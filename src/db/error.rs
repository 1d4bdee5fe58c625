//! Database failure classification.
//!
//! Driver errors are turned into a `DbError` exactly once, at the boundary of
//! the database layer. Handlers branch on `FailureKind` and never inspect
//! driver error strings.

use std::fmt;
use std::io;

/// Coarse category of a database failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The server actively refused the TCP connection
    ConnectionRefused,
    /// Connecting or acquiring a pooled connection took too long
    TimedOut,
    /// Authentication, query, protocol and everything else
    Other,
}

impl FailureKind {
    /// True for failures that mean the database could not be reached.
    pub fn is_connectivity(self) -> bool {
        matches!(self, FailureKind::ConnectionRefused | FailureKind::TimedOut)
    }

    /// Well-known code for the connectivity categories.
    pub fn code(self) -> Option<&'static str> {
        match self {
            FailureKind::ConnectionRefused => Some("ECONNREFUSED"),
            FailureKind::TimedOut => Some("ETIMEDOUT"),
            FailureKind::Other => None,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ConnectionRefused => write!(f, "connection_refused"),
            FailureKind::TimedOut => write!(f, "timed_out"),
            FailureKind::Other => write!(f, "other"),
        }
    }
}

/// A classified database failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DbError {
    pub kind: FailureKind,
    /// Driver-supplied code, e.g. `ECONNREFUSED` or a SQLSTATE such as `28P01`
    pub code: Option<String>,
    pub message: String,
}

impl DbError {
    pub fn new(kind: FailureKind, code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    /// Build an error of a connectivity kind carrying that kind's code.
    pub fn connectivity(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::new(kind, kind.code().map(str::to_string), message)
    }
}

/// Map an I/O error kind to a category and errno-style code.
fn classify_io(err: &io::Error) -> (FailureKind, Option<&'static str>) {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => (FailureKind::ConnectionRefused, Some("ECONNREFUSED")),
        io::ErrorKind::TimedOut => (FailureKind::TimedOut, Some("ETIMEDOUT")),
        io::ErrorKind::ConnectionReset => (FailureKind::Other, Some("ECONNRESET")),
        io::ErrorKind::ConnectionAborted => (FailureKind::Other, Some("ECONNABORTED")),
        io::ErrorKind::NotFound => (FailureKind::Other, Some("ENOTFOUND")),
        _ => (FailureKind::Other, None),
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let message = err.to_string();
        match &err {
            sqlx::Error::Io(io_err) => {
                let (kind, code) = classify_io(io_err);
                DbError::new(kind, code.map(str::to_string), message)
            }
            sqlx::Error::PoolTimedOut => DbError::connectivity(FailureKind::TimedOut, message),
            sqlx::Error::Database(db_err) => DbError::new(
                FailureKind::Other,
                db_err.code().map(|code| code.into_owned()),
                message,
            ),
            _ => DbError::new(FailureKind::Other, None, message),
        }
    }
}
