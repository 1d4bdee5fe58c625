//! Database access used by the connectivity probe.
//!
//! The probe only needs two things from the database layer: a pool it can
//! acquire a connection from, and a connection that can report the server
//! version and answer a trivial query. Both are traits so handlers receive the
//! pool through `AppState` and tests can swap in a fake.
//!
//! Dropping a `Box<dyn ProbeConnection>` returns the connection to its pool.

mod error;
mod postgres;

use async_trait::async_trait;

pub use error::{DbError, FailureKind};
pub use postgres::PgProbePool;

/// A pool that hands out connections for health probing.
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// Acquire a connection. The connection is released when dropped.
    async fn acquire(&self) -> Result<Box<dyn ProbeConnection>, DbError>;
}

/// A checked-out connection.
#[async_trait]
pub trait ProbeConnection: Send {
    /// The server's self-reported version string.
    async fn server_version(&mut self) -> Result<String, DbError>;

    /// Constant-result query confirming the connection still responds.
    async fn ping(&mut self) -> Result<(), DbError>;
}
