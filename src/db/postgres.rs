//! PostgreSQL pool backed by `sqlx`.
//!
//! The pool is created lazily: no connection is opened at startup, so the
//! service comes up even when the database is down and reports that through
//! `/health/db` instead of refusing to start.
//!
//! `sqlx` retries refused connects until its acquire timeout and then reports
//! only `PoolTimedOut`. When that happens with no live connections, one direct
//! connect attempt recovers the underlying cause (for example a refused TCP
//! connection) so the health report names it.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::{Connection, Postgres};

use super::{DatabasePool, DbError, ProbeConnection};
use crate::config::{DatabaseConfig, SERVICE_NAME};

/// Server version query
const VERSION_QUERY: &str = "SELECT version()";

/// Constant-result liveness query
const PING_QUERY: &str = "SELECT 1";

/// Process-wide PostgreSQL pool, constructed once at startup and shared via `AppState`.
#[derive(Clone)]
pub struct PgProbePool {
    pool: PgPool,
    connect_options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgProbePool {
    /// Build a lazily-connecting pool from configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let connect_options = Self::connect_options(config);
        let pool = Self::pool_options(config).connect_lazy_with(connect_options.clone());
        Self {
            pool,
            connect_options,
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
        }
    }

    fn connect_options(config: &DatabaseConfig) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password)
            .application_name(SERVICE_NAME)
    }

    fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_seconds)))
    }

    /// Idle connections currently held by the pool.
    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Find out why the pool could not open a connection.
    ///
    /// Returns the direct connect error, or `timed_out` unchanged when the
    /// direct attempt also stalls or unexpectedly succeeds.
    async fn diagnose_timeout(&self, timed_out: sqlx::Error) -> DbError {
        let connect = PgConnection::connect_with(&self.connect_options);
        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "Direct connect after pool timeout failed");
                err.into()
            }
            Ok(Ok(conn)) => {
                if let Err(e) = conn.close().await {
                    tracing::debug!(error = %e, "Failed to close diagnostic connection");
                }
                timed_out.into()
            }
            Err(_) => timed_out.into(),
        }
    }

    /// Close all connections. Called during shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DatabasePool for PgProbePool {
    async fn acquire(&self) -> Result<Box<dyn ProbeConnection>, DbError> {
        match self.pool.acquire().await {
            Ok(conn) => Ok(Box::new(PgProbeConnection { conn })),
            Err(err @ sqlx::Error::PoolTimedOut) if self.pool.size() == 0 => {
                Err(self.diagnose_timeout(err).await)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// A pooled connection; `sqlx` returns it to the pool when dropped.
struct PgProbeConnection {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl ProbeConnection for PgProbeConnection {
    async fn server_version(&mut self) -> Result<String, DbError> {
        let version = sqlx::query_scalar::<_, String>(VERSION_QUERY)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(version)
    }

    async fn ping(&mut self) -> Result<(), DbError> {
        sqlx::query_scalar::<_, i32>(PING_QUERY)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(())
    }
}
