//! Liveness and database connectivity probes.
//!
//! `probe` never fails: every acquisition or query error is folded into the
//! returned `HealthReport`, so callers can always answer 200 and let
//! orchestrators branch on the payload's `status` field.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DatabaseConfig, APP_NAME, SERVICE_NAME, SERVICE_VERSION};
use crate::db::{DatabasePool, DbError};

/// Backend technology reported in every database health report
pub const DATABASE_KIND: &str = "PostgreSQL";

pub const MESSAGE_CONNECTED: &str = "Conexión a PostgreSQL exitosa";
pub const MESSAGE_CONNECT_FAILED: &str = "Error al conectar con la base de datos";
pub const MESSAGE_UNEXPECTED: &str = "Error inesperado al verificar la base de datos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Result of a database connectivity probe.
///
/// Either `connected` is true with `postgres_version` set and no error, or
/// `connected` is false with `error` set and no version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub database_kind: String,
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub timestamp: String,
    pub status: HealthStatus,
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postgres_version: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl HealthReport {
    /// A report for `config` that has not yet reached the database.
    fn pending(config: &DatabaseConfig) -> Self {
        Self {
            database_kind: DATABASE_KIND.to_string(),
            host: config.host.clone(),
            port: config.port,
            database_name: config.name.clone(),
            timestamp: timestamp(),
            status: HealthStatus::Unhealthy,
            connected: false,
            postgres_version: None,
            message: String::new(),
            error: None,
            error_code: None,
        }
    }

    fn mark_healthy(&mut self, version: String) {
        self.status = HealthStatus::Healthy;
        self.connected = true;
        self.postgres_version = Some(version);
        self.message = MESSAGE_CONNECTED.to_string();
        self.error = None;
        self.error_code = None;
    }

    fn mark_unhealthy(&mut self, err: DbError) {
        self.status = HealthStatus::Unhealthy;
        self.connected = false;
        self.postgres_version = None;
        self.message = if err.kind.is_connectivity() {
            MESSAGE_CONNECT_FAILED
        } else {
            MESSAGE_UNEXPECTED
        }
        .to_string();
        self.error = Some(err.message);
        self.error_code = err.code;
    }
}

/// Liveness payload served at `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessReport {
    pub status: HealthStatus,
    pub timestamp: String,
    pub service: String,
    pub version: String,
    pub app: String,
}

/// Liveness probe. Performs no I/O and cannot fail.
pub fn liveness() -> LivenessReport {
    LivenessReport {
        status: HealthStatus::Healthy,
        timestamp: timestamp(),
        service: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
        app: APP_NAME.to_string(),
    }
}

/// Check database connectivity through `pool`.
///
/// `config` is only echoed into the report.
pub async fn probe(pool: &dyn DatabasePool, config: &DatabaseConfig) -> HealthReport {
    let mut report = HealthReport::pending(config);

    match check(pool).await {
        Ok(version) => {
            tracing::debug!(version = %version, "Database probe succeeded");
            report.mark_healthy(version);
        }
        Err(err) => {
            tracing::warn!(
                kind = %err.kind,
                code = err.code.as_deref().unwrap_or("-"),
                error = %err.message,
                host = %config.host,
                port = config.port,
                "Database probe failed"
            );
            report.mark_unhealthy(err);
        }
    }

    report
}

/// Acquire a connection and run both diagnostic queries.
///
/// The connection is dropped, and so returned to the pool, on every exit
/// path including early returns from `?` and panics.
// TODO: the diagnostic queries have no timeout of their own; a backend that
// accepts the connection but never answers hangs this request.
async fn check(pool: &dyn DatabasePool) -> Result<String, DbError> {
    let mut conn = pool.acquire().await?;
    let version = conn.server_version().await?;
    conn.ping().await?;
    Ok(version)
}

/// Current UTC time as RFC 3339 with millisecond precision.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
