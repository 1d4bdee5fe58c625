//! HTTP server startup logic.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to resolve http.host {target}: {source}")]
    Resolve { target: String, source: io::Error },

    #[error("Server error: {0}")]
    Server(#[from] io::Error),
}

/// Resolve the listening address from configuration.
///
/// `http.host` may be an IP literal or a hostname such as `localhost`; the
/// first resolved address is used.
pub async fn bind_address(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    let target = format!("{}:{}", config.host, config.port);
    let mut addrs = match tokio::net::lookup_host(target.clone()).await {
        Ok(addrs) => addrs,
        Err(source) => return Err(ServerError::Resolve { target, source }),
    };
    addrs.next().ok_or_else(|| ServerError::Resolve {
        source: io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
        target,
    })
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down, either after a shutdown
/// signal has drained in-flight requests or because binding failed.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = bind_address(config).await?;
    let handle = Handle::new();

    tracing::info!(%addr, "Starting HTTP server");

    shutdown::setup_shutdown_handler(handle.clone());

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_address_default() {
        let addr = bind_address(&HttpServerConfig::default()).await.unwrap();
        assert_eq!(addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
    }

    #[tokio::test]
    async fn test_bind_address_resolves_localhost() {
        let config = HttpServerConfig {
            host: "localhost".to_string(),
            port: 3000,
        };
        let addr = bind_address(&config).await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 3000);
    }

    #[tokio::test]
    async fn test_bind_address_rejects_invalid_host() {
        let config = HttpServerConfig {
            host: "not a host".to_string(),
            port: 3000,
        };
        let err = bind_address(&config).await.unwrap_err();
        assert!(matches!(
            err,
            ServerError::Resolve { ref target, .. } if target == "not a host:3000"
        ));
    }
}
