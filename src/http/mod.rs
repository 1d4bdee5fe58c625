//! HTTP server module.
//!
//! The server includes:
//! - Plain HTTP listener (TLS is expected to terminate at the load balancer)
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
