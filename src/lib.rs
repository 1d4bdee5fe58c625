//! docker-api-aws - welcome, liveness and PostgreSQL health endpoints.
//!
//! A small JSON service meant to run in a container behind a load balancer.
//! `/health` answers as long as the process is up; `/health/db` checks that the
//! database can be reached and reports the outcome in its payload.

pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
