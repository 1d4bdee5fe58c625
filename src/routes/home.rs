//! Welcome endpoint.

use axum::Json;
use serde::Serialize;

use crate::config::WELCOME_MESSAGE;

#[derive(Debug, Serialize)]
pub struct Welcome {
    pub message: &'static str,
    pub status: &'static str,
}

/// Returns the welcome message and a static "running" status.
pub async fn index() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME_MESSAGE,
        status: "running",
    })
}
