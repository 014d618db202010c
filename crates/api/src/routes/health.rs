//! Liveness check.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `ok` while the process serves requests.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// Creates the health router. No session is required.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/health",
        get(|| async {
            Json(Health {
                status: "ok",
                service: "cashora",
                version: env!("CARGO_PKG_VERSION"),
            })
        }),
    )
}
