//! HTTP surface for AFM checks.
//!
//! - `GET /health`: liveness, always `OK`
//! - `POST /check`: `true`/`false` as plain text
//! - `POST /check/details`: [`Verification`](crate::registry::Verification)
//!   as JSON, plus the echoed `correlation_id`
//!
//! Handlers only trim input and delegate to
//! [`RegistryClient::verify`](crate::registry::RegistryClient::verify).

mod config;
mod error;
mod routes;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::registry::RegistryClient;

pub use config::ServerConfig;
pub use error::AppError;
pub use routes::{CheckDetails, CheckRequest};

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: RegistryClient,
}

impl AppState {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/check", post(routes::check))
        .route("/check/details", post(routes::check_details))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
