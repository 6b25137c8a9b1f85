use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use super::error::AppError;
use crate::registry::Verification;

/// Body of both check endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    /// Identifier to check. Surrounding whitespace is ignored.
    pub afm: String,
    /// Opaque token echoed back by `/check/details`.
    #[serde(default)]
    pub correlation_id: Option<Value>,
}

/// Response of `/check/details`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Value>,
    #[serde(flatten)]
    pub verification: Verification,
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

/// POST /check — `true` or `false` as plain text.
///
/// Fails closed: a bad body, a bad checksum and a registry failure all
/// answer `false`.
pub async fn check(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> &'static str {
    let Ok(Json(req)) = payload else {
        tracing::debug!("unreadable /check body");
        return "false";
    };
    if state.client.verify(req.afm.trim()).await.is_confirmed() {
        "true"
    } else {
        "false"
    }
}

/// POST /check/details — full verification record as JSON.
pub async fn check_details(
    State(state): State<AppState>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<CheckDetails>, AppError> {
    let Json(req) = payload?;
    let verification = state.client.verify(req.afm.trim()).await;
    Ok(Json(CheckDetails {
        correlation_id: req.correlation_id,
        verification,
    }))
}
