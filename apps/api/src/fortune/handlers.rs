//! Axum route handlers for the Fortune API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::fortune::models::{FortuneRequest, FortuneResult};
use crate::state::AppState;

pub const MALFORMED_BODY_MESSAGE: &str = "リクエストの形式が正しくありません。";

/// POST /api/fortune
///
/// Body: `{ "birthDate": "YYYY-MM-DD", "bloodType": "A"|"B"|"O"|"AB", "mode"?: "normal"|"yumekawa" }`.
/// Returns the validated fortune unchanged.
pub async fn handle_fortune(
    State(state): State<AppState>,
    payload: Result<Json<FortuneRequest>, JsonRejection>,
) -> Result<Json<FortuneResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::info!("Rejected fortune request body: {}", rejection.body_text());
        AppError::InvalidInput(MALFORMED_BODY_MESSAGE.to_string())
    })?;

    let result = state.fortune.request_fortune(&request).await?;

    Ok(Json(result))
}

/// GET /api/fortune
///
/// Liveness check for the fortune route.
pub async fn handle_fortune_alive() -> Json<Value> {
    Json(json!({
        "ok": true,
        "msg": "fortune API is alive"
    }))
}
