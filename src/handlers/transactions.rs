use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::ApiResponse;
use crate::models::entities::Transfer;
use crate::services::transfer_service::TransferService;
use crate::utility::user_id_from_claims;
use crate::AppState;

const HISTORY_LIMIT: i64 = 50;

#[derive(Serialize, ToSchema)]
pub struct TransfersData {
    pub transfers: Vec<Transfer>,
}

#[utoipa::path(
    get,
    path = "/transfers",
    responses(
        (status = 200, description = "Most recent transfers sent or received", body = ApiResponse<TransfersData>),
        (status = 401, description = "Missing session")
    ),
    security(("sessionCookie" = [])),
    tag = "Transfers"
)]
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<TransfersData>>, (StatusCode, String)> {
    let user_id = user_id_from_claims(&claims)?;

    let mut conn = state
        .db
        .get()
        .map_err(|e| ApiError::DatabaseConnection(e.to_string()))?;

    let transfers = TransferService::history_for_user(&mut conn, user_id, HISTORY_LIMIT)?;
    Ok(Json(ApiResponse::ok(TransfersData { transfers })))
}
