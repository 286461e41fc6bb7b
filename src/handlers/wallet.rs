use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::ApiResponse;
use crate::models::entities::Wallet;
use crate::services::wallet_service::WalletService;
use crate::utility::user_id_from_claims;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct WalletData {
    pub wallet: Wallet,
}

#[utoipa::path(
    get,
    path = "/wallet",
    responses(
        (status = 200, description = "The caller's wallet", body = ApiResponse<WalletData>),
        (status = 401, description = "Missing session"),
        (status = 404, description = "Wallet not found")
    ),
    security(("sessionCookie" = [])),
    tag = "Wallet"
)]
pub async fn get_wallet(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<WalletData>>, (StatusCode, String)> {
    let user_id = user_id_from_claims(&claims)?;

    let mut conn = state
        .db
        .get()
        .map_err(|e| ApiError::DatabaseConnection(e.to_string()))?;

    let wallet = WalletService::find_by_user(&mut conn, user_id)?;
    Ok(Json(ApiResponse::ok(WalletData { wallet })))
}
