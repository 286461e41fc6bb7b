use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::ApiResponse;
use crate::models::entities::{Transfer, TransferType};
use crate::services::transfer_service::{Destination, ExecuteTransfer, TransferService};
use crate::utility::{user_id_from_claims, validate_amount};
use crate::AppState;

#[derive(Deserialize, ToSchema, Validate)]
pub struct TransferRequest {
    pub receiver_id: Uuid,
    pub amount: f64,
    #[validate(length(max = 280, message = "Message too long"))]
    pub message: Option<String>,
    #[validate(length(min = 4, max = 6, message = "PIN must be 4 to 6 digits"))]
    pub pin: String,
    /// `transfer` (default) or `tip`.
    #[serde(rename = "type")]
    pub transfer_type: Option<TransferType>,
    /// Idempotency key; retries with the same reference return the original
    /// transfer instead of moving money twice.
    pub reference: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
pub struct TransferData {
    pub transfer: Transfer,
}

#[utoipa::path(
    post,
    path = "/transfers",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer completed", body = ApiResponse<TransferData>),
        (status = 400, description = "Invalid amount, self-transfer, or insufficient balance"),
        (status = 401, description = "Missing session or incorrect PIN"),
        (status = 404, description = "Receiver not found")
    ),
    security(("sessionCookie" = [])),
    tag = "Transfers"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<ApiResponse<TransferData>>, (StatusCode, String)> {
    info!(
        "Transfer request: sender={}, receiver={}, amount={}",
        claims.sub, req.receiver_id, req.amount
    );

    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    let sender_id = user_id_from_claims(&claims)?;
    let amount = validate_amount(req.amount)?;

    let transfer_type = match req.transfer_type.unwrap_or(TransferType::Transfer) {
        t @ (TransferType::Transfer | TransferType::Tip) => t,
        _ => {
            return Err(ApiError::InvalidInput(
                "Gateway transfers must use the gateway-qr endpoint".to_string(),
            )
            .into());
        }
    };

    let transfer = TransferService::execute(
        &state,
        ExecuteTransfer {
            sender_id,
            destination: Destination::Peer(req.receiver_id),
            amount,
            message: req.message,
            transfer_type,
            reference: req.reference.unwrap_or_else(Uuid::new_v4),
            guest: None,
        },
        &req.pin,
    )
    .await?;

    Ok(Json(ApiResponse::ok(TransferData { transfer })))
}
