use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::handlers::transfer::TransferData;
use crate::models::dtos::ApiResponse;
use crate::models::entities::TransferType;
use crate::services::transfer_service::{
    Destination, ExecuteTransfer, GuestDetails, TransferService,
};
use crate::utility::{user_id_from_claims, validate_amount, validate_phone};
use crate::AppState;

/// Payload from a guest who scanned a vendor gateway QR code. Only
/// `gateway_id` is trusted; the event and celebrant are re-derived from the
/// stored gateway record.
#[derive(Deserialize, ToSchema, Validate)]
pub struct GatewayTransferRequest {
    pub gateway_id: Uuid,
    pub amount: f64,
    #[validate(length(max = 280, message = "Message too long"))]
    pub message: Option<String>,
    pub guest_user_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "Guest name is required"))]
    pub guest_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub guest_phone: String,
    #[validate(length(min = 4, max = 6, message = "PIN must be 4 to 6 digits"))]
    pub pin: String,
    pub reference: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/transfers/gateway-qr",
    request_body = GatewayTransferRequest,
    responses(
        (status = 200, description = "Gateway transfer completed", body = ApiResponse<TransferData>),
        (status = 400, description = "Invalid amount or insufficient balance"),
        (status = 401, description = "Missing session or incorrect PIN"),
        (status = 404, description = "Gateway not found or inactive"),
        (status = 409, description = "Event balance already withdrawn")
    ),
    security(("sessionCookie" = [])),
    tag = "Transfers"
)]
pub async fn gateway_transfer(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<GatewayTransferRequest>,
) -> Result<Json<ApiResponse<TransferData>>, (StatusCode, String)> {
    info!(
        "Gateway transfer request: sender={}, gateway={}, amount={}",
        claims.sub, req.gateway_id, req.amount
    );

    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    let sender_id = user_id_from_claims(&claims)?;
    if req.guest_user_id != sender_id {
        warn!(
            "guest_user_id {} does not match session user {}",
            req.guest_user_id, sender_id
        );
        return Err(ApiError::Forbidden(
            "guest_user_id must match the authenticated user".to_string(),
        )
        .into());
    }

    let amount = validate_amount(req.amount)?;

    let transfer = TransferService::execute(
        &state,
        ExecuteTransfer {
            sender_id,
            destination: Destination::Gateway(req.gateway_id),
            amount,
            message: req.message,
            transfer_type: TransferType::GatewayQr,
            reference: req.reference.unwrap_or_else(Uuid::new_v4),
            guest: Some(GuestDetails {
                name: req.guest_name,
                phone: req.guest_phone,
            }),
        },
        &req.pin,
    )
    .await?;

    Ok(Json(ApiResponse::ok(TransferData { transfer })))
}

/// A sale the vendor enters by hand for a guest paying cash: the BU leaves
/// the vendor's own wallet and lands on the gateway's event, and the guest
/// details go onto the pending-sale record for note issuance.
#[derive(Deserialize, ToSchema, Validate)]
pub struct ManualSaleRequest {
    pub gateway_id: Uuid,
    pub amount: f64,
    #[validate(length(max = 280, message = "Message too long"))]
    pub message: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Guest name is required"))]
    pub guest_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub guest_phone: String,
    #[validate(length(min = 4, max = 6, message = "PIN must be 4 to 6 digits"))]
    pub pin: String,
    pub reference: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/transfers/manual-sale",
    request_body = ManualSaleRequest,
    responses(
        (status = 200, description = "Manual sale completed", body = ApiResponse<TransferData>),
        (status = 400, description = "Invalid amount or insufficient vendor balance"),
        (status = 401, description = "Missing session or incorrect PIN"),
        (status = 403, description = "Gateway belongs to another vendor"),
        (status = 404, description = "Gateway not found or inactive"),
        (status = 409, description = "Event balance already withdrawn")
    ),
    security(("sessionCookie" = [])),
    tag = "Transfers"
)]
pub async fn manual_sale(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ManualSaleRequest>,
) -> Result<Json<ApiResponse<TransferData>>, (StatusCode, String)> {
    info!(
        "Manual sale request: vendor={}, gateway={}, amount={}",
        claims.sub, req.gateway_id, req.amount
    );

    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    let vendor_id = user_id_from_claims(&claims)?;
    let amount = validate_amount(req.amount)?;

    let transfer = TransferService::execute(
        &state,
        ExecuteTransfer {
            sender_id: vendor_id,
            destination: Destination::Gateway(req.gateway_id),
            amount,
            message: req.message,
            transfer_type: TransferType::ManualSale,
            reference: req.reference.unwrap_or_else(Uuid::new_v4),
            guest: Some(GuestDetails {
                name: req.guest_name,
                phone: req.guest_phone,
            }),
        },
        &req.pin,
    )
    .await?;

    Ok(Json(ApiResponse::ok(TransferData { transfer })))
}
