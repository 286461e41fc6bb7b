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
use crate::models::entities::Withdrawal;
use crate::services::withdrawal_service::{WithdrawalRequest, WithdrawalService};
use crate::utility::{to_subunits, user_id_from_claims};
use crate::AppState;

#[derive(Deserialize, ToSchema, Validate)]
pub struct CreateWithdrawalRequest {
    pub bu_amount: f64,
    /// Display amount; BU converts 1:1 and the server recomputes it.
    pub naira_amount: f64,
    /// `bank` or `wallet`.
    #[serde(rename = "type")]
    pub withdrawal_type: String,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub wallet_address: Option<String>,
    pub event_id: Option<Uuid>,
    #[validate(length(min = 4, max = 6, message = "PIN must be 4 to 6 digits"))]
    pub pin: String,
}

#[derive(Serialize, ToSchema)]
pub struct WithdrawalData {
    pub withdrawal: Withdrawal,
}

#[utoipa::path(
    post,
    path = "/withdrawals",
    request_body = CreateWithdrawalRequest,
    responses(
        (status = 200, description = "Withdrawal created in pending state", body = ApiResponse<WithdrawalData>),
        (status = 400, description = "Invalid destination or insufficient wallet balance"),
        (status = 401, description = "Missing session or incorrect PIN"),
        (status = 403, description = "Event belongs to another celebrant"),
        (status = 409, description = "Amount exceeds event balance or event already withdrawn")
    ),
    security(("sessionCookie" = [])),
    tag = "Withdrawals"
)]
pub async fn create_withdrawal(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateWithdrawalRequest>,
) -> Result<Json<ApiResponse<WithdrawalData>>, (StatusCode, String)> {
    info!(
        "Withdrawal request: user={}, bu_amount={}, type={}, event_id={:?}",
        claims.sub, req.bu_amount, req.withdrawal_type, req.event_id
    );

    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    let user_id = user_id_from_claims(&claims)?;

    if !req.bu_amount.is_finite() || req.bu_amount <= 0.0 {
        return Err(ApiError::DomainInvariant(
            "Withdrawal amount must be positive".to_string(),
        )
        .into());
    }

    let withdrawal = WithdrawalService::initiate(
        &state,
        user_id,
        WithdrawalRequest {
            amount: to_subunits(req.bu_amount),
            withdrawal_type: req.withdrawal_type,
            event_id: req.event_id,
            bank_name: req.bank_name,
            account_number: req.account_number,
            account_name: req.account_name,
            wallet_address: req.wallet_address,
        },
        &req.pin,
    )
    .await?;

    Ok(Json(ApiResponse::ok(WithdrawalData { withdrawal })))
}
