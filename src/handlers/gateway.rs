use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::{ApiResponse, GatewayQrPayload};
use crate::models::entities::Gateway;
use crate::services::gateway_service::{CreateGateway, GatewayService};
use crate::utility::{user_id_from_claims, validate_phone};
use crate::AppState;

/// Either `{event_id}` (link a celebrant-created event) or the manual-entry
/// fields. Mixing the two is rejected.
#[derive(Deserialize, ToSchema, Validate)]
pub struct CreateGatewayRequest {
    pub event_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub event_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_phone"))]
    pub celebrant_unique_id: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub celebrant_name: Option<String>,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GatewayData {
    pub gateway: Gateway,
    pub qr_payload: GatewayQrPayload,
}

#[utoipa::path(
    post,
    path = "/gateways",
    request_body = CreateGatewayRequest,
    responses(
        (status = 200, description = "Gateway created", body = ApiResponse<GatewayData>),
        (status = 400, description = "Neither or both creation modes supplied"),
        (status = 404, description = "Event or celebrant not found")
    ),
    security(("sessionCookie" = [])),
    tag = "Gateways"
)]
pub async fn create_gateway(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateGatewayRequest>,
) -> Result<Json<ApiResponse<GatewayData>>, (StatusCode, String)> {
    req.validate().map_err(|e| {
        error!("Validation error: {}", e);
        ApiError::Validation(e)
    })?;

    let vendor_id = user_id_from_claims(&claims)?;
    info!("Gateway create: vendor={}, event_id={:?}", vendor_id, req.event_id);

    let request = match req.event_id {
        Some(event_id) => {
            if req.event_name.is_some()
                || req.event_date.is_some()
                || req.celebrant_unique_id.is_some()
                || req.celebrant_name.is_some()
                || req.event_time.is_some()
                || req.event_location.is_some()
            {
                return Err(ApiError::InvalidInput(
                    "Provide either event_id or manual event details, not both".to_string(),
                )
                .into());
            }
            CreateGateway::LinkEvent { event_id }
        }
        None => {
            let (celebrant_unique_id, celebrant_name, event_name, event_date) = match (
                req.celebrant_unique_id,
                req.celebrant_name,
                req.event_name,
                req.event_date,
            ) {
                (Some(phone), Some(name), Some(event_name), Some(event_date)) => {
                    (phone, name, event_name, event_date)
                }
                _ => {
                    return Err(ApiError::InvalidInput(
                        "Manual gateways require celebrant_unique_id, celebrant_name, \
                         event_name and event_date"
                            .to_string(),
                    )
                    .into());
                }
            };
            CreateGateway::Manual {
                celebrant_unique_id,
                celebrant_name,
                event_name,
                event_date,
                event_time: req.event_time,
                event_location: req.event_location,
            }
        }
    };

    let mut conn = state
        .db
        .get()
        .map_err(|e| ApiError::DatabaseConnection(e.to_string()))?;

    let (gateway, qr_payload) = GatewayService::create(&mut conn, vendor_id, request)?;
    Ok(Json(ApiResponse::ok(GatewayData { gateway, qr_payload })))
}
