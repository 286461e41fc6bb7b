use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::security_config::Claims;
use crate::error::ApiError;
use crate::models::dtos::ApiResponse;
use crate::models::entities::VendorPendingSale;
use crate::services::vendor_sale_service::VendorSaleService;
use crate::utility::user_id_from_claims;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct SaleData {
    pub sale: VendorPendingSale,
}

#[derive(Serialize, ToSchema)]
pub struct SalesData {
    pub sales: Vec<VendorPendingSale>,
}

#[derive(Deserialize, IntoParams)]
pub struct PendingSalesQuery {
    pub gateway_id: Uuid,
}

#[utoipa::path(
    post,
    path = "/vendor/sales/{id}/confirm",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale confirmed", body = ApiResponse<SaleData>),
        (status = 403, description = "Sale belongs to another vendor"),
        (status = 404, description = "Sale not found"),
        (status = 409, description = "Sale is not pending")
    ),
    security(("sessionCookie" = [])),
    tag = "Vendor"
)]
pub async fn confirm_sale(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(sale_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaleData>>, (StatusCode, String)> {
    let vendor_id = user_id_from_claims(&claims)?;
    info!("Sale confirm: vendor={}, sale={}", vendor_id, sale_id);

    let mut conn = state
        .db
        .get()
        .map_err(|e| ApiError::DatabaseConnection(e.to_string()))?;

    let sale = VendorSaleService::confirm(&mut conn, vendor_id, sale_id)?;
    Ok(Json(ApiResponse::ok(SaleData { sale })))
}

#[utoipa::path(
    post,
    path = "/vendor/sales/{id}/issue-notes",
    params(("id" = Uuid, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Notes issued", body = ApiResponse<SaleData>),
        (status = 403, description = "Sale belongs to another vendor"),
        (status = 404, description = "Sale not found"),
        (status = 409, description = "Sale is not confirmed")
    ),
    security(("sessionCookie" = [])),
    tag = "Vendor"
)]
pub async fn issue_notes(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(sale_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SaleData>>, (StatusCode, String)> {
    let vendor_id = user_id_from_claims(&claims)?;
    info!("Sale issue-notes: vendor={}, sale={}", vendor_id, sale_id);

    let mut conn = state
        .db
        .get()
        .map_err(|e| ApiError::DatabaseConnection(e.to_string()))?;

    let sale = VendorSaleService::issue_notes(&mut conn, vendor_id, sale_id)?;
    Ok(Json(ApiResponse::ok(SaleData { sale })))
}

#[utoipa::path(
    get,
    path = "/vendor/sales/pending",
    params(PendingSalesQuery),
    responses(
        (status = 200, description = "Pending sales for the gateway", body = ApiResponse<SalesData>),
        (status = 403, description = "Gateway belongs to another vendor"),
        (status = 404, description = "Gateway not found")
    ),
    security(("sessionCookie" = [])),
    tag = "Vendor"
)]
pub async fn pending_sales(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<PendingSalesQuery>,
) -> Result<Json<ApiResponse<SalesData>>, (StatusCode, String)> {
    let vendor_id = user_id_from_claims(&claims)?;

    let mut conn = state
        .db
        .get()
        .map_err(|e| ApiError::DatabaseConnection(e.to_string()))?;

    let sales = VendorSaleService::pending_for_gateway(&mut conn, vendor_id, query.gateway_id)?;
    Ok(Json(ApiResponse::ok(SalesData { sales })))
}
