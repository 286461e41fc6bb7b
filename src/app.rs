use axum::{middleware, Router};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::security_config::auth_middleware;
use crate::config::swagger_config::ApiDoc;
use crate::handlers::{
    gateway::create_gateway, gateway_transfer::gateway_transfer, gateway_transfer::manual_sale,
    health::health,
    transactions::list_transfers, transfer::create_transfer, vendor_sales::confirm_sale,
    vendor_sales::issue_notes, vendor_sales::pending_sales, wallet::get_wallet,
    withdraw::create_withdrawal,
};
use crate::models::app_state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no session)
    let public_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", axum::routing::get(health));

    // Protected routes (session cookie + CSRF)
    let protected_router = Router::new()
        .route(
            "/transfers",
            axum::routing::post(create_transfer).get(list_transfers),
        )
        .route("/transfers/gateway-qr", axum::routing::post(gateway_transfer))
        .route("/transfers/manual-sale", axum::routing::post(manual_sale))
        .route("/withdrawals", axum::routing::post(create_withdrawal))
        .route("/vendor/sales/{id}/confirm", axum::routing::post(confirm_sale))
        .route("/vendor/sales/{id}/issue-notes", axum::routing::post(issue_notes))
        .route("/vendor/sales/pending", axum::routing::get(pending_sales))
        .route("/gateways", axum::routing::post(create_gateway))
        .route("/wallet", axum::routing::get(get_wallet))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_router)
        .merge(protected_router)
        .with_state(state)
}
