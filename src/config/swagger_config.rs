use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{
    gateway::__path_create_gateway, gateway_transfer::__path_gateway_transfer,
    gateway_transfer::__path_manual_sale, health::__path_health,
    transactions::__path_list_transfers,
    transfer::__path_create_transfer, vendor_sales::__path_confirm_sale,
    vendor_sales::__path_issue_notes, vendor_sales::__path_pending_sales,
    wallet::__path_get_wallet, withdraw::__path_create_withdrawal,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health, create_transfer, gateway_transfer, manual_sale, list_transfers,
        create_withdrawal, confirm_sale, issue_notes, pending_sales,
        create_gateway, get_wallet
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Transfers", description = "Peer, tip and gateway-routed BU transfers"),
        (name = "Withdrawals", description = "Wallet and event balance payouts"),
        (name = "Vendor", description = "Pending-sale workflow for vendors"),
        (name = "Gateways", description = "Vendor QR gateways"),
        (name = "Wallet", description = "Wallet balance"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "sessionCookie".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
            );
        }
    }
}
