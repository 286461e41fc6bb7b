use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Uniform response envelope: `{"success": bool, "data"?: T, "error"?: string}`.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// The structure encoded into a gateway's QR code. Everything except
/// `gateway_id` is client-controlled display data; the resolver re-derives
/// the canonical record from the id alone.
#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct GatewayQrPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    #[serde(rename = "gatewayId")]
    pub gateway_id: Uuid,
    #[serde(rename = "eventName")]
    pub event_name: String,
    #[serde(rename = "celebrantUniqueId")]
    pub celebrant_unique_id: String,
    #[serde(rename = "celebrantName")]
    pub celebrant_name: String,
}

impl GatewayQrPayload {
    pub const PAYLOAD_TYPE: &'static str = "gateway";
}
