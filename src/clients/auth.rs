use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// External auth collaborator: PIN verification and account-lockout tracking
/// live behind this seam. Nothing in the ledger stores PIN material or
/// process-local lockout state.
#[async_trait]
pub trait PinVerifier: Send + Sync {
    async fn verify_pin(&self, user_id: Uuid, pin: &str) -> Result<(), ApiError>;
}

/// Calls the auth service over HTTP with a bounded timeout. The auth service
/// consults and updates its lockout counters as part of this call.
pub struct HttpPinVerifier {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpPinVerifier {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            timeout,
        }
    }
}

#[async_trait]
impl PinVerifier for HttpPinVerifier {
    async fn verify_pin(&self, user_id: Uuid, pin: &str) -> Result<(), ApiError> {
        let request = self
            .client
            .post(format!("{}/internal/verify-pin", self.base_url))
            .json(&json!({ "user_id": user_id, "pin": pin }))
            .timeout(self.timeout)
            .send();

        let resp = request.await.map_err(|e| {
            error!("PIN verification call failed: {}", e);
            ApiError::Internal("Auth service unavailable".to_string())
        })?;

        if resp.status().is_success() {
            Ok(())
        } else if resp.status().as_u16() == 423 {
            warn!("Account locked for user {}", user_id);
            Err(ApiError::Auth("Account locked".to_string()))
        } else {
            Err(ApiError::Auth("Incorrect PIN".to_string()))
        }
    }
}
