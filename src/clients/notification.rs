use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

/// External notification collaborator. Dispatch is fire-and-forget: a failure
/// is logged and ignored, it never reverses a completed transfer.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// `counterparty_id` is the receiving wallet's user for peer transfers
    /// and the event's celebrant for gateway-routed ones.
    async fn transfer_completed(
        &self,
        sender_id: Uuid,
        counterparty_id: Option<Uuid>,
        amount: i64,
        message: Option<&str>,
    );

    async fn withdrawal_requested(&self, user_id: Uuid, amount: i64);
}

pub struct HttpNotifier {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpNotifier {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url,
            timeout,
        }
    }

    async fn post(&self, path: &str, body: serde_json::Value) {
        let result = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await;
        if let Err(e) = result {
            warn!("Notification dispatch failed ({}): {}", path, e);
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn transfer_completed(
        &self,
        sender_id: Uuid,
        counterparty_id: Option<Uuid>,
        amount: i64,
        message: Option<&str>,
    ) {
        self.post(
            "/internal/notify/transfer",
            json!({
                "sender_id": sender_id,
                "receiver_id": counterparty_id,
                "amount": amount,
                "message": message,
            }),
        )
        .await;
    }

    async fn withdrawal_requested(&self, user_id: Uuid, amount: i64) {
        self.post(
            "/internal/notify/withdrawal",
            json!({ "user_id": user_id, "amount": amount }),
        )
        .await;
    }
}
