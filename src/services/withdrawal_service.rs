use diesel::prelude::*;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::app_state::AppState;
use crate::models::entities::{
    Event, NewWithdrawal, Withdrawal, WITHDRAWAL_STATUS_PENDING,
};
use crate::schema::{events, withdrawals};
use crate::services::event_service::EventService;
use crate::services::wallet_service::WalletService;

pub const WITHDRAWAL_TYPE_BANK: &str = "bank";
pub const WITHDRAWAL_TYPE_WALLET: &str = "wallet";

pub struct WithdrawalRequest {
    /// BU subunits.
    pub amount: i64,
    pub withdrawal_type: String,
    pub event_id: Option<Uuid>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub wallet_address: Option<String>,
}

/// Converts wallet or event balance into an off-platform payout request. The
/// debit is immediate; the payout itself is asynchronous and its status is
/// advanced by an operator, not here.
pub struct WithdrawalService;

impl WithdrawalService {
    pub async fn initiate(
        state: &AppState,
        user_id: Uuid,
        req: WithdrawalRequest,
        pin: &str,
    ) -> Result<Withdrawal, ApiError> {
        if req.amount <= 0 {
            return Err(ApiError::DomainInvariant(
                "Withdrawal amount must be positive".to_string(),
            ));
        }
        Self::validate_destination(&req)?;

        state.pin_verifier.verify_pin(user_id, pin).await?;

        let mut conn = state.db.get().map_err(|e| {
            error!("Database connection error: {}", e);
            ApiError::DatabaseConnection(e.to_string())
        })?;

        // One backing store, so the whole debit/credit/record sequence runs
        // in a single database transaction; the balance checks inside are
        // still conditional statements so concurrent requests serialize.
        let withdrawal = conn.transaction::<Withdrawal, ApiError, _>(|conn| {
            match req.event_id {
                Some(event_id) => {
                    Self::ensure_celebrant(conn, event_id, user_id)?;
                    let remaining = EventService::debit_event(conn, event_id, req.amount)?;
                    // An event withdrawal lands in the celebrant's wallet.
                    WalletService::credit(conn, user_id, req.amount)?;
                    info!(
                        "Event {} withdrawal of {} by {}; remaining balance {}",
                        event_id, req.amount, user_id, remaining
                    );
                }
                None => {
                    WalletService::debit(conn, user_id, req.amount)?;
                }
            }

            diesel::insert_into(withdrawals::table)
                .values(NewWithdrawal {
                    user_id,
                    event_id: req.event_id,
                    bu_amount: req.amount,
                    // 1:1 conversion
                    naira_amount: req.amount,
                    withdrawal_type: req.withdrawal_type.clone(),
                    bank_name: req.bank_name.clone(),
                    account_number: req.account_number.clone(),
                    account_name: req.account_name.clone(),
                    wallet_address: req.wallet_address.clone(),
                    status: WITHDRAWAL_STATUS_PENDING.to_string(),
                })
                .returning(Withdrawal::as_returning())
                .get_result::<Withdrawal>(conn)
                .map_err(ApiError::from)
        })?;

        info!(
            "Withdrawal {} created: user={} amount={} type={}",
            withdrawal.id, user_id, req.amount, req.withdrawal_type
        );

        state.notifier.withdrawal_requested(user_id, req.amount).await;

        Ok(withdrawal)
    }

    fn validate_destination(req: &WithdrawalRequest) -> Result<(), ApiError> {
        match req.withdrawal_type.as_str() {
            WITHDRAWAL_TYPE_BANK => {
                if req.bank_name.is_none()
                    || req.account_number.is_none()
                    || req.account_name.is_none()
                {
                    return Err(ApiError::InvalidInput(
                        "Bank withdrawals require bank_name, account_number and account_name"
                            .to_string(),
                    ));
                }
                Ok(())
            }
            WITHDRAWAL_TYPE_WALLET => {
                if req.wallet_address.is_none() {
                    return Err(ApiError::InvalidInput(
                        "Wallet withdrawals require wallet_address".to_string(),
                    ));
                }
                Ok(())
            }
            other => Err(ApiError::InvalidInput(format!(
                "Unknown withdrawal type: {}",
                other
            ))),
        }
    }

    fn ensure_celebrant(
        conn: &mut PgConnection,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ApiError> {
        let event = events::table
            .filter(events::id.eq(event_id))
            .select(Event::as_select())
            .first::<Event>(conn)
            .optional()
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;

        if event.celebrant_id != user_id {
            return Err(ApiError::Forbidden(
                "Only the celebrant can withdraw an event balance".to_string(),
            ));
        }
        Ok(())
    }
}
