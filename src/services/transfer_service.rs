use diesel::prelude::*;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::app_state::AppState;
use crate::models::entities::{
    NewTransfer, NewVendorPendingSale, Transfer, TransferType, User, TRANSFER_STATUS_COMPLETED,
};
use crate::schema::{transfers, users, vendor_pending_sales};
use crate::services::event_service::EventService;
use crate::services::gateway_service::GatewayService;
use crate::services::vendor_sale_service::SaleStatus;
use crate::services::wallet_service::WalletService;

pub enum Destination {
    /// Peer or tip transfer to another user's wallet.
    Peer(Uuid),
    /// Gateway-routed transfer; resolved to an event and celebrant.
    Gateway(Uuid),
}

pub struct GuestDetails {
    pub name: String,
    pub phone: String,
}

pub struct ExecuteTransfer {
    pub sender_id: Uuid,
    pub destination: Destination,
    /// BU subunits, already validated positive.
    pub amount: i64,
    pub message: Option<String>,
    pub transfer_type: TransferType,
    /// Client idempotency key; a replay returns the original transfer.
    pub reference: Uuid,
    /// Required for gateway-routed transfers (the pending-sale record).
    pub guest: Option<GuestDetails>,
}

/// Validates and executes one value movement. The debit is a committed
/// conditional statement; the credit side runs in one database transaction
/// and is compensated by re-crediting the sender if it fails. There is no
/// cross-store transaction covering both halves, so ordering here is the
/// correctness argument: money is only ever at rest in the sender's wallet,
/// the destination, or (transiently) nowhere, never in two places.
pub struct TransferService;

impl TransferService {
    pub async fn execute(
        state: &AppState,
        cmd: ExecuteTransfer,
        pin: &str,
    ) -> Result<Transfer, ApiError> {
        if cmd.amount <= 0 {
            return Err(ApiError::InvalidInput("Amount must be positive".to_string()));
        }
        if let Destination::Peer(receiver_id) = cmd.destination {
            if receiver_id == cmd.sender_id {
                return Err(ApiError::InvalidInput(
                    "Cannot transfer to yourself".to_string(),
                ));
            }
        }
        if cmd.transfer_type.is_gateway_routed() && cmd.guest.is_none() {
            return Err(ApiError::InvalidInput(
                "Guest details are required for gateway sales".to_string(),
            ));
        }

        // PIN check happens before any balance mutation; the auth collaborator
        // also tracks lockout state on its side of this call.
        state.pin_verifier.verify_pin(cmd.sender_id, pin).await?;

        let mut conn = state.db.get().map_err(|e| {
            error!("Database connection error: {}", e);
            ApiError::DatabaseConnection(e.to_string())
        })?;

        if let Some(existing) = Self::find_by_reference(&mut *conn, cmd.reference)? {
            info!(
                "Idempotent replay: transfer {} already exists for reference {}",
                existing.id, cmd.reference
            );
            return Ok(existing);
        }

        let (transfer, counterparty) = Self::move_value(&mut *conn, &cmd)?;

        state
            .notifier
            .transfer_completed(
                transfer.sender_id,
                counterparty,
                transfer.amount,
                transfer.message.as_deref(),
            )
            .await;

        Ok(transfer)
    }

    /// Debit, then credit-and-record, then compensate on failure. Returns
    /// the transfer together with the counterparty to notify: the receiver
    /// for peer transfers, the celebrant for gateway-routed ones.
    fn move_value(
        conn: &mut PgConnection,
        cmd: &ExecuteTransfer,
    ) -> Result<(Transfer, Option<Uuid>), ApiError> {
        let (receiver_id, event_id, gateway_id, resolved_vendor, counterparty) =
            match cmd.destination {
                Destination::Peer(receiver_id) => {
                    Self::ensure_user_exists(conn, receiver_id)?;
                    (Some(receiver_id), None, None, None, Some(receiver_id))
                }
                Destination::Gateway(gateway_id) => {
                    let resolved = GatewayService::resolve(conn, gateway_id)?;
                    if resolved.celebrant_id == cmd.sender_id {
                        return Err(ApiError::InvalidInput(
                            "Cannot spray your own event".to_string(),
                        ));
                    }
                    // A manual sale is entered by the vendor themselves, so
                    // the gateway must be theirs.
                    if cmd.transfer_type == TransferType::ManualSale
                        && resolved.gateway.vendor_id != cmd.sender_id
                    {
                        return Err(ApiError::Forbidden(
                            "Gateway belongs to another vendor".to_string(),
                        ));
                    }
                    (
                        None,
                        Some(resolved.event_id),
                        Some(gateway_id),
                        Some(resolved.gateway.vendor_id),
                        Some(resolved.celebrant_id),
                    )
                }
            };

        WalletService::debit(conn, cmd.sender_id, cmd.amount)?;

        let credit_result = conn.transaction::<Transfer, ApiError, _>(|conn| {
            match cmd.destination {
                Destination::Peer(receiver) => WalletService::credit(conn, receiver, cmd.amount)?,
                Destination::Gateway(_) => {
                    let event_id = event_id.ok_or_else(|| {
                        ApiError::Internal("Gateway resolution lost event id".to_string())
                    })?;
                    EventService::credit_event(conn, event_id, cmd.amount)?
                }
            }

            let transfer = diesel::insert_into(transfers::table)
                .values(NewTransfer {
                    id: Uuid::new_v4(),
                    sender_id: cmd.sender_id,
                    receiver_id,
                    event_id,
                    gateway_id,
                    amount: cmd.amount,
                    message: cmd.message.clone(),
                    transfer_type: cmd.transfer_type.as_str().to_string(),
                    status: TRANSFER_STATUS_COMPLETED.to_string(),
                    source: cmd.transfer_type.source().to_string(),
                    reference: cmd.reference,
                })
                .returning(Transfer::as_returning())
                .get_result::<Transfer>(conn)
                .map_err(ApiError::from)?;

            if let (Some(gateway_id), Some(vendor_id), Some(guest)) =
                (gateway_id, resolved_vendor, cmd.guest.as_ref())
            {
                diesel::insert_into(vendor_pending_sales::table)
                    .values(NewVendorPendingSale {
                        transfer_id: transfer.id,
                        gateway_id,
                        vendor_id,
                        guest_name: guest.name.clone(),
                        guest_phone: guest.phone.clone(),
                        amount: cmd.amount,
                        status: SaleStatus::Pending.as_str().to_string(),
                    })
                    .execute(conn)
                    .map_err(ApiError::from)?;
            }

            Ok(transfer)
        });

        match credit_result {
            Ok(transfer) => {
                info!(
                    "Transfer completed: {} BU subunits from {} ({})",
                    cmd.amount,
                    cmd.sender_id,
                    cmd.transfer_type.as_str()
                );
                Ok((transfer, counterparty))
            }
            Err(credit_err) => {
                Self::compensate(conn, cmd, credit_err).map(|transfer| (transfer, counterparty))
            }
        }
    }

    /// The debit committed but the credit side did not. Credit the sender
    /// back; if even that fails, money has left a wallet with no confirmed
    /// destination and the error must reach manual review.
    fn compensate(
        conn: &mut PgConnection,
        cmd: &ExecuteTransfer,
        credit_err: ApiError,
    ) -> Result<Transfer, ApiError> {
        warn!(
            "Credit step failed for reference {} ({}), compensating sender {}",
            cmd.reference, credit_err, cmd.sender_id
        );

        if let Err(comp_err) = WalletService::credit(conn, cmd.sender_id, cmd.amount) {
            error!(
                "COMPENSATION FAILED: sender={} amount={} reference={} credit_err={} comp_err={}",
                cmd.sender_id, cmd.amount, cmd.reference, credit_err, comp_err
            );
            return Err(ApiError::Compensation(format!(
                "reference {}: {}",
                cmd.reference, comp_err
            )));
        }

        // A concurrent submit of the same reference can win the unique
        // constraint between our idempotency check and the insert. The money
        // already moved under that row, so after compensating our debit the
        // original transfer is the correct answer.
        if let ApiError::Duplicate(_) = credit_err {
            if let Some(existing) = Self::find_by_reference(conn, cmd.reference)? {
                info!(
                    "Duplicate submit for reference {}: returning transfer {}",
                    cmd.reference, existing.id
                );
                return Ok(existing);
            }
        }

        match credit_err {
            e @ (ApiError::NotFound(_) | ApiError::DomainInvariant(_)) => Err(e),
            other => Err(ApiError::TransferFailed(other.to_string())),
        }
    }

    pub fn find_by_reference(
        conn: &mut PgConnection,
        reference: Uuid,
    ) -> Result<Option<Transfer>, ApiError> {
        transfers::table
            .filter(transfers::reference.eq(reference))
            .select(Transfer::as_select())
            .first::<Transfer>(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn history_for_user(
        conn: &mut PgConnection,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Transfer>, ApiError> {
        transfers::table
            .filter(
                transfers::sender_id
                    .eq(user_id)
                    .or(transfers::receiver_id.eq(user_id)),
            )
            .order(transfers::created_at.desc())
            .limit(limit)
            .select(Transfer::as_select())
            .load::<Transfer>(conn)
            .map_err(ApiError::from)
    }

    fn ensure_user_exists(conn: &mut PgConnection, user_id: Uuid) -> Result<(), ApiError> {
        users::table
            .filter(users::id.eq(user_id))
            .select(User::as_select())
            .first::<User>(conn)
            .optional()
            .map_err(ApiError::from)?
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound("Receiver not found".to_string()))
    }
}
