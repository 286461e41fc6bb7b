use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::schema::{events, gateways, transfers, users, vendor_pending_sales, wallets, withdrawals};

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub phone_number: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub phone_number: String,
    pub full_name: String,
}

/// One balance per user. BU amounts are BIGINT subunits (100 = ɃU 1.00);
/// `naira_balance` is a display-only 1:1 mirror and is never read for
/// decisions. Mutated only through WalletService's conditional updates.
#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = wallets)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub balance: i64,
    pub naira_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = wallets)]
pub struct NewWallet {
    pub user_id: Uuid,
    pub balance: i64,
    pub naira_balance: i64,
}

/// Immutable record of one value movement. Exactly one of `receiver_id` or
/// `event_id` is set on a completed transfer; only `status` may change after
/// creation.
#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = transfers)]
pub struct Transfer {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub gateway_id: Option<Uuid>,
    pub amount: i64,
    pub message: Option<String>,
    pub transfer_type: String,
    pub status: String,
    pub source: String,
    pub reference: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = transfers)]
pub struct NewTransfer {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Option<Uuid>,
    pub event_id: Option<Uuid>,
    pub gateway_id: Option<Uuid>,
    pub amount: i64,
    pub message: Option<String>,
    pub transfer_type: String,
    pub status: String,
    pub source: String,
    pub reference: Uuid,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = events)]
pub struct Event {
    pub id: Uuid,
    pub celebrant_id: Uuid,
    pub gateway_id: Option<Uuid>,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub total_bu_received: i64,
    pub withdrawn: bool,
    pub max_guests: Option<i32>,
    pub strictly_by_invitation: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub celebrant_id: Uuid,
    pub event_name: String,
    pub event_date: NaiveDate,
}

/// The only bridge between a scanning guest and a celebrant's event balance.
/// `celebrant_unique_id` is the celebrant's phone number.
#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = gateways)]
pub struct Gateway {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub event_id: Option<Uuid>,
    pub celebrant_unique_id: String,
    pub celebrant_name: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = gateways)]
pub struct NewGateway {
    pub vendor_id: Uuid,
    pub event_id: Option<Uuid>,
    pub celebrant_unique_id: String,
    pub celebrant_name: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub status: String,
}

/// Tracks physical-note issuance for a gateway-routed transfer. One-to-one
/// with a Transfer; status only moves forward (pending -> confirmed ->
/// notes_issued). Note issuance has zero monetary effect.
#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = vendor_pending_sales)]
pub struct VendorPendingSale {
    pub id: Uuid,
    pub transfer_id: Uuid,
    pub gateway_id: Uuid,
    pub vendor_id: Uuid,
    pub guest_name: String,
    pub guest_phone: String,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = vendor_pending_sales)]
pub struct NewVendorPendingSale {
    pub transfer_id: Uuid,
    pub gateway_id: Uuid,
    pub vendor_id: Uuid,
    pub guest_name: String,
    pub guest_phone: String,
    pub amount: i64,
    pub status: String,
}

/// A debit request against a wallet (event_id absent) or one event's balance.
/// The debit happens at creation; the external payout is asynchronous and
/// tracked by operator-driven status transitions.
#[derive(Queryable, Selectable, Identifiable, Serialize, ToSchema, Debug)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(table_name = withdrawals)]
pub struct Withdrawal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub bu_amount: i64,
    pub naira_amount: i64,
    pub withdrawal_type: String,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub wallet_address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = withdrawals)]
pub struct NewWithdrawal {
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub bu_amount: i64,
    pub naira_amount: i64,
    pub withdrawal_type: String,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub account_name: Option<String>,
    pub wallet_address: Option<String>,
    pub status: String,
}

/// Transfer kinds as stored in `transfers.transfer_type`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    Transfer,
    Tip,
    GatewayQr,
    ManualSale,
}

impl TransferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Transfer => "transfer",
            TransferType::Tip => "tip",
            TransferType::GatewayQr => "gateway_qr",
            TransferType::ManualSale => "manual_sale",
        }
    }

    pub fn is_gateway_routed(&self) -> bool {
        matches!(self, TransferType::GatewayQr | TransferType::ManualSale)
    }

    pub fn source(&self) -> &'static str {
        match self {
            TransferType::Transfer | TransferType::Tip => "direct",
            TransferType::GatewayQr => "gateway_qr_scan",
            TransferType::ManualSale => "manual_sale",
        }
    }
}

pub const TRANSFER_STATUS_PENDING: &str = "pending";
pub const TRANSFER_STATUS_COMPLETED: &str = "completed";
pub const TRANSFER_STATUS_FAILED: &str = "failed";

pub const GATEWAY_STATUS_ACTIVE: &str = "active";
pub const GATEWAY_STATUS_INACTIVE: &str = "inactive";

pub const WITHDRAWAL_STATUS_PENDING: &str = "pending";
