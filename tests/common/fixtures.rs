#![allow(dead_code)]

use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use bashpay::models::entities::{
    Event, Gateway, NewEvent, NewGateway, NewUser, NewWallet, User, GATEWAY_STATUS_ACTIVE,
    GATEWAY_STATUS_INACTIVE,
};
use bashpay::schema::{events, gateways, users, wallets};

/// Insert a user together with a funded wallet.
pub fn create_user_with_wallet(
    conn: &mut PgConnection,
    phone: &str,
    name: &str,
    balance: i64,
) -> User {
    let user = diesel::insert_into(users::table)
        .values(NewUser {
            phone_number: phone.to_string(),
            full_name: name.to_string(),
        })
        .returning(User::as_returning())
        .get_result::<User>(conn)
        .expect("Failed to insert user");

    diesel::insert_into(wallets::table)
        .values(NewWallet {
            user_id: user.id,
            balance,
            naira_balance: balance,
        })
        .execute(conn)
        .expect("Failed to insert wallet");

    user
}

pub fn create_event(conn: &mut PgConnection, celebrant_id: Uuid, name: &str) -> Event {
    diesel::insert_into(events::table)
        .values(NewEvent {
            celebrant_id,
            event_name: name.to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 12, 12).unwrap(),
        })
        .returning(Event::as_returning())
        .get_result::<Event>(conn)
        .expect("Failed to insert event")
}

/// Seed `events.total_bu_received` directly for withdrawal scenarios.
pub fn set_event_balance(conn: &mut PgConnection, event_id: Uuid, balance: i64) {
    diesel::update(events::table.filter(events::id.eq(event_id)))
        .set(events::total_bu_received.eq(balance))
        .execute(conn)
        .expect("Failed to set event balance");
}

pub fn create_gateway(
    conn: &mut PgConnection,
    vendor_id: Uuid,
    event: &Event,
    celebrant: &User,
) -> Gateway {
    let gateway = diesel::insert_into(gateways::table)
        .values(NewGateway {
            vendor_id,
            event_id: Some(event.id),
            celebrant_unique_id: celebrant.phone_number.clone(),
            celebrant_name: celebrant.full_name.clone(),
            event_name: event.event_name.clone(),
            event_date: event.event_date,
            event_time: None,
            event_location: None,
            status: GATEWAY_STATUS_ACTIVE.to_string(),
        })
        .returning(Gateway::as_returning())
        .get_result::<Gateway>(conn)
        .expect("Failed to insert gateway");

    diesel::update(events::table.filter(events::id.eq(event.id)))
        .set(events::gateway_id.eq(gateway.id))
        .execute(conn)
        .expect("Failed to link gateway to event");

    gateway
}

pub fn deactivate_gateway(conn: &mut PgConnection, gateway_id: Uuid) {
    diesel::update(gateways::table.filter(gateways::id.eq(gateway_id)))
        .set(gateways::status.eq(GATEWAY_STATUS_INACTIVE))
        .execute(conn)
        .expect("Failed to deactivate gateway");
}

pub fn wallet_balance(conn: &mut PgConnection, user_id: Uuid) -> i64 {
    wallets::table
        .filter(wallets::user_id.eq(user_id))
        .select(wallets::balance)
        .first::<i64>(conn)
        .expect("Failed to read wallet balance")
}

pub fn event_state(conn: &mut PgConnection, event_id: Uuid) -> (i64, bool) {
    events::table
        .filter(events::id.eq(event_id))
        .select((events::total_bu_received, events::withdrawn))
        .first::<(i64, bool)>(conn)
        .expect("Failed to read event state")
}
