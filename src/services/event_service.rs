use diesel::prelude::*;
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::entities::Event;
use crate::schema::events;

/// Maintains each event's cumulative received balance and withdrawn flag.
/// All mutations are conditional single-statement updates so that concurrent
/// gateway scans, or a withdrawal racing an incoming transfer, serialize in
/// the database.
pub struct EventService;

impl EventService {
    /// Adds a gateway-routed transfer to the event balance. Rejected once the
    /// event is fully withdrawn; re-opening an event is not an operation this
    /// system provides.
    pub fn credit_event(conn: &mut PgConnection, event_id: Uuid, amount: i64) -> Result<(), ApiError> {
        debug_assert!(amount > 0);

        let rows = diesel::update(
            events::table
                .filter(events::id.eq(event_id))
                .filter(events::withdrawn.eq(false)),
        )
        .set((
            events::total_bu_received.eq(events::total_bu_received + amount),
            events::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .map_err(|e| {
            error!("Event credit failed for event {}: {}", event_id, e);
            ApiError::from(e)
        })?;

        if rows == 1 {
            return Ok(());
        }

        match Self::find(conn, event_id)? {
            Some(_) => Err(ApiError::DomainInvariant(
                "Event balance has already been withdrawn".to_string(),
            )),
            None => Err(ApiError::NotFound("Event not found".to_string())),
        }
    }

    /// Removes `amount` from the event balance, failing if it would go
    /// negative. Returns the remaining balance; when it reaches exactly zero
    /// the withdrawn flag is flipped in a second conditional update, so a
    /// racing credit that lands in between leaves the flag alone.
    pub fn debit_event(conn: &mut PgConnection, event_id: Uuid, amount: i64) -> Result<i64, ApiError> {
        debug_assert!(amount > 0);

        let remaining = diesel::update(
            events::table
                .filter(events::id.eq(event_id))
                .filter(events::withdrawn.eq(false))
                .filter(events::total_bu_received.ge(amount)),
        )
        .set((
            events::total_bu_received.eq(events::total_bu_received - amount),
            events::updated_at.eq(diesel::dsl::now),
        ))
        .returning(events::total_bu_received)
        .get_result::<i64>(conn)
        .optional()
        .map_err(|e| {
            error!("Event debit failed for event {}: {}", event_id, e);
            ApiError::from(e)
        })?;

        let remaining = match remaining {
            Some(balance) => balance,
            None => {
                return match Self::find(conn, event_id)? {
                    None => Err(ApiError::NotFound("Event not found".to_string())),
                    Some(event) if event.withdrawn => Err(ApiError::DomainInvariant(
                        "Event balance has already been withdrawn".to_string(),
                    )),
                    Some(_) => Err(ApiError::DomainInvariant(
                        "Amount exceeds event balance".to_string(),
                    )),
                };
            }
        };

        if remaining == 0 {
            diesel::update(
                events::table
                    .filter(events::id.eq(event_id))
                    .filter(events::total_bu_received.eq(0)),
            )
            .set(events::withdrawn.eq(true))
            .execute(conn)
            .map_err(ApiError::from)?;
        }

        Ok(remaining)
    }

    pub fn find(conn: &mut PgConnection, event_id: Uuid) -> Result<Option<Event>, ApiError> {
        events::table
            .filter(events::id.eq(event_id))
            .select(Event::as_select())
            .first::<Event>(conn)
            .optional()
            .map_err(ApiError::from)
    }
}
