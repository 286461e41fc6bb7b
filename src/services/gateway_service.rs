use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::dtos::GatewayQrPayload;
use crate::models::entities::{Event, Gateway, NewEvent, NewGateway, User, GATEWAY_STATUS_ACTIVE};
use crate::schema::{events, gateways, users};

/// The `{event_id, celebrant_id}` contract both creation paths converge on.
#[derive(Debug)]
pub struct ResolvedGateway {
    pub gateway: Gateway,
    pub event_id: Uuid,
    pub celebrant_id: Uuid,
}

pub enum CreateGateway {
    /// Vendor selected an event already created by a celebrant.
    LinkEvent { event_id: Uuid },
    /// Vendor typed the celebrant's phone number and event details.
    Manual {
        celebrant_unique_id: String,
        celebrant_name: String,
        event_name: String,
        event_date: NaiveDate,
        event_time: Option<String>,
        event_location: Option<String>,
    },
}

pub struct GatewayService;

impl GatewayService {
    /// Maps a scanned gateway id to its event and celebrant. Only the id from
    /// the QR payload is trusted; everything else is re-derived from the
    /// canonical gateway row.
    pub fn resolve(conn: &mut PgConnection, gateway_id: Uuid) -> Result<ResolvedGateway, ApiError> {
        let gateway = gateways::table
            .filter(gateways::id.eq(gateway_id))
            .select(Gateway::as_select())
            .first::<Gateway>(conn)
            .optional()
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::NotFound("Gateway not found".to_string()))?;

        if gateway.status != GATEWAY_STATUS_ACTIVE {
            return Err(ApiError::NotFound("Gateway is not active".to_string()));
        }

        let event_id = gateway
            .event_id
            .ok_or_else(|| ApiError::NotFound("Gateway is not linked to an event".to_string()))?;

        let event = events::table
            .filter(events::id.eq(event_id))
            .select(Event::as_select())
            .first::<Event>(conn)
            .map_err(|e| {
                error!("Event lookup failed for gateway {}: {}", gateway_id, e);
                if matches!(e, diesel::result::Error::NotFound) {
                    ApiError::NotFound("Event not found for gateway".to_string())
                } else {
                    ApiError::from(e)
                }
            })?;

        Ok(ResolvedGateway {
            celebrant_id: event.celebrant_id,
            event_id: event.id,
            gateway,
        })
    }

    pub fn create(
        conn: &mut PgConnection,
        vendor_id: Uuid,
        request: CreateGateway,
    ) -> Result<(Gateway, GatewayQrPayload), ApiError> {
        let (event, celebrant, event_time, event_location) = match request {
            CreateGateway::LinkEvent { event_id } => {
                let event = events::table
                    .filter(events::id.eq(event_id))
                    .select(Event::as_select())
                    .first::<Event>(conn)
                    .optional()
                    .map_err(ApiError::from)?
                    .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?;
                let celebrant = Self::find_user(conn, event.celebrant_id)?;
                (event, celebrant, None, None)
            }
            CreateGateway::Manual {
                celebrant_unique_id,
                celebrant_name: _,
                event_name,
                event_date,
                event_time,
                event_location,
            } => {
                let celebrant = users::table
                    .filter(users::phone_number.eq(&celebrant_unique_id))
                    .select(User::as_select())
                    .first::<User>(conn)
                    .optional()
                    .map_err(ApiError::from)?
                    .ok_or_else(|| {
                        ApiError::NotFound("No celebrant found for that phone number".to_string())
                    })?;

                // Reuse the celebrant's event when the vendor re-types one
                // that already exists.
                let existing = events::table
                    .filter(events::celebrant_id.eq(celebrant.id))
                    .filter(events::event_name.eq(&event_name))
                    .filter(events::event_date.eq(event_date))
                    .select(Event::as_select())
                    .first::<Event>(conn)
                    .optional()
                    .map_err(ApiError::from)?;

                let event = match existing {
                    Some(event) => event,
                    None => diesel::insert_into(events::table)
                        .values(NewEvent {
                            celebrant_id: celebrant.id,
                            event_name,
                            event_date,
                        })
                        .returning(Event::as_returning())
                        .get_result::<Event>(conn)
                        .map_err(ApiError::from)?,
                };
                (event, celebrant, event_time, event_location)
            }
        };

        // The back-link is set once; a second gateway for the same event is
        // rejected, and the conditional update makes that hold under
        // concurrent creates too.
        let gateway = conn.transaction::<Gateway, ApiError, _>(|conn| {
            let gateway = diesel::insert_into(gateways::table)
                .values(NewGateway {
                    vendor_id,
                    event_id: Some(event.id),
                    celebrant_unique_id: celebrant.phone_number.clone(),
                    celebrant_name: celebrant.full_name.clone(),
                    event_name: event.event_name.clone(),
                    event_date: event.event_date,
                    event_time,
                    event_location,
                    status: GATEWAY_STATUS_ACTIVE.to_string(),
                })
                .returning(Gateway::as_returning())
                .get_result::<Gateway>(conn)
                .map_err(ApiError::from)?;

            let linked = diesel::update(
                events::table
                    .filter(events::id.eq(event.id))
                    .filter(events::gateway_id.is_null()),
            )
            .set(events::gateway_id.eq(gateway.id))
            .execute(conn)
            .map_err(ApiError::from)?;

            if linked == 0 {
                return Err(ApiError::DomainInvariant(
                    "Event is already linked to a gateway".to_string(),
                ));
            }
            Ok(gateway)
        })?;

        info!(
            "Gateway {} created by vendor {} for event {}",
            gateway.id, vendor_id, event.id
        );

        let payload = Self::qr_payload(&gateway);
        Ok((gateway, payload))
    }

    pub fn qr_payload(gateway: &Gateway) -> GatewayQrPayload {
        GatewayQrPayload {
            payload_type: GatewayQrPayload::PAYLOAD_TYPE.to_string(),
            gateway_id: gateway.id,
            event_name: gateway.event_name.clone(),
            celebrant_unique_id: gateway.celebrant_unique_id.clone(),
            celebrant_name: gateway.celebrant_name.clone(),
        }
    }

    fn find_user(conn: &mut PgConnection, user_id: Uuid) -> Result<User, ApiError> {
        users::table
            .filter(users::id.eq(user_id))
            .select(User::as_select())
            .first::<User>(conn)
            .map_err(|e| {
                if matches!(e, diesel::result::Error::NotFound) {
                    ApiError::NotFound("User not found".to_string())
                } else {
                    ApiError::from(e)
                }
            })
    }
}
