use diesel::prelude::*;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::entities::{Gateway, VendorPendingSale};
use crate::schema::{gateways, vendor_pending_sales};

/// Physical-note issuance workflow. The BU already moved at transfer time;
/// these transitions are informational and carry zero monetary effect, which
/// is what makes it safe to delay or repeat note hand-off without risking a
/// double payment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SaleStatus {
    Pending,
    Confirmed,
    NotesIssued,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Confirmed => "confirmed",
            SaleStatus::NotesIssued => "notes_issued",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SaleStatus::Pending),
            "confirmed" => Some(SaleStatus::Confirmed),
            "notes_issued" => Some(SaleStatus::NotesIssued),
            _ => None,
        }
    }

    /// Status only moves forward, one step at a time.
    pub fn can_transition(from: SaleStatus, to: SaleStatus) -> bool {
        matches!(
            (from, to),
            (SaleStatus::Pending, SaleStatus::Confirmed)
                | (SaleStatus::Confirmed, SaleStatus::NotesIssued)
        )
    }
}

pub struct VendorSaleService;

impl VendorSaleService {
    /// Vendor acknowledges the BU has landed. pending -> confirmed.
    pub fn confirm(
        conn: &mut PgConnection,
        vendor_id: Uuid,
        sale_id: Uuid,
    ) -> Result<VendorPendingSale, ApiError> {
        Self::transition(conn, vendor_id, sale_id, SaleStatus::Pending, SaleStatus::Confirmed)
    }

    /// Physical notes handed to the guest. confirmed -> notes_issued.
    pub fn issue_notes(
        conn: &mut PgConnection,
        vendor_id: Uuid,
        sale_id: Uuid,
    ) -> Result<VendorPendingSale, ApiError> {
        Self::transition(
            conn,
            vendor_id,
            sale_id,
            SaleStatus::Confirmed,
            SaleStatus::NotesIssued,
        )
    }

    /// Conditional state transition: the WHERE clause on the expected status
    /// means two vendor-app taps cannot both succeed on the same sale.
    fn transition(
        conn: &mut PgConnection,
        vendor_id: Uuid,
        sale_id: Uuid,
        expected: SaleStatus,
        next: SaleStatus,
    ) -> Result<VendorPendingSale, ApiError> {
        let sale = vendor_pending_sales::table
            .filter(vendor_pending_sales::id.eq(sale_id))
            .select(VendorPendingSale::as_select())
            .first::<VendorPendingSale>(conn)
            .optional()
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::NotFound("Sale not found".to_string()))?;

        if sale.vendor_id != vendor_id {
            return Err(ApiError::Forbidden(
                "Sale belongs to another vendor".to_string(),
            ));
        }

        let updated = diesel::update(
            vendor_pending_sales::table
                .filter(vendor_pending_sales::id.eq(sale_id))
                .filter(vendor_pending_sales::status.eq(expected.as_str())),
        )
        .set((
            vendor_pending_sales::status.eq(next.as_str()),
            vendor_pending_sales::updated_at.eq(diesel::dsl::now),
        ))
        .returning(VendorPendingSale::as_returning())
        .get_result::<VendorPendingSale>(conn)
        .optional()
        .map_err(ApiError::from)?;

        match updated {
            Some(sale) => {
                info!("Sale {} moved to {}", sale_id, next.as_str());
                Ok(sale)
            }
            None => Err(ApiError::InvalidStateTransition(format!(
                "Sale is {}, expected {}",
                sale.status,
                expected.as_str()
            ))),
        }
    }

    /// Read-side poll for the vendor app.
    pub fn pending_for_gateway(
        conn: &mut PgConnection,
        vendor_id: Uuid,
        gateway_id: Uuid,
    ) -> Result<Vec<VendorPendingSale>, ApiError> {
        let gateway = gateways::table
            .filter(gateways::id.eq(gateway_id))
            .select(Gateway::as_select())
            .first::<Gateway>(conn)
            .optional()
            .map_err(ApiError::from)?
            .ok_or_else(|| ApiError::NotFound("Gateway not found".to_string()))?;

        if gateway.vendor_id != vendor_id {
            return Err(ApiError::Forbidden(
                "Gateway belongs to another vendor".to_string(),
            ));
        }

        vendor_pending_sales::table
            .filter(vendor_pending_sales::gateway_id.eq(gateway_id))
            .filter(vendor_pending_sales::status.eq(SaleStatus::Pending.as_str()))
            .order(vendor_pending_sales::created_at.desc())
            .select(VendorPendingSale::as_select())
            .load::<VendorPendingSale>(conn)
            .map_err(ApiError::from)
    }
}
