use regex::Regex;
use std::sync::LazyLock;
use tracing::error;
use uuid::Uuid;
use validator::ValidationError;

use crate::config::security_config::Claims;
use crate::error::ApiError;

pub static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("Invalid phone regex"));

/// BU amounts travel as whole BU in the API and are stored as BIGINT
/// subunits (100 = ɃU 1.00).
pub fn to_subunits(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Positive, finite, and non-zero after rounding to subunits.
pub fn validate_amount(amount: f64) -> Result<i64, ApiError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ApiError::InvalidInput(
            "Amount must be positive".to_string(),
        ));
    }
    let subunits = to_subunits(amount);
    if subunits <= 0 {
        return Err(ApiError::InvalidInput("Amount too small".to_string()));
    }
    Ok(subunits)
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_NUMBER.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("Invalid phone number"))
    }
}

pub fn user_id_from_claims(claims: &Claims) -> Result<Uuid, ApiError> {
    Uuid::parse_str(&claims.sub).map_err(|e| {
        error!("Invalid user id in session: {}", e);
        ApiError::Auth("Invalid session subject".to_string())
    })
}
