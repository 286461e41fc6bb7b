use diesel::prelude::*;
use tracing::error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::entities::Wallet;
use crate::schema::wallets;

/// The only code allowed to mutate wallet balances. Both primitives are
/// single conditional UPDATE statements, so two concurrent debits against the
/// same wallet cannot both succeed past the point of insufficient funds.
pub struct WalletService;

impl WalletService {
    /// Subtracts `amount` where `balance >= amount`. Zero rows affected on an
    /// existing wallet means the funds were not there at execution time.
    pub fn debit(conn: &mut PgConnection, user_id: Uuid, amount: i64) -> Result<(), ApiError> {
        debug_assert!(amount > 0);

        let rows = diesel::update(
            wallets::table
                .filter(wallets::user_id.eq(user_id))
                .filter(wallets::balance.ge(amount)),
        )
        .set((
            wallets::balance.eq(wallets::balance - amount),
            wallets::naira_balance.eq(wallets::naira_balance - amount),
            wallets::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)
        .map_err(|e| {
            error!("Wallet debit failed for user {}: {}", user_id, e);
            ApiError::from(e)
        })?;

        if rows == 1 {
            return Ok(());
        }

        match Self::exists(conn, user_id)? {
            true => Err(ApiError::InsufficientBalance),
            false => Err(ApiError::NotFound("Wallet not found".to_string())),
        }
    }

    pub fn credit(conn: &mut PgConnection, user_id: Uuid, amount: i64) -> Result<(), ApiError> {
        debug_assert!(amount > 0);

        let rows = diesel::update(wallets::table.filter(wallets::user_id.eq(user_id)))
            .set((
                wallets::balance.eq(wallets::balance + amount),
                wallets::naira_balance.eq(wallets::naira_balance + amount),
                wallets::updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)
            .map_err(|e| {
                error!("Wallet credit failed for user {}: {}", user_id, e);
                ApiError::from(e)
            })?;

        if rows == 1 {
            Ok(())
        } else {
            Err(ApiError::NotFound("Wallet not found".to_string()))
        }
    }

    pub fn find_by_user(conn: &mut PgConnection, user_id: Uuid) -> Result<Wallet, ApiError> {
        wallets::table
            .filter(wallets::user_id.eq(user_id))
            .select(Wallet::as_select())
            .first::<Wallet>(conn)
            .map_err(|e| {
                if matches!(e, diesel::result::Error::NotFound) {
                    ApiError::NotFound("Wallet not found".to_string())
                } else {
                    ApiError::from(e)
                }
            })
    }

    fn exists(conn: &mut PgConnection, user_id: Uuid) -> Result<bool, ApiError> {
        wallets::table
            .filter(wallets::user_id.eq(user_id))
            .select(wallets::id)
            .first::<Uuid>(conn)
            .optional()
            .map(|row| row.is_some())
            .map_err(ApiError::from)
    }
}
