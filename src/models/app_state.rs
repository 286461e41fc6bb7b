use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use std::sync::Arc;

use crate::clients::auth::PinVerifier;
use crate::clients::notification::Notifier;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub session_secret: String,
    pub pin_verifier: Arc<dyn PinVerifier>,
    pub notifier: Arc<dyn Notifier>,
}
