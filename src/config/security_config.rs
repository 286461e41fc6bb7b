use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::{HeaderMap, Method, StatusCode};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::warn;

use crate::models::app_state::AppState;

pub const SESSION_COOKIE: &str = "session";
pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Session claims minted by the external auth collaborator. This service only
/// verifies; it never issues cookies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiration time
    pub iat: usize,  // issued at
}

pub struct SessionSecret {
    pub session_secret: String,
}

impl SessionSecret {
    pub fn new() -> Self {
        let session_secret =
            env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in environment variables");

        if session_secret.len() < 32 {
            panic!("SESSION_SECRET must be at least 32 characters long");
        }

        Self { session_secret }
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingSession,
    InvalidSession(String),
    MissingCsrf,
    CsrfMismatch,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingSession => write!(f, "Session cookie required"),
            AuthError::InvalidSession(msg) => write!(f, "Invalid session: {}", msg),
            AuthError::MissingCsrf => write!(f, "CSRF token required"),
            AuthError::CsrfMismatch => write!(f, "CSRF token mismatch"),
        }
    }
}

impl From<AuthError> for (StatusCode, String) {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingSession => (
                StatusCode::UNAUTHORIZED,
                "Session cookie required".to_string(),
            ),
            AuthError::InvalidSession(msg) => {
                (StatusCode::UNAUTHORIZED, format!("Invalid session: {}", msg))
            }
            AuthError::MissingCsrf => (StatusCode::FORBIDDEN, "CSRF token required".to_string()),
            AuthError::CsrfMismatch => (StatusCode::FORBIDDEN, "CSRF token mismatch".to_string()),
        }
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get(http::header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

pub fn verify_session(secret: &str, token: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Session verification error: {}", e))
}

/// Double-submit CSRF check: the `x-csrf-token` header must match the
/// `csrf_token` cookie on every state-modifying request.
fn check_csrf(headers: &HeaderMap, method: &Method) -> Result<(), AuthError> {
    if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(());
    }

    let cookie = cookie_value(headers, CSRF_COOKIE).ok_or(AuthError::MissingCsrf)?;
    let header = headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCsrf)?;

    if cookie != header {
        return Err(AuthError::CsrfMismatch);
    }
    Ok(())
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    if let Err(error) = check_csrf(req.headers(), req.method()) {
        warn!("CSRF check failed: {}", error);
        let (status, message): (StatusCode, String) = error.into();
        return Err((status, message).into_response());
    }

    let token = match cookie_value(req.headers(), SESSION_COOKIE) {
        Some(token) if !token.is_empty() => token,
        _ => {
            let (status, message): (StatusCode, String) = AuthError::MissingSession.into();
            return Err((status, message).into_response());
        }
    };

    let claims = match verify_session(&state.session_secret, &token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Session verification failed: {}", e);
            let (status, message): (StatusCode, String) =
                AuthError::InvalidSession("verification failed".to_string()).into();
            return Err((status, message).into_response());
        }
    };

    let now = Utc::now().timestamp() as usize;
    if claims.exp < now {
        warn!("Session expired for user {}", claims.sub);
        let (status, message): (StatusCode, String) =
            AuthError::InvalidSession("session expired".to_string()).into();
        return Err((status, message).into_response());
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
