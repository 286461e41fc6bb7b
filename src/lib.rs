// Library entry point for BashPay
// This exposes modules for testing while keeping main.rs as the binary entry point

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod schema;
pub mod services;
pub mod utility;

pub use error::ApiError;
pub use models::app_state::AppState;
