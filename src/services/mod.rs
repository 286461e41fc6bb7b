pub mod event_service;
pub mod gateway_service;
pub mod transfer_service;
pub mod vendor_sale_service;
pub mod wallet_service;
pub mod withdrawal_service;
