pub mod gateway;
pub mod gateway_transfer;
pub mod health;
pub mod transactions;
pub mod transfer;
pub mod vendor_sales;
pub mod wallet;
pub mod withdraw;
