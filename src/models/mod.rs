pub mod app_state;
pub mod dtos;
pub mod entities;
