// Module exports for models

pub mod conflict;
pub mod drag;
pub mod employee;
pub mod filter;
pub mod settings;
pub mod shift;
