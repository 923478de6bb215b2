// Service module exports

pub mod conflict;
pub mod database;
pub mod drag;
pub mod feedback;
pub mod persistence;
pub mod render;
pub mod settings;
pub mod shift;
pub mod store;
