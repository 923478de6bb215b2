//! Shift service entry point.
//! SQLite-backed create/read/update/delete for shifts, split across focused
//! submodules.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
pub(crate) mod shared;

/// Service for managing shifts stored in SQLite.
pub struct ShiftService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> ShiftService<'a> {
    /// Create a new ShiftService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}
