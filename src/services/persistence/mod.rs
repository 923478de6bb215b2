//! Persistence collaborator.
//!
//! The calendar core never talks to storage directly; every mutation goes
//! through a [`ShiftRepository`]. Calls complete before the caller re-renders,
//! so the in-memory store only ever reflects confirmed writes.

use anyhow::Result;

use crate::models::shift::{Shift, ShiftDraft, ShiftId};
use crate::services::database::Database;
use crate::services::shift::ShiftService;

/// Remote/durable storage for shifts.
#[cfg_attr(test, mockall::automock)]
pub trait ShiftRepository {
    /// Load every shift once at startup.
    fn load_all(&self) -> Result<Vec<Shift>>;
    /// Persist a new shift and return the id assigned to it.
    fn create(&self, draft: &ShiftDraft) -> Result<ShiftId>;
    /// Overwrite an existing shift.
    fn update(&self, shift: &Shift) -> Result<()>;
    /// Remove a shift.
    fn delete(&self, id: &ShiftId) -> Result<()>;
}

/// [`ShiftRepository`] backed by the local SQLite database.
pub struct SqliteShiftRepository {
    db: Database,
}

impl SqliteShiftRepository {
    /// Open the database at `path` and make sure the schema exists.
    pub fn open(path: &str) -> Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        Ok(Self { db })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn service(&self) -> ShiftService<'_> {
        ShiftService::new(self.db.connection())
    }
}

impl ShiftRepository for SqliteShiftRepository {
    fn load_all(&self) -> Result<Vec<Shift>> {
        self.service().list_all()
    }

    fn create(&self, draft: &ShiftDraft) -> Result<ShiftId> {
        self.service().create(draft).map(|shift| shift.id)
    }

    fn update(&self, shift: &Shift) -> Result<()> {
        self.service().update(shift)
    }

    fn delete(&self, id: &ShiftId) -> Result<()> {
        self.service().delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::EmployeeId;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_sqlite_repository_round_trip() {
        let repo = SqliteShiftRepository::in_memory().unwrap();
        let draft = ShiftDraft::new(
            EmployeeId::new("E1"),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            "The Crown",
        );

        let id = repo.create(&draft).unwrap();
        let loaded = repo.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);

        repo.delete(&id).unwrap();
        assert!(repo.load_all().unwrap().is_empty());
    }
}
