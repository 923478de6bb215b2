use super::shared::{format_date, format_time, map_shift_row, SHIFT_COLUMNS};
use super::ShiftService;
use crate::models::shift::{Shift, ShiftDraft, ShiftId};
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

impl<'a> ShiftService<'a> {
    /// Insert a new shift, generating its id.
    pub fn create(&self, draft: &ShiftDraft) -> Result<Shift> {
        draft.validate().map_err(|e| anyhow!(e))?;

        let id = ShiftId::new(Uuid::new_v4().to_string());
        self.conn
            .execute(
                "INSERT INTO shifts (
                    id, employee_id, shift_date, start_time, end_time,
                    shift_type, theme, location, notes, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                params![
                    id.as_str(),
                    draft.employee_id.as_str(),
                    format_date(draft.date),
                    format_time(draft.start_time),
                    format_time(draft.end_time),
                    draft.shift_type.as_str(),
                    draft.theme,
                    draft.location,
                    draft.notes,
                ],
            )
            .context("Failed to insert shift")?;

        Ok(draft.clone().into_shift(id))
    }

    /// Retrieve a shift by id.
    pub fn get(&self, id: &ShiftId) -> Result<Option<Shift>> {
        let sql = format!("SELECT {} FROM shifts WHERE id = ?", SHIFT_COLUMNS);
        let shift = self
            .conn
            .query_row(&sql, [id.as_str()], map_shift_row)
            .optional()
            .context("Failed to load shift")?;
        Ok(shift)
    }

    /// Update every field of an existing shift.
    pub fn update(&self, shift: &Shift) -> Result<()> {
        shift.validate().map_err(|e| anyhow!(e))?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE shifts SET
                    employee_id = ?, shift_date = ?, start_time = ?, end_time = ?,
                    shift_type = ?, theme = ?, location = ?, notes = ?,
                    updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                params![
                    shift.employee_id.as_str(),
                    format_date(shift.date),
                    format_time(shift.start_time),
                    format_time(shift.end_time),
                    shift.shift_type.as_str(),
                    shift.theme,
                    shift.location,
                    shift.notes,
                    shift.id.as_str(),
                ],
            )
            .context("Failed to update shift")?;

        if rows_affected == 0 {
            return Err(anyhow!("Shift with id {} not found", shift.id));
        }

        Ok(())
    }

    /// Delete a shift by id.
    pub fn delete(&self, id: &ShiftId) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM shifts WHERE id = ?", [id.as_str()])
            .context("Failed to delete shift")?;

        if rows_affected == 0 {
            return Err(anyhow!("Shift with id {} not found", id));
        }

        Ok(())
    }

    /// Insert or replace shifts keeping their existing ids.
    pub fn import(&self, shifts: &[Shift]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for shift in shifts {
            shift
                .validate()
                .map_err(|e| anyhow!("Shift {}: {}", shift.id, e))?;
            tx.execute(
                "INSERT OR REPLACE INTO shifts (
                    id, employee_id, shift_date, start_time, end_time,
                    shift_type, theme, location, notes, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                params![
                    shift.id.as_str(),
                    shift.employee_id.as_str(),
                    format_date(shift.date),
                    format_time(shift.start_time),
                    format_time(shift.end_time),
                    shift.shift_type.as_str(),
                    shift.theme,
                    shift.location,
                    shift.notes,
                ],
            )
            .with_context(|| format!("Failed to import shift {}", shift.id))?;
        }
        tx.commit().context("Failed to commit shift import")?;
        Ok(shifts.len())
    }
}
