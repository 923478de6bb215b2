use super::shared::{format_date, map_shift_row, SHIFT_COLUMNS};
use super::ShiftService;
use crate::models::shift::Shift;
use crate::utils::date::MonthKey;
use anyhow::Result;

impl<'a> ShiftService<'a> {
    /// List every shift ordered by date and start time.
    pub fn list_all(&self) -> Result<Vec<Shift>> {
        let sql = format!(
            "SELECT {} FROM shifts ORDER BY shift_date ASC, start_time ASC",
            SHIFT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let shifts = stmt
            .query_map([], map_shift_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(shifts)
    }

    /// Shifts dated within `month`.
    pub fn find_by_month(&self, month: MonthKey) -> Result<Vec<Shift>> {
        let sql = format!(
            "SELECT {} FROM shifts
             WHERE shift_date >= ? AND shift_date <= ?
             ORDER BY shift_date ASC, start_time ASC",
            SHIFT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let shifts = stmt
            .query_map(
                [format_date(month.first_day()), format_date(month.last_day())],
                map_shift_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(shifts)
    }
}
