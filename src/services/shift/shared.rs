use chrono::{NaiveDate, NaiveTime};
use rusqlite::{self, types::Type, Result, Row};

use crate::models::shift::{EmployeeId, Shift, ShiftId, ShiftType};

pub(crate) const SHIFT_COLUMNS: &str =
    "id, employee_id, shift_date, start_time, end_time, shift_type, theme, location, notes";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

fn parse_date(index: usize, value: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|e| conversion_error(index, format!("invalid date '{}': {}", value, e)))
}

fn parse_time(index: usize, value: String) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(&value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
        .map_err(|e| conversion_error(index, format!("invalid time '{}': {}", value, e)))
}

pub(crate) fn map_shift_row(row: &Row<'_>) -> Result<Shift> {
    let shift_type: String = row.get(5)?;
    let shift_type = ShiftType::parse(&shift_type)
        .ok_or_else(|| conversion_error(5, format!("unknown shift type '{}'", shift_type)))?;

    Ok(Shift {
        id: ShiftId::new(row.get::<_, String>(0)?),
        employee_id: EmployeeId::new(row.get::<_, String>(1)?),
        date: parse_date(2, row.get(2)?)?,
        start_time: parse_time(3, row.get(3)?)?,
        end_time: parse_time(4, row.get(4)?)?,
        shift_type,
        theme: row.get(6)?,
        location: row.get(7)?,
        notes: row.get(8)?,
    })
}
