// Test fixtures - reusable test data
// Provides consistent shifts and calendars across the integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use shift_calendar::calendar::ScheduleCalendar;
use shift_calendar::models::settings::CalendarConfig;
use shift_calendar::models::shift::{EmployeeId, ShiftDraft, ShiftType};
use shift_calendar::services::persistence::{ShiftRepository, SqliteShiftRepository};
use shift_calendar::services::store::ShiftStore;
use shift_calendar::utils::date::MonthKey;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// A day in June 2025 (June 1st is a Sunday)
    pub fn june(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    /// A day in July 2025 (July 1st is a Tuesday)
    pub fn july(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    pub fn june_2025() -> MonthKey {
        MonthKey::new(2025, 6).unwrap()
    }
}

/// Sample shifts for testing
pub mod shifts {
    use super::*;

    /// Evening trivia shift at The Crown
    pub fn trivia(employee: &str, date: NaiveDate) -> ShiftDraft {
        ShiftDraft::new(
            EmployeeId::new(employee),
            date,
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            "The Crown",
        )
    }

    /// Themed trivia with notes, to check every field survives a copy
    pub fn themed(employee: &str, date: NaiveDate) -> ShiftDraft {
        ShiftDraft::new(
            EmployeeId::new(employee),
            date,
            NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(20, 30, 0).unwrap(),
            "Red Lion",
        )
        .with_type(ShiftType::ThemedTrivia)
        .with_theme("80s Movies")
        .with_notes("Bring the projector")
    }
}

/// Calendar showing June 2025 over the given repository.
pub fn calendar_with(repository: Box<dyn ShiftRepository>) -> ScheduleCalendar {
    let store = ShiftStore::load(repository).expect("Failed to load shifts");
    ScheduleCalendar::new(store, dates::june_2025(), &CalendarConfig::default())
}

/// Calendar showing June 2025 over an in-memory database.
pub fn june_calendar() -> ScheduleCalendar {
    calendar_with(Box::new(
        SqliteShiftRepository::in_memory().expect("Failed to create database"),
    ))
}
