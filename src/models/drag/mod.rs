// Drag session model
// The payload captured when a drag starts and the target it is dropped on.

use chrono::NaiveDate;
use std::time::Instant;

use super::shift::{Shift, ShiftId};
use crate::utils::date::{DayMapping, MonthKey};

/// The six drag operations a gesture can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    MoveEvent,
    CopyEvent,
    MoveDay,
    CopyDay,
    MoveWeek,
    CopyWeek,
}

impl DragMode {
    pub fn is_copy(&self) -> bool {
        matches!(
            self,
            DragMode::CopyEvent | DragMode::CopyDay | DragMode::CopyWeek
        )
    }

    /// Present participle used in announcements ("moving", "copying").
    pub fn verb(&self) -> &'static str {
        if self.is_copy() {
            "copying"
        } else {
            "moving"
        }
    }

    /// Past tense used in announcements ("moved", "copied").
    pub fn past_tense(&self) -> &'static str {
        if self.is_copy() {
            "Copied"
        } else {
            "Moved"
        }
    }
}

/// The control a drag gesture started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOrigin {
    DayMoveHandle(NaiveDate),
    DayCopyHandle(NaiveDate),
    WeekMoveHandle(usize),
    WeekCopyHandle(usize),
    EventCopyAffordance(ShiftId),
    EventBody(ShiftId),
    /// Anything that is not a drag handle (headers, empty space, buttons).
    Unrecognized,
}

/// Where a day or week payload was captured from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKey {
    Day(NaiveDate),
    Week { month: MonthKey, row: usize },
}

/// An in-flight drag. The payload is a snapshot taken when the drag started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSession {
    Event {
        shift: Shift,
        copy: bool,
    },
    Day {
        date: NaiveDate,
        shifts: Vec<Shift>,
        copy: bool,
    },
    Week {
        month: MonthKey,
        row: usize,
        /// In-month dates of the source row, kept so the weekday mapping can
        /// still be computed after the view has moved to another month.
        source_dates: Vec<NaiveDate>,
        shifts: Vec<Shift>,
        copy: bool,
    },
}

impl DragSession {
    pub fn mode(&self) -> DragMode {
        match self {
            DragSession::Event { copy: false, .. } => DragMode::MoveEvent,
            DragSession::Event { copy: true, .. } => DragMode::CopyEvent,
            DragSession::Day { copy: false, .. } => DragMode::MoveDay,
            DragSession::Day { copy: true, .. } => DragMode::CopyDay,
            DragSession::Week { copy: false, .. } => DragMode::MoveWeek,
            DragSession::Week { copy: true, .. } => DragMode::CopyWeek,
        }
    }

    pub fn is_copy(&self) -> bool {
        self.mode().is_copy()
    }

    pub fn payload(&self) -> &[Shift] {
        match self {
            DragSession::Event { shift, .. } => std::slice::from_ref(shift),
            DragSession::Day { shifts, .. } | DragSession::Week { shifts, .. } => shifts,
        }
    }

    pub fn payload_ids(&self) -> Vec<ShiftId> {
        self.payload().iter().map(|s| s.id.clone()).collect()
    }

    pub fn source_key(&self) -> Option<SourceKey> {
        match self {
            DragSession::Event { .. } => None,
            DragSession::Day { date, .. } => Some(SourceKey::Day(*date)),
            DragSession::Week { month, row, .. } => Some(SourceKey::Week {
                month: *month,
                row: *row,
            }),
        }
    }

    /// "1 shift" / "4 shifts".
    pub fn describe_payload(&self) -> String {
        describe_count(self.payload().len())
    }
}

pub fn describe_count(count: usize) -> String {
    if count == 1 {
        "1 shift".to_string()
    } else {
        format!("{} shifts", count)
    }
}

/// Synthetic preview shown under the pointer right after a drag starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPreview {
    pub label: String,
    pub count: usize,
    pub expires_at: Instant,
}

impl DragPreview {
    pub fn for_session(session: &DragSession, expires_at: Instant) -> Self {
        let label = match session {
            DragSession::Event { shift, .. } => {
                format!("{} {}", shift.employee_id, shift.start_time.format("%H:%M"))
            }
            DragSession::Day { date, .. } => {
                format!("{} ({})", date.format("%b %-d"), session.describe_payload())
            }
            DragSession::Week { source_dates, .. } => {
                let first = source_dates.first().map(|d| d.format("%b %-d").to_string());
                format!(
                    "Week of {} ({})",
                    first.unwrap_or_default(),
                    session.describe_payload()
                )
            }
        };
        Self {
            label,
            count: session.payload().len(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// The single cell or row currently highlighted as the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Cell(NaiveDate),
    Row(usize),
}

/// Resolved drop location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Every payload shift lands on this date.
    Date(NaiveDate),
    /// Week drop: each source date maps to the same weekday of `row`.
    Week {
        month: MonthKey,
        row: usize,
        mapping: DayMapping,
    },
}

/// One payload shift and the date it should land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub shift: &'a Shift,
    pub target: NaiveDate,
}

/// A session paired with the target it was dropped on, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropPlan {
    pub session: DragSession,
    pub target: DropTarget,
}

impl DropPlan {
    pub fn new(session: DragSession, target: DropTarget) -> Self {
        Self { session, target }
    }

    pub fn mode(&self) -> DragMode {
        self.session.mode()
    }

    pub fn target_for(&self, shift: &Shift) -> Option<NaiveDate> {
        match &self.target {
            DropTarget::Date(date) => Some(*date),
            DropTarget::Week { mapping, .. } => mapping.get(shift.date),
        }
    }

    /// Payload shifts that have a target.
    pub fn placements(&self) -> Vec<Placement<'_>> {
        self.session
            .payload()
            .iter()
            .filter_map(|shift| {
                self.target_for(shift)
                    .map(|target| Placement { shift, target })
            })
            .collect()
    }

    /// Payload shifts whose weekday has no counterpart in the target row.
    pub fn dropped(&self) -> Vec<&Shift> {
        self.session
            .payload()
            .iter()
            .filter(|shift| self.target_for(shift).is_none())
            .collect()
    }

    /// A move that would leave every shift where it already is.
    pub fn is_noop(&self) -> bool {
        !self.session.is_copy()
            && self.dropped().is_empty()
            && self
                .placements()
                .iter()
                .all(|placement| placement.shift.date == placement.target)
    }

    /// Human readable destination for announcements.
    pub fn describe_target(&self) -> String {
        match &self.target {
            DropTarget::Date(date) => date.format("%A, %B %-d").to_string(),
            DropTarget::Week { mapping, .. } => mapping
                .mapped
                .values()
                .min()
                .map(|first| format!("the week of {}", first.format("%B %-d")))
                .unwrap_or_else(|| "the selected week".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::{EmployeeId, ShiftDraft};
    use crate::utils::date::grid_for;
    use chrono::NaiveTime;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn shift(id: &str, on: NaiveDate) -> Shift {
        ShiftDraft::new(
            EmployeeId::new("E1"),
            on,
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            "The Crown",
        )
        .into_shift(ShiftId::new(id))
    }

    #[test]
    fn test_session_modes() {
        let s = shift("1", date(2025, 6, 3));
        let event = DragSession::Event {
            shift: s.clone(),
            copy: false,
        };
        assert_eq!(event.mode(), DragMode::MoveEvent);
        assert_eq!(event.source_key(), None);
        assert_eq!(event.payload().len(), 1);

        let day = DragSession::Day {
            date: s.date,
            shifts: vec![s],
            copy: true,
        };
        assert_eq!(day.mode(), DragMode::CopyDay);
        assert!(day.is_copy());
        assert_eq!(day.source_key(), Some(SourceKey::Day(date(2025, 6, 3))));
    }

    #[test]
    fn test_week_plan_placements_and_drops() {
        let grid = grid_for(2025, 6).unwrap();
        let shifts = vec![shift("1", date(2025, 6, 2)), shift("2", date(2025, 6, 4))];
        let source_dates = grid.row_dates(0);
        let session = DragSession::Week {
            month: grid.month(),
            row: 0,
            source_dates: source_dates.clone(),
            shifts,
            copy: false,
        };
        let plan = DropPlan::new(
            session,
            DropTarget::Week {
                month: grid.month(),
                row: 5,
                mapping: grid.day_of_week_mapping(&source_dates, 5),
            },
        );
        let placements = plan.placements();
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].target, date(2025, 6, 30));
        assert_eq!(plan.dropped().len(), 1);
        assert!(!plan.is_noop());
    }

    #[test]
    fn test_move_to_same_date_is_noop() {
        let s = shift("1", date(2025, 6, 3));
        let plan = DropPlan::new(
            DragSession::Event {
                shift: s.clone(),
                copy: false,
            },
            DropTarget::Date(s.date),
        );
        assert!(plan.is_noop());

        let copy = DropPlan::new(
            DragSession::Event {
                shift: s.clone(),
                copy: true,
            },
            DropTarget::Date(s.date),
        );
        assert!(!copy.is_noop());
    }

    #[test]
    fn test_describe_count() {
        assert_eq!(describe_count(1), "1 shift");
        assert_eq!(describe_count(3), "3 shifts");
    }
}
