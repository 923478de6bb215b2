// Drag operation classifier
// Turns the control a gesture started from into a drag session, or declines.

use crate::models::drag::{DragOrigin, DragSession};
use crate::models::filter::ShiftFilter;
use crate::models::shift::Shift;
use crate::services::store::ShiftStore;
use crate::utils::date::MonthGrid;

/// Build the session for a gesture starting at `origin`.
///
/// Returns `None` when the origin is not a drag handle, when it refers to
/// something that is not on the grid, or when a day/week handle would carry
/// no shifts under the current filter.
pub fn classify(
    origin: &DragOrigin,
    store: &ShiftStore,
    grid: &MonthGrid,
    filter: &ShiftFilter,
) -> Option<DragSession> {
    let session = match origin {
        DragOrigin::EventBody(id) => DragSession::Event {
            shift: store.get(id)?.clone(),
            copy: false,
        },
        DragOrigin::EventCopyAffordance(id) => DragSession::Event {
            shift: store.get(id)?.clone(),
            copy: true,
        },
        DragOrigin::DayMoveHandle(date) | DragOrigin::DayCopyHandle(date) => {
            grid.week_row_index_of(*date)?;
            let shifts = snapshot(store.by_date(*date, filter))?;
            DragSession::Day {
                date: *date,
                shifts,
                copy: matches!(origin, DragOrigin::DayCopyHandle(_)),
            }
        }
        DragOrigin::WeekMoveHandle(row) | DragOrigin::WeekCopyHandle(row) => {
            let source_dates = grid.row_dates(*row);
            if source_dates.is_empty() {
                return None;
            }
            let shifts = snapshot(store.by_dates(&source_dates, filter))?;
            DragSession::Week {
                month: grid.month(),
                row: *row,
                source_dates,
                shifts,
                copy: matches!(origin, DragOrigin::WeekCopyHandle(_)),
            }
        }
        DragOrigin::Unrecognized => return None,
    };

    log::debug!(
        "Classified drag as {:?} with {} shift(s)",
        session.mode(),
        session.payload().len()
    );
    Some(session)
}

/// Owned copy of the matching shifts, `None` when there are none.
fn snapshot(shifts: Vec<&Shift>) -> Option<Vec<Shift>> {
    if shifts.is_empty() {
        return None;
    }
    Some(shifts.into_iter().cloned().collect())
}
