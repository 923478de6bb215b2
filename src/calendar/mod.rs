//! Schedule calendar.
//!
//! Owns the shift store, the displayed month and all presentation state,
//! and is the only entry point for pointer gestures. Every change that
//! affects what is visible produces a fresh [`RenderSnapshot`].

use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;
use std::time::Instant;

use crate::models::drag::DragOrigin;
use crate::models::employee::EmployeeRoster;
use crate::models::filter::ShiftFilter;
use crate::models::settings::CalendarConfig;
use crate::models::shift::{Shift, ShiftDraft, ShiftForm, ShiftId, ShiftPatch};
use crate::services::drag::{DragController, DragEnv, DropOutcome, GridLayout, Point, Side};
use crate::services::feedback::{Alert, Feedback};
use crate::services::render::{RenderSnapshot, Renderer};
use crate::services::store::{DoubleBooking, ShiftStore, StoreError};
use crate::utils::date::{MonthGrid, MonthKey};

const DEFAULT_CELL_WIDTH: f32 = 120.0;
const DEFAULT_CELL_HEIGHT: f32 = 100.0;

pub struct ScheduleCalendar {
    store: ShiftStore,
    grid: MonthGrid,
    filter: ShiftFilter,
    collapsed: BTreeSet<ShiftId>,
    roster: EmployeeRoster,
    layout: GridLayout,
    drag: DragController,
    feedback: Feedback,
    renderer: Option<Box<dyn Renderer>>,
    snapshot: RenderSnapshot,
}

impl ScheduleCalendar {
    pub fn new(store: ShiftStore, month: MonthKey, config: &CalendarConfig) -> Self {
        let grid = MonthGrid::for_month(month);
        let filter = ShiftFilter::all();
        let collapsed = BTreeSet::new();
        let snapshot = RenderSnapshot::build(&grid, &store, &filter, &collapsed);
        Self {
            store,
            grid,
            filter,
            collapsed,
            roster: EmployeeRoster::new(),
            layout: GridLayout::uniform(
                DEFAULT_CELL_WIDTH,
                DEFAULT_CELL_HEIGHT,
                config.boundary_region_width,
            ),
            drag: DragController::new(config),
            feedback: Feedback::new(),
            renderer: None,
            snapshot,
        }
    }

    // Accessors

    pub fn month(&self) -> MonthKey {
        self.grid.month()
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn store(&self) -> &ShiftStore {
        &self.store
    }

    pub fn filter(&self) -> &ShiftFilter {
        &self.filter
    }

    pub fn collapsed(&self) -> &BTreeSet<ShiftId> {
        &self.collapsed
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut Feedback {
        &mut self.feedback
    }

    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    /// Center of the in-view cell for `date`.
    pub fn cell_center(&self, date: NaiveDate) -> Option<Point> {
        self.grid
            .cell_for(date)
            .map(|cell| self.layout.cell_center(cell.row, cell.column))
    }

    // Configuration

    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer>) {
        self.renderer = Some(renderer);
        self.render();
    }

    pub fn set_layout(&mut self, layout: GridLayout) {
        self.layout = layout;
    }

    pub fn set_roster(&mut self, roster: EmployeeRoster) {
        self.roster = roster;
    }

    pub fn set_filter(&mut self, filter: ShiftFilter) {
        self.filter = filter;
        self.render();
    }

    // Month navigation

    pub fn navigate_previous(&mut self) {
        self.go_to(self.month().previous());
    }

    pub fn navigate_next(&mut self) {
        self.go_to(self.month().next());
    }

    pub fn navigate_today(&mut self) {
        self.go_to(MonthKey::containing(Local::now().date_naive()));
    }

    pub fn go_to(&mut self, month: MonthKey) {
        if month == self.month() {
            return;
        }
        log::debug!("Showing {}", month);
        self.grid = MonthGrid::for_month(month);
        self.render();
    }

    // Drag gestures

    /// Gesture start. Returns whether a drag session was created.
    pub fn begin_drag(&mut self, origin: &DragOrigin, now: Instant) -> bool {
        let (drag, mut env) = self.drag_parts();
        drag.begin(origin, now, &mut env)
    }

    pub fn drag_over(&mut self, point: Point, now: Instant) {
        let (drag, env) = self.drag_parts();
        drag.pointer_move(point, now, &env);
    }

    /// Advance drag timers; performs the boundary month change when the
    /// dwell elapses and returns the month now shown.
    pub fn tick(&mut self, now: Instant) -> Option<MonthKey> {
        let current = self.month();
        let month = match self.drag.tick(now, current)? {
            Side::Previous => current.previous(),
            Side::Next => current.next(),
        };
        self.go_to(month);
        self.drag.finish_transition(&mut self.feedback, month);
        Some(month)
    }

    pub fn drop_at(&mut self, point: Point) -> DropOutcome {
        let (drag, mut env) = self.drag_parts();
        let outcome = drag.drop_at(point, &mut env);
        if matches!(outcome, DropOutcome::Committed(_)) {
            self.render();
        }
        outcome
    }

    pub fn confirm_override(&mut self) -> DropOutcome {
        let (drag, mut env) = self.drag_parts();
        let outcome = drag.confirm_override(&mut env);
        if matches!(outcome, DropOutcome::Committed(_)) {
            self.render();
        }
        outcome
    }

    pub fn decline_override(&mut self) -> DropOutcome {
        self.drag.decline_override(&mut self.feedback)
    }

    pub fn drag_end(&mut self) -> DropOutcome {
        self.drag.drag_end(&mut self.feedback)
    }

    fn drag_parts(&mut self) -> (&mut DragController, DragEnv<'_>) {
        let env = DragEnv {
            store: &mut self.store,
            collapsed: &mut self.collapsed,
            feedback: &mut self.feedback,
            grid: &self.grid,
            layout: &self.layout,
            filter: &self.filter,
            roster: &self.roster,
        };
        (&mut self.drag, env)
    }

    // Shift editing

    pub fn create_shift(&mut self, draft: ShiftDraft) -> Result<ShiftId, StoreError> {
        let name = self.roster.display_name(&draft.employee_id);
        let date = draft.date;
        let id = self.store.add(draft).map_err(|e| self.report(e, "add"))?;
        self.feedback.announce(format!(
            "Added shift for {} on {}",
            name,
            date.format("%A, %B %-d")
        ));
        self.render();
        Ok(id)
    }

    pub fn create_shift_from_form(&mut self, form: &ShiftForm) -> Result<ShiftId, StoreError> {
        let draft = form.parse()?;
        self.create_shift(draft)
    }

    pub fn edit_shift(&mut self, id: &ShiftId, patch: &ShiftPatch) -> Result<(), StoreError> {
        let result = self.store.update(id, patch).map(|_| ());
        result.map_err(|e| self.report(e, "update"))?;
        self.feedback.announce("Shift updated");
        self.render();
        Ok(())
    }

    pub fn delete_shift(&mut self, id: &ShiftId) -> Result<Shift, StoreError> {
        let removed = self.store.remove(id).map_err(|e| self.report(e, "delete"))?;
        self.collapsed.remove(id);
        self.feedback.announce("Shift deleted");
        self.render();
        Ok(removed)
    }

    /// Flip the collapsed flag of a shift. Returns the new state.
    pub fn toggle_collapsed(&mut self, id: &ShiftId) -> bool {
        let collapsed = if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.clone());
            true
        };
        self.render();
        collapsed
    }

    /// Existing double-bookings in the displayed month.
    pub fn double_bookings(&self) -> Vec<DoubleBooking> {
        self.store.double_bookings(self.month())
    }

    /// Persistence failures need acknowledging; validation errors go back
    /// to the form that produced them.
    fn report(&mut self, error: StoreError, operation: &str) -> StoreError {
        if matches!(error, StoreError::Persistence { .. }) {
            self.feedback
                .alert(Alert::error(format!("Could not {} shift", operation), error.to_string()));
        }
        error
    }

    fn render(&mut self) {
        self.snapshot =
            RenderSnapshot::build(&self.grid, &self.store, &self.filter, &self.collapsed);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(&self.snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::drag::Highlight;
    use crate::models::shift::EmployeeId;
    use crate::services::drag::{BoundaryAffordance, CancelReason, DragPhase};
    use crate::services::persistence::SqliteShiftRepository;
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn june_calendar() -> ScheduleCalendar {
        let store =
            ShiftStore::load(Box::new(SqliteShiftRepository::in_memory().unwrap())).unwrap();
        ScheduleCalendar::new(store, MonthKey::new(2025, 6).unwrap(), &CalendarConfig::default())
    }

    fn draft(employee: &str, on: NaiveDate) -> ShiftDraft {
        ShiftDraft::new(
            EmployeeId::new(employee),
            on,
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            "The Crown",
        )
    }

    struct CountingRenderer(Rc<RefCell<usize>>);

    impl Renderer for CountingRenderer {
        fn render(&mut self, _snapshot: &RenderSnapshot) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_move_event_keeps_id_and_count() {
        let mut cal = june_calendar();
        let id = cal.create_shift(draft("E1", date(6, 3))).unwrap();
        let t0 = Instant::now();

        assert!(cal.begin_drag(&DragOrigin::EventBody(id.clone()), t0));
        let target = cal.cell_center(date(6, 10)).unwrap();
        cal.drag_over(target, t0);
        assert_eq!(cal.drag().highlight(), Highlight::Cell(date(6, 10)));

        let outcome = cal.drop_at(target);
        assert!(matches!(outcome, DropOutcome::Committed(ref r) if r.succeeded == 1));
        assert_eq!(cal.store().len(), 1);
        assert_eq!(cal.store().get(&id).unwrap().date, date(6, 10));
        assert_eq!(cal.snapshot().cell(date(6, 10)).unwrap().shifts.len(), 1);
        assert_eq!(cal.drag().phase(), DragPhase::Idle);
    }

    #[test]
    fn test_conflict_confirm_and_decline() {
        let mut roster = EmployeeRoster::new();
        roster.insert(EmployeeId::new("E1"), "Erin");

        for confirm in [true, false] {
            let mut cal = june_calendar();
            cal.set_roster(roster.clone());
            cal.create_shift(draft("E1", date(6, 10))).unwrap();
            let moving = cal.create_shift(draft("E1", date(6, 3))).unwrap();
            let t0 = Instant::now();

            cal.begin_drag(&DragOrigin::EventBody(moving.clone()), t0);
            let target = cal.cell_center(date(6, 10)).unwrap();
            let DropOutcome::Suspended(pending) = cal.drop_at(target) else {
                panic!("expected a conflict prompt");
            };
            assert!(pending.prompt().starts_with("Erin is already scheduled"));
            assert_eq!(cal.drag().phase(), DragPhase::SuspendedForConflict);
            assert_eq!(cal.store().get(&moving).unwrap().date, date(6, 3));

            if confirm {
                assert!(matches!(cal.confirm_override(), DropOutcome::Committed(_)));
                assert_eq!(cal.store().get(&moving).unwrap().date, date(6, 10));
            } else {
                assert_eq!(
                    cal.decline_override(),
                    DropOutcome::Cancelled(CancelReason::Declined)
                );
                assert_eq!(cal.store().get(&moving).unwrap().date, date(6, 3));
            }
            assert_eq!(cal.drag().phase(), DragPhase::Idle);
            assert_eq!(cal.drag().highlight(), Highlight::None);
            assert!(cal.drag().session().is_none());
        }
    }

    #[test]
    fn test_week_batch_conflict_has_no_partial_override() {
        for confirm in [true, false] {
            let mut cal = june_calendar();
            let a = cal.create_shift(draft("E1", date(6, 2))).unwrap();
            let b = cal.create_shift(draft("E2", date(6, 4))).unwrap();
            let c = cal.create_shift(draft("E3", date(6, 5))).unwrap();
            // Only E2 already works on the Wednesday of the target week
            let existing = cal.create_shift(draft("E2", date(6, 11))).unwrap();
            let before: Vec<Shift> = cal.store().all().to_vec();

            assert!(cal.begin_drag(&DragOrigin::WeekMoveHandle(0), Instant::now()));
            let target = cal.cell_center(date(6, 10)).unwrap();
            let DropOutcome::Suspended(pending) = cal.drop_at(target) else {
                panic!("expected a conflict prompt");
            };
            assert_eq!(pending.candidate_employee_id, EmployeeId::new("E2"));
            assert_eq!(pending.conflict_date, date(6, 11));
            assert_eq!(cal.store().all(), before.as_slice());

            if confirm {
                let DropOutcome::Committed(report) = cal.confirm_override() else {
                    panic!("expected commit");
                };
                assert!(report.is_complete());
                assert_eq!(report.succeeded, 3);
                assert_eq!(cal.store().len(), 4);
                for source in [&a, &b, &c] {
                    assert!(!cal.store().contains(source));
                }
                let mut moved: Vec<(String, NaiveDate)> = report
                    .created
                    .iter()
                    .map(|id| {
                        let shift = cal.store().get(id).unwrap();
                        (shift.employee_id.to_string(), shift.date)
                    })
                    .collect();
                moved.sort();
                assert_eq!(
                    moved,
                    vec![
                        ("E1".to_string(), date(6, 9)),
                        ("E2".to_string(), date(6, 11)),
                        ("E3".to_string(), date(6, 12)),
                    ]
                );
                assert_eq!(cal.store().get(&existing).unwrap().date, date(6, 11));
                assert_eq!(cal.double_bookings().len(), 1);
            } else {
                assert_eq!(
                    cal.decline_override(),
                    DropOutcome::Cancelled(CancelReason::Declined)
                );
                assert_eq!(cal.store().all(), before.as_slice());
                assert!(cal.double_bookings().is_empty());
            }
            assert_eq!(cal.drag().phase(), DragPhase::Idle);
            assert_eq!(cal.drag().highlight(), Highlight::None);
            assert!(cal.drag().session().is_none());
            assert!(cal.drag().pending_override().is_none());
            assert!(!cal.feedback().has_alerts());
        }
    }

    #[test]
    fn test_day_batch_conflict_decline_keeps_every_member() {
        let mut cal = june_calendar();
        cal.create_shift(draft("E1", date(6, 3))).unwrap();
        cal.create_shift(draft("E2", date(6, 3))).unwrap();
        cal.create_shift(draft("E1", date(6, 10))).unwrap();
        let before: Vec<Shift> = cal.store().all().to_vec();

        cal.begin_drag(&DragOrigin::DayMoveHandle(date(6, 3)), Instant::now());
        let target = cal.cell_center(date(6, 10)).unwrap();
        assert!(matches!(cal.drop_at(target), DropOutcome::Suspended(_)));
        assert_eq!(cal.drag().session().unwrap().payload_ids().len(), 2);

        assert_eq!(
            cal.decline_override(),
            DropOutcome::Cancelled(CancelReason::Declined)
        );
        assert_eq!(cal.store().all(), before.as_slice());
        assert_eq!(cal.drag().phase(), DragPhase::Idle);
    }

    #[test]
    fn test_copy_day_preserves_sources() {
        let mut cal = june_calendar();
        let a = cal.create_shift(draft("E1", date(6, 3))).unwrap();
        let b = cal.create_shift(draft("E2", date(6, 3))).unwrap();
        cal.toggle_collapsed(&a);

        cal.begin_drag(&DragOrigin::DayCopyHandle(date(6, 3)), Instant::now());
        let target = cal.cell_center(date(6, 5)).unwrap();
        let DropOutcome::Committed(report) = cal.drop_at(target) else {
            panic!("expected commit");
        };

        assert_eq!(report.created.len(), 2);
        assert_eq!(cal.store().len(), 4);
        assert_eq!(cal.store().get(&a).unwrap().date, date(6, 3));
        assert_eq!(cal.store().get(&b).unwrap().date, date(6, 3));
        for id in &report.created {
            let copy = cal.store().get(id).unwrap();
            assert_eq!(copy.date, date(6, 5));
            assert_eq!(copy.location, "The Crown");
        }
        // Only the copy of the collapsed shift is collapsed
        assert_eq!(cal.collapsed().len(), 2);
    }

    #[test]
    fn test_week_move_maps_weekdays() {
        let mut cal = june_calendar();
        cal.create_shift(draft("E1", date(6, 2))).unwrap();
        cal.create_shift(draft("E2", date(6, 4))).unwrap();

        cal.begin_drag(&DragOrigin::WeekMoveHandle(0), Instant::now());
        // Any in-month cell of the second row targets that row
        let target = cal.cell_center(date(6, 14)).unwrap();
        assert!(matches!(cal.drop_at(target), DropOutcome::Committed(_)));

        let mut dates: Vec<NaiveDate> = cal.store().all().iter().map(|s| s.date).collect();
        dates.sort();
        assert_eq!(dates, vec![date(6, 9), date(6, 11)]);
    }

    #[test]
    fn test_week_move_across_boundary() {
        let mut cal = june_calendar();
        cal.create_shift(draft("E1", date(6, 2))).unwrap();
        cal.create_shift(draft("E2", date(6, 4))).unwrap();
        let t0 = Instant::now();

        cal.begin_drag(&DragOrigin::WeekMoveHandle(0), t0);
        let right_edge = Point::new(cal.layout().content.max.x - 5.0, 40.0);
        cal.drag_over(right_edge, t0);
        assert_eq!(cal.tick(t0 + Duration::from_millis(400)), None);
        assert_eq!(
            cal.tick(t0 + Duration::from_millis(800)),
            Some(MonthKey::new(2025, 7).unwrap())
        );
        assert_eq!(cal.drag().phase(), DragPhase::Active);

        // July 7th (Monday) is in the second row of July 2025
        let target = cal.cell_center(date(7, 7)).unwrap();
        let t1 = t0 + Duration::from_millis(900);
        cal.drag_over(target, t1);
        assert_eq!(cal.drag().highlight(), Highlight::Row(1));
        assert!(matches!(cal.drop_at(target), DropOutcome::Committed(_)));

        let mut dates: Vec<NaiveDate> = cal.store().all().iter().map(|s| s.date).collect();
        dates.sort();
        assert_eq!(dates, vec![date(7, 7), date(7, 9)]);
    }

    #[test]
    fn test_cancel_then_fresh_drag_starts_clean() {
        let mut cal = june_calendar();
        let id = cal.create_shift(draft("E1", date(6, 3))).unwrap();
        let t0 = Instant::now();

        cal.begin_drag(&DragOrigin::EventBody(id.clone()), t0);
        cal.drag_over(Point::new(5.0, 40.0), t0);
        assert!(cal.drag().is_boundary_timer_armed());
        assert_eq!(
            cal.drop_at(Point::new(5.0, 40.0)),
            DropOutcome::Cancelled(CancelReason::InvalidTarget)
        );

        assert_eq!(cal.drag().boundary_affordance(), BoundaryAffordance::Hidden);
        assert!(!cal.drag().is_boundary_timer_armed());
        assert_eq!(cal.tick(t0 + Duration::from_secs(5)), None);
        assert_eq!(cal.month(), MonthKey::new(2025, 6).unwrap());

        assert!(cal.begin_drag(&DragOrigin::EventCopyAffordance(id), t0));
        assert_eq!(cal.drag().highlight(), Highlight::None);
        assert!(!cal.drag().is_boundary_timer_armed());
    }

    #[test]
    fn test_filtered_day_declines_drag() {
        let mut cal = june_calendar();
        cal.create_shift(draft("E1", date(6, 3))).unwrap();
        cal.set_filter(ShiftFilter::for_employee(EmployeeId::new("E2")));

        assert!(!cal.begin_drag(&DragOrigin::DayMoveHandle(date(6, 3)), Instant::now()));
        assert_eq!(cal.drag().phase(), DragPhase::Idle);
        assert!(cal.drag().preview().is_none());
    }

    #[test]
    fn test_renders_after_each_mutation() {
        let mut cal = june_calendar();
        let count = Rc::new(RefCell::new(0));
        cal.set_renderer(Box::new(CountingRenderer(count.clone())));
        assert_eq!(*count.borrow(), 1);

        let id = cal.create_shift(draft("E1", date(6, 3))).unwrap();
        cal.edit_shift(&id, &ShiftPatch::move_to(date(6, 4))).unwrap();
        cal.toggle_collapsed(&id);
        cal.delete_shift(&id).unwrap();
        assert_eq!(*count.borrow(), 5);
        assert!(cal.collapsed().is_empty());
    }

    #[test]
    fn test_invalid_form_is_returned_without_alert() {
        let mut cal = june_calendar();
        let form = ShiftForm {
            employee_id: "E1".into(),
            date: "2025-06-03".into(),
            start_time: "21:00".into(),
            end_time: "19:00".into(),
            shift_type: "trivia".into(),
            location: "The Crown".into(),
            ..ShiftForm::default()
        };
        assert!(matches!(
            cal.create_shift_from_form(&form),
            Err(StoreError::Invalid(_))
        ));
        assert!(!cal.feedback().has_alerts());
        assert!(cal.store().is_empty());
    }

    #[test]
    fn test_navigation() {
        let mut cal = june_calendar();
        cal.navigate_next();
        assert_eq!(cal.month(), MonthKey::new(2025, 7).unwrap());
        cal.navigate_previous();
        cal.navigate_previous();
        assert_eq!(cal.month(), MonthKey::new(2025, 5).unwrap());
        cal.navigate_today();
        assert_eq!(cal.month(), MonthKey::containing(Local::now().date_naive()));
    }
}
