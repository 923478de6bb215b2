// Drag session state machine
// Owns the single in-flight drag and drives it from gesture start to commit
// or cancellation.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use super::commit::{self, CommitReport};
use super::layout::{GridLayout, HitTarget, Point, Side};
use super::navigator::{BoundaryAffordance, BoundaryNavigator, CrossBoundaryCarry};
use super::classifier::classify;
use crate::models::conflict::ConflictOverride;
use crate::models::drag::{
    describe_count, DragOrigin, DragPreview, DragSession, DropPlan, DropTarget, Highlight,
};
use crate::models::employee::EmployeeRoster;
use crate::models::filter::ShiftFilter;
use crate::models::settings::CalendarConfig;
use crate::models::shift::ShiftId;
use crate::services::conflict::ConflictResolver;
use crate::services::feedback::{Alert, Feedback};
use crate::services::store::ShiftStore;
use crate::utils::date::{MonthGrid, MonthKey};

/// Observable lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Active,
    SuspendedForConflict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Dropped on an edge region, outside the grid or on an out-of-month cell.
    InvalidTarget,
    /// The gesture ended without a drop.
    DragEnded,
    /// The user declined the double-booking prompt.
    Declined,
    /// A move dropped back where it started.
    NoChange,
    /// A new gesture started while the previous one was still active.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Committed(CommitReport),
    Suspended(ConflictOverride),
    Cancelled(CancelReason),
    /// No drag to drop.
    Ignored,
}

/// Everything outside the controller that a drag reads or mutates.
pub struct DragEnv<'a> {
    pub store: &'a mut ShiftStore,
    pub collapsed: &'a mut BTreeSet<ShiftId>,
    pub feedback: &'a mut Feedback,
    pub grid: &'a MonthGrid,
    pub layout: &'a GridLayout,
    pub filter: &'a ShiftFilter,
    pub roster: &'a EmployeeRoster,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    session: DragSession,
    highlight: Highlight,
}

#[derive(Debug, Clone, Default)]
enum DragState {
    #[default]
    Idle,
    Active(ActiveDrag),
    /// Parked while the displayed month changes under the pointer.
    Carried(CrossBoundaryCarry),
    Suspended(Box<ConflictOverride>),
}

pub struct DragController {
    state: DragState,
    navigator: BoundaryNavigator,
    preview: Option<DragPreview>,
    preview_lifetime: Duration,
}

impl DragController {
    pub fn new(config: &CalendarConfig) -> Self {
        Self {
            state: DragState::Idle,
            navigator: BoundaryNavigator::new(config.boundary_dwell()),
            preview: None,
            preview_lifetime: config.drag_preview_lifetime(),
        }
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Active(_) | DragState::Carried(_) => DragPhase::Active,
            DragState::Suspended(_) => DragPhase::SuspendedForConflict,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Active(active) => Some(&active.session),
            DragState::Carried(carry) => Some(&carry.session),
            DragState::Suspended(pending) => Some(&pending.plan.session),
        }
    }

    pub fn highlight(&self) -> Highlight {
        match &self.state {
            DragState::Active(active) => active.highlight,
            _ => Highlight::None,
        }
    }

    pub fn preview(&self) -> Option<&DragPreview> {
        self.preview.as_ref()
    }

    pub fn boundary_affordance(&self) -> BoundaryAffordance {
        self.navigator.affordance()
    }

    pub fn is_boundary_timer_armed(&self) -> bool {
        self.navigator.is_armed()
    }

    pub fn pending_override(&self) -> Option<&ConflictOverride> {
        match &self.state {
            DragState::Suspended(pending) => Some(pending),
            _ => None,
        }
    }

    /// Start a drag from `origin`. Returns false when the origin does not
    /// produce a session or a conflict prompt is still open; nothing changes
    /// in that case.
    pub fn begin(&mut self, origin: &DragOrigin, now: Instant, env: &mut DragEnv<'_>) -> bool {
        if matches!(self.state, DragState::Suspended(_)) {
            log::debug!("Ignoring new drag while a conflict prompt is open");
            return false;
        }
        let Some(session) = classify(origin, env.store, env.grid, env.filter) else {
            return false;
        };

        if !matches!(self.state, DragState::Idle) {
            self.cancel(env.feedback, CancelReason::Superseded);
        }

        env.feedback.announce(format!(
            "Started {} {}{}",
            session.mode().verb(),
            session.describe_payload(),
            describe_source(&session)
        ));
        self.preview = Some(DragPreview::for_session(&session, now + self.preview_lifetime));
        self.navigator.reveal();
        self.state = DragState::Active(ActiveDrag {
            session,
            highlight: Highlight::None,
        });
        true
    }

    /// Track the pointer: arm or disarm edge regions and move the highlight.
    pub fn pointer_move(&mut self, point: Point, now: Instant, env: &DragEnv<'_>) {
        self.expire_preview(now);
        let DragState::Active(active) = &mut self.state else {
            return;
        };

        let hit = env.layout.hit_test(point);
        let side = match hit {
            HitTarget::Boundary(side) => Some(side),
            _ => None,
        };
        if side.is_some() && side != self.navigator.hovering() {
            log::debug!("Pointer entered {:?} edge region", side);
        }
        self.navigator.pointer_at(side, now);

        active.highlight = match hit {
            HitTarget::Cell { row, column } => {
                target_highlight(&active.session, env.grid, row, column)
            }
            HitTarget::Boundary(_) | HitTarget::Outside => Highlight::None,
        };
    }

    /// Advance timers. Returns the side to navigate towards when the
    /// boundary dwell has elapsed; the session is parked until
    /// [`finish_transition`](Self::finish_transition).
    pub fn tick(&mut self, now: Instant, month: MonthKey) -> Option<Side> {
        self.expire_preview(now);
        if !matches!(self.state, DragState::Active(_)) {
            return None;
        }
        let side = self.navigator.poll(now)?;

        if let DragState::Active(active) = std::mem::take(&mut self.state) {
            log::info!("Boundary navigation {:?} from {} during drag", side, month);
            self.state = DragState::Carried(CrossBoundaryCarry::capture(active.session, month));
        }
        Some(side)
    }

    /// Resume the parked session once the new month has rendered.
    pub fn finish_transition(&mut self, feedback: &mut Feedback, month: MonthKey) {
        let DragState::Carried(carry) = std::mem::take(&mut self.state) else {
            return;
        };
        let session = carry.into_session();
        feedback.announce(format!(
            "Showing {}, still {} {}",
            month.first_day().format("%B %Y"),
            session.mode().verb(),
            session.describe_payload()
        ));
        self.state = DragState::Active(ActiveDrag {
            session,
            highlight: Highlight::None,
        });
    }

    /// Drop at `point`: cancel, suspend on a conflict or commit.
    pub fn drop_at(&mut self, point: Point, env: &mut DragEnv<'_>) -> DropOutcome {
        let active = match std::mem::take(&mut self.state) {
            DragState::Active(active) => active,
            other => {
                self.state = other;
                return DropOutcome::Ignored;
            }
        };

        let target = match env.layout.hit_test(point) {
            HitTarget::Cell { row, column } => {
                drop_target(&active.session, env.grid, row, column)
            }
            HitTarget::Boundary(_) | HitTarget::Outside => None,
        };
        let Some(target) = target else {
            self.state = DragState::Active(active);
            return self.cancel(env.feedback, CancelReason::InvalidTarget);
        };

        let plan = DropPlan::new(active.session, target);
        if plan.is_noop() {
            self.state = DragState::Active(ActiveDrag {
                session: plan.session,
                highlight: Highlight::None,
            });
            return self.cancel(env.feedback, CancelReason::NoChange);
        }

        if let Some(conflict) = ConflictResolver::new(env.store).check_plan(&plan) {
            let pending = ConflictOverride {
                employee_name: env.roster.display_name(&conflict.employee_id),
                candidate_employee_id: conflict.employee_id,
                conflict_date: conflict.date,
                conflicting: conflict.conflicting,
                plan,
            };
            env.feedback.announce_urgent(pending.prompt());
            self.navigator.reset();
            self.preview = None;
            self.state = DragState::Suspended(Box::new(pending.clone()));
            return DropOutcome::Suspended(pending);
        }

        DropOutcome::Committed(self.commit(plan, env))
    }

    /// Accept the double-booking and commit the suspended drop.
    pub fn confirm_override(&mut self, env: &mut DragEnv<'_>) -> DropOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Suspended(pending) => {
                log::info!(
                    "Double-booking of {} on {} accepted",
                    pending.candidate_employee_id,
                    pending.conflict_date
                );
                DropOutcome::Committed(self.commit(pending.plan, env))
            }
            other => {
                self.state = other;
                DropOutcome::Ignored
            }
        }
    }

    /// Decline the double-booking; nothing is written.
    pub fn decline_override(&mut self, feedback: &mut Feedback) -> DropOutcome {
        if matches!(self.state, DragState::Suspended(_)) {
            self.cancel(feedback, CancelReason::Declined)
        } else {
            DropOutcome::Ignored
        }
    }

    /// Gesture ended without a drop. A drag waiting on the conflict prompt
    /// stays suspended until the user answers.
    pub fn drag_end(&mut self, feedback: &mut Feedback) -> DropOutcome {
        match self.state {
            DragState::Active(_) | DragState::Carried(_) => {
                self.cancel(feedback, CancelReason::DragEnded)
            }
            DragState::Idle | DragState::Suspended(_) => DropOutcome::Ignored,
        }
    }

    fn commit(&mut self, plan: DropPlan, env: &mut DragEnv<'_>) -> CommitReport {
        let report = commit::apply(&plan, env.store, env.collapsed);
        log::info!(
            "{:?} committed: {} of {} succeeded, {} failed, {} unplaced",
            report.mode,
            report.succeeded,
            report.requested,
            report.failed,
            report.dropped
        );

        if report.succeeded > 0 {
            env.feedback.announce(format!(
                "{} {} to {}",
                report.mode.past_tense(),
                describe_count(report.succeeded),
                plan.describe_target()
            ));
        }
        if report.unsuccessful() > 0 {
            let verb = if report.mode.is_copy() { "copy" } else { "move" };
            env.feedback.alert(Alert::error(
                format!("Could not {} all shifts", verb),
                format!(
                    "{} of {} could not be {}.",
                    report.unsuccessful(),
                    describe_count(report.requested),
                    report.mode.past_tense().to_lowercase()
                ),
            ));
        }

        self.clear();
        report
    }

    fn cancel(&mut self, feedback: &mut Feedback, reason: CancelReason) -> DropOutcome {
        if let Some(session) = self.session() {
            feedback.announce(format!(
                "Cancelled {} {}",
                session.mode().verb(),
                session.describe_payload()
            ));
        }
        log::debug!("Drag cancelled: {:?}", reason);
        self.clear();
        DropOutcome::Cancelled(reason)
    }

    /// Back to a clean idle state: no session, highlight, preview or timer.
    fn clear(&mut self) {
        self.state = DragState::Idle;
        self.navigator.reset();
        self.preview = None;
    }

    fn expire_preview(&mut self, now: Instant) {
        if self.preview.as_ref().is_some_and(|p| p.is_expired(now)) {
            self.preview = None;
        }
    }
}

fn describe_source(session: &DragSession) -> String {
    match session {
        DragSession::Event { shift, .. } => format!(" from {}", shift.date.format("%A, %B %-d")),
        DragSession::Day { date, .. } => format!(" from {}", date.format("%A, %B %-d")),
        DragSession::Week { source_dates, .. } => source_dates
            .first()
            .map(|first| format!(" from the week of {}", first.format("%B %-d")))
            .unwrap_or_default(),
    }
}

/// Row for week payloads, the single cell otherwise. Out-of-month cells
/// never highlight.
fn target_highlight(
    session: &DragSession,
    grid: &MonthGrid,
    row: usize,
    column: usize,
) -> Highlight {
    match grid.cell(row, column) {
        Some(cell) if cell.in_month => match session {
            DragSession::Week { .. } => Highlight::Row(row),
            _ => Highlight::Cell(cell.date),
        },
        _ => Highlight::None,
    }
}

fn drop_target(
    session: &DragSession,
    grid: &MonthGrid,
    row: usize,
    column: usize,
) -> Option<DropTarget> {
    let cell = grid.cell(row, column).filter(|cell| cell.in_month)?;
    match session {
        DragSession::Week { source_dates, .. } => Some(DropTarget::Week {
            month: grid.month(),
            row,
            mapping: grid.day_of_week_mapping(source_dates, row),
        }),
        _ => Some(DropTarget::Date(cell.date)),
    }
}
