// Commit of a dropped drag session.
// Single-event moves update in place. Batch moves create every target first
// and only delete sources once all creates have succeeded.

use std::collections::BTreeSet;

use crate::models::drag::{DragMode, DragSession, DropPlan};
use crate::models::shift::{ShiftId, ShiftPatch};
use crate::services::store::ShiftStore;

/// Outcome of applying a drop plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    pub mode: DragMode,
    /// Payload size.
    pub requested: usize,
    /// Shifts fully moved or copied.
    pub succeeded: usize,
    /// Shifts that hit a persistence failure.
    pub failed: usize,
    /// Shifts left out because their weekday had no target cell.
    pub dropped: usize,
    /// Ids created by this commit.
    pub created: Vec<ShiftId>,
}

impl CommitReport {
    fn new(mode: DragMode, requested: usize, dropped: usize) -> Self {
        Self {
            mode,
            requested,
            succeeded: 0,
            failed: 0,
            dropped,
            created: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.succeeded == self.requested
    }

    /// Shifts that did not end up where the user dropped them.
    pub fn unsuccessful(&self) -> usize {
        self.requested - self.succeeded
    }
}

/// Apply `plan` to the store, carrying collapsed state over to new ids.
pub fn apply(
    plan: &DropPlan,
    store: &mut ShiftStore,
    collapsed: &mut BTreeSet<ShiftId>,
) -> CommitReport {
    let mode = plan.mode();
    let placements = plan.placements();
    let mut report = CommitReport::new(
        mode,
        plan.session.payload().len(),
        plan.dropped().len(),
    );

    if let DragSession::Event { shift, copy: false } = &plan.session {
        if let Some(placement) = placements.first() {
            match store.update(&shift.id, &ShiftPatch::move_to(placement.target)) {
                Ok(_) => report.succeeded = 1,
                Err(_) => report.failed = 1,
            }
        }
        return report;
    }

    let mut pairs = Vec::with_capacity(placements.len());
    for placement in &placements {
        match store.add(placement.shift.draft_on(placement.target)) {
            Ok(new_id) => {
                if collapsed.contains(&placement.shift.id) {
                    collapsed.insert(new_id.clone());
                }
                report.created.push(new_id);
                pairs.push(placement.shift.id.clone());
            }
            Err(_) => report.failed += 1,
        }
    }

    if mode.is_copy() {
        report.succeeded = pairs.len();
        return report;
    }

    if report.failed > 0 {
        log::warn!(
            "{} of {} create(s) failed, keeping every source shift",
            report.failed,
            placements.len()
        );
        // Sources are untouched, so none of the members count as moved.
        report.failed = placements.len();
        return report;
    }

    for source_id in pairs {
        match store.remove(&source_id) {
            Ok(_) => {
                collapsed.remove(&source_id);
                report.succeeded += 1;
            }
            Err(_) => report.failed += 1,
        }
    }

    report
}
