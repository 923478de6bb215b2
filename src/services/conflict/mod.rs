//! Double-booking detection.
//!
//! A conflict is an existing shift for the same employee on the target date.
//! Batch drops are all-or-nothing: the first conflicting employee suspends the
//! whole drop.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::drag::DropPlan;
use crate::models::shift::{EmployeeId, Shift, ShiftId};
use crate::services::store::ShiftStore;

/// First conflict found for a drop plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConflict {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub conflicting: Vec<ShiftId>,
}

pub struct ConflictResolver<'a> {
    store: &'a ShiftStore,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(store: &'a ShiftStore) -> Self {
        Self { store }
    }

    /// All shifts of `employee_id` on `date`, except `exclude`.
    pub fn check(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
        exclude: Option<&ShiftId>,
    ) -> Vec<&'a Shift> {
        let exclude: Vec<ShiftId> = exclude.cloned().into_iter().collect();
        self.store.conflicts_for(employee_id, date, &exclude)
    }

    /// Check every distinct employee of the plan against its target date(s).
    ///
    /// Moves ignore the payload's own shifts since they are leaving their
    /// current dates; copies leave them in place, so they count.
    pub fn check_plan(&self, plan: &DropPlan) -> Option<BatchConflict> {
        let exclude = if plan.session.is_copy() {
            Vec::new()
        } else {
            plan.session.payload_ids()
        };

        let mut targets: BTreeMap<&EmployeeId, BTreeSet<NaiveDate>> = BTreeMap::new();
        for placement in plan.placements() {
            targets
                .entry(&placement.shift.employee_id)
                .or_default()
                .insert(placement.target);
        }

        for (employee_id, dates) in targets {
            for date in dates {
                let conflicting = self.store.conflicts_for(employee_id, date, &exclude);
                if !conflicting.is_empty() {
                    log::debug!(
                        "Conflict: {} already has {} shift(s) on {}",
                        employee_id,
                        conflicting.len(),
                        date
                    );
                    return Some(BatchConflict {
                        employee_id: employee_id.clone(),
                        date,
                        conflicting: conflicting.iter().map(|s| s.id.clone()).collect(),
                    });
                }
            }
        }

        None
    }
}
