//! In-memory shift store.
//!
//! Source of truth for rendering. Every mutation is mirrored to the
//! persistence collaborator first and only applied locally once the
//! collaborator has confirmed it.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::filter::ShiftFilter;
use crate::models::shift::{EmployeeId, Shift, ShiftDraft, ShiftId, ShiftPatch, ValidationError};
use crate::services::persistence::ShiftRepository;
use crate::utils::date::{MonthGrid, MonthKey};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to {operation} shift: {message}")]
    Persistence {
        operation: &'static str,
        message: String,
    },
    #[error("Shift {0} not found")]
    NotFound(ShiftId),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn persistence_error(operation: &'static str) -> impl FnOnce(anyhow::Error) -> StoreError {
    move |err| {
        log::error!("Failed to {} shift: {:#}", operation, err);
        StoreError::Persistence {
            operation,
            message: format!("{:#}", err),
        }
    }
}

/// An existing `(date, employee)` pair with more than one shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoubleBooking {
    pub date: NaiveDate,
    pub employee_id: EmployeeId,
    pub shift_ids: Vec<ShiftId>,
}

pub struct ShiftStore {
    shifts: Vec<Shift>,
    repository: Box<dyn ShiftRepository>,
}

impl ShiftStore {
    /// Populate the store from the collaborator's initial load.
    pub fn load(repository: Box<dyn ShiftRepository>) -> Result<Self, StoreError> {
        let shifts = repository.load_all().map_err(persistence_error("load"))?;
        log::info!("Loaded {} shifts", shifts.len());
        Ok(Self { shifts, repository })
    }

    pub fn all(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn get(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &ShiftId) -> bool {
        self.get(id).is_some()
    }

    /// Create a shift and return the id the collaborator assigned.
    pub fn add(&mut self, draft: ShiftDraft) -> Result<ShiftId, StoreError> {
        let draft = draft.normalized();
        draft.validate()?;
        let id = self
            .repository
            .create(&draft)
            .map_err(persistence_error("create"))?;
        log::debug!("Created shift {} on {}", id, draft.date);
        self.shifts.push(draft.into_shift(id.clone()));
        Ok(id)
    }

    /// Apply a partial update in place, keeping the id.
    pub fn update(&mut self, id: &ShiftId, patch: &ShiftPatch) -> Result<&Shift, StoreError> {
        let index = self.index_of(id)?;
        let updated = patch.applied_to(&self.shifts[index]);
        updated.validate()?;
        self.repository
            .update(&updated)
            .map_err(persistence_error("update"))?;
        log::debug!("Updated shift {}", id);
        self.shifts[index] = updated;
        Ok(&self.shifts[index])
    }

    pub fn remove(&mut self, id: &ShiftId) -> Result<Shift, StoreError> {
        let index = self.index_of(id)?;
        self.repository
            .delete(id)
            .map_err(persistence_error("delete"))?;
        log::debug!("Deleted shift {}", id);
        Ok(self.shifts.remove(index))
    }

    fn index_of(&self, id: &ShiftId) -> Result<usize, StoreError> {
        self.shifts
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Shifts on `date` passing `filter`, ordered by start time.
    pub fn by_date(&self, date: NaiveDate, filter: &ShiftFilter) -> Vec<&Shift> {
        self.by_dates(&[date], filter)
    }

    /// Shifts on the in-month dates of week `row` passing `filter`.
    pub fn by_week(&self, grid: &MonthGrid, row: usize, filter: &ShiftFilter) -> Vec<&Shift> {
        self.by_dates(&grid.row_dates(row), filter)
    }

    pub fn by_dates(&self, dates: &[NaiveDate], filter: &ShiftFilter) -> Vec<&Shift> {
        let mut shifts: Vec<&Shift> = self
            .shifts
            .iter()
            .filter(|s| dates.contains(&s.date) && filter.matches(s))
            .collect();
        shifts.sort_by(|a, b| {
            (a.date, a.start_time, a.id.as_str()).cmp(&(b.date, b.start_time, b.id.as_str()))
        });
        shifts
    }

    /// Every shift for `employee_id` on `date` other than the excluded ids.
    pub fn conflicts_for(
        &self,
        employee_id: &EmployeeId,
        date: NaiveDate,
        exclude: &[ShiftId],
    ) -> Vec<&Shift> {
        self.shifts
            .iter()
            .filter(|s| &s.employee_id == employee_id && s.date == date && !exclude.contains(&s.id))
            .collect()
    }

    /// Existing double-bookings within `month`.
    pub fn double_bookings(&self, month: MonthKey) -> Vec<DoubleBooking> {
        let mut groups: BTreeMap<(NaiveDate, &EmployeeId), Vec<ShiftId>> = BTreeMap::new();
        for shift in self.shifts.iter().filter(|s| month.contains(s.date)) {
            groups
                .entry((shift.date, &shift.employee_id))
                .or_default()
                .push(shift.id.clone());
        }

        groups
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|((date, employee_id), shift_ids)| DoubleBooking {
                date,
                employee_id: employee_id.clone(),
                shift_ids,
            })
            .collect()
    }
}
