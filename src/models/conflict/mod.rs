// Conflict override
// Decision record held while the user is asked whether to double-book.

use chrono::NaiveDate;

use super::drag::DropPlan;
use super::shift::{EmployeeId, ShiftId};

/// A suspended drop waiting for the user to accept or cancel a double-booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictOverride {
    pub candidate_employee_id: EmployeeId,
    pub employee_name: String,
    /// Date on which the first conflict was found.
    pub conflict_date: NaiveDate,
    /// Existing shifts that clash with the candidate placement.
    pub conflicting: Vec<ShiftId>,
    pub plan: DropPlan,
}

impl ConflictOverride {
    /// Prompt text. Names the employee only, not the individual shifts.
    pub fn prompt(&self) -> String {
        format!(
            "{} is already scheduled on {}. Schedule anyway?",
            self.employee_name,
            self.conflict_date.format("%A, %B %-d")
        )
    }
}
