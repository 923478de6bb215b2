// Shift filter
// Narrows which shifts are rendered and captured by day/week drags.

use super::shift::{EmployeeId, Shift, ShiftType};

/// Active calendar filters. The default matches every shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftFilter {
    pub employee_id: Option<EmployeeId>,
    pub location: Option<String>,
    pub shift_type: Option<ShiftType>,
}

impl ShiftFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_employee(employee_id: EmployeeId) -> Self {
        Self {
            employee_id: Some(employee_id),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.employee_id.is_none() && self.location.is_none() && self.shift_type.is_none()
    }

    pub fn matches(&self, shift: &Shift) -> bool {
        self.employee_id
            .as_ref()
            .map_or(true, |id| &shift.employee_id == id)
            && self
                .location
                .as_deref()
                .map_or(true, |loc| shift.location.eq_ignore_ascii_case(loc))
            && self.shift_type.map_or(true, |ty| shift.shift_type == ty)
    }
}
