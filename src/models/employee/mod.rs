// Employee roster
// Display names for staff referenced by shifts. Staff records live elsewhere;
// the calendar only needs names for prompts and announcements.

use super::shift::EmployeeId;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct EmployeeRoster {
    names: HashMap<EmployeeId, String>,
}

impl EmployeeRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EmployeeId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Display name, falling back to the raw id for unknown staff.
    pub fn display_name(&self, id: &EmployeeId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }
}

impl FromIterator<(EmployeeId, String)> for EmployeeRoster {
    fn from_iter<T: IntoIterator<Item = (EmployeeId, String)>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
