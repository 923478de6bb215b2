// Settings module
// Tunables for the drag engine and the location of the shift database.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Width in pixels of each edge region that triggers month navigation.
    pub boundary_region_width: f32,
    /// How long the pointer must dwell in an edge region before navigating.
    pub boundary_dwell_ms: u64,
    /// Lifetime of the drag preview shown under the pointer.
    pub drag_preview_ms: u64,
    /// Shift database file; `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            boundary_region_width: 60.0,
            boundary_dwell_ms: 800,
            drag_preview_ms: 100,
            database_path: None,
        }
    }
}

impl CalendarConfig {
    pub fn boundary_dwell(&self) -> Duration {
        Duration::from_millis(self.boundary_dwell_ms)
    }

    pub fn drag_preview_lifetime(&self) -> Duration {
        Duration::from_millis(self.drag_preview_ms)
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<(), String> {
        if !self.boundary_region_width.is_finite() || self.boundary_region_width < 0.0 {
            return Err("boundary_region_width must be a non-negative number".to_string());
        }
        if self.boundary_dwell_ms == 0 {
            return Err("boundary_dwell_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}
