// Cross-boundary navigation
// Dwelling in an edge region during a drag flips the displayed month while
// the drag session is carried across.

use chrono::NaiveDate;
use std::time::{Duration, Instant};

use super::layout::Side;
use crate::models::drag::DragSession;
use crate::utils::date::MonthKey;

/// How the edge-region affordances should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryAffordance {
    Hidden,
    /// Shown at reduced prominence while any drag is active.
    Dimmed,
    /// The pointer is dwelling in this region.
    Active(Side),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArmedTransition {
    side: Side,
    fires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct BoundaryNavigator {
    dwell: Duration,
    revealed: bool,
    hovering: Option<Side>,
    armed: Option<ArmedTransition>,
}

impl BoundaryNavigator {
    pub fn new(dwell: Duration) -> Self {
        Self {
            dwell,
            revealed: false,
            hovering: None,
            armed: None,
        }
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    /// Track which edge region (if any) the pointer is in.
    ///
    /// Entering a region arms its timer and disarms the other; leaving
    /// disarms without side effects. Staying put keeps the running timer.
    pub fn pointer_at(&mut self, side: Option<Side>, now: Instant) {
        if self.hovering == side {
            return;
        }
        self.hovering = side;
        self.armed = side.map(|side| {
            log::debug!("Armed {:?} navigation", side);
            ArmedTransition {
                side,
                fires_at: now + self.dwell,
            }
        });
    }

    /// Fire the armed transition once its dwell has elapsed.
    ///
    /// Hover state is reset on fire so continued dwelling arms a fresh timer
    /// on the next pointer update.
    pub fn poll(&mut self, now: Instant) -> Option<Side> {
        let armed = self.armed?;
        if now < armed.fires_at {
            return None;
        }
        self.armed = None;
        self.hovering = None;
        Some(armed.side)
    }

    /// Hide affordances and drop any pending timer.
    pub fn reset(&mut self) {
        self.revealed = false;
        self.hovering = None;
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn hovering(&self) -> Option<Side> {
        self.hovering
    }

    pub fn affordance(&self) -> BoundaryAffordance {
        match (self.revealed, self.hovering) {
            (false, _) => BoundaryAffordance::Hidden,
            (true, Some(side)) => BoundaryAffordance::Active(side),
            (true, None) => BoundaryAffordance::Dimmed,
        }
    }
}

/// A drag session parked while the displayed month changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossBoundaryCarry {
    pub session: DragSession,
    /// Month shown when the transition fired.
    pub month: MonthKey,
    /// Dates of the source week row, empty for other scopes.
    pub source_dates: Vec<NaiveDate>,
}

impl CrossBoundaryCarry {
    pub fn capture(session: DragSession, month: MonthKey) -> Self {
        let source_dates = match &session {
            DragSession::Week { source_dates, .. } => source_dates.clone(),
            _ => Vec::new(),
        };
        Self {
            session,
            month,
            source_dates,
        }
    }

    /// Give the session back, with the week source dates restored from the
    /// carry so the weekday mapping survives the month change.
    pub fn into_session(self) -> DragSession {
        match self.session {
            DragSession::Week {
                month,
                row,
                shifts,
                copy,
                ..
            } => DragSession::Week {
                month,
                row,
                source_dates: self.source_dates,
                shifts,
                copy,
            },
            other => other,
        }
    }
}
