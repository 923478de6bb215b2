//! Render collaborator interface.
//!
//! After every store mutation the calendar hands the renderer the whole
//! visible grid plus the collapsed-shift presentation state. Only in-month
//! cells carry shifts.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::models::filter::ShiftFilter;
use crate::models::shift::{Shift, ShiftId};
use crate::services::store::ShiftStore;
use crate::utils::date::{MonthGrid, MonthKey};

pub mod text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftView {
    pub shift: Shift,
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub date: NaiveDate,
    pub in_month: bool,
    pub row: usize,
    pub column: usize,
    pub shifts: Vec<ShiftView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub month: MonthKey,
    pub cells: Vec<CellView>,
    pub collapsed: BTreeSet<ShiftId>,
}

impl RenderSnapshot {
    pub fn build(
        grid: &MonthGrid,
        store: &ShiftStore,
        filter: &ShiftFilter,
        collapsed: &BTreeSet<ShiftId>,
    ) -> Self {
        let cells = grid
            .cells()
            .iter()
            .map(|cell| {
                let shifts = if cell.in_month {
                    store
                        .by_date(cell.date, filter)
                        .into_iter()
                        .map(|shift| ShiftView {
                            collapsed: collapsed.contains(&shift.id),
                            shift: shift.clone(),
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                CellView {
                    date: cell.date,
                    in_month: cell.in_month,
                    row: cell.row,
                    column: cell.column,
                    shifts,
                }
            })
            .collect();

        Self {
            month: grid.month(),
            cells,
            collapsed: collapsed.clone(),
        }
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CellView> {
        self.cells.iter().find(|cell| cell.date == date)
    }

    pub fn shift_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.shifts.len()).sum()
    }
}

/// Receives a fresh snapshot after every change.
pub trait Renderer {
    fn render(&mut self, snapshot: &RenderSnapshot);
}
