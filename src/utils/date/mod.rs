// Month grid model
// Maps a displayed month onto the fixed 6x7 grid of day cells (Sunday first)
// and resolves week rows back to dates.

use chrono::{Datelike, Duration, Months, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// Number of week rows in every month grid.
pub const GRID_ROWS: usize = 6;
/// Number of day columns in every month grid (Sunday..Saturday).
pub const GRID_COLUMNS: usize = 7;

/// A displayed period: one calendar month.
///
/// Stored as the first day of the month so every value is a valid date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// Build a month key, returning `None` for an invalid year/month pair.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Duration::days(i64::from(date.day0())))
    }

    /// Parse a `YYYY-MM` string.
    pub fn parse(value: &str) -> Option<Self> {
        let (year, month) = value.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().0.pred_opt().unwrap_or(self.0)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Move by `delta` months, `None` when leaving chrono's supported range.
    pub fn offset(&self, delta: i32) -> Option<Self> {
        let months = Months::new(delta.unsigned_abs());
        let shifted = if delta >= 0 {
            self.0.checked_add_months(months)
        } else {
            self.0.checked_sub_months(months)
        };
        shifted.map(Self)
    }

    /// Previous month (saturates at the earliest representable month).
    pub fn previous(&self) -> Self {
        self.offset(-1).unwrap_or(*self)
    }

    /// Next month (saturates at the latest representable month).
    pub fn next(&self) -> Self {
        self.offset(1).unwrap_or(*self)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

/// One day cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date: NaiveDate,
    /// `false` for the leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
    pub row: usize,
    pub column: usize,
}

/// Result of mapping source dates onto a target week row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayMapping {
    /// Source date -> target date sharing the same weekday.
    pub mapped: BTreeMap<NaiveDate, NaiveDate>,
    /// Source dates whose weekday has no in-month cell in the target row.
    pub unmapped: Vec<NaiveDate>,
}

impl DayMapping {
    pub fn get(&self, source: NaiveDate) -> Option<NaiveDate> {
        self.mapped.get(&source).copied()
    }
}

/// The 6x7 grid of day cells displayed for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    month: MonthKey,
    cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn for_month(month: MonthKey) -> Self {
        let first = month.first_day();
        let lead = i64::from(first.weekday().num_days_from_sunday());
        let start = first - Duration::days(lead);

        let cells = (0..GRID_ROWS * GRID_COLUMNS)
            .map(|index| {
                let date = start + Duration::days(index as i64);
                GridCell {
                    date,
                    in_month: month.contains(date),
                    row: index / GRID_COLUMNS,
                    column: index % GRID_COLUMNS,
                }
            })
            .collect();

        Self { month, cells }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&GridCell> {
        if row >= GRID_ROWS || column >= GRID_COLUMNS {
            return None;
        }
        self.cells.get(row * GRID_COLUMNS + column)
    }

    pub fn row(&self, row: usize) -> Option<&[GridCell]> {
        if row >= GRID_ROWS {
            return None;
        }
        let start = row * GRID_COLUMNS;
        self.cells.get(start..start + GRID_COLUMNS)
    }

    /// Cell displaying `date`, including out-of-month cells.
    pub fn cell_for(&self, date: NaiveDate) -> Option<&GridCell> {
        let start = self.cells.first()?.date;
        let offset = (date - start).num_days();
        if offset < 0 {
            return None;
        }
        self.cells.get(offset as usize)
    }

    /// Row index (0..=5) of an in-month date.
    pub fn week_row_index_of(&self, date: NaiveDate) -> Option<usize> {
        self.cell_for(date)
            .filter(|cell| cell.in_month)
            .map(|cell| cell.row)
    }

    /// In-month dates of a week row, Sunday first.
    pub fn row_dates(&self, row: usize) -> Vec<NaiveDate> {
        self.row(row)
            .map(|cells| {
                cells
                    .iter()
                    .filter(|cell| cell.in_month)
                    .map(|cell| cell.date)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when the row contains at least one in-month cell.
    pub fn is_valid_row(&self, row: usize) -> bool {
        !self.row_dates(row).is_empty()
    }

    /// Map each source date to the in-month date of `target_row` that falls on
    /// the same weekday.
    pub fn day_of_week_mapping(&self, source_dates: &[NaiveDate], target_row: usize) -> DayMapping {
        let mut mapping = DayMapping::default();
        let row = self.row(target_row);

        for &source in source_dates {
            if mapping.mapped.contains_key(&source) || mapping.unmapped.contains(&source) {
                continue;
            }
            let column = source.weekday().num_days_from_sunday() as usize;
            match row.and_then(|cells| cells.get(column)).filter(|cell| cell.in_month) {
                Some(cell) => {
                    mapping.mapped.insert(source, cell.date);
                }
                None => {
                    log::warn!(
                        "No {} cell in week row {} of {}, dropping {}",
                        source.weekday(),
                        target_row,
                        self.month,
                        source
                    );
                    mapping.unmapped.push(source);
                }
            }
        }

        mapping
    }
}

/// Grid for a `(year, month)` pair.
pub fn grid_for(year: i32, month: u32) -> Option<MonthGrid> {
    MonthKey::new(year, month).map(MonthGrid::for_month)
}

/// Week row of `date` within the grid of `(year, month)`.
pub fn week_row_index_of(date: NaiveDate, year: i32, month: u32) -> Option<usize> {
    grid_for(year, month)?.week_row_index_of(date)
}
