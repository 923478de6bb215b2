// Plain-text month rendering used by the command line tool

use std::fmt::Write;

use super::RenderSnapshot;
use crate::utils::date::GRID_COLUMNS;

const DAY_NAMES: [&str; GRID_COLUMNS] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const CELL_WIDTH: usize = 9;

/// Render the month grid as a table of day numbers and shift counts.
pub fn render_month(snapshot: &RenderSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", snapshot.month);

    for name in DAY_NAMES {
        let _ = write!(out, "{:<width$}", name, width = CELL_WIDTH);
    }
    out.push('\n');

    for row in snapshot.cells.chunks(GRID_COLUMNS) {
        for cell in row {
            let text = if !cell.in_month {
                "  .".to_string()
            } else if cell.shifts.is_empty() {
                format!("{:>3}", chrono::Datelike::day(&cell.date))
            } else {
                format!(
                    "{:>3} ({})",
                    chrono::Datelike::day(&cell.date),
                    cell.shifts.len()
                )
            };
            let _ = write!(out, "{:<width$}", text, width = CELL_WIDTH);
        }
        out.push('\n');
    }

    out
}
