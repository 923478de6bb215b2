// Grid geometry and pointer hit-testing.
// The content area is flanked by two edge regions that trigger month
// navigation during a drag; the 7x6 cell grid sits between them.

use crate::utils::date::{GRID_COLUMNS, GRID_ROWS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_min_size(min: Point, width: f32, height: f32) -> Self {
        Self {
            min,
            max: Point::new(min.x + width, min.y + height),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Half-open containment so adjacent rects never both claim a point.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x < self.max.x
            && point.y >= self.min.y
            && point.y < self.max.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }
}

/// Which edge of the view, i.e. which way the displayed month moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Boundary(Side),
    Cell { row: usize, column: usize },
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Whole content area of the calendar view.
    pub content: Rect,
    /// Area covered by the day cells.
    pub grid: Rect,
    /// Width of each navigation edge region.
    pub boundary_width: f32,
}

impl GridLayout {
    pub fn new(content: Rect, grid: Rect, boundary_width: f32) -> Self {
        Self {
            content,
            grid,
            boundary_width,
        }
    }

    /// Layout with equally sized cells and the grid inset by the edge regions.
    pub fn uniform(cell_width: f32, cell_height: f32, boundary_width: f32) -> Self {
        let grid_width = cell_width * GRID_COLUMNS as f32;
        let grid_height = cell_height * GRID_ROWS as f32;
        let content = Rect::from_min_size(
            Point::new(0.0, 0.0),
            grid_width + 2.0 * boundary_width,
            grid_height,
        );
        let grid = Rect::from_min_size(Point::new(boundary_width, 0.0), grid_width, grid_height);
        Self::new(content, grid, boundary_width)
    }

    /// Edge region under the pointer, judged on the x coordinate only.
    pub fn boundary_side(&self, point: Point) -> Option<Side> {
        if self.boundary_width <= 0.0 {
            return None;
        }
        let left_edge = self.content.min.x;
        let right_edge = self.content.max.x;
        if point.x >= left_edge && point.x < left_edge + self.boundary_width {
            Some(Side::Previous)
        } else if point.x > right_edge - self.boundary_width && point.x <= right_edge {
            Some(Side::Next)
        } else {
            None
        }
    }

    /// Resolve the pointer to an edge region, a grid cell or nothing.
    /// Edge regions win over cells.
    pub fn hit_test(&self, point: Point) -> HitTarget {
        if let Some(side) = self.boundary_side(point) {
            return HitTarget::Boundary(side);
        }
        if !self.grid.contains(point) {
            return HitTarget::Outside;
        }

        let column = ((point.x - self.grid.min.x) / self.cell_width()) as usize;
        let row = ((point.y - self.grid.min.y) / self.cell_height()) as usize;
        HitTarget::Cell {
            row: row.min(GRID_ROWS - 1),
            column: column.min(GRID_COLUMNS - 1),
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.grid.width() / GRID_COLUMNS as f32
    }

    pub fn cell_height(&self) -> f32 {
        self.grid.height() / GRID_ROWS as f32
    }

    pub fn cell_rect(&self, row: usize, column: usize) -> Rect {
        Rect::from_min_size(
            Point::new(
                self.grid.min.x + column as f32 * self.cell_width(),
                self.grid.min.y + row as f32 * self.cell_height(),
            ),
            self.cell_width(),
            self.cell_height(),
        )
    }

    pub fn cell_center(&self, row: usize, column: usize) -> Point {
        self.cell_rect(row, column).center()
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::uniform(120.0, 100.0, 60.0)
    }
}
