use crate::math::{Axis, Cell, GridDirection, Turn};

/// An axis-aligned segment between two grid cells.
///
/// The direction is derived from the endpoints rather than stored, so a line
/// whose end is moved in place stays consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Line {
    pub start: Cell,
    pub end: Cell,
}

impl Line {
    #[must_use]
    pub fn new(start: Cell, end: Cell) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn direction(&self) -> GridDirection {
        GridDirection::between(self.start, self.end)
    }

    #[must_use]
    pub fn axis(&self) -> Option<Axis> {
        self.direction().axis()
    }

    /// True for zero-length and diagonal lines.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.direction() == GridDirection::None
    }

    /// Number of unit steps covered by the line.
    #[must_use]
    pub fn step_count(&self) -> i32 {
        let delta = self.end - self.start;
        delta.x.abs() + delta.y.abs()
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    /// Whether `cell` lies strictly between the endpoints.
    ///
    /// Endpoints are excluded so that a corner shared by two lines is never
    /// claimed by both; callers resolve corners through the adjacent lines.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        match self.axis() {
            Some(Axis::Horizontal) => {
                cell.y == self.start.y && strictly_between(cell.x, self.start.x, self.end.x)
            }
            Some(Axis::Vertical) => {
                cell.x == self.start.x && strictly_between(cell.y, self.start.y, self.end.y)
            }
            None => false,
        }
    }

    /// Whether `cell` lies on the line, endpoints included.
    #[must_use]
    pub fn contains_inclusive(&self, cell: Cell) -> bool {
        cell == self.start || cell == self.end || self.contains(cell)
    }

    /// Turn taken when continuing from this line onto `next`.
    #[must_use]
    pub fn turn_to(&self, next: &Line) -> Turn {
        self.direction().turn_to(next.direction())
    }

    /// Whether `a` comes no later than `b` when walking along this line.
    #[must_use]
    pub fn precedes(&self, a: Cell, b: Cell) -> bool {
        let delta = b - a;
        let step = self.direction().offset();
        delta.x * step.x + delta.y * step.y >= 0
    }

    /// Horizontal extent `[left, right)` and row of a horizontal line.
    #[must_use]
    pub fn horizontal_span(&self) -> Option<(i32, i32, i32)> {
        if self.axis() != Some(Axis::Horizontal) {
            return None;
        }
        let left = self.start.x.min(self.end.x);
        let right = self.start.x.max(self.end.x);
        Some((left, right, self.start.y))
    }
}

fn strictly_between(value: i32, a: i32, b: i32) -> bool {
    a.min(b) < value && value < a.max(b)
}
