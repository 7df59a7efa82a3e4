mod quadrangulation;

pub use quadrangulation::{BottomUpQuadrangulation, Curtain, SweepOutput};

use crate::grid::GridBounds;
use crate::math::Cell;

/// Axis-aligned rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quad {
    pub bottom_left: Cell,
    pub size: Cell,
}

impl Quad {
    #[must_use]
    pub fn new(bottom_left: Cell, size: Cell) -> Self {
        Self { bottom_left, size }
    }

    #[must_use]
    pub fn top_right(&self) -> Cell {
        self.bottom_left + self.size
    }

    /// Number of unit cells covered.
    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.size.x) * i64::from(self.size.y)
    }

    /// Whether the unit cell whose bottom-left corner is `cell` lies inside.
    #[must_use]
    pub fn covers(&self, cell: Cell) -> bool {
        let top_right = self.top_right();
        (self.bottom_left.x..top_right.x).contains(&cell.x)
            && (self.bottom_left.y..top_right.y).contains(&cell.y)
    }

    /// Whether the two quads share any unit cell.
    #[must_use]
    pub fn overlaps(&self, other: &Quad) -> bool {
        let (a0, a1) = (self.bottom_left, self.top_right());
        let (b0, b1) = (other.bottom_left, other.top_right());
        a0.x < b1.x && b0.x < a1.x && a0.y < b1.y && b0.y < a1.y
    }
}

/// Every quad revealed during a level.
#[derive(Debug, Clone, Default)]
pub struct QuadContainer {
    quads: Vec<Quad>,
    area: i64,
}

impl QuadContainer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend<I>(&mut self, quads: I)
    where
        I: IntoIterator<Item = Quad>,
    {
        for quad in quads {
            self.area += quad.area();
            self.quads.push(quad);
        }
    }

    /// Drops every quad, as on a level reset.
    pub fn clear(&mut self) {
        self.quads.clear();
        self.area = 0;
    }

    #[must_use]
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Total covered cells.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.area
    }

    /// Covered fraction of the playing field.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn coverage(&self, bounds: &GridBounds) -> f64 {
        self.area as f64 / bounds.area() as f64
    }

    /// Whether the unit cell whose bottom-left corner is `cell` is revealed.
    #[must_use]
    pub fn covers(&self, cell: Cell) -> bool {
        self.quads.iter().any(|quad| quad.covers(cell))
    }
}
