use crate::error::{ContractError, Result};
use crate::math::{Cell, GridDirection, WorldPoint};

/// A side of the playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridSide {
    Left,
    Right,
    Bottom,
    Top,
}

/// A corner of the playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridCorner {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl GridCorner {
    /// Direction to continue along after reaching this corner while moving
    /// `direction` along one of the two grid sides that meet here.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::NotACornerApproach` for any direction that
    /// does not arrive at the corner along a grid side.
    pub fn turn_inside(self, direction: GridDirection) -> Result<GridDirection> {
        use GridDirection::{Down, Left, Right, Up};
        let turned = match (self, direction) {
            (Self::BottomLeft, Left) | (Self::BottomRight, Right) => Some(Up),
            (Self::BottomLeft, Down) | (Self::TopLeft, Up) => Some(Right),
            (Self::BottomRight, Down) | (Self::TopRight, Up) => Some(Left),
            (Self::TopLeft, Left) | (Self::TopRight, Right) => Some(Down),
            _ => None,
        };
        turned.ok_or_else(|| {
            ContractError::NotACornerApproach {
                direction,
                corner: self,
            }
            .into()
        })
    }
}

/// The rectangle `[0, width] x [0, height]` of grid intersection points,
/// plus its placement in scene space.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBounds {
    size: Cell,
    origin: WorldPoint,
    cell_size: f64,
}

impl GridBounds {
    /// Creates bounds with the scene origin at zero and unit cells.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidGridSize` unless both dimensions are
    /// positive.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(ContractError::InvalidGridSize { width, height }.into());
        }
        Ok(Self {
            size: Cell::new(width, height),
            origin: WorldPoint::origin(),
            cell_size: 1.0,
        })
    }

    /// Places the grid in scene space.
    #[must_use]
    pub fn with_world(mut self, origin: WorldPoint, cell_size: f64) -> Self {
        self.origin = origin;
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub fn size(&self) -> Cell {
        self.size
    }

    /// Number of unit cells inside the bounds.
    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.size.x) * i64::from(self.size.y)
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        (0..=self.size.x).contains(&cell.x) && (0..=self.size.y).contains(&cell.y)
    }

    #[must_use]
    pub fn clamp(&self, cell: Cell) -> Cell {
        Cell::new(cell.x.clamp(0, self.size.x), cell.y.clamp(0, self.size.y))
    }

    #[must_use]
    pub fn cell_to_world(&self, cell: Cell) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + f64::from(cell.x) * self.cell_size,
            self.origin.y + f64::from(cell.y) * self.cell_size,
        )
    }

    /// Nearest cell to a scene position, clamped into the bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_cell(&self, point: WorldPoint) -> Cell {
        let x = ((point.x - self.origin.x) / self.cell_size).round();
        let y = ((point.y - self.origin.y) / self.cell_size).round();
        Cell::new(
            x.clamp(0.0, f64::from(self.size.x)) as i32,
            y.clamp(0.0, f64::from(self.size.y)) as i32,
        )
    }

    /// The corner this cell sits on, if any.
    #[must_use]
    pub fn corner(&self, cell: Cell) -> Option<GridCorner> {
        match (self.side_x(cell), self.side_y(cell)) {
            (Some(GridSide::Left), Some(GridSide::Bottom)) => Some(GridCorner::BottomLeft),
            (Some(GridSide::Right), Some(GridSide::Bottom)) => Some(GridCorner::BottomRight),
            (Some(GridSide::Left), Some(GridSide::Top)) => Some(GridCorner::TopLeft),
            (Some(GridSide::Right), Some(GridSide::Top)) => Some(GridCorner::TopRight),
            _ => None,
        }
    }

    /// The side this cell sits on. Corners report their horizontal side
    /// (`Bottom` or `Top`).
    #[must_use]
    pub fn side(&self, cell: Cell) -> Option<GridSide> {
        if !self.contains(cell) {
            return None;
        }
        self.side_y(cell).or_else(|| self.side_x(cell))
    }

    fn side_x(&self, cell: Cell) -> Option<GridSide> {
        if cell.x == 0 {
            Some(GridSide::Left)
        } else if cell.x == self.size.x {
            Some(GridSide::Right)
        } else {
            None
        }
    }

    fn side_y(&self, cell: Cell) -> Option<GridSide> {
        if cell.y == 0 {
            Some(GridSide::Bottom)
        } else if cell.y == self.size.y {
            Some(GridSide::Top)
        } else {
            None
        }
    }
}
