use tracing::debug;

use crate::error::{Result, ValidationError};
use crate::grid::GridBounds;
use crate::insertion::InsertionEvaluation;
use crate::lines::{LineChain, LineId, LineLoop};
use crate::math::polygon_2d::enclosed_area;
use crate::math::{Cell, GridDirection, Turn};
use crate::quads::{BottomUpQuadrangulation, Quad, QuadContainer};

use super::ShapeParams;

/// How a one-cell move from a point of the outline relates to the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryMove {
    /// The move stays on an outline line.
    Along,
    /// The move leaves the shape; drawing starts from this line.
    Outward(LineId),
    /// The move would enter the revealed interior.
    Inward,
}

/// Outcome of a successful insertion.
#[derive(Debug, Clone)]
pub struct Insertion {
    /// Quads covering the newly enclosed area.
    pub quads: Vec<Quad>,
    pub area: i64,
    /// Whether the chain was spliced in the order it was drawn.
    pub is_start_to_end: bool,
}

/// The revealed region: its outline and the quads covering it.
#[derive(Debug, Clone)]
pub struct DrawnShape {
    outline: LineLoop,
    quads: QuadContainer,
    params: ShapeParams,
}

impl DrawnShape {
    /// Wraps `outline`, covering its interior with quads.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractError`](crate::error::ContractError) if the
    /// outline cannot be quadrangulated.
    pub fn new(outline: LineLoop, params: ShapeParams) -> Result<Self> {
        let sweep = BottomUpQuadrangulation::new(outline.turn())?.execute(outline.lines())?;
        let mut quads = QuadContainer::new();
        quads.extend(sweep.quads);
        debug!(lines = outline.len(), area = quads.area(), "shape created");
        Ok(Self {
            outline,
            quads,
            params,
        })
    }

    /// Rectangular starting shape.
    ///
    /// # Errors
    ///
    /// See [`LineLoop::rectangle`].
    pub fn rectangle(bottom_left: Cell, size: Cell, turn: Turn, params: ShapeParams) -> Result<Self> {
        Self::new(LineLoop::rectangle(bottom_left, size, turn)?, params)
    }

    #[must_use]
    pub fn outline(&self) -> &LineLoop {
        &self.outline
    }

    #[must_use]
    pub fn quads(&self) -> &QuadContainer {
        &self.quads
    }

    #[must_use]
    pub fn params(&self) -> &ShapeParams {
        &self.params
    }

    #[must_use]
    pub fn area(&self) -> i64 {
        self.quads.area()
    }

    #[must_use]
    pub fn coverage(&self, bounds: &GridBounds) -> f64 {
        self.quads.coverage(bounds)
    }

    #[must_use]
    pub fn is_on_outline(&self, cell: Cell) -> bool {
        self.outline.find_line(cell).is_some()
    }

    /// Line a drawing may start from when leaving `cell` towards
    /// `direction`.
    ///
    /// Inside a line only the exterior perpendicular qualifies. At a corner
    /// that turns the same way as the loop, continuing past the corner along
    /// either of its two lines qualifies; other corners open nowhere.
    #[must_use]
    pub fn breakout_line(&self, cell: Cell, direction: GridDirection) -> Option<LineId> {
        let turn = self.outline.turn();
        for (id, line) in self.outline.iter() {
            if line.contains(cell) {
                let exterior = line.direction().turned(turn.reverse());
                return (direction == exterior).then_some(id);
            }
            if line.end != cell {
                continue;
            }
            let next_id = self.outline.next(id)?;
            let next = self.outline.line(next_id).ok()?;
            if line.turn_to(&next) != turn {
                return None;
            }
            return if direction == line.direction() {
                Some(id)
            } else if direction == next.direction().reverse() {
                Some(next_id)
            } else {
                None
            };
        }
        None
    }

    /// Line a drawing reconnects to when it reaches `cell`.
    #[must_use]
    pub fn reinsertion_line(&self, cell: Cell) -> Option<LineId> {
        self.outline.find_line(cell)
    }

    /// Classifies a one-cell move from `cell`; `None` if `cell` is not on
    /// the outline.
    #[must_use]
    pub fn boundary_move(&self, cell: Cell, direction: GridDirection) -> Option<BoundaryMove> {
        if !self.is_on_outline(cell) || direction == GridDirection::None {
            return None;
        }
        let target = cell + direction.offset();
        let along = self
            .outline
            .lines()
            .any(|line| line.contains_inclusive(cell) && line.contains_inclusive(target));
        if along {
            return Some(BoundaryMove::Along);
        }
        Some(match self.breakout_line(cell, direction) {
            Some(id) => BoundaryMove::Outward(id),
            None => BoundaryMove::Inward,
        })
    }

    /// Reconnects `chain` into the outline and reveals the area it closes.
    ///
    /// The enclosed boundary is quadrangulated before the outline is
    /// touched, so a failed area check leaves the shape unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractError`](crate::error::ContractError) for a chain
    /// that does not run from `breakout` to `reinsertion`, and a
    /// [`ValidationError`] when an enabled check fails.
    pub fn insert(
        &mut self,
        chain: &LineChain,
        breakout: LineId,
        reinsertion: LineId,
    ) -> Result<Insertion> {
        let evaluation = InsertionEvaluation::evaluate(&self.outline, chain, breakout, reinsertion)?;
        let sweep = BottomUpQuadrangulation::new(self.outline.turn())?
            .execute(evaluation.loop_view(&self.outline))?;
        let area = sweep.area();
        if self.params.validate_area {
            let enclosed = enclosed_area(evaluation.loop_view(&self.outline));
            if enclosed != area {
                return Err(ValidationError::AreaMismatch {
                    quads: area,
                    enclosed,
                }
                .into());
            }
        }

        self.outline.splice(&evaluation.splice())?;
        if self.params.merge_collinear {
            self.outline.merge_collinear();
        }
        if self.params.validate_outline {
            self.outline.validate()?;
        }
        self.quads.extend(sweep.quads.iter().copied());
        debug!(
            area,
            quads = sweep.quads.len(),
            lines = self.outline.len(),
            total = self.quads.area(),
            "chain inserted"
        );
        Ok(Insertion {
            quads: sweep.quads,
            area,
            is_start_to_end: evaluation.is_start_to_end(),
        })
    }
}
