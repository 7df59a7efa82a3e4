use tracing::trace;

use crate::error::Result;
use crate::lines::{Extension, LineChain, LineId};
use crate::math::{Cell, GridDirection};

use super::DrawnShape;

/// What happened to a drawing after one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawEvent {
    /// The chain grew or shrank and is still outside the shape.
    Extended,
    /// Backtracking brought the chain back to its start; nothing is left.
    Retracted,
    /// The step hit the chain itself. The chain is left as it was.
    SelfCollision,
    /// The chain touched the outline again and is ready to be inserted.
    Reconnected { reinsertion: LineId },
}

/// A chain being drawn away from a shape, one cell per step.
#[derive(Debug, Clone)]
pub struct DrawingChain {
    chain: LineChain,
    breakout: LineId,
}

impl DrawingChain {
    /// Starts drawing at `start`, which lies on the `breakout` line.
    #[must_use]
    pub fn begin(start: Cell, breakout: LineId) -> Self {
        Self {
            chain: LineChain::new(start),
            breakout,
        }
    }

    #[must_use]
    pub fn chain(&self) -> &LineChain {
        &self.chain
    }

    #[must_use]
    pub fn breakout(&self) -> LineId {
        self.breakout
    }

    #[must_use]
    pub fn start_cell(&self) -> Cell {
        self.chain.start_cell()
    }

    #[must_use]
    pub fn end_cell(&self) -> Cell {
        self.chain.end_cell()
    }

    /// Moves the chain's end to the adjacent `cell`.
    ///
    /// # Errors
    ///
    /// Returns a [`LineError`](crate::error::LineError) if `cell` is not a
    /// single axis-aligned step away from the current end.
    pub fn advance(&mut self, cell: Cell, shape: &DrawnShape) -> Result<DrawEvent> {
        let direction = GridDirection::between(self.chain.end_cell(), cell);
        let backtracking = self
            .chain
            .last_line()
            .is_some_and(|last| direction == last.direction().reverse());
        if backtracking {
            let extension = self.chain.extend(cell)?;
            trace!(?extension, x = cell.x, y = cell.y, "drawing backtracked");
            return Ok(if extension == Extension::Removed && self.chain.is_empty() {
                DrawEvent::Retracted
            } else {
                DrawEvent::Extended
            });
        }

        if cell == self.chain.start_cell() || self.chain.touches_earlier_line(cell) {
            trace!(x = cell.x, y = cell.y, "drawing hit itself");
            return Ok(DrawEvent::SelfCollision);
        }

        self.chain.extend(cell)?;
        Ok(match shape.reinsertion_line(cell) {
            Some(reinsertion) => DrawEvent::Reconnected { reinsertion },
            None => DrawEvent::Extended,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Turn;
    use crate::shape::ShapeParams;

    fn cell(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    fn shape() -> DrawnShape {
        DrawnShape::rectangle(cell(2, 2), cell(4, 4), Turn::Right, ShapeParams::default()).unwrap()
    }

    fn begin(shape: &DrawnShape) -> DrawingChain {
        let breakout = shape.breakout_line(cell(4, 2), GridDirection::Down).unwrap();
        DrawingChain::begin(cell(4, 2), breakout)
    }

    #[test]
    fn reconnects_and_inserts() {
        let mut shape = shape();
        let mut drawing = begin(&shape);
        for step in [cell(4, 1), cell(4, 0), cell(5, 0), cell(6, 0)] {
            assert_eq!(drawing.advance(step, &shape).unwrap(), DrawEvent::Extended);
        }
        assert_eq!(drawing.advance(cell(6, 1), &shape).unwrap(), DrawEvent::Extended);
        let DrawEvent::Reconnected { reinsertion } = drawing.advance(cell(6, 2), &shape).unwrap()
        else {
            panic!("expected reconnection");
        };
        let insertion = shape
            .insert(drawing.chain(), drawing.breakout(), reinsertion)
            .unwrap();
        assert_eq!(insertion.area, 4);
        assert_eq!(shape.area(), 20);
    }

    #[test]
    fn backtracking_retracts() {
        let shape = shape();
        let mut drawing = begin(&shape);
        drawing.advance(cell(4, 1), &shape).unwrap();
        drawing.advance(cell(4, 0), &shape).unwrap();
        assert_eq!(drawing.advance(cell(4, 1), &shape).unwrap(), DrawEvent::Extended);
        assert_eq!(drawing.end_cell(), cell(4, 1));
        assert_eq!(drawing.advance(cell(4, 2), &shape).unwrap(), DrawEvent::Retracted);
        assert!(drawing.chain().is_empty());
    }

    #[test]
    fn crossing_itself_collides() {
        let shape = shape();
        let mut drawing = begin(&shape);
        for step in [cell(4, 1), cell(4, 0), cell(3, 0), cell(3, 1)] {
            assert_eq!(drawing.advance(step, &shape).unwrap(), DrawEvent::Extended);
        }
        assert_eq!(drawing.advance(cell(4, 1), &shape).unwrap(), DrawEvent::SelfCollision);
        assert_eq!(drawing.end_cell(), cell(3, 1));
    }

    #[test]
    fn non_adjacent_step_is_an_error() {
        let shape = shape();
        let mut drawing = begin(&shape);
        assert!(drawing.advance(cell(5, 1), &shape).is_err());
    }
}
