use crate::error::{ContractError, LineError, Result, ValidationError};
use crate::grid::GridBounds;
use crate::math::{Cell, Turn};

use super::container::{ContainerKind, LineContainer, LineId};
use super::line::Line;
use super::span::SpanIter;

/// Total clockwise weight of any simple rectilinear polygon, up to sign.
pub const FULL_TURN_WEIGHT: i32 = 4;

/// Closed, turn-consistent rectilinear polygon.
///
/// The orientation is fixed when the loop is built and preserved by every
/// splice.
#[derive(Debug, Clone)]
pub struct LineLoop {
    lines: LineContainer,
    turn: Turn,
}

/// Where a chain is spliced into a loop.
///
/// `lines` run from `breakout_point` on `breakout` to `reinsertion_point` on
/// `reinsertion`, in the loop's traversal sense.
#[derive(Debug, Clone, Copy)]
pub struct Splice<'a> {
    pub breakout: LineId,
    pub breakout_point: Cell,
    pub reinsertion: LineId,
    pub reinsertion_point: Cell,
    pub lines: &'a [Line],
}

impl LineLoop {
    /// Builds a loop through `corners`, closing it back to the first one.
    ///
    /// Collinear corners are merged away and the orientation is taken from
    /// the sign of the clockwise weight.
    ///
    /// # Errors
    ///
    /// Returns `LineError::TooFewCorners` for fewer than four corners,
    /// `LineError::Diagonal` for non axis-aligned steps and
    /// `ValidationError::TurnWeight` if the corners do not describe a simple
    /// rectilinear polygon.
    pub fn from_corners(corners: &[Cell]) -> Result<Self> {
        if corners.len() < 4 {
            return Err(LineError::TooFewCorners {
                required: 4,
                actual: corners.len(),
            }
            .into());
        }
        let mut lines = LineContainer::new(ContainerKind::Loop);
        lines.rebuild(corners)?;
        lines.merge_collinear();
        let weight = lines.clockwise_weight();
        if weight.abs() != FULL_TURN_WEIGHT {
            return Err(ValidationError::TurnWeight {
                expected: if weight < 0 {
                    -FULL_TURN_WEIGHT
                } else {
                    FULL_TURN_WEIGHT
                },
                actual: weight,
            }
            .into());
        }
        Ok(Self {
            lines,
            turn: Turn::from_clockwise_weight(weight),
        })
    }

    /// Axis-aligned rectangle walked in the given orientation, starting at its
    /// bottom-left corner.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::InvalidOrientation` for `Turn::None` and
    /// `LineError::TooFewCorners` when the size is not positive.
    pub fn rectangle(bottom_left: Cell, size: Cell, turn: Turn) -> Result<Self> {
        let (x, y) = (bottom_left.x, bottom_left.y);
        let (w, h) = (size.x, size.y);
        if w <= 0 || h <= 0 {
            return Err(LineError::TooFewCorners {
                required: 4,
                actual: 0,
            }
            .into());
        }
        let corners = match turn {
            Turn::Right => [
                Cell::new(x, y),
                Cell::new(x, y + h),
                Cell::new(x + w, y + h),
                Cell::new(x + w, y),
            ],
            Turn::Left => [
                Cell::new(x, y),
                Cell::new(x + w, y),
                Cell::new(x + w, y + h),
                Cell::new(x, y + h),
            ],
            Turn::None => return Err(ContractError::InvalidOrientation { turn }.into()),
        };
        Self::from_corners(&corners)
    }

    #[must_use]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    #[must_use]
    pub fn container(&self) -> &LineContainer {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` for a stale or foreign id.
    pub fn line(&self, id: LineId) -> Result<Line> {
        self.lines.line(id)
    }

    #[must_use]
    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.lines.next(id)
    }

    #[must_use]
    pub fn previous(&self, id: LineId) -> Option<LineId> {
        self.lines.previous(id)
    }

    /// Walks the loop once.
    #[must_use]
    pub fn iter(&self) -> SpanIter<'_> {
        self.lines.iter()
    }

    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.lines.lines()
    }

    #[must_use]
    pub fn corners(&self) -> Vec<Cell> {
        self.lines.corners()
    }

    #[must_use]
    pub fn clockwise_weight(&self) -> i32 {
        self.lines.clockwise_weight()
    }

    /// First line containing `cell`, endpoints included.
    #[must_use]
    pub fn find_line(&self, cell: Cell) -> Option<LineId> {
        self.lines.find_containing(cell)
    }

    /// Clamps the loop into `bounds`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::TurnWeight` if clamping flattened the loop
    /// into something that is no longer a polygon of the same orientation.
    pub fn clamp(&mut self, bounds: &GridBounds) -> Result<()> {
        self.lines.clamp(bounds);
        self.lines.merge_collinear();
        self.check_weight()?;
        Ok(())
    }

    /// Replaces the part of the loop from the breakout point forward to the
    /// reinsertion point with `splice.lines`.
    ///
    /// When breakout and reinsertion are the same line and the reinsertion
    /// point comes first along it, the replaced part wraps around the whole
    /// loop. Zero-length pieces are dropped; collinear neighbours are left
    /// for [`LineLoop::merge_collinear`].
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` if either id is stale.
    pub fn splice(&mut self, splice: &Splice<'_>) -> Result<()> {
        let breakout = self.lines.line(splice.breakout)?;
        self.lines.line(splice.reinsertion)?;
        let p = splice.breakout_point;
        let q = splice.reinsertion_point;

        if splice.breakout != splice.reinsertion {
            let mut current = self.lines.next(splice.breakout);
            while let Some(id) = current.filter(|&id| id != splice.reinsertion) {
                current = self.lines.next(id);
                self.lines.remove(id)?;
            }
            self.lines
                .set_line(splice.breakout, Line::new(breakout.start, p))?;
            let reinsertion = self.lines.line(splice.reinsertion)?;
            self.lines
                .set_line(splice.reinsertion, Line::new(q, reinsertion.end))?;
        } else if breakout.precedes(p, q) {
            self.lines
                .set_line(splice.breakout, Line::new(breakout.start, p))?;
            self.lines
                .insert_after(splice.breakout, Line::new(q, breakout.end))?;
        } else {
            let others: Vec<LineId> = self
                .lines
                .iter()
                .map(|(id, _)| id)
                .filter(|&id| id != splice.breakout)
                .collect();
            for id in others {
                self.lines.remove(id)?;
            }
            self.lines.set_line(splice.breakout, Line::new(q, p))?;
        }

        let mut after = splice.breakout;
        for &line in splice.lines {
            after = self.lines.insert_after(after, line)?;
        }
        self.lines.remove_degenerate();
        Ok(())
    }

    /// Joins consecutive lines running the same way.
    pub fn merge_collinear(&mut self) {
        self.lines.merge_collinear();
    }

    /// Checks circularity in both directions, link consistency and the turn
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let len = self.lines.len();
        let Some(head) = self.lines.head() else {
            return Err(ValidationError::NotCircular { steps: 0, len });
        };
        for forward in [true, false] {
            let mut current = head;
            let mut steps = 0;
            loop {
                let step = if forward {
                    self.lines.next(current)
                } else {
                    self.lines.previous(current)
                };
                let Some(step) = step else {
                    return Err(ValidationError::NotCircular { steps, len });
                };
                steps += 1;
                current = step;
                if current == head || steps > len {
                    break;
                }
            }
            if current != head || steps != len {
                return Err(ValidationError::NotCircular { steps, len });
            }
        }
        for (id, line) in self.lines.iter() {
            let next = self
                .lines
                .next(id)
                .and_then(|next| self.lines.line(next).ok());
            if next.map(|next| next.start) != Some(line.end) {
                return Err(ValidationError::Disconnected(line.end));
            }
        }
        self.check_weight()
    }

    fn check_weight(&self) -> std::result::Result<(), ValidationError> {
        let expected = FULL_TURN_WEIGHT * self.turn.clockwise_weight();
        let actual = self.clockwise_weight();
        if actual == expected {
            Ok(())
        } else {
            Err(ValidationError::TurnWeight { expected, actual })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    #[test]
    fn rectangle_orientations() {
        let cw = LineLoop::rectangle(cell(0, 0), cell(4, 4), Turn::Right).unwrap();
        assert_eq!(cw.turn(), Turn::Right);
        assert_eq!(cw.clockwise_weight(), 4);
        let ccw = LineLoop::rectangle(cell(0, 0), cell(4, 4), Turn::Left).unwrap();
        assert_eq!(ccw.turn(), Turn::Left);
        assert_eq!(ccw.clockwise_weight(), -4);
        assert!(LineLoop::rectangle(cell(0, 0), cell(4, 4), Turn::None).is_err());
        assert!(cw.validate().is_ok());
    }

    #[test]
    fn from_corners_merges_collinear() {
        let lp = LineLoop::from_corners(&[
            cell(0, 0),
            cell(0, 2),
            cell(0, 4),
            cell(4, 4),
            cell(4, 0),
        ])
        .unwrap();
        assert_eq!(lp.len(), 4);
    }

    #[test]
    fn from_corners_rejects_non_polygons() {
        assert!(LineLoop::from_corners(&[cell(0, 0), cell(0, 4), cell(4, 4)]).is_err());
        assert!(LineLoop::from_corners(&[cell(0, 0), cell(0, 4), cell(0, 6), cell(0, 2)]).is_err());
    }

    #[test]
    fn u_shape_weight() {
        let lp = LineLoop::from_corners(&[
            cell(0, 0),
            cell(0, 4),
            cell(1, 4),
            cell(1, 1),
            cell(3, 1),
            cell(3, 4),
            cell(4, 4),
            cell(4, 0),
        ])
        .unwrap();
        assert_eq!(lp.turn(), Turn::Right);
        assert_eq!(lp.len(), 8);
        assert!(lp.validate().is_ok());
    }

    #[test]
    fn find_line_resolves_corners() {
        let lp = LineLoop::rectangle(cell(0, 0), cell(4, 4), Turn::Right).unwrap();
        let id = lp.find_line(cell(0, 4)).unwrap();
        assert!(lp.line(id).unwrap().contains_inclusive(cell(0, 4)));
        assert!(lp.find_line(cell(2, 2)).is_none());
    }

    #[test]
    fn splice_within_one_line() {
        let mut lp = LineLoop::rectangle(cell(2, 2), cell(4, 4), Turn::Right).unwrap();
        let bottom = lp.find_line(cell(5, 2)).unwrap();
        let lines = [
            Line::new(cell(5, 2), cell(5, 1)),
            Line::new(cell(5, 1), cell(4, 1)),
            Line::new(cell(4, 1), cell(4, 2)),
        ];
        lp.splice(&Splice {
            breakout: bottom,
            breakout_point: cell(5, 2),
            reinsertion: bottom,
            reinsertion_point: cell(4, 2),
            lines: &lines,
        })
        .unwrap();
        assert_eq!(lp.len(), 8);
        assert!(lp.validate().is_ok());
    }

    #[test]
    fn clamp_keeps_orientation() {
        let mut lp = LineLoop::rectangle(cell(-2, -2), cell(6, 6), Turn::Left).unwrap();
        lp.clamp(&GridBounds::new(10, 10).unwrap()).unwrap();
        assert_eq!(lp.corners().len(), 4);
        assert!(lp.lines().all(|line| line.start.x >= 0 && line.start.y >= 0));
        assert!(lp.validate().is_ok());
    }
}
