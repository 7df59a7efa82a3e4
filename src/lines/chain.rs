use crate::error::{LineError, Result};
use crate::math::{Cell, GridDirection};

use super::container::{ContainerKind, LineContainer, LineId};
use super::line::Line;

/// How a chain absorbed a new end cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// The last line was lengthened or shortened in place.
    Collinear,
    /// A new line was appended after a turn.
    Turned,
    /// Backtracking shortened the last line to nothing and it was removed.
    Removed,
}

/// Open polyline drawn from an origin cell.
///
/// Keeps a running clockwise weight that is updated in constant time as the
/// chain grows or backtracks.
#[derive(Debug, Clone)]
pub struct LineChain {
    lines: LineContainer,
    origin: Cell,
    clockwise_weight: i32,
}

impl LineChain {
    /// An empty chain starting at `origin`.
    #[must_use]
    pub fn new(origin: Cell) -> Self {
        Self {
            lines: LineContainer::new(ContainerKind::Chain),
            origin,
            clockwise_weight: 0,
        }
    }

    /// Builds a chain through the given corners.
    ///
    /// # Errors
    ///
    /// Returns `LineError::TooFewCorners` for an empty list and
    /// `LineError::Diagonal` for non axis-aligned steps.
    pub fn from_corners(corners: &[Cell]) -> Result<Self> {
        let Some(&origin) = corners.first() else {
            return Err(LineError::TooFewCorners {
                required: 1,
                actual: 0,
            }
            .into());
        };
        let mut chain = Self::new(origin);
        chain.lines.rebuild(corners)?;
        chain.lines.merge_collinear();
        chain.clockwise_weight = chain.lines.clockwise_weight();
        Ok(chain)
    }

    #[must_use]
    pub fn container(&self) -> &LineContainer {
        &self.lines
    }

    #[must_use]
    pub fn start_cell(&self) -> Cell {
        self.origin
    }

    /// Current end of the chain; the origin while the chain is empty.
    #[must_use]
    pub fn end_cell(&self) -> Cell {
        self.last_line().map_or(self.origin, |line| line.end)
    }

    #[must_use]
    pub fn last_line(&self) -> Option<Line> {
        self.lines.tail().and_then(|tail| self.lines.line(tail).ok())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn clockwise_weight(&self) -> i32 {
        self.clockwise_weight
    }

    /// Lines from origin to end.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.lines.lines()
    }

    /// Lines from end back to origin, each one reversed.
    #[must_use]
    pub fn reversed_lines(&self) -> Vec<Line> {
        self.lines
            .iter_rev()
            .map(|(_, line)| line.reversed())
            .collect()
    }

    /// Moves the chain's end to `new_end`.
    ///
    /// A step along the last line's axis edits that line in place, which
    /// also covers backtracking; any other step appends a new line.
    ///
    /// # Errors
    ///
    /// Returns `LineError::ZeroLength` if `new_end` is the current end and
    /// `LineError::Diagonal` if it is not axis-aligned with it.
    pub fn extend(&mut self, new_end: Cell) -> Result<Extension> {
        let end = self.end_cell();
        let direction = GridDirection::between(end, new_end);
        if direction == GridDirection::None {
            return Err(if end == new_end {
                LineError::ZeroLength(end).into()
            } else {
                LineError::Diagonal {
                    start: end,
                    end: new_end,
                }
                .into()
            });
        }

        let Some(tail) = self.lines.tail() else {
            self.lines.push_back(Line::new(end, new_end));
            return Ok(Extension::Turned);
        };
        let last = self.lines.line(tail)?;
        if direction.axis() != last.axis() {
            self.clockwise_weight += last.turn_to(&Line::new(end, new_end)).clockwise_weight();
            self.lines.push_back(Line::new(end, new_end));
            return Ok(Extension::Turned);
        }

        let previous = self.previous_line(tail)?;
        let old_weight = previous.map_or(0, |p| p.turn_to(&last).clockwise_weight());
        let edited = Line::new(last.start, new_end);
        if edited.start == edited.end {
            self.lines.remove(tail)?;
            self.clockwise_weight -= old_weight;
            return Ok(Extension::Removed);
        }
        let new_weight = previous.map_or(0, |p| p.turn_to(&edited).clockwise_weight());
        self.lines.set_line(tail, edited)?;
        self.clockwise_weight += new_weight - old_weight;
        Ok(Extension::Collinear)
    }

    /// Whether `cell` lies on any line other than the last one.
    ///
    /// The start of the last line is excluded, since backtracking reaches it
    /// legitimately.
    #[must_use]
    pub fn touches_earlier_line(&self, cell: Cell) -> bool {
        let Some(tail) = self.lines.tail() else {
            return false;
        };
        let last_start = self.lines.line(tail).map_or(self.origin, |line| line.start);
        if cell == last_start {
            return false;
        }
        self.lines
            .iter()
            .filter(|&(id, _)| id != tail)
            .any(|(_, line)| line.contains_inclusive(cell))
    }

    fn previous_line(&self, id: LineId) -> Result<Option<Line>> {
        self.lines
            .previous(id)
            .map(|previous| self.lines.line(previous))
            .transpose()
    }
}
