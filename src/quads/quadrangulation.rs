use tracing::{debug, trace, warn};

use crate::error::{ContractError, Result};
use crate::lines::Line;
use crate::math::{Cell, GridDirection, Turn};

use super::Quad;

/// Open horizontal span `[left, right)` of the sweep, started at row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curtain {
    pub left: i32,
    pub right: i32,
    pub y: i32,
}

impl Curtain {
    /// Quad covered by this curtain from its row up to `row`, if any.
    fn close(&self, row: i32) -> Option<Quad> {
        (row > self.y).then(|| {
            Quad::new(
                Cell::new(self.left, self.y),
                Cell::new(self.right - self.left, row - self.y),
            )
        })
    }
}

/// Result of one sweep.
#[derive(Debug, Clone, Default)]
pub struct SweepOutput {
    pub quads: Vec<Quad>,
    /// Curtains never closed; empty for a closed boundary.
    pub open_curtains: Vec<Curtain>,
}

impl SweepOutput {
    #[must_use]
    pub fn area(&self) -> i64 {
        self.quads.iter().map(Quad::area).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeKind {
    Opening,
    Closing,
}

#[derive(Debug, Clone, Copy)]
struct CurtainEdge {
    kind: EdgeKind,
    left: i32,
    right: i32,
    y: i32,
}

/// Where an opening edge lands among the open curtains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurtainFit {
    /// Touches nothing; becomes a new curtain at this index.
    Insert(usize),
    /// Its right end meets the left end of this curtain.
    LeftExtend(usize),
    /// Its left end meets the right end of this curtain.
    RightExtend(usize),
    /// Bridges this curtain and the next one.
    Merge(usize),
}

/// Decomposes a closed rectilinear boundary into disjoint rectangles by
/// sweeping horizontal edges from the bottom row upward.
///
/// Horizontal edges with the interior above them open curtains; edges with
/// the interior below close them. Which direction is which follows from the
/// boundary's orientation.
#[derive(Debug, Clone, Copy)]
pub struct BottomUpQuadrangulation {
    turn: Turn,
}

impl BottomUpQuadrangulation {
    /// Creates a sweep for boundaries of the given orientation.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::UndefinedTurn` for `Turn::None`.
    pub fn new(turn: Turn) -> Result<Self> {
        if turn == Turn::None {
            return Err(ContractError::UndefinedTurn.into());
        }
        Ok(Self { turn })
    }

    /// Horizontal direction of edges whose interior lies above.
    #[must_use]
    pub fn opening_direction(&self) -> GridDirection {
        if self.turn == Turn::Right {
            GridDirection::Left
        } else {
            GridDirection::Right
        }
    }

    #[must_use]
    pub fn closing_direction(&self) -> GridDirection {
        self.opening_direction().reverse()
    }

    /// Runs the sweep over a closed boundary.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractError`] when the edges cannot belong to a simple
    /// boundary of this orientation: the lowest edge closes, a closing edge
    /// is not under an open curtain, or an opening edge overlaps one.
    pub fn execute<I>(&self, lines: I) -> Result<SweepOutput>
    where
        I: IntoIterator<Item = Line>,
    {
        let mut edges = self.classify(lines);
        edges.sort_by_key(|edge| edge.y);

        if let Some(first) = edges.first() {
            if first.kind != EdgeKind::Opening {
                return Err(ContractError::ClosingBeforeOpening { row: first.y }.into());
            }
        }

        let mut curtains: Vec<Curtain> = Vec::new();
        let mut quads = Vec::new();
        for edge in &edges {
            match edge.kind {
                EdgeKind::Opening => open(&mut curtains, &mut quads, edge)?,
                EdgeKind::Closing => close(&mut curtains, &mut quads, edge)?,
            }
        }

        if !curtains.is_empty() {
            warn!(open = curtains.len(), "sweep finished with open curtains");
        }
        debug!(
            edges = edges.len(),
            quads = quads.len(),
            "quadrangulation finished"
        );
        Ok(SweepOutput {
            quads,
            open_curtains: curtains,
        })
    }

    fn classify<I>(&self, lines: I) -> Vec<CurtainEdge>
    where
        I: IntoIterator<Item = Line>,
    {
        let opening = self.opening_direction();
        let closing = self.closing_direction();
        lines
            .into_iter()
            .filter_map(|line| {
                let direction = line.direction();
                let kind = if direction == opening {
                    EdgeKind::Opening
                } else if direction == closing {
                    EdgeKind::Closing
                } else {
                    return None;
                };
                let (left, right, y) = line.horizontal_span()?;
                Some(CurtainEdge {
                    kind,
                    left,
                    right,
                    y,
                })
            })
            .collect()
    }
}

fn locate(curtains: &[Curtain], edge: &CurtainEdge) -> Result<CurtainFit> {
    let index = curtains.partition_point(|curtain| curtain.left < edge.left);
    let before = index.checked_sub(1).map(|i| (i, curtains[i]));
    let after = curtains.get(index);

    let overlaps_before = before.is_some_and(|(_, c)| c.right > edge.left);
    let overlaps_after = after.is_some_and(|c| c.left < edge.right);
    if overlaps_before || overlaps_after {
        return Err(ContractError::OverlappingOpening {
            left: edge.left,
            right: edge.right,
            row: edge.y,
        }
        .into());
    }

    let touches_before = before.filter(|(_, c)| c.right == edge.left);
    let touches_after = after.is_some_and(|c| c.left == edge.right);
    Ok(match (touches_before, touches_after) {
        (Some((i, _)), true) => CurtainFit::Merge(i),
        (Some((i, _)), false) => CurtainFit::RightExtend(i),
        (None, true) => CurtainFit::LeftExtend(index),
        (None, false) => CurtainFit::Insert(index),
    })
}

fn open(curtains: &mut Vec<Curtain>, quads: &mut Vec<Quad>, edge: &CurtainEdge) -> Result<()> {
    let fit = locate(curtains, edge)?;
    trace!(?fit, left = edge.left, right = edge.right, row = edge.y, "opening edge");
    let row = edge.y;
    match fit {
        CurtainFit::Insert(i) => curtains.insert(
            i,
            Curtain {
                left: edge.left,
                right: edge.right,
                y: row,
            },
        ),
        CurtainFit::LeftExtend(i) => {
            let curtain = curtains[i];
            quads.extend(curtain.close(row));
            curtains[i] = Curtain {
                left: edge.left,
                right: curtain.right,
                y: row,
            };
        }
        CurtainFit::RightExtend(i) => {
            let curtain = curtains[i];
            quads.extend(curtain.close(row));
            curtains[i] = Curtain {
                left: curtain.left,
                right: edge.right,
                y: row,
            };
        }
        CurtainFit::Merge(i) => {
            let left = curtains[i];
            let right = curtains.remove(i + 1);
            quads.extend(left.close(row));
            quads.extend(right.close(row));
            curtains[i] = Curtain {
                left: left.left,
                right: right.right,
                y: row,
            };
        }
    }
    Ok(())
}

fn close(curtains: &mut Vec<Curtain>, quads: &mut Vec<Quad>, edge: &CurtainEdge) -> Result<()> {
    let Some(i) = curtains
        .iter()
        .position(|c| c.left <= edge.left && edge.right <= c.right)
    else {
        return Err(ContractError::UnmatchedClosing {
            left: edge.left,
            right: edge.right,
            row: edge.y,
        }
        .into());
    };
    trace!(index = i, left = edge.left, right = edge.right, row = edge.y, "closing edge");
    let row = edge.y;
    let curtain = curtains[i];
    quads.extend(curtain.close(row));

    let left_rest = (curtain.left < edge.left).then_some(Curtain {
        left: curtain.left,
        right: edge.left,
        y: row,
    });
    let right_rest = (edge.right < curtain.right).then_some(Curtain {
        left: edge.right,
        right: curtain.right,
        y: row,
    });
    match (left_rest, right_rest) {
        (None, None) => {
            curtains.remove(i);
        }
        (Some(rest), None) | (None, Some(rest)) => curtains[i] = rest,
        (Some(left), Some(right)) => {
            curtains[i] = left;
            curtains.insert(i + 1, right);
        }
    }
    Ok(())
}
