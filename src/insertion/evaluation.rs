use tracing::debug;

use crate::error::{ContractError, LineError, Result};
use crate::lines::{Line, LineChain, LineId, LineLoop, Splice};
use crate::math::{Cell, Turn};

use super::view::LoopView;

/// How a drawn chain reconnects into a loop.
///
/// The reconnection sense is derived from geometry alone: the chain's
/// clockwise weight is compared with the weight of the loop span between the
/// two touched lines. When the chain runs against the loop's sense, the
/// breakout and reinsertion roles are swapped and the chain is reversed, so
/// `lines_to_insert` always follows the loop's own traversal order.
#[derive(Debug, Clone)]
pub struct InsertionEvaluation {
    breakout_line: LineId,
    reinsertion_line: LineId,
    breakout_point: Cell,
    reinsertion_point: Cell,
    is_start_to_end: bool,
    lines_to_insert: Vec<Line>,
}

impl InsertionEvaluation {
    /// Evaluates the reconnection of `chain` into `outline`.
    ///
    /// # Errors
    ///
    /// Returns a [`ContractError`] if the loop has no orientation, the chain
    /// is empty or closed, or its endpoints are not on the declared lines;
    /// `LineError::LineNotFound` if either id does not belong to the loop.
    pub fn evaluate(
        outline: &LineLoop,
        chain: &LineChain,
        breakout_line: LineId,
        reinsertion_line: LineId,
    ) -> Result<Self> {
        let loop_turn = outline.turn();
        if loop_turn == Turn::None {
            return Err(ContractError::UndefinedTurn.into());
        }
        if chain.is_empty() {
            return Err(ContractError::EmptyChain.into());
        }
        let start = chain.start_cell();
        let end = chain.end_cell();
        if start == end {
            return Err(ContractError::ClosedChain(start).into());
        }
        if !outline.line(breakout_line)?.contains_inclusive(start) {
            return Err(ContractError::ChainStartOffBreakout(start).into());
        }
        if !outline.line(reinsertion_line)?.contains_inclusive(end) {
            return Err(ContractError::ChainEndOffReinsertion(end).into());
        }

        // At a corner, take the lines the replaced path actually runs over:
        // the one leaving the breakout point and the one arriving at the
        // reinsertion point. Otherwise the corner's turn is miscounted.
        let breakout_line = if outline.line(breakout_line)?.end == start {
            outline.next(breakout_line).ok_or(LineError::LineNotFound)?
        } else {
            breakout_line
        };
        let reinsertion_line = if outline.line(reinsertion_line)?.start == end {
            outline
                .previous(reinsertion_line)
                .ok_or(LineError::LineNotFound)?
        } else {
            reinsertion_line
        };

        let loop_weight = outline
            .container()
            .span_weight(breakout_line, reinsertion_line)?;
        let chain_weight = chain.clockwise_weight();
        let is_start_to_end = is_start_to_end(loop_turn, chain_weight, loop_weight)?;
        debug!(
            loop_weight,
            chain_weight, is_start_to_end, "evaluated chain reconnection"
        );

        Ok(if is_start_to_end {
            Self {
                breakout_line,
                reinsertion_line,
                breakout_point: start,
                reinsertion_point: end,
                is_start_to_end,
                lines_to_insert: chain.lines().collect(),
            }
        } else {
            Self {
                breakout_line: reinsertion_line,
                reinsertion_line: breakout_line,
                breakout_point: end,
                reinsertion_point: start,
                is_start_to_end,
                lines_to_insert: chain.reversed_lines(),
            }
        })
    }

    /// Loop line the inserted material leaves from, after any swap.
    ///
    /// A point on a corner resolves to the line the replaced part of the
    /// loop runs along, so this may differ from the id passed in.
    #[must_use]
    pub fn breakout_line(&self) -> LineId {
        self.breakout_line
    }

    /// Loop line the inserted material returns to, after any swap.
    #[must_use]
    pub fn reinsertion_line(&self) -> LineId {
        self.reinsertion_line
    }

    #[must_use]
    pub fn breakout_point(&self) -> Cell {
        self.breakout_point
    }

    #[must_use]
    pub fn reinsertion_point(&self) -> Cell {
        self.reinsertion_point
    }

    /// Whether the chain was inserted as drawn.
    #[must_use]
    pub fn is_start_to_end(&self) -> bool {
        self.is_start_to_end
    }

    #[must_use]
    pub fn lines_to_insert(&self) -> &[Line] {
        &self.lines_to_insert
    }

    /// Boundary of the area enclosed by this insertion, walked lazily.
    ///
    /// Must be taken before the loop is spliced.
    #[must_use]
    pub fn loop_view<'a>(&'a self, outline: &'a LineLoop) -> LoopView<'a> {
        LoopView::new(self, outline)
    }

    /// Splice description for [`LineLoop::splice`].
    #[must_use]
    pub fn splice(&self) -> Splice<'_> {
        Splice {
            breakout: self.breakout_line,
            breakout_point: self.breakout_point,
            reinsertion: self.reinsertion_line,
            reinsertion_point: self.reinsertion_point,
            lines: &self.lines_to_insert,
        }
    }
}

/// Reconnection sense of a chain against a loop of the given orientation.
///
/// # Errors
///
/// Returns `ContractError::UndefinedTurn` for `Turn::None`.
pub fn is_start_to_end(loop_turn: Turn, chain_weight: i32, loop_weight: i32) -> Result<bool> {
    let delta = chain_weight - loop_weight;
    match loop_turn {
        Turn::Right => Ok(delta > 0),
        Turn::Left => Ok(delta < 0),
        Turn::None => Err(ContractError::UndefinedTurn.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    fn square(turn: Turn) -> LineLoop {
        LineLoop::rectangle(cell(0, 0), cell(4, 4), turn).unwrap()
    }

    fn detour() -> LineChain {
        LineChain::from_corners(&[cell(4, 2), cell(6, 2), cell(6, 6), cell(0, 6), cell(0, 4)])
            .unwrap()
    }

    #[test]
    fn clockwise_loop_reverses_detour() {
        let outline = square(Turn::Right);
        let chain = detour();
        let breakout = outline.find_line(cell(4, 2)).unwrap();
        let reinsertion = outline.find_line(cell(0, 4)).unwrap();
        let eval = InsertionEvaluation::evaluate(&outline, &chain, breakout, reinsertion).unwrap();

        assert!(!eval.is_start_to_end());
        assert_eq!(eval.breakout_line(), reinsertion);
        assert_eq!(eval.reinsertion_line(), breakout);
        assert_eq!(eval.breakout_point(), cell(0, 4));
        assert_eq!(eval.reinsertion_point(), cell(4, 2));
        assert_eq!(
            eval.lines_to_insert(),
            &[
                Line::new(cell(0, 4), cell(0, 6)),
                Line::new(cell(0, 6), cell(6, 6)),
                Line::new(cell(6, 6), cell(6, 2)),
                Line::new(cell(6, 2), cell(4, 2)),
            ]
        );
    }

    #[test]
    fn counter_clockwise_loop_keeps_detour() {
        let outline = square(Turn::Left);
        let chain = detour();
        let breakout = outline.find_line(cell(4, 2)).unwrap();
        let reinsertion = outline.find_line(cell(0, 4)).unwrap();
        let eval = InsertionEvaluation::evaluate(&outline, &chain, breakout, reinsertion).unwrap();

        assert!(eval.is_start_to_end());
        assert_eq!(eval.breakout_line(), breakout);
        assert_eq!(eval.lines_to_insert().len(), 4);
        assert_eq!(eval.lines_to_insert()[0].start, cell(4, 2));
    }

    #[test]
    fn drawing_direction_does_not_matter() {
        let outline = square(Turn::Right);
        let chain =
            LineChain::from_corners(&[cell(0, 4), cell(0, 6), cell(6, 6), cell(6, 2), cell(4, 2)])
                .unwrap();
        let breakout = outline.find_line(cell(0, 4)).unwrap();
        let reinsertion = outline.find_line(cell(4, 2)).unwrap();
        let eval = InsertionEvaluation::evaluate(&outline, &chain, breakout, reinsertion).unwrap();
        assert!(eval.is_start_to_end());
        assert_eq!(eval.lines_to_insert(), detour().reversed_lines().as_slice());
    }

    #[test]
    fn evaluation_is_deterministic() {
        let outline = square(Turn::Right);
        let chain = detour();
        let breakout = outline.find_line(cell(4, 2)).unwrap();
        let reinsertion = outline.find_line(cell(0, 4)).unwrap();
        let first = InsertionEvaluation::evaluate(&outline, &chain, breakout, reinsertion).unwrap();
        for _ in 0..3 {
            let again =
                InsertionEvaluation::evaluate(&outline, &chain, breakout, reinsertion).unwrap();
            assert_eq!(again.is_start_to_end(), first.is_start_to_end());
            assert_eq!(again.lines_to_insert(), first.lines_to_insert());
        }
    }

    #[test]
    fn corner_endpoints_resolve_to_the_replaced_line() {
        // Counter-clockwise square; the chain wraps its left side from the
        // top-left corner to the bottom-left corner.
        let outline = LineLoop::rectangle(cell(4, 4), cell(3, 3), Turn::Left).unwrap();
        let chain =
            LineChain::from_corners(&[cell(4, 7), cell(3, 7), cell(3, 4), cell(4, 4)]).unwrap();
        let top = outline.find_line(cell(5, 7)).unwrap();
        let bottom = outline.find_line(cell(5, 4)).unwrap();
        let left = outline.find_line(cell(4, 5)).unwrap();
        assert_eq!(outline.find_line(cell(4, 4)), Some(bottom));

        let eval = InsertionEvaluation::evaluate(&outline, &chain, top, bottom).unwrap();
        assert!(eval.is_start_to_end());
        assert_eq!(eval.breakout_line(), left);
        assert_eq!(eval.reinsertion_line(), left);
    }

    #[test]
    fn corner_reinsertion_on_clockwise_loop() {
        let outline = LineLoop::rectangle(cell(4, 4), cell(3, 3), Turn::Right).unwrap();
        let chain =
            LineChain::from_corners(&[cell(4, 7), cell(3, 7), cell(3, 4), cell(4, 4)]).unwrap();
        let top = outline.find_line(cell(5, 7)).unwrap();
        let bottom = outline.find_line(cell(5, 4)).unwrap();
        let corner = outline.find_line(cell(4, 4)).unwrap();
        assert_ne!(corner, bottom);

        let eval = InsertionEvaluation::evaluate(&outline, &chain, top, corner).unwrap();
        assert!(!eval.is_start_to_end());
        assert_eq!(eval.breakout_line(), bottom);
        assert_eq!(eval.reinsertion_line(), top);
        assert_eq!(eval.breakout_point(), cell(4, 4));
    }

    #[test]
    fn sense_table() {
        assert!(is_start_to_end(Turn::Right, 1, -2).unwrap());
        assert!(!is_start_to_end(Turn::Right, 2, 2).unwrap());
        assert!(is_start_to_end(Turn::Left, -3, -1).unwrap());
        assert!(!is_start_to_end(Turn::Left, 0, 0).unwrap());
        assert!(is_start_to_end(Turn::None, 1, 0).is_err());
    }

    #[test]
    fn rejects_endpoints_off_lines() {
        let outline = square(Turn::Right);
        let chain = detour();
        let breakout = outline.find_line(cell(4, 2)).unwrap();
        let reinsertion = outline.find_line(cell(0, 4)).unwrap();
        assert!(InsertionEvaluation::evaluate(&outline, &chain, reinsertion, reinsertion).is_err());
        assert!(InsertionEvaluation::evaluate(&outline, &chain, breakout, breakout).is_err());
        assert!(
            InsertionEvaluation::evaluate(&outline, &LineChain::new(cell(4, 2)), breakout, breakout)
                .is_err()
        );
    }
}
