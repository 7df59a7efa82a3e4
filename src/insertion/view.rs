use crate::lines::{Line, LineId, LineLoop};

use super::evaluation::InsertionEvaluation;

#[derive(Debug, Clone, Copy)]
enum ViewState {
    /// Yielding `lines_to_insert[index]`.
    Insertion(usize),
    /// About to leave the reinsertion point backward.
    ConnectionStart,
    /// Walking the replaced part of the old loop backward.
    Connection(LineId),
    Done,
}

/// Closed boundary of the area an insertion adds to a loop.
///
/// Yields the inserted lines, then the replaced stretch of the old loop
/// walked backward from the reinsertion point to the breakout point with
/// every piece reversed. Nothing is buffered; zero-length pieces are skipped.
/// The boundary has the same orientation as the loop.
#[derive(Debug, Clone)]
pub struct LoopView<'a> {
    evaluation: &'a InsertionEvaluation,
    outline: &'a LineLoop,
    state: ViewState,
}

impl<'a> LoopView<'a> {
    pub(crate) fn new(evaluation: &'a InsertionEvaluation, outline: &'a LineLoop) -> Self {
        Self {
            evaluation,
            outline,
            state: ViewState::Insertion(0),
        }
    }

    fn advance(&mut self) -> Option<Line> {
        let eval = self.evaluation;
        match self.state {
            ViewState::Insertion(index) => {
                if let Some(&line) = eval.lines_to_insert().get(index) {
                    self.state = ViewState::Insertion(index + 1);
                    Some(line)
                } else {
                    self.state = ViewState::ConnectionStart;
                    self.advance()
                }
            }
            ViewState::ConnectionStart => {
                let reinsertion = self.outline.line(eval.reinsertion_line()).ok()?;
                let q = eval.reinsertion_point();
                let p = eval.breakout_point();
                if eval.reinsertion_line() == eval.breakout_line() && reinsertion.precedes(p, q) {
                    self.state = ViewState::Done;
                    return Some(Line::new(q, p));
                }
                self.state = match self.outline.previous(eval.reinsertion_line()) {
                    Some(previous) => ViewState::Connection(previous),
                    None => ViewState::Done,
                };
                Some(Line::new(q, reinsertion.start))
            }
            ViewState::Connection(id) => {
                let line = self.outline.line(id).ok()?;
                if id == eval.breakout_line() {
                    self.state = ViewState::Done;
                    return Some(Line::new(line.end, eval.breakout_point()));
                }
                self.state = match self.outline.previous(id) {
                    Some(previous) => ViewState::Connection(previous),
                    None => ViewState::Done,
                };
                Some(line.reversed())
            }
            ViewState::Done => None,
        }
    }
}

impl Iterator for LoopView<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.advance()?;
            if line.start != line.end {
                return Some(line);
            }
        }
    }
}
