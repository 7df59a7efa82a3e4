use super::container::{LineContainer, LineId};
use super::line::Line;

/// Lazy walk over a half-open span of a [`LineContainer`].
///
/// Yields `(id, line)` pairs without collecting them. The walk stops at the
/// exclusive end or at an open chain end, whichever comes first.
#[derive(Debug, Clone)]
pub struct SpanIter<'a> {
    container: &'a LineContainer,
    current: Option<LineId>,
    end: Option<LineId>,
    forward: bool,
}

impl<'a> SpanIter<'a> {
    pub(crate) fn forward(
        container: &'a LineContainer,
        start: Option<LineId>,
        end: Option<LineId>,
    ) -> Self {
        Self {
            container,
            current: start,
            end,
            forward: true,
        }
    }

    pub(crate) fn backward(
        container: &'a LineContainer,
        start: Option<LineId>,
        end: Option<LineId>,
    ) -> Self {
        Self {
            container,
            current: start,
            end,
            forward: false,
        }
    }
}

impl Iterator for SpanIter<'_> {
    type Item = (LineId, Line);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.container.node(id).ok()?;
        let step = if self.forward {
            node.next
        } else {
            node.previous
        };
        self.current = step.filter(|&following| Some(following) != self.end);
        Some((id, node.line))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::container::ContainerKind;
    use super::*;
    use crate::math::Cell;

    fn chain() -> LineContainer {
        let mut container = LineContainer::new(ContainerKind::Chain);
        container
            .rebuild(&[
                Cell::new(0, 0),
                Cell::new(3, 0),
                Cell::new(3, 2),
                Cell::new(1, 2),
            ])
            .unwrap();
        container
    }

    #[test]
    fn chain_span_stops_at_open_end() {
        let container = chain();
        let head = container.head().unwrap();
        let ends: Vec<Cell> = container.span(head, None).map(|(_, l)| l.end).collect();
        assert_eq!(ends, vec![Cell::new(3, 0), Cell::new(3, 2), Cell::new(1, 2)]);
    }

    #[test]
    fn span_excludes_end() {
        let container = chain();
        let head = container.head().unwrap();
        let tail = container.tail().unwrap();
        assert_eq!(container.span(head, Some(tail)).count(), 2);
    }

    #[test]
    fn reverse_span() {
        let container = chain();
        let tail = container.tail().unwrap();
        let starts: Vec<Cell> = container.span_rev(tail, None).map(|(_, l)| l.start).collect();
        assert_eq!(starts, vec![Cell::new(3, 2), Cell::new(3, 0), Cell::new(0, 0)]);
    }
}
