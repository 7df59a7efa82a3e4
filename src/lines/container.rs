use slotmap::SlotMap;

use crate::error::{LineError, Result};
use crate::grid::GridBounds;
use crate::math::Cell;

use super::line::Line;
use super::span::SpanIter;

slotmap::new_key_type! {
    /// Unique identifier for a line within its container.
    pub struct LineId;
}

/// Whether a container is an open polyline or a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Chain,
    Loop,
}

/// A line together with its links inside a container.
#[derive(Debug, Clone)]
pub struct LineNode {
    pub line: Line,
    pub next: Option<LineId>,
    pub previous: Option<LineId>,
}

/// Arena that owns a doubly-linked sequence of lines.
///
/// Nodes reference each other through [`LineId`] keys. For a loop the links
/// are circular in both directions; for a chain the head has no `previous`
/// and the tail has no `next`.
#[derive(Debug, Clone)]
pub struct LineContainer {
    nodes: SlotMap<LineId, LineNode>,
    head: Option<LineId>,
    tail: Option<LineId>,
    kind: ContainerKind,
}

impl LineContainer {
    #[must_use]
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            head: None,
            tail: None,
            kind,
        }
    }

    #[must_use]
    pub fn is_loop(&self) -> bool {
        self.kind == ContainerKind::Loop
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn head(&self) -> Option<LineId> {
        self.head
    }

    #[must_use]
    pub fn tail(&self) -> Option<LineId> {
        self.tail
    }

    /// Returns the node, or an error if it is not part of this container.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` for a stale or foreign id.
    pub fn node(&self, id: LineId) -> Result<&LineNode> {
        self.nodes.get(id).ok_or_else(|| LineError::LineNotFound.into())
    }

    /// Returns the line stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` for a stale or foreign id.
    pub fn line(&self, id: LineId) -> Result<Line> {
        self.node(id).map(|node| node.line)
    }

    /// Replaces the line stored under `id`, keeping its links.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` for a stale or foreign id.
    pub fn set_line(&mut self, id: LineId, line: Line) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(LineError::LineNotFound)?;
        node.line = line;
        Ok(())
    }

    #[must_use]
    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.nodes.get(id).and_then(|node| node.next)
    }

    #[must_use]
    pub fn previous(&self, id: LineId) -> Option<LineId> {
        self.nodes.get(id).and_then(|node| node.previous)
    }

    /// Forward walk over `[start, end)`.
    ///
    /// `end == None` runs to the open end of a chain. Passing `start` as the
    /// end of a loop walks the whole loop once.
    #[must_use]
    pub fn span(&self, start: LineId, end: Option<LineId>) -> SpanIter<'_> {
        SpanIter::forward(self, Some(start), end)
    }

    /// Backward walk over `[start, end)` following `previous` links.
    #[must_use]
    pub fn span_rev(&self, start: LineId, end: Option<LineId>) -> SpanIter<'_> {
        SpanIter::backward(self, Some(start), end)
    }

    /// Walks every line once, head first.
    #[must_use]
    pub fn iter(&self) -> SpanIter<'_> {
        SpanIter::forward(self, self.head, self.exclusive_end())
    }

    /// Walks every line once, tail first.
    #[must_use]
    pub fn iter_rev(&self) -> SpanIter<'_> {
        let end = if self.is_loop() { self.tail } else { None };
        SpanIter::backward(self, self.tail, end)
    }

    /// Copies of every line, head first.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        self.iter().map(|(_, line)| line)
    }

    /// Sentinel that stops a whole-container walk: the head for a loop, the
    /// open end for a chain.
    #[must_use]
    pub fn exclusive_end(&self) -> Option<LineId> {
        if self.is_loop() {
            self.head
        } else {
            None
        }
    }

    /// Clockwise weight of the walk from `from` to `to`, both inclusive.
    ///
    /// The outgoing turn of `to` is not counted.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` if either id is not in the container.
    pub fn span_weight(&self, from: LineId, to: LineId) -> Result<i32> {
        self.node(from)?;
        self.node(to)?;
        if from == to {
            return Ok(0);
        }
        Ok(turn_weight(self.span(from, self.next(to))))
    }

    /// Sum of clockwise weights of every corner.
    ///
    /// For a loop the corner joining tail and head is included.
    #[must_use]
    pub fn clockwise_weight(&self) -> i32 {
        let mut weight = turn_weight(self.iter());
        if self.is_loop() {
            if let (Some(tail), Some(head)) = (self.tail, self.head) {
                if let (Some(a), Some(b)) = (self.nodes.get(tail), self.nodes.get(head)) {
                    weight += a.line.turn_to(&b.line).clockwise_weight();
                }
            }
        }
        weight
    }

    /// Appends a line after the tail and returns its id.
    pub fn push_back(&mut self, line: Line) -> LineId {
        match self.tail {
            Some(tail) => self.link_after(tail, line),
            None => {
                let id = self.nodes.insert(LineNode {
                    line,
                    next: None,
                    previous: None,
                });
                if self.is_loop() {
                    self.nodes[id].next = Some(id);
                    self.nodes[id].previous = Some(id);
                }
                self.head = Some(id);
                self.tail = Some(id);
                id
            }
        }
    }

    /// Inserts a line directly after `after` and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` if `after` is not in the container.
    pub fn insert_after(&mut self, after: LineId, line: Line) -> Result<LineId> {
        self.node(after)?;
        Ok(self.link_after(after, line))
    }

    fn link_after(&mut self, after: LineId, line: Line) -> LineId {
        let next = self.nodes[after].next;
        let id = self.nodes.insert(LineNode {
            line,
            next,
            previous: Some(after),
        });
        self.nodes[after].next = Some(id);
        match next {
            Some(next) => self.nodes[next].previous = Some(id),
            None => self.tail = Some(id),
        }
        if self.is_loop() && self.tail == Some(after) {
            self.tail = Some(id);
        }
        id
    }

    /// Unlinks and removes a line, returning it.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` if `id` is not in the container.
    pub fn remove(&mut self, id: LineId) -> Result<Line> {
        let node = self.nodes.remove(id).ok_or(LineError::LineNotFound)?;
        self.relink_without(id, &node);
        Ok(node.line)
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// First line containing `cell`, endpoints included.
    #[must_use]
    pub fn find_containing(&self, cell: Cell) -> Option<LineId> {
        self.iter()
            .find(|(_, line)| line.contains_inclusive(cell))
            .map(|(id, _)| id)
    }

    /// Rebuilds the container from a corner list.
    ///
    /// Repeated corners are skipped. A loop is closed from the last corner
    /// back to the first.
    ///
    /// # Errors
    ///
    /// Returns `LineError::Diagonal` if two consecutive corners differ on both
    /// axes. The container is left empty in that case.
    pub fn rebuild(&mut self, corners: &[Cell]) -> Result<()> {
        self.clear();
        let closing = if self.is_loop() { corners.first() } else { None };
        let mut iter = corners.iter().chain(closing);
        let Some(&first) = iter.next() else {
            return Ok(());
        };
        let mut previous = first;
        for &corner in iter {
            if corner == previous {
                continue;
            }
            let line = Line::new(previous, corner);
            if line.is_degenerate() {
                self.clear();
                return Err(LineError::Diagonal {
                    start: previous,
                    end: corner,
                }
                .into());
            }
            self.push_back(line);
            previous = corner;
        }
        Ok(())
    }

    /// Corner list of the container: every line start, plus the final end of
    /// a chain.
    #[must_use]
    pub fn corners(&self) -> Vec<Cell> {
        let mut corners: Vec<Cell> = self.lines().map(|line| line.start).collect();
        if !self.is_loop() {
            if let Some(last) = self.tail.and_then(|tail| self.nodes.get(tail)) {
                corners.push(last.line.end);
            }
        }
        corners
    }

    /// Clamps every endpoint into `bounds` and drops lines that collapse.
    pub fn clamp(&mut self, bounds: &GridBounds) {
        let ids: Vec<LineId> = self.iter().map(|(id, _)| id).collect();
        for id in ids {
            let node = &mut self.nodes[id];
            node.line = Line::new(bounds.clamp(node.line.start), bounds.clamp(node.line.end));
        }
        self.remove_degenerate();
    }

    /// Removes every zero-length line, reconnecting its neighbours.
    pub fn remove_degenerate(&mut self) {
        let degenerate: Vec<LineId> = self
            .iter()
            .filter(|(_, line)| line.start == line.end)
            .map(|(id, _)| id)
            .collect();
        for id in degenerate {
            if let Some(node) = self.nodes.remove(id) {
                self.relink_without(id, &node);
            }
        }
    }

    fn relink_without(&mut self, id: LineId, node: &LineNode) {
        if self.nodes.is_empty() {
            self.head = None;
            self.tail = None;
            return;
        }
        if let Some(previous) = node.previous {
            self.nodes[previous].next = node.next;
        }
        if let Some(next) = node.next {
            self.nodes[next].previous = node.previous;
        }
        if self.head == Some(id) {
            self.head = node.next;
        }
        if self.tail == Some(id) {
            self.tail = node.previous;
        }
    }

    /// Merges consecutive lines running in the same direction.
    pub fn merge_collinear(&mut self) {
        loop {
            let merge = self.iter().find_map(|(id, line)| {
                let next = self.next(id).filter(|&next| next != id)?;
                let next_line = self.nodes.get(next)?.line;
                (line.direction() == next_line.direction()).then_some((id, next, next_line.end))
            });
            let Some((id, next, end)) = merge else {
                break;
            };
            self.nodes[id].line.end = end;
            if let Some(node) = self.nodes.remove(next) {
                self.relink_without(next, &node);
            }
        }
    }
}

/// Clockwise weight of consecutive line pairs in a walk.
pub fn turn_weight<I>(lines: I) -> i32
where
    I: IntoIterator<Item = (LineId, Line)>,
{
    let mut weight = 0;
    let mut previous: Option<Line> = None;
    for (_, line) in lines {
        if let Some(previous) = previous {
            weight += previous.turn_to(&line).clockwise_weight();
        }
        previous = Some(line);
    }
    weight
}
