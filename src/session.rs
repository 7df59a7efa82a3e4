use tracing::{debug, warn};

use crate::error::{LineError, Result};
use crate::grid::GridBounds;
use crate::math::{Cell, GridDirection};
use crate::quads::Quad;
use crate::shape::{BoundaryMove, DrawEvent, DrawingChain, DrawnShape};

/// What one session step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepEvent {
    /// No direction requested and none to keep.
    Idle,
    /// Travelled along the outline.
    Moved,
    /// The move would enter the shape or leave the grid.
    Blocked,
    /// Left the outline and started drawing.
    BrokeOut,
    /// Extended or shortened the current drawing.
    Drawing,
    /// Backtracked onto the outline; the drawing is gone.
    Retracted,
    /// Ran into the drawing; the actor is back where it broke out.
    SelfCollision,
    /// Reconnected to the outline and revealed new area.
    Revealed { quads: Vec<Quad>, area: i64 },
}

/// The player cursor.
#[derive(Debug, Clone)]
pub struct Actor {
    position: Cell,
    direction: GridDirection,
    drawing: Option<DrawingChain>,
}

impl Actor {
    #[must_use]
    pub fn position(&self) -> Cell {
        self.position
    }

    /// Direction kept while no new one is requested.
    #[must_use]
    pub fn direction(&self) -> GridDirection {
        self.direction
    }

    #[must_use]
    pub fn drawing(&self) -> Option<&DrawingChain> {
        self.drawing.as_ref()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }
}

/// One level: the grid, the revealed shape and the actor moving over them.
#[derive(Debug, Clone)]
pub struct RevealSession {
    bounds: GridBounds,
    shape: DrawnShape,
    actor: Actor,
}

impl RevealSession {
    /// Places the actor on the shape's outline at `start`.
    ///
    /// # Errors
    ///
    /// Returns `LineError::LineNotFound` if `start` is not on the outline.
    pub fn new(bounds: GridBounds, shape: DrawnShape, start: Cell) -> Result<Self> {
        if !shape.is_on_outline(start) {
            return Err(LineError::LineNotFound.into());
        }
        Ok(Self {
            bounds,
            shape,
            actor: Actor {
                position: start,
                direction: GridDirection::None,
                drawing: None,
            },
        })
    }

    #[must_use]
    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    #[must_use]
    pub fn shape(&self) -> &DrawnShape {
        &self.shape
    }

    #[must_use]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Revealed fraction of the grid.
    #[must_use]
    pub fn coverage(&self) -> f64 {
        self.shape.coverage(&self.bounds)
    }

    /// Advances the actor by one cell.
    ///
    /// `GridDirection::None` keeps the current direction. At a grid corner
    /// the actor turns to follow the grid side instead of leaving the grid.
    ///
    /// # Errors
    ///
    /// Propagates insertion failures, after dropping the drawing and moving
    /// the actor back to where it broke out. Gameplay outcomes such as
    /// collisions are reported as [`StepEvent`] values.
    pub fn step(&mut self, requested: GridDirection) -> Result<StepEvent> {
        let direction = if requested == GridDirection::None {
            self.actor.direction
        } else {
            requested
        };
        if direction == GridDirection::None {
            return Ok(StepEvent::Idle);
        }
        let Some(direction) = self.steer(direction) else {
            self.actor.direction = GridDirection::None;
            return Ok(StepEvent::Blocked);
        };
        let target = self.actor.position + direction.offset();

        if self.actor.drawing.is_some() {
            self.actor.direction = direction;
            return self.draw(target);
        }

        match self.shape.boundary_move(self.actor.position, direction) {
            Some(BoundaryMove::Along) => {
                self.actor.position = target;
                self.actor.direction = direction;
                Ok(StepEvent::Moved)
            }
            Some(BoundaryMove::Outward(breakout)) => {
                debug!(
                    x = self.actor.position.x,
                    y = self.actor.position.y,
                    ?direction,
                    "breaking out"
                );
                self.actor.drawing = Some(DrawingChain::begin(self.actor.position, breakout));
                self.actor.direction = direction;
                let event = self.draw(target)?;
                Ok(if event == StepEvent::Drawing {
                    StepEvent::BrokeOut
                } else {
                    event
                })
            }
            Some(BoundaryMove::Inward) | None => {
                self.actor.direction = GridDirection::None;
                Ok(StepEvent::Blocked)
            }
        }
    }

    /// Keeps a move inside the grid, turning at corners.
    fn steer(&self, direction: GridDirection) -> Option<GridDirection> {
        let position = self.actor.position;
        if self.bounds.contains(position + direction.offset()) {
            return Some(direction);
        }
        let turned = self.bounds.corner(position)?.turn_inside(direction).ok()?;
        self.bounds
            .contains(position + turned.offset())
            .then_some(turned)
    }

    fn draw(&mut self, target: Cell) -> Result<StepEvent> {
        let Some(drawing) = self.actor.drawing.as_mut() else {
            return Ok(StepEvent::Blocked);
        };
        match drawing.advance(target, &self.shape)? {
            DrawEvent::Extended => {
                self.actor.position = target;
                Ok(StepEvent::Drawing)
            }
            DrawEvent::Retracted => {
                self.actor.position = target;
                self.actor.drawing = None;
                Ok(StepEvent::Retracted)
            }
            DrawEvent::SelfCollision => {
                self.actor.position = drawing.start_cell();
                self.actor.direction = GridDirection::None;
                self.actor.drawing = None;
                Ok(StepEvent::SelfCollision)
            }
            DrawEvent::Reconnected { reinsertion } => {
                let inserted = self
                    .shape
                    .insert(drawing.chain(), drawing.breakout(), reinsertion);
                // The chain already ends on the outline; it cannot be drawn
                // any further whether or not the insert went through.
                let start = drawing.start_cell();
                self.actor.drawing = None;
                self.actor.direction = GridDirection::None;
                match inserted {
                    Ok(insertion) => {
                        self.actor.position = target;
                        Ok(StepEvent::Revealed {
                            quads: insertion.quads,
                            area: insertion.area,
                        })
                    }
                    Err(error) => {
                        warn!(%error, x = start.x, y = start.y, "insert failed, drawing dropped");
                        self.actor.position = start;
                        Err(error)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::lines::{LineId, FULL_TURN_WEIGHT};
    use crate::math::polygon_2d::enclosed_area;
    use crate::math::Turn;
    use crate::shape::ShapeParams;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const MOVES: [GridDirection; 5] = [
        GridDirection::None,
        GridDirection::Right,
        GridDirection::Up,
        GridDirection::Left,
        GridDirection::Down,
    ];

    fn checked() -> ShapeParams {
        ShapeParams {
            validate_outline: true,
            validate_area: true,
            merge_collinear: true,
        }
    }

    fn assert_consistent(shape: &DrawnShape) {
        let outline = shape.outline();
        assert!(outline.validate().is_ok());
        assert_eq!(outline.clockwise_weight().abs(), FULL_TURN_WEIGHT);
        assert_eq!(shape.area(), enclosed_area(outline.lines()));
        let quads = shape.quads().quads();
        for (i, a) in quads.iter().enumerate() {
            for b in &quads[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    /// Runs `moves`, checking the shape after every reveal, and returns the
    /// revealed areas in order.
    fn play(session: &mut RevealSession, moves: &[GridDirection]) -> Vec<i64> {
        let mut revealed = Vec::new();
        for &direction in moves {
            if let StepEvent::Revealed { area, .. } = session.step(direction).unwrap() {
                assert_consistent(session.shape());
                revealed.push(area);
            }
        }
        revealed
    }

    fn cell(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    fn session(bottom_left: Cell, start: Cell) -> RevealSession {
        let shape =
            DrawnShape::rectangle(bottom_left, cell(4, 4), Turn::Right, ShapeParams::default())
                .unwrap();
        RevealSession::new(GridBounds::new(10, 10).unwrap(), shape, start).unwrap()
    }

    #[test]
    fn break_out_and_reveal() {
        let mut session = session(cell(2, 2), cell(2, 2));
        assert_eq!(session.step(GridDirection::Down).unwrap(), StepEvent::BrokeOut);
        assert_eq!(session.actor().position(), cell(2, 1));
        assert_eq!(session.step(GridDirection::Right).unwrap(), StepEvent::Drawing);
        assert_eq!(session.step(GridDirection::None).unwrap(), StepEvent::Drawing);
        assert_eq!(session.actor().position(), cell(4, 1));

        let StepEvent::Revealed { area, quads } = session.step(GridDirection::Up).unwrap() else {
            panic!("expected a reveal");
        };
        assert_eq!(area, 2);
        assert_eq!(quads, vec![Quad::new(cell(2, 1), cell(2, 1))]);
        assert_eq!(session.shape().area(), 18);
        assert_relative_eq!(session.coverage(), 0.18);
        assert_eq!(session.actor().position(), cell(4, 2));
        assert!(!session.actor().is_drawing());
        assert_eq!(session.step(GridDirection::None).unwrap(), StepEvent::Idle);
    }

    #[test]
    fn self_collision_resets_to_breakout() {
        let mut session = session(cell(2, 2), cell(2, 2));
        for direction in [
            GridDirection::Down,
            GridDirection::Down,
            GridDirection::Left,
            GridDirection::Up,
        ] {
            session.step(direction).unwrap();
        }
        assert_eq!(session.actor().position(), cell(1, 1));
        assert_eq!(
            session.step(GridDirection::Right).unwrap(),
            StepEvent::SelfCollision
        );
        assert_eq!(session.actor().position(), cell(2, 2));
        assert!(!session.actor().is_drawing());
        assert_eq!(session.shape().area(), 16);
    }

    #[test]
    fn backtracking_returns_to_outline() {
        let mut session = session(cell(2, 2), cell(4, 2));
        assert_eq!(session.step(GridDirection::Down).unwrap(), StepEvent::BrokeOut);
        assert_eq!(session.step(GridDirection::Up).unwrap(), StepEvent::Retracted);
        assert_eq!(session.actor().position(), cell(4, 2));
        assert!(!session.actor().is_drawing());
    }

    #[test]
    fn travel_along_and_blocked_inward() {
        let mut session = session(cell(2, 2), cell(2, 2));
        assert_eq!(session.step(GridDirection::Up).unwrap(), StepEvent::Moved);
        assert_eq!(session.step(GridDirection::None).unwrap(), StepEvent::Moved);
        assert_eq!(session.actor().position(), cell(2, 4));
        assert_eq!(session.step(GridDirection::Right).unwrap(), StepEvent::Blocked);
        assert_eq!(session.step(GridDirection::None).unwrap(), StepEvent::Idle);
    }

    #[test]
    fn turns_at_grid_corner() {
        let mut session = session(cell(0, 0), cell(0, 0));
        assert_eq!(session.step(GridDirection::Left).unwrap(), StepEvent::Moved);
        assert_eq!(session.actor().position(), cell(0, 1));
        assert_eq!(session.actor().direction(), GridDirection::Up);
    }

    #[test]
    fn failed_insert_drops_the_drawing() {
        let mut session = session(cell(2, 2), cell(4, 2));
        // The breakout id is not part of the outline, so the insert fails.
        session.actor.drawing = Some(DrawingChain::begin(cell(4, 2), LineId::default()));
        assert_eq!(session.step(GridDirection::Down).unwrap(), StepEvent::Drawing);
        assert_eq!(session.step(GridDirection::Right).unwrap(), StepEvent::Drawing);
        assert!(session.step(GridDirection::Up).is_err());

        assert!(!session.actor().is_drawing());
        assert_eq!(session.actor().position(), cell(4, 2));
        assert_eq!(session.shape().area(), 16);
        assert_eq!(session.step(GridDirection::Right).unwrap(), StepEvent::Moved);
        assert_eq!(session.actor().position(), cell(5, 2));
    }

    #[test]
    fn successive_reveals_keep_the_shape_consistent() {
        use GridDirection::{Down, Left, None, Right, Up};
        let mut session = session(cell(2, 2), cell(2, 2));
        let moves = [
            // Below the bottom-left corner.
            Down, Right, Right, Up,
            // Under the new step in the bottom side.
            Right, Down, Down, Left, Left, Up,
            // Up the left side and over the top-left corner.
            Left, Up, None, None, None, None, Up, Right, None, Down,
            // Past the top-right corner, back in at the bottom-right one.
            Right, None, Right, Down, None, None, None, Left,
        ];
        assert_eq!(play(&mut session, &moves), vec![2, 3, 2, 4]);
        assert_eq!(session.shape().area(), 27);
        assert_eq!(session.actor().position(), cell(6, 2));
    }

    #[test]
    fn corner_reconnection_in_a_session() {
        use GridDirection::{Down, Left, Right};
        let shape = DrawnShape::rectangle(cell(4, 4), cell(3, 3), Turn::Left, checked()).unwrap();
        let mut session =
            RevealSession::new(GridBounds::new(12, 12).unwrap(), shape, cell(4, 7)).unwrap();
        let revealed = play(&mut session, &[Left, Down, Down, Down, Right]);
        assert_eq!(revealed, vec![3]);
        assert_eq!(session.shape().area(), 12);
        assert_eq!(session.actor().position(), cell(4, 4));
    }

    #[test]
    fn seeded_random_walks() {
        let mut reveals = 0;
        for seed in 0..200_u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let turn = if seed % 2 == 0 { Turn::Right } else { Turn::Left };
            let shape = DrawnShape::rectangle(cell(4, 4), cell(3, 3), turn, checked()).unwrap();
            let mut session =
                RevealSession::new(GridBounds::new(12, 12).unwrap(), shape, cell(4, 4)).unwrap();
            let moves: Vec<GridDirection> = (0..300)
                .map(|_| MOVES[rng.random_range(0..MOVES.len())])
                .collect();
            reveals += play(&mut session, &moves).len();
            assert_consistent(session.shape());
        }
        assert!(reveals > 0);
    }

    #[test]
    fn start_must_be_on_outline() {
        let shape =
            DrawnShape::rectangle(cell(2, 2), cell(4, 4), Turn::Right, ShapeParams::default())
                .unwrap();
        assert!(RevealSession::new(GridBounds::new(10, 10).unwrap(), shape, cell(3, 3)).is_err());
    }
}
