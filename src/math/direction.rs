use super::Cell;

/// One of the four grid directions, or `None` for "no movement".
///
/// The variants after `None` are in counter-clockwise order with y pointing
/// up, which makes rotation a matter of index arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridDirection {
    #[default]
    None,
    Right,
    Up,
    Left,
    Down,
}

/// A quarter turn, or no turn at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Turn {
    #[default]
    None,
    /// Counter-clockwise.
    Left,
    /// Clockwise.
    Right,
}

/// Orientation of an axis-aligned segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl GridDirection {
    /// The four real directions in counter-clockwise order.
    pub const CARDINALS: [GridDirection; 4] = [
        GridDirection::Right,
        GridDirection::Up,
        GridDirection::Left,
        GridDirection::Down,
    ];

    /// Direction of travel from `from` to `to`.
    ///
    /// Equal cells and diagonal deltas have no grid direction.
    #[must_use]
    pub fn between(from: Cell, to: Cell) -> Self {
        let delta = to - from;
        match (delta.x.signum(), delta.y.signum()) {
            (1, 0) => Self::Right,
            (-1, 0) => Self::Left,
            (0, 1) => Self::Up,
            (0, -1) => Self::Down,
            _ => Self::None,
        }
    }

    /// Unit offset of one step in this direction.
    #[must_use]
    pub fn offset(self) -> Cell {
        match self {
            Self::None => Cell::zeros(),
            Self::Right => Cell::new(1, 0),
            Self::Up => Cell::new(0, 1),
            Self::Left => Cell::new(-1, 0),
            Self::Down => Cell::new(0, -1),
        }
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Down => Self::Up,
        }
    }

    #[must_use]
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::None => None,
            Self::Right | Self::Left => Some(Axis::Horizontal),
            Self::Up | Self::Down => Some(Axis::Vertical),
        }
    }

    #[must_use]
    pub fn is_horizontal(self) -> bool {
        self.axis() == Some(Axis::Horizontal)
    }

    #[must_use]
    pub fn is_vertical(self) -> bool {
        self.axis() == Some(Axis::Vertical)
    }

    /// Rotates this direction by a quarter turn.
    #[must_use]
    pub fn turned(self, turn: Turn) -> Self {
        let Some(index) = self.rotation_index() else {
            return self;
        };
        let steps = match turn {
            Turn::None => 0,
            Turn::Left => 1,
            Turn::Right => 3,
        };
        Self::CARDINALS[(index + steps) % 4]
    }

    /// The quarter turn that rotates `self` onto `to`.
    ///
    /// Straight continuation, reversal and any `None` operand all yield
    /// [`Turn::None`]; drawing and backtracking produce these pairs.
    #[must_use]
    pub fn turn_to(self, to: Self) -> Turn {
        match (self.rotation_index(), to.rotation_index()) {
            (Some(from), Some(to)) => match (to + 4 - from) % 4 {
                1 => Turn::Left,
                3 => Turn::Right,
                _ => Turn::None,
            },
            _ => Turn::None,
        }
    }

    fn rotation_index(self) -> Option<usize> {
        match self {
            Self::None => None,
            Self::Right => Some(0),
            Self::Up => Some(1),
            Self::Left => Some(2),
            Self::Down => Some(3),
        }
    }
}

impl Turn {
    /// +1 for a clockwise turn, -1 for counter-clockwise, 0 otherwise.
    #[must_use]
    pub fn clockwise_weight(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// Orientation implied by the sign of a clockwise weight.
    #[must_use]
    pub fn from_clockwise_weight(weight: i32) -> Self {
        match weight.signum() {
            1 => Self::Right,
            -1 => Self::Left,
            _ => Self::None,
        }
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}
