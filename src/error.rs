use thiserror::Error;

use crate::grid::GridCorner;
use crate::math::direction::{GridDirection, Turn};
use crate::math::Cell;

/// Top-level error type for the reveal engine.
#[derive(Debug, Error)]
pub enum RevealError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Line(#[from] LineError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Caller errors: an argument outside the declared domain of an operation.
///
/// These point at a bug in the orchestration that produced the arguments and
/// are never coerced into a fallback value.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("loop turn is undefined")]
    UndefinedTurn,

    #[error("moving {direction:?} does not approach the {corner:?} corner along a grid side")]
    NotACornerApproach {
        direction: GridDirection,
        corner: GridCorner,
    },

    #[error("chain start ({}, {}) is not on the breakout line", .0.x, .0.y)]
    ChainStartOffBreakout(Cell),

    #[error("chain end ({}, {}) is not on the reinsertion line", .0.x, .0.y)]
    ChainEndOffReinsertion(Cell),

    #[error("chain has no lines")]
    EmptyChain,

    #[error("chain starts and ends at ({}, {})", .0.x, .0.y)]
    ClosedChain(Cell),

    #[error("first curtain event at row {row} is a closing line")]
    ClosingBeforeOpening { row: i32 },

    #[error("closing line [{left}, {right}) at row {row} is not covered by an open curtain")]
    UnmatchedClosing { left: i32, right: i32, row: i32 },

    #[error("opening line [{left}, {right}) at row {row} overlaps an open curtain")]
    OverlappingOpening { left: i32, right: i32, row: i32 },

    #[error("invalid grid size {width}x{height}")]
    InvalidGridSize { width: i32, height: i32 },

    #[error("turn {turn:?} cannot orient a loop")]
    InvalidOrientation { turn: Turn },
}

/// Errors raised by the line containers.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("line not found in container")]
    LineNotFound,

    #[error("diagonal line from ({}, {}) to ({}, {})", .start.x, .start.y, .end.x, .end.y)]
    Diagonal { start: Cell, end: Cell },

    #[error("zero-length line at ({}, {})", .0.x, .0.y)]
    ZeroLength(Cell),

    #[error("a loop needs at least {required} corners, got {actual}")]
    TooFewCorners { required: usize, actual: usize },
}

/// Geometric invariants that failed an explicit validation pass.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("loop clockwise weight is {actual}, expected {expected}")]
    TurnWeight { expected: i32, actual: i32 },

    #[error("loop does not return to its head after {steps} steps over {len} lines")]
    NotCircular { steps: usize, len: usize },

    #[error("line ending at ({}, {}) does not connect to its successor", .0.x, .0.y)]
    Disconnected(Cell),

    #[error("quads cover {quads} cells but the boundary encloses {enclosed}")]
    AreaMismatch { quads: i64, enclosed: i64 },
}

/// Convenience type alias for results using [`RevealError`].
pub type Result<T> = std::result::Result<T, RevealError>;
