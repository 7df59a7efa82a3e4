pub mod direction;
pub mod polygon_2d;

pub use direction::{Axis, GridDirection, Turn};

/// Integer grid intersection point.
pub type Cell = nalgebra::Vector2<i32>;

/// Scene-space position of a cell.
pub type WorldPoint = nalgebra::Point2<f64>;
