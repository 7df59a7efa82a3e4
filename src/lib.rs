pub mod error;
pub mod grid;
pub mod insertion;
pub mod lines;
pub mod math;
pub mod quads;
pub mod session;
pub mod shape;

pub use error::{Result, RevealError};
