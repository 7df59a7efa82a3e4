mod chain;
mod container;
mod line;
mod line_loop;
mod span;

pub use chain::{Extension, LineChain};
pub use container::{turn_weight, ContainerKind, LineContainer, LineId, LineNode};
pub use line::Line;
pub use line_loop::{LineLoop, Splice, FULL_TURN_WEIGHT};
pub use span::SpanIter;
