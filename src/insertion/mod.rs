mod evaluation;
mod view;

pub use evaluation::{is_start_to_end, InsertionEvaluation};
pub use view::LoopView;
