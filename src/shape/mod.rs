mod drawing_chain;
mod drawn_shape;

pub use drawing_chain::{DrawEvent, DrawingChain};
pub use drawn_shape::{BoundaryMove, DrawnShape, Insertion};

/// Parameters controlling how a shape maintains its outline.
#[derive(Debug, Clone, Copy)]
pub struct ShapeParams {
    /// Re-check circularity and the turn invariant after every insertion.
    pub validate_outline: bool,
    /// Compare the revealed quad area with the shoelace area of the
    /// inserted boundary before splicing.
    pub validate_area: bool,
    /// Join consecutive lines running the same way after a splice.
    pub merge_collinear: bool,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            validate_outline: cfg!(debug_assertions),
            validate_area: cfg!(debug_assertions),
            merge_collinear: true,
        }
    }
}

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
