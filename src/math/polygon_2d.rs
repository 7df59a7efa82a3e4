use super::Cell;
use crate::lines::Line;

/// Twice the signed area enclosed by a closed sequence of lines.
///
/// Each line contributes its own shoelace term, so the sequence only has to
/// be closed as a whole; degenerate or collinear pieces are harmless.
pub fn line_area_doubled<I>(lines: I) -> i64
where
    I: IntoIterator<Item = Line>,
{
    lines
        .into_iter()
        .map(|line| cross(line.start, line.end))
        .sum()
}

/// Number of unit cells enclosed by a closed sequence of lines.
pub fn enclosed_area<I>(lines: I) -> i64
where
    I: IntoIterator<Item = Line>,
{
    line_area_doubled(lines).abs() / 2
}

fn cross(a: Cell, b: Cell) -> i64 {
    i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y)
}
