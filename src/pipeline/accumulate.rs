use crate::pipeline::types::Point;

/// Running total of an incremental series.
pub fn cumulate(points: &[Point]) -> Vec<Point> {
    points
        .iter()
        .scan(0.0, |total, p| {
            *total += p.y;
            Some(Point::new(p.x, *total))
        })
        .collect()
}
