use tracing::debug;

use crate::pipeline::types::Point;

/// Converts a cumulative series into day-over-day increments.
///
/// The first point has no predecessor and never produces an increment. Deltas
/// that are NaN, because either side is missing, are left out so the output
/// has a gap at that date rather than a zero.
pub fn to_incremental(points: &[Point]) -> Vec<Point> {
    let deltas: Vec<Point> = points
        .windows(2)
        .map(|pair| Point::new(pair[1].x, pair[1].y - pair[0].y))
        .filter(|p| !p.y.is_nan())
        .collect();

    let dropped = points.len().saturating_sub(1) - deltas.len();
    if dropped > 0 {
        debug!(dropped, "Skipped increments with missing values");
    }

    deltas
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<Point> {
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| Point::new(i as i64, y))
            .collect()
    }

    #[test]
    fn test_to_incremental_basic() {
        let input = points(&[10.0, 15.0, 15.0, 20.0]);
        let output = to_incremental(&input);

        assert_eq!(
            output,
            vec![Point::new(1, 5.0), Point::new(2, 0.0), Point::new(3, 5.0)]
        );
    }

    #[test]
    fn test_to_incremental_empty_and_single() {
        assert!(to_incremental(&[]).is_empty());
        assert!(to_incremental(&points(&[42.0])).is_empty());
    }

    #[test]
    fn test_to_incremental_length_law() {
        for n in 1..10 {
            let input = points(&(0..n).map(|v| (v * v) as f64).collect::<Vec<_>>());
            let output = to_incremental(&input);

            assert!(output.len() <= n - 1);
            assert!(output.iter().all(|p| p.x != 0));
        }
    }

    #[test]
    fn test_to_incremental_drops_nan_deltas() {
        let input = points(&[10.0, f64::NAN, 15.0, 18.0]);
        let output = to_incremental(&input);

        // both deltas touching the missing value are gone
        assert_eq!(output, vec![Point::new(3, 3.0)]);
    }

    #[test]
    fn test_to_incremental_keeps_negative_corrections() {
        let input = points(&[10.0, 8.0]);
        assert_eq!(to_incremental(&input), vec![Point::new(1, -2.0)]);
    }
}
