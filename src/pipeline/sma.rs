use std::num::NonZeroUsize;

use crate::pipeline::types::Point;

/// Window used for the smoothed chart lines.
pub const WEEK: NonZeroUsize = match NonZeroUsize::new(7) {
    Some(window) => window,
    None => panic!("window must be non-zero"),
};

/// Trailing simple moving average over at most `window` points.
///
/// The sum is maintained incrementally. Until `window` points have been seen
/// the divisor is the number of points so far, so early values are averages
/// of a partial window. Values are rounded to one decimal place.
///
/// The output has the same length and x-values as `points`.
pub fn sma(points: &[Point], window: NonZeroUsize) -> Vec<Point> {
    let window = window.get();
    let mut result = Vec::with_capacity(points.len());
    let mut total = 0.0;
    let mut count = 0usize;
    let mut oldest = 0usize;

    for point in points {
        total += point.y;
        if count == window {
            total -= points[oldest].y;
            oldest += 1;
        } else {
            count += 1;
        }
        result.push(Point::new(point.x, round_tenth(total / count as f64)));
    }

    result
}

/// Rounds half up to one decimal place.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
