//! Stroke reduction: adaptive resampling followed by path simplification.
//!
//! Applied exactly once, after a pencil gesture completes and before the
//! stroke is stored, chunked or broadcast. Live capture never pays for this.

use kurbo::Point;

use crate::shapes::point_to_segment_dist;

/// Minimum spacing between kept points during resampling, in canvas pixels.
pub const MIN_SAMPLE_DISTANCE: f64 = 2.0;

/// Ramer-Douglas-Peucker deviation tolerance, in canvas pixels.
pub const SIMPLIFY_TOLERANCE: f64 = 1.5;

/// Drop points that sit closer than `min_distance` to the previously kept
/// point. The first point is always kept; so is the final one, even when it
/// lands inside the spacing threshold, because it pins where the stroke ended.
pub fn resample(points: &[Point], min_distance: f64) -> Vec<Point> {
    if points.len() <= 1 {
        return points.to_vec();
    }

    let mut kept = Vec::with_capacity(points.len());
    kept.push(points[0]);
    let mut last = points[0];

    for (i, point) in points.iter().enumerate().skip(1) {
        let dist = (*point - last).hypot();
        if dist >= min_distance || i == points.len() - 1 {
            kept.push(*point);
            last = *point;
        }
    }

    kept
}

/// Ramer-Douglas-Peucker line simplification.
///
/// Output is a subsequence of the input with both endpoints preserved.
/// Deviation is measured against the chord as a segment, so far-out points
/// beyond either endpoint still count their true distance.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Find point with maximum distance from the chord between first and last
    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_index = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = point_to_segment_dist(*point, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > tolerance {
        // Recursively simplify both halves
        let mut left = simplify(&points[..=max_index], tolerance);
        let right = simplify(&points[max_index..], tolerance);

        // Combine, removing the duplicated point at the junction
        left.pop();
        left.extend(right);
        left
    } else {
        // All points between first and last can be removed
        vec![first, last]
    }
}

/// Full reduction pipeline with the default thresholds: resample, then
/// simplify. Strokes of two points or fewer pass through untouched.
pub fn reduce_stroke(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let resampled = resample(points, MIN_SAMPLE_DISTANCE);
    simplify(&resampled, SIMPLIFY_TOLERANCE)
}
