//! Douglas-Peucker polyline simplification.
//!
//! Hosts that feed dense polylines to the renderer can thin them first so
//! the sketchy perturbation works on visually meaningful vertices rather
//! than every sample point.

use crate::geometry::Point;
use crate::segment::Segment;

/// Simplifies a polyline with the Douglas-Peucker algorithm. The greater
/// the tolerance, the greater the simplification. Endpoints are always
/// retained; consecutive duplicates are suppressed.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut kept = Vec::new();
    douglas_peucker(points, 0, points.len() - 1, tolerance, &mut kept);
    kept
}

fn push_unless_duplicate(kept: &mut Vec<Point>, p: Point) {
    if kept.last() != Some(&p) {
        kept.push(p);
    }
}

fn douglas_peucker(points: &[Point], start: usize, end: usize, tolerance: f64, kept: &mut Vec<Point>) {
    if end - start < 2 {
        // Adjacent points: keep both.
        push_unless_duplicate(kept, points[start]);
        push_unless_duplicate(kept, points[end]);
        return;
    }

    let seg = Segment::new(points[start].x, points[start].y, points[end].x, points[end].y);

    let mut max_dist = 0.0;
    let mut furthest = 0;
    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        let dist = seg.distance_to(p.x, p.y);
        if dist > max_dist {
            max_dist = dist;
            furthest = i;
        }
    }

    if max_dist > tolerance {
        douglas_peucker(points, start, furthest, tolerance, kept);
        douglas_peucker(points, furthest, end, tolerance, kept);
    } else {
        push_unless_duplicate(kept, points[start]);
        push_unless_duplicate(kept, points[end]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_collapse() {
        let points: Vec<Point> = (0..=10).map(|i| Point::new(i as f64, 0.0)).collect();
        let simplified = simplify(&points, 0.5);
        assert_eq!(simplified, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    }

    #[test]
    fn corner_survives() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 10.0),
        ];
        let simplified = simplify(&points, 0.5);
        assert_eq!(
            simplified,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0)
            ]
        );
    }

    #[test]
    fn tolerance_controls_detail() {
        let points: Vec<Point> = (0..=20)
            .map(|i| Point::new(i as f64, if i % 2 == 0 { 0.0 } else { 2.0 }))
            .collect();
        let fine = simplify(&points, 0.1);
        let coarse = simplify(&points, 5.0);
        assert!(fine.len() > coarse.len());
        assert_eq!(coarse, vec![points[0], points[20]]);
    }

    #[test]
    fn short_inputs_pass_through() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(simplify(&points, 1.0), points);
        assert!(simplify(&[], 1.0).is_empty());
    }

    #[test]
    fn endpoints_always_kept() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 8.0),
            Point::new(6.0, -4.0),
            Point::new(9.0, 1.0),
        ];
        let simplified = simplify(&points, 0.01);
        assert_eq!(simplified.first(), Some(&points[0]));
        assert_eq!(simplified.last(), Some(&points[3]));
    }
}
