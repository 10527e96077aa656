//! Catmull-Rom curve evaluation and flattening.
//!
//! Curved vertex runs are interpreted as Catmull-Rom splines: each window
//! of four consecutive control points draws the span between the middle
//! two. For stroking, windows are converted to cubic Béziers and
//! flattened with lyon_geom; for filling, the straight-line approximation
//! uses an explicit step size that grows coarser with roughness.

use lyon_geom::{CubicBezierSegment, point};

use crate::geometry::{Point, Point3};
use crate::rng::Jitter;

/// Tolerance for curve flattening. Lower = more points, smoother curves.
pub(crate) const CURVE_TOLERANCE: f64 = 0.1;

/// Evaluates the Catmull-Rom basis through p0..p3 at parameter `t`,
/// tracing the span from `p1` (t = 0) to `p2` (t = 1).
pub fn catmull_rom_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let basis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point::new(
        basis(p0.x, p1.x, p2.x, p3.x),
        basis(p0.y, p1.y, p2.y, p3.y),
    )
}

/// 3D variant of [`catmull_rom_point`].
pub fn catmull_rom_point3(p0: Point3, p1: Point3, p2: Point3, p3: Point3, t: f64) -> Point3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let basis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point3::new(
        basis(p0.x, p1.x, p2.x, p3.x),
        basis(p0.y, p1.y, p2.y, p3.y),
        basis(p0.z, p1.z, p2.z, p3.z),
    )
}

/// Converts one Catmull-Rom window to the equivalent cubic Bézier segment
/// over the p1..p2 span.
pub fn catmull_rom_to_bezier(p0: Point, p1: Point, p2: Point, p3: Point) -> CubicBezierSegment<f64> {
    CubicBezierSegment {
        from: point(p1.x, p1.y),
        ctrl1: point(p1.x + (p2.x - p0.x) / 6.0, p1.y + (p2.y - p0.y) / 6.0),
        ctrl2: point(p2.x - (p3.x - p1.x) / 6.0, p2.y - (p3.y - p1.y) / 6.0),
        to: point(p2.x, p2.y),
    }
}

/// Flattens one Catmull-Rom window into `out`, starting at `p1` and
/// ending at `p2`.
pub fn flatten_window(p0: Point, p1: Point, p2: Point, p3: Point, out: &mut Vec<Point>) {
    out.push(p1);
    let bezier = catmull_rom_to_bezier(p0, p1, p2, p3);
    bezier.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
        out.push(Point::new(segment.to.x, segment.to.y));
    });
}

/// Flattens a whole Catmull-Rom control chain. The first and last control
/// points act as guides only; the traced path runs from `ctrl[1]` to
/// `ctrl[n-2]`.
pub fn flatten_chain(ctrl: &[Point], out: &mut Vec<Point>) {
    if ctrl.len() < 4 {
        return;
    }
    out.push(ctrl[1]);
    for window in ctrl.windows(4) {
        let bezier = catmull_rom_to_bezier(window[0], window[1], window[2], window[3]);
        bezier.for_each_flattened(CURVE_TOLERANCE, &mut |segment| {
            out.push(Point::new(segment.to.x, segment.to.y));
        });
    }
}

/// Flattens one 3D Catmull-Rom window by uniform sampling, with a sample
/// count proportional to the span's chord length.
pub fn flatten_window3(p0: Point3, p1: Point3, p2: Point3, p3: Point3, out: &mut Vec<Point3>) {
    let chord = Point3::new(p2.x - p1.x, p2.y - p1.y, p2.z - p1.z).magnitude();
    let steps = ((chord / 2.0).ceil() as usize).clamp(4, 64);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        out.push(catmull_rom_point3(p0, p1, p2, p3, t));
    }
}

/// Builds a straight-line approximation of a vertex sequence whose
/// entries are flagged straight (`false`) or curve (`true`) vertices.
///
/// Straight vertices pass through unchanged. Each curve vertex that
/// completes a 4-point window contributes interpolated points at
/// `step = (25 + 300*roughness) / dist_sq` parameter increments, with the
/// window corners jittered by up to ±2 units (scaled by roughness) so the
/// fill boundary matches the sketchy stroke that will be drawn over it.
pub fn flatten_for_fill(
    vertices: &[(Point, bool)],
    roughness: f64,
    jitter: &mut Jitter,
) -> Vec<Point> {
    let mut coords: Vec<Point> = Vec::with_capacity(vertices.len());
    let mut windows: Vec<Point> = Vec::with_capacity(vertices.len());

    for (i, &(vertex, is_curve)) in vertices.iter().enumerate() {
        windows.push(Point::new(
            vertex.x + jitter.offset(roughness, -2.0, 2.0),
            vertex.y + jitter.offset(roughness, -2.0, 2.0),
        ));

        if !is_curve {
            coords.push(vertex);
        } else if i >= 3 {
            let (p0, p1, p2, p3) = (windows[i - 3], windows[i - 2], windows[i - 1], windows[i]);
            let dist_sq = p1.dist_sq(p2);
            let step = ((25.0 + 300.0 * roughness) / dist_sq).max(1e-3);

            let mut t = 0.0;
            while t < 1.0 {
                coords.push(catmull_rom_point(p0, p1, p2, p3, t));
                t += step;
            }
        }
    }

    coords
}
