//! Sketchy double-stroke line synthesis.
//!
//! A straight line becomes two overlapping perturbed passes: one at the
//! full random offset and one at half, diverging from a randomized point
//! 20-40% along the line and bowed away from the straight path at the
//! midpoint. Drawing both passes gives the characteristic hand-drawn
//! double-stroke appearance.

use crate::curve;
use crate::geometry::{Point, Point3};
use crate::rng::Jitter;

/// One pass of a sketchy line: a straight start vertex, a four-point
/// Catmull-Rom control window tracing the bowed body, and a straight end
/// vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchStroke {
    pub start: Point,
    pub ctrl: [Point; 4],
    pub end: Point,
}

impl SketchStroke {
    /// Flattens the stroke to a drawable polyline.
    pub fn to_polyline(&self) -> Vec<Point> {
        let mut points = vec![self.start];
        curve::flatten_window(
            self.ctrl[0],
            self.ctrl[1],
            self.ctrl[2],
            self.ctrl[3],
            &mut points,
        );
        points.push(self.end);
        points
    }
}

/// 3D counterpart of [`SketchStroke`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchStroke3 {
    pub start: Point3,
    pub ctrl: [Point3; 4],
    pub end: Point3,
}

impl SketchStroke3 {
    /// Flattens the stroke to a drawable 3D polyline.
    pub fn to_polyline(&self) -> Vec<Point3> {
        let mut points = vec![self.start];
        curve::flatten_window3(
            self.ctrl[0],
            self.ctrl[1],
            self.ctrl[2],
            self.ctrl[3],
            &mut points,
        );
        points.push(self.end);
        points
    }
}

/// Clamps the random offset so it never exceeds 10% of the line's length.
/// Keeps short lines from dissolving into jitter.
fn clamp_offset(max_offset: f64, len_sq: f64) -> f64 {
    if max_offset * max_offset * 100.0 > len_sq {
        len_sq.sqrt() / 10.0
    } else {
        max_offset
    }
}

/// Synthesizes the two passes of a sketchy 2D line.
///
/// Every coordinate draws its own jitter offset, so the two passes
/// diverge visibly; the divergence point and midpoint bow are shared.
/// A zero-length input yields a degenerate near-zero-length double
/// stroke.
pub fn sketch_line(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    max_offset: f64,
    roughness: f64,
    bowing: f64,
    jitter: &mut Jitter,
) -> [SketchStroke; 2] {
    let len_sq = (x1 - x2) * (x1 - x2) + (y1 - y2) * (y1 - y2);
    let offset = clamp_offset(max_offset, len_sq);
    let half_offset = offset / 2.0;

    let diverge_point = 0.2 + jitter.next_f64() * 0.2;

    // Midpoint displacement perpendicular to the line direction, giving
    // slightly bowed strokes.
    let mid_disp_x = bowing * max_offset * (y2 - y1) / 200.0;
    let mid_disp_y = bowing * max_offset * (x1 - x2) / 200.0;
    let mid_disp_x = jitter.offset(roughness, -mid_disp_x, mid_disp_x);
    let mid_disp_y = jitter.offset(roughness, -mid_disp_y, mid_disp_y);

    let mut pass = |o: f64| -> SketchStroke {
        let mut jog = |v: f64| v + jitter.offset(roughness, -o, o);
        let start = Point::new(jog(x1), jog(y1));
        let c0 = Point::new(jog(x1), jog(y1));
        let c1 = Point::new(
            jog(mid_disp_x + x1 + (x2 - x1) * diverge_point),
            jog(mid_disp_y + y1 + (y2 - y1) * diverge_point),
        );
        let c2 = Point::new(
            jog(mid_disp_x + x1 + 2.0 * (x2 - x1) * diverge_point),
            jog(mid_disp_y + y1 + 2.0 * (y2 - y1) * diverge_point),
        );
        let c3 = Point::new(jog(x2), jog(y2));
        let end = Point::new(jog(x2), jog(y2));
        SketchStroke {
            start,
            ctrl: [c0, c1, c2, c3],
            end,
        }
    };

    [pass(offset), pass(half_offset)]
}

/// Synthesizes the two passes of a sketchy 3D line. The bow displacement
/// is taken orthogonal to the line via the cross product of its unit
/// direction with the reference vector (1,1,1).
pub fn sketch_line3(
    p1: Point3,
    p2: Point3,
    max_offset: f64,
    roughness: f64,
    bowing: f64,
    jitter: &mut Jitter,
) -> [SketchStroke3; 2] {
    let v = Point3::new(p2.x - p1.x, p2.y - p1.y, p2.z - p1.z);
    let vn = v.normalized();

    let len_sq = v.x * v.x + v.y * v.y + v.z * v.z;
    let offset = clamp_offset(max_offset, len_sq);
    let half_offset = offset / 2.0;

    let diverge_point = 0.2 + jitter.next_f64() * 0.2;

    let v_cross = vn.cross(Point3::new(1.0, 1.0, 1.0));
    let v_len = v.magnitude();

    let mid_disp_x = bowing * v_len * v_cross.x / 200.0;
    let mid_disp_y = bowing * v_len * v_cross.y / 200.0;
    let mid_disp_z = bowing * v_len * v_cross.z / 200.0;
    let mid_disp_x = jitter.offset(roughness, -mid_disp_x, mid_disp_x);
    let mid_disp_y = jitter.offset(roughness, -mid_disp_y, mid_disp_y);
    let mid_disp_z = jitter.offset(roughness, -mid_disp_z, mid_disp_z);

    let mut pass = |o: f64| -> SketchStroke3 {
        let mut jog = |v: f64| v + jitter.offset(roughness, -o, o);
        let start = Point3::new(jog(p1.x), jog(p1.y), jog(p1.z));
        let c0 = Point3::new(jog(p1.x), jog(p1.y), jog(p1.z));
        let c1 = Point3::new(
            jog(mid_disp_x + p1.x + v.x * diverge_point),
            jog(mid_disp_y + p1.y + v.y * diverge_point),
            jog(mid_disp_z + p1.z + v.z * diverge_point),
        );
        let c2 = Point3::new(
            jog(mid_disp_x + p1.x + 2.0 * v.x * diverge_point),
            jog(mid_disp_y + p1.y + 2.0 * v.y * diverge_point),
            jog(mid_disp_z + p1.z + 2.0 * v.z * diverge_point),
        );
        let c3 = Point3::new(jog(p2.x), jog(p2.y), jog(p2.z));
        let end = Point3::new(jog(p2.x), jog(p2.y), jog(p2.z));
        SketchStroke3 {
            start,
            ctrl: [c0, c1, c2, c3],
            end,
        }
    };

    [pass(offset), pass(half_offset)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_with_seed() {
        let mut a = Jitter::new(42);
        let mut b = Jitter::new(42);
        let s1 = sketch_line(0.0, 0.0, 100.0, 50.0, 2.0, 1.0, 1.0, &mut a);
        let s2 = sketch_line(0.0, 0.0, 100.0, 50.0, 2.0, 1.0, 1.0, &mut b);
        assert_eq!(s1, s2);
    }

    #[test]
    fn passes_diverge() {
        let mut jitter = Jitter::new(7);
        let [full, half] = sketch_line(0.0, 0.0, 100.0, 0.0, 2.0, 1.0, 1.0, &mut jitter);
        assert_ne!(full, half);
    }

    #[test]
    fn offset_clamped_to_tenth_of_length() {
        // A 5-unit line with a 2-unit max offset: endpoints must stay
        // within half a unit of their targets at roughness 1.
        let mut jitter = Jitter::new(3);
        for _ in 0..50 {
            let [full, _] = sketch_line(0.0, 0.0, 5.0, 0.0, 2.0, 1.0, 0.0, &mut jitter);
            assert!((full.start.x - 0.0).abs() <= 0.5 + 1e-9);
            assert!((full.end.x - 5.0).abs() <= 0.5 + 1e-9);
        }
    }

    #[test]
    fn zero_roughness_is_exact() {
        let mut jitter = Jitter::new(1);
        let [full, _] = sketch_line(0.0, 0.0, 100.0, 0.0, 2.0, 0.0, 0.0, &mut jitter);
        assert_eq!(full.start, Point::new(0.0, 0.0));
        assert_eq!(full.end, Point::new(100.0, 0.0));
        assert_eq!(full.ctrl[3], Point::new(100.0, 0.0));
    }

    #[test]
    fn zero_length_line_degenerates_quietly() {
        let mut jitter = Jitter::new(5);
        let [full, half] = sketch_line(10.0, 10.0, 10.0, 10.0, 2.0, 1.0, 1.0, &mut jitter);
        for stroke in [full, half] {
            let polyline = stroke.to_polyline();
            assert!(polyline.len() >= 2);
            for p in polyline {
                assert!((p.x - 10.0).abs() < 1e-9);
                assert!((p.y - 10.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn polyline_spans_endpoints() {
        let mut jitter = Jitter::new(11);
        let [full, _] = sketch_line(0.0, 0.0, 200.0, 0.0, 2.0, 1.0, 1.0, &mut jitter);
        let polyline = full.to_polyline();
        assert!(polyline.len() > 4);
        // Loose tolerance: jitter and bowing stay small against a 200px
        // line.
        assert!(polyline[0].x.abs() < 5.0);
        assert!((polyline.last().unwrap().x - 200.0).abs() < 5.0);
    }

    #[test]
    fn zero_length_3d_line_degenerates_quietly() {
        let mut jitter = Jitter::new(5);
        let p = Point3::new(1.0, 2.0, 3.0);
        let [full, _] = sketch_line3(p, p, 2.0, 1.0, 1.0, &mut jitter);
        for q in full.to_polyline() {
            assert!((q.x - 1.0).abs() < 1e-9);
            assert!((q.y - 2.0).abs() < 1e-9);
            assert!((q.z - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn sketch3_deterministic() {
        let a = {
            let mut jitter = Jitter::new(9);
            sketch_line3(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 20.0, 30.0),
                2.0,
                1.0,
                1.0,
                &mut jitter,
            )
        };
        let b = {
            let mut jitter = Jitter::new(9);
            sketch_line3(
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 20.0, 30.0),
                2.0,
                1.0,
                1.0,
                &mut jitter,
            )
        };
        assert_eq!(a, b);
    }
}
