//! Clipping of hachure chords against shape boundaries.
//!
//! A sweep chord crossing a simple closed ring alternates outside/inside
//! at each boundary crossing, so the crossing points — ordered by distance
//! from the chord's start — pair up 0-1, 2-3, … into the interior spans
//! the fill engines actually draw.

use crate::geometry::{Line, Point, dist_sq};
use crate::segment::{Segment, SegmentRelation};

/// All crossing points between `chord` and the implicitly closed ring
/// described by `xs`/`ys`, ordered by distance from the chord's first
/// endpoint. Points at tied distances are all kept, in edge order, so a
/// chord passing exactly through a vertex still pairs correctly.
pub fn crossings(chord: Line, xs: &[f64], ys: &[f64]) -> Vec<Point> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return Vec::new();
    }

    let s1 = Segment::new(chord.x1, chord.y1, chord.x2, chord.y2);
    let mut hits: Vec<(f64, Point)> = Vec::with_capacity(4);

    for i in 0..n {
        let j = (i + 1) % n;
        let edge = Segment::new(xs[i], ys[i], xs[j], ys[j]);

        if let SegmentRelation::Intersects { x, y } = s1.relate(&edge) {
            hits.push((dist_sq(x, y, chord.x1, chord.y1), Point::new(x, y)));
        }
    }

    // Stable sort keeps tied crossings in insertion order.
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, p)| p).collect()
}

/// Interior spans of a chord across the ring: crossing points paired up
/// as entry/exit.
pub fn interior_spans(chord: Line, xs: &[f64], ys: &[f64]) -> Vec<Line> {
    let points = crossings(chord, xs, ys);
    points
        .chunks_exact(2)
        .map(|pair| Line::new(pair[0].x, pair[0].y, pair[1].x, pair[1].y))
        .collect()
}

/// Crossing points of a chord against a triangle's three edges.
///
/// A chord can cross a triangle boundary at most twice, so this fast path
/// intersects exactly three edges and stops after two hits. When
/// `ordered` is set the two points are sorted by distance from the chord's
/// first endpoint so alternating-stroke fills connect consecutive chords
/// consistently.
pub fn triangle_crossings(
    chord: Line,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    ordered: bool,
) -> Vec<Point> {
    let s = Segment::new(chord.x1, chord.y1, chord.x2, chord.y2);
    let mut points: Vec<Point> = Vec::with_capacity(2);

    for (ex1, ey1, ex2, ey2) in [(x1, y1, x2, y2), (x2, y2, x3, y3), (x3, y3, x1, y1)] {
        if points.len() == 2 {
            break;
        }
        let edge = Segment::new(ex1, ey1, ex2, ey2);
        if let SegmentRelation::Intersects { x, y } = s.relate(&edge) {
            points.push(Point::new(x, y));
        }
    }

    if ordered
        && points.len() == 2
        && dist_sq(points[0].x, points[0].y, chord.x1, chord.y1)
            > dist_sq(points[1].x, points[1].y, chord.x1, chord.y1)
    {
        points.swap(0, 1);
    }

    points
}
