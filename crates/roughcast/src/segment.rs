//! Directional line segment kernel.
//!
//! A [`Segment`] stores its endpoints together with the Cartesian equation
//! aX + bY + c = 0 of the infinite line through them, and answers the
//! geometric queries the hachure clipper depends on: segment/segment
//! intersection with explicit parallel and vertical handling, point
//! classification against the segment, and point-to-segment distance.

use crate::geometry::Point;

/// Gradients with |b| below this are treated as infinite (vertical line).
const VERTICAL_EPS: f64 = 1e-5;

/// Slack applied to the parametric bounds tests during intersection.
const BOUNDS_EPS: f64 = 1e-5;

/// Result of intersecting one segment with another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentRelation {
    /// The segments cross; the crossing point is carried in the variant.
    Intersects { x: f64, y: f64 },
    /// The segments do not cross.
    Separate,
    /// At least one segment has coincident endpoints.
    Undefined,
}

impl SegmentRelation {
    /// True for the `Intersects` variant.
    #[inline]
    pub fn intersects(&self) -> bool {
        matches!(self, SegmentRelation::Intersects { .. })
    }
}

/// Where a point lies relative to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRelation {
    /// Left of the segment's infinite extension.
    Left,
    /// Right of the segment's infinite extension.
    Right,
    /// On the extension, beyond the second endpoint.
    Ahead,
    /// On the extension, before the first endpoint.
    Behind,
    /// Within the segment's own span.
    On,
    /// The segment is undefined.
    Undefined,
}

/// A directional 2D line segment.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    // Cartesian line equation parameters aX + bY + c = 0.
    a: f64,
    b: f64,
    c: f64,
    undefined: bool,
}

impl Segment {
    /// Creates a segment from the two given endpoints. A segment whose
    /// endpoints coincide is flagged undefined.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let a = y2 - y1;
        let b = x1 - x2;
        let c = x2 * y1 - x1 * y2;
        Self {
            x1,
            y1,
            x2,
            y2,
            a,
            b,
            c,
            undefined: a == 0.0 && b == 0.0 && c == 0.0,
        }
    }

    /// True if the endpoints coincide and no line equation exists.
    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.undefined
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        (dx * dx + dy * dy).sqrt()
    }

    /// Gradient and intercept, or `None` for a near-vertical line.
    #[inline]
    fn gradient(&self) -> Option<(f64, f64)> {
        if self.b.abs() > VERTICAL_EPS {
            Some((-self.a / self.b, -self.c / self.b))
        } else {
            None
        }
    }

    /// Determines if and where the given segment intersects this one.
    pub fn relate(&self, other: &Segment) -> SegmentRelation {
        if self.is_undefined() || other.is_undefined() {
            return SegmentRelation::Undefined;
        }

        let grad1 = self.gradient();
        let grad2 = other.gradient();

        match (grad1, grad2) {
            // Two parallel vertical lines.
            (None, None) => {
                if -self.c / self.a != -other.c / other.a {
                    return SegmentRelation::Separate;
                }

                // Segments overlap along the same vertical line. Either
                // segment's endpoint inside the other's span counts, so
                // containment classifies the same from both sides.
                if self.y1 >= other.y1.min(other.y2) && self.y1 <= other.y1.max(other.y2) {
                    return SegmentRelation::Intersects {
                        x: self.x1,
                        y: self.y1,
                    };
                }
                if self.y2 >= other.y1.min(other.y2) && self.y2 <= other.y1.max(other.y2) {
                    return SegmentRelation::Intersects {
                        x: self.x2,
                        y: self.y2,
                    };
                }
                if other.y1 >= self.y1.min(self.y2) && other.y1 <= self.y1.max(self.y2) {
                    return SegmentRelation::Intersects {
                        x: other.x1,
                        y: other.y1,
                    };
                }

                SegmentRelation::Separate
            }

            // This segment vertical, the other not parallel to it.
            (None, Some((g2, i2))) => {
                let xi = self.x1;
                let yi = g2 * xi + i2;

                if (self.y1 - yi) * (yi - self.y2) < -BOUNDS_EPS
                    || (other.y1 - yi) * (yi - other.y2) < -BOUNDS_EPS
                {
                    return SegmentRelation::Separate;
                }
                // Other segment horizontal: constrain along its x extent too.
                if other.a.abs() < VERTICAL_EPS
                    && (other.x1 - xi) * (xi - other.x2) < -BOUNDS_EPS
                {
                    return SegmentRelation::Separate;
                }
                SegmentRelation::Intersects { x: xi, y: yi }
            }

            // Other segment vertical, this one not parallel to it.
            (Some((g1, i1)), None) => {
                let xi = other.x1;
                let yi = g1 * xi + i1;

                if (other.y1 - yi) * (yi - other.y2) < -BOUNDS_EPS
                    || (self.y1 - yi) * (yi - self.y2) < -BOUNDS_EPS
                {
                    return SegmentRelation::Separate;
                }
                if self.a.abs() < VERTICAL_EPS && (self.x1 - xi) * (xi - self.x2) < -BOUNDS_EPS {
                    return SegmentRelation::Separate;
                }
                SegmentRelation::Intersects { x: xi, y: yi }
            }

            (Some((g1, i1)), Some((g2, i2))) => {
                // Parallel non-vertical lines.
                if g1 == g2 {
                    if i1 != i2 {
                        return SegmentRelation::Separate;
                    }

                    // Segments overlap along the same non-vertical line.
                    if self.x1 >= other.x1.min(other.x2) && self.x1 <= other.x1.max(other.x2) {
                        return SegmentRelation::Intersects {
                            x: self.x1,
                            y: self.y1,
                        };
                    }
                    if self.x2 >= other.x1.min(other.x2) && self.x2 <= other.x1.max(other.x2) {
                        return SegmentRelation::Intersects {
                            x: self.x2,
                            y: self.y2,
                        };
                    }
                    if other.x1 >= self.x1.min(self.x2) && other.x1 <= self.x1.max(self.x2) {
                        return SegmentRelation::Intersects {
                            x: other.x1,
                            y: other.y1,
                        };
                    }

                    return SegmentRelation::Separate;
                }

                // General case: solve the simultaneous line equations.
                let xi = (i2 - i1) / (g1 - g2);
                let yi = g1 * xi + i1;

                if (self.x1 - xi) * (xi - self.x2) < -BOUNDS_EPS
                    || (other.x1 - xi) * (xi - other.x2) < -BOUNDS_EPS
                {
                    return SegmentRelation::Separate;
                }
                SegmentRelation::Intersects { x: xi, y: yi }
            }
        }
    }

    /// Determines where the given point lies in relation to the segment.
    pub fn relate_point(&self, px: f64, py: f64) -> PointRelation {
        if self.undefined {
            return PointRelation::Undefined;
        }

        // Test whether the point falls on the extended line.
        let s = self.a * px + self.b * py + self.c;
        if s > 0.01 {
            return PointRelation::Right;
        }
        if s < -0.01 {
            return PointRelation::Left;
        }

        // Find where along the line the point falls.
        let d = if self.x2 == self.x1 {
            (py - self.y1) / (self.y2 - self.y1)
        } else {
            (px - self.x1) / (self.x2 - self.x1)
        };

        if d < -0.001 {
            return PointRelation::Behind;
        }
        if d > 1.001 {
            return PointRelation::Ahead;
        }
        PointRelation::On
    }

    /// Distance between the given point and this segment. A zero-length
    /// segment degenerates to point distance.
    pub fn distance_to(&self, px: f64, py: f64) -> f64 {
        if self.x1 == self.x2 && self.y1 == self.y2 {
            return ((px - self.x1) * (px - self.x1) + (py - self.y1) * (py - self.y1)).sqrt();
        }

        let dx = self.x1 - self.x2;
        let dy = self.y1 - self.y2;
        let dist2 = dx * dx + dy * dy;

        let u = ((px - self.x1) * (self.x2 - self.x1) + (py - self.y1) * (self.y2 - self.y1))
            / dist2;

        if u < 0.0 {
            // Nearest point is behind the segment.
            return Point::new(px, py).distance(Point::new(self.x1, self.y1));
        }
        if u > 1.0 {
            // Nearest point is in front of the segment.
            return Point::new(px, py).distance(Point::new(self.x2, self.y2));
        }

        (((self.y2 - self.y1) * (px - self.x1) - (self.x2 - self.x1) * (py - self.y1))
            / dist2.sqrt())
        .abs()
    }

    /// Nearest point on the segment to the given point, clamped to the
    /// segment's endpoints.
    pub fn nearest_point(&self, px: f64, py: f64) -> Point {
        if self.x1 == self.x2 && self.y1 == self.y2 {
            return Point::new(self.x1, self.y1);
        }

        let dx = self.x1 - self.x2;
        let dy = self.y1 - self.y2;
        let dist2 = dx * dx + dy * dy;

        let u = ((px - self.x1) * (self.x2 - self.x1) + (py - self.y1) * (self.y2 - self.y1))
            / dist2;

        if u < 0.0 {
            return Point::new(self.x1, self.y1);
        }
        if u > 1.0 {
            return Point::new(self.x2, self.y2);
        }

        Point::new(
            self.x1 + u * (self.x2 - self.x1),
            self.y1 + u * (self.y2 - self.y1),
        )
    }

    /// Reports whether the given crossing point coincides with one of the
    /// segment's endpoints.
    pub fn touches_endpoint(&self, x: f64, y: f64) -> bool {
        let diff1 = (self.x1 - x).abs() + (self.y1 - y).abs();
        let diff2 = (self.x2 - x).abs() + (self.y2 - y).abs();
        diff1 < 0.1 || diff2 < 0.1
    }
}
