//! Core geometry types shared across the engine.

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A 3D point, used by the 3D line and planar-face paths.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A line segment defined by two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Squared distance to another point.
    #[inline]
    pub fn dist_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl Point3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Vector length from the origin.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Cross product with another vector.
    #[inline]
    pub fn cross(&self, other: Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Unit-length copy, or the zero vector if degenerate.
    #[inline]
    pub fn normalized(&self) -> Point3 {
        let mag = self.magnitude();
        if mag < 1e-12 {
            Point3::default()
        } else {
            Point3::new(self.x / mag, self.y / mag, self.z / mag)
        }
    }
}

impl Line {
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[inline]
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Length of the line segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }
}

/// Squared distance between two coordinate pairs.
#[inline]
pub fn dist_sq(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x1 - x2) * (x1 - x2) + (y1 - y2) * (y1 - y2)
}

/// Bounding box of a point slice as (min_x, min_y, max_x, max_y).
pub fn bounding_box(points: &[Point]) -> Option<(f64, f64, f64, f64)> {
    if points.is_empty() {
        return None;
    }

    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Some((min_x, min_y, max_x, max_y))
}

/// Per-axis extents of a 3D point slice as ((min_x, max_x), (min_y, max_y), (min_z, max_z)).
pub fn bounding_box3(points: &[Point3]) -> Option<((f64, f64), (f64, f64), (f64, f64))> {
    if points.is_empty() {
        return None;
    }

    let mut xs = (f64::INFINITY, f64::NEG_INFINITY);
    let mut ys = (f64::INFINITY, f64::NEG_INFINITY);
    let mut zs = (f64::INFINITY, f64::NEG_INFINITY);

    for p in points {
        xs = (xs.0.min(p.x), xs.1.max(p.x));
        ys = (ys.0.min(p.y), ys.1.max(p.y));
        zs = (zs.0.min(p.z), zs.1.max(p.z));
    }

    Some((xs, ys, zs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0);
    }

    #[test]
    fn line_length() {
        let line = Line::new(0.0, 0.0, 3.0, 4.0);
        assert_eq!(line.length(), 5.0);
    }

    #[test]
    fn cross_product_orthogonal() {
        let x = Point3::new(1.0, 0.0, 0.0);
        let y = Point3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn normalize_zero_vector() {
        assert_eq!(Point3::default().normalized(), Point3::default());
    }

    #[test]
    fn bbox_of_points() {
        let pts = [
            Point::new(0.0, 5.0),
            Point::new(10.0, 0.0),
            Point::new(4.0, 2.0),
        ];
        assert_eq!(bounding_box(&pts), Some((0.0, 0.0, 10.0, 5.0)));
    }

    #[test]
    fn bbox_empty() {
        assert_eq!(bounding_box(&[]), None);
    }

    #[test]
    fn bbox3_ranges() {
        let pts = [Point3::new(0.0, 1.0, 2.0), Point3::new(3.0, -1.0, 2.0)];
        let (xs, ys, zs) = bounding_box3(&pts).unwrap();
        assert_eq!(xs, (0.0, 3.0));
        assert_eq!(ys, (-1.0, 1.0));
        assert_eq!(zs, (2.0, 2.0));
    }
}
