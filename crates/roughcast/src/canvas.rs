//! The drawing surface abstraction.
//!
//! The engine computes sketchy geometry and emits it through the [`Canvas`]
//! trait; a host adapter implements the trait by forwarding to its native
//! drawing calls. The engine itself never rasterizes. Because the canvas
//! is a plain trait object passed into each draw call, redirecting output
//! (for instance into an offscreen buffer) is a matter of passing a
//! different canvas — there is no hidden context state to save and
//! restore.

use crate::geometry::{Point, Point3};
use crate::style::Color;

/// Stroke parameters for one emitted path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub weight: f64,
}

impl Pen {
    pub fn new(color: Color, weight: f64) -> Self {
        Self { color, weight }
    }
}

/// Solid fill parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
}

impl Fill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

/// Host drawing surface the engine emits computed geometry into.
///
/// All coordinates are in the host's space; the engine performs no
/// transformation of its own. Paths are emitted fully flattened, so an
/// implementation only ever deals with straight polylines and solid
/// fills. `stroke_curve` receives paths that approximate a smooth curve,
/// kept distinct from `stroke_polyline` so vector hosts may re-fit them.
pub trait Canvas {
    /// Draw an open polyline.
    fn stroke_polyline(&mut self, points: &[Point], pen: Pen);

    /// Draw an open flattened curve.
    fn stroke_curve(&mut self, points: &[Point], pen: Pen);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], fill: Fill);

    /// Fill an axis-aligned ellipse given by centre and radii.
    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, fill: Fill);

    /// Stroke the outline of an axis-aligned ellipse.
    fn stroke_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, pen: Pen);

    /// Draw a single point.
    fn point(&mut self, p: Point, pen: Pen);

    /// Draw an open 3D polyline.
    fn stroke_polyline3(&mut self, points: &[Point3], pen: Pen);

    /// Fill a closed 3D polygon.
    fn fill_polygon3(&mut self, points: &[Point3], fill: Fill);

    /// Draw a single 3D point.
    fn point3(&mut self, p: Point3, pen: Pen);

    /// Optional capability: render `draw` into an offscreen buffer of the
    /// given size and map the result as a texture onto `face`, using the
    /// per-vertex `uvs` texture coordinates.
    ///
    /// The default declines the capability by returning `false`, in which
    /// case the renderer falls back to a flat fill of the face. Hosts
    /// that can build an offscreen target override this, run `draw`
    /// against it, and return `true`.
    fn hachure_texture(
        &mut self,
        width: f64,
        height: f64,
        face: &[Point3],
        uvs: &[Point],
        draw: &mut dyn FnMut(&mut dyn Canvas),
    ) -> bool {
        let _ = (width, height, face, uvs, draw);
        false
    }
}

/// One recorded canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    StrokePolyline { points: Vec<Point>, pen: Pen },
    StrokeCurve { points: Vec<Point>, pen: Pen },
    FillPolygon { points: Vec<Point>, fill: Fill },
    FillEllipse { cx: f64, cy: f64, rx: f64, ry: f64, fill: Fill },
    StrokeEllipse { cx: f64, cy: f64, rx: f64, ry: f64, pen: Pen },
    Point { p: Point, pen: Pen },
    StrokePolyline3 { points: Vec<Point3>, pen: Pen },
    FillPolygon3 { points: Vec<Point3>, fill: Fill },
    Point3 { p: Point3, pen: Pen },
    /// A textured 3D face and the operations drawn into its offscreen
    /// buffer.
    TexturedFace {
        width: f64,
        height: f64,
        face: Vec<Point3>,
        uvs: Vec<Point>,
        ops: Vec<DrawOp>,
    },
}

/// A canvas that records every operation as a [`DrawOp`].
///
/// Useful for tests and for hosts that capture geometry for later replay
/// or export.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    texture_capable: bool,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder that accepts the texture-mapping capability, recording
    /// offscreen work as a nested op list.
    pub fn with_texture_support() -> Self {
        Self {
            ops: Vec::new(),
            texture_capable: true,
        }
    }

    /// The operations recorded so far.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drain the recorded operations.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Canvas for RecordingCanvas {
    fn stroke_polyline(&mut self, points: &[Point], pen: Pen) {
        self.ops.push(DrawOp::StrokePolyline {
            points: points.to_vec(),
            pen,
        });
    }

    fn stroke_curve(&mut self, points: &[Point], pen: Pen) {
        self.ops.push(DrawOp::StrokeCurve {
            points: points.to_vec(),
            pen,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], fill: Fill) {
        self.ops.push(DrawOp::FillPolygon {
            points: points.to_vec(),
            fill,
        });
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, fill: Fill) {
        self.ops.push(DrawOp::FillEllipse { cx, cy, rx, ry, fill });
    }

    fn stroke_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, pen: Pen) {
        self.ops.push(DrawOp::StrokeEllipse { cx, cy, rx, ry, pen });
    }

    fn point(&mut self, p: Point, pen: Pen) {
        self.ops.push(DrawOp::Point { p, pen });
    }

    fn stroke_polyline3(&mut self, points: &[Point3], pen: Pen) {
        self.ops.push(DrawOp::StrokePolyline3 {
            points: points.to_vec(),
            pen,
        });
    }

    fn fill_polygon3(&mut self, points: &[Point3], fill: Fill) {
        self.ops.push(DrawOp::FillPolygon3 {
            points: points.to_vec(),
            fill,
        });
    }

    fn point3(&mut self, p: Point3, pen: Pen) {
        self.ops.push(DrawOp::Point3 { p, pen });
    }

    fn hachure_texture(
        &mut self,
        width: f64,
        height: f64,
        face: &[Point3],
        uvs: &[Point],
        draw: &mut dyn FnMut(&mut dyn Canvas),
    ) -> bool {
        if !self.texture_capable {
            return false;
        }

        let mut offscreen = RecordingCanvas::new();
        draw(&mut offscreen);
        self.ops.push(DrawOp::TexturedFace {
            width,
            height,
            face: face.to_vec(),
            uvs: uvs.to_vec(),
            ops: offscreen.take_ops(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut canvas = RecordingCanvas::new();
        let pen = Pen::new(Color::BLACK, 1.0);
        canvas.point(Point::new(1.0, 2.0), pen);
        canvas.stroke_polyline(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)], pen);

        assert_eq!(canvas.len(), 2);
        assert!(matches!(canvas.ops()[0], DrawOp::Point { .. }));
        assert!(matches!(canvas.ops()[1], DrawOp::StrokePolyline { .. }));
    }

    #[test]
    fn texture_capability_declined_by_default() {
        let mut canvas = RecordingCanvas::new();
        let accepted = canvas.hachure_texture(10.0, 10.0, &[], &[], &mut |_| {});
        assert!(!accepted);
        assert!(canvas.is_empty());
    }

    #[test]
    fn texture_capability_records_nested_ops() {
        let mut canvas = RecordingCanvas::with_texture_support();
        let pen = Pen::new(Color::BLACK, 1.0);
        let accepted = canvas.hachure_texture(10.0, 10.0, &[], &[], &mut |offscreen| {
            offscreen.point(Point::new(3.0, 4.0), pen);
        });
        assert!(accepted);
        assert_eq!(canvas.len(), 1);
        match &canvas.ops()[0] {
            DrawOp::TexturedFace { ops, .. } => assert_eq!(ops.len(), 1),
            other => panic!("expected textured face, got {other:?}"),
        }
    }
}
