//! The sketchy renderer.
//!
//! [`SketchRenderer`] is the public drawing surface of the engine. Each
//! operation resolves the current [`Style`] against the host's ambient
//! stroke/fill state, computes perturbed geometry for the primitive and
//! emits it through the [`Canvas`] passed to the call. Nothing is drawn
//! directly; the engine only ever produces vertex sequences.

use std::collections::HashSet;

use log::warn;

use crate::canvas::{Canvas, Fill, Pen};
use crate::clip;
use crate::curve;
use crate::geometry::{Line, Point, Point3, bounding_box3};
use crate::hachure::{HachureIterator, HachureTrig};
use crate::rng::Jitter;
use crate::sketch;
use crate::style::{Color, EllipseMode, MIN_ROUGHNESS, RectMode, Style};

/// Maximum random offset, in pixels, applied to primitive edges.
const EDGE_OFFSET: f64 = 2.0;

/// Angular increment between the control points of an ellipse ring.
const ELLIPSE_INC: f64 = std::f64::consts::TAU / 9.0;

/// Seed installed at construction and by `reset_style`.
const DEFAULT_SEED: u64 = 12345;

/// How the vertices accumulated between `begin_shape` and `end_shape` are
/// assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeMode {
    #[default]
    Polygon,
    Points,
    Lines,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
}

/// Which 2D plane a 3D face is projected onto for texture hachuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plane2d {
    Xy,
    Xz,
    Yz,
}

/// Linear remap of `v` from the range a..b to c..d.
#[inline]
fn map_range(v: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    c + (d - c) * (v - a) / (b - a)
}

/// How a shape's interior is to be painted this draw call.
enum FillMode {
    /// Not filling, or the fill colour matches the background.
    None,
    Solid(Fill),
    Hachure { pen: Pen, gap: f64 },
}

struct FillPlan {
    /// Background erase pass, when gap filling could leave earlier content
    /// visible between the lines.
    erase: Option<Fill>,
    mode: FillMode,
}

/// Draws graphic primitives in a sketchy hand-drawn style.
pub struct SketchRenderer {
    style: Style,
    jitter: Jitter,
    /// The stroke the host would use, or `None` when the host has
    /// stroking disabled.
    host_pen: Option<Pen>,
    /// The fill the host would use, or `None` when filling is disabled.
    host_fill: Option<Fill>,
    // Shape-assembly state for begin/vertex/end sequences.
    vertices: Vec<Point3>,
    curve_indices: HashSet<usize>,
    shape_mode: ShapeMode,
    is_3d_shape: bool,
}

impl Default for SketchRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SketchRenderer {
    pub fn new() -> Self {
        Self {
            style: Style::default(),
            jitter: Jitter::new(DEFAULT_SEED),
            host_pen: Some(Pen::new(Color::BLACK, 1.0)),
            host_fill: Some(Fill::new(Color::WHITE)),
            vertices: Vec::new(),
            curve_indices: HashSet::new(),
            shape_mode: ShapeMode::Polygon,
            is_3d_shape: false,
        }
    }

    pub fn with_style(style: Style) -> Self {
        Self {
            style,
            ..Self::new()
        }
    }

    // ----------------------------------------------------- configuration

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Resets the sketchy style to defaults, adopting the host's current
    /// colours as the override colours, and restarts the jitter stream.
    pub fn reset_style(&mut self) {
        self.style = Style::default();
        if let Some(pen) = self.host_pen {
            self.style.stroke_color = pen.color;
        }
        if let Some(fill) = self.host_fill {
            self.style.fill_color = fill.color;
        }
        self.jitter.reseed(DEFAULT_SEED);
    }

    /// Sets the seed for the random offsets used when drawing. Call
    /// before every redraw for a stable (non-vibrating) rendering.
    pub fn set_seed(&mut self, seed: u64) {
        self.jitter.reseed(seed);
    }

    /// Informs the renderer of the stroke the host would draw with, or
    /// `None` when host stroking is off.
    pub fn set_host_pen(&mut self, pen: Option<Pen>) {
        self.host_pen = pen;
    }

    /// Informs the renderer of the fill the host would paint with, or
    /// `None` when host filling is off.
    pub fn set_host_fill(&mut self, fill: Option<Fill>) {
        self.host_fill = fill;
    }

    // ------------------------------------------------- style resolution

    fn host_weight(&self) -> f64 {
        self.host_pen.map(|p| p.weight).unwrap_or(1.0)
    }

    fn is_stroking(&self) -> bool {
        self.host_pen.is_some() || self.style.override_stroke
    }

    fn stroke_pen(&self) -> Pen {
        let color = if self.style.override_stroke {
            self.style.stroke_color
        } else {
            self.host_pen.map(|p| p.color).unwrap_or(Color::BLACK)
        };
        let weight = if self.style.stroke_weight > 0.0 {
            self.style.stroke_weight
        } else {
            self.host_weight()
        };
        Pen::new(color, weight)
    }

    fn fill_plan(&self) -> FillPlan {
        let Some(host_fill) = self.host_fill else {
            return FillPlan {
                erase: None,
                mode: FillMode::None,
            };
        };

        let fill_color = if self.style.override_fill {
            self.style.fill_color
        } else {
            host_fill.color
        };

        let erase = (self.style.fill_gap != 0.0 && self.style.background.alpha() > 0)
            .then(|| Fill::new(self.style.background));

        // Interior is only synthesized when it would differ from the
        // background.
        let mode = if fill_color == self.style.background {
            FillMode::None
        } else if self.style.fill_gap == 0.0 {
            FillMode::Solid(Fill::new(fill_color))
        } else {
            let mut gap = if self.style.fill_gap < 0.0 {
                self.host_weight() * 4.0
            } else {
                self.style.fill_gap
            };
            if self.style.alternating {
                // Widen so zig-zag filling keeps a similar density.
                gap *= 1.41;
            }
            let weight = if self.style.fill_weight <= 0.0 {
                self.host_weight() / 2.0
            } else {
                self.style.fill_weight
            };
            if gap <= 0.0 {
                // A derived gap can collapse to zero when the host weight
                // is zero; a zero-gap sweep never terminates.
                FillMode::Solid(Fill::new(fill_color))
            } else {
                FillMode::Hachure {
                    pen: Pen::new(fill_color, weight),
                    gap,
                }
            }
        };

        FillPlan { erase, mode }
    }

    // ------------------------------------------------------------ lines

    /// Draws a sketchy 2D line between the given coordinate pairs.
    pub fn line(&mut self, canvas: &mut dyn Canvas, x1: f64, y1: f64, x2: f64, y2: f64) {
        if !self.is_stroking() {
            return;
        }
        let pen = self.stroke_pen();
        self.sketchy_line(canvas, x1, y1, x2, y2, EDGE_OFFSET, pen);
    }

    /// Draws a sketchy 3D line between the given coordinate triplets.
    pub fn line3(
        &mut self,
        canvas: &mut dyn Canvas,
        x1: f64,
        y1: f64,
        z1: f64,
        x2: f64,
        y2: f64,
        z2: f64,
    ) {
        if !self.is_stroking() {
            return;
        }
        let pen = self.stroke_pen();
        self.sketchy_line3(
            canvas,
            Point3::new(x1, y1, z1),
            Point3::new(x2, y2, z2),
            EDGE_OFFSET,
            pen,
        );
    }

    /// Draws a complex line linking the given coordinates.
    pub fn poly_line(&mut self, canvas: &mut dyn Canvas, xs: &[f64], ys: &[f64]) {
        if xs.is_empty() || ys.is_empty() {
            warn!("no coordinates provided to poly_line()");
            return;
        }
        if !self.is_stroking() {
            return;
        }

        let n = xs.len().min(ys.len());
        let pen = self.stroke_pen();

        if !self.style.sketchy {
            let points: Vec<Point> = (0..n).map(|i| Point::new(xs[i], ys[i])).collect();
            canvas.stroke_polyline(&points, pen);
            return;
        }

        for i in 0..n.saturating_sub(1) {
            self.sketchy_line(canvas, xs[i], ys[i], xs[i + 1], ys[i + 1], EDGE_OFFSET, pen);
        }
    }

    /// Draws a 2D point. Points carry no sketchiness.
    pub fn point(&mut self, canvas: &mut dyn Canvas, x: f64, y: f64) {
        if self.is_stroking() {
            let pen = self.stroke_pen();
            canvas.point(Point::new(x, y), pen);
        }
    }

    /// Draws a 3D point.
    pub fn point3(&mut self, canvas: &mut dyn Canvas, x: f64, y: f64, z: f64) {
        if self.is_stroking() {
            let pen = self.stroke_pen();
            canvas.point3(Point3::new(x, y, z), pen);
        }
    }

    // ------------------------------------------------------- rectangles

    /// Draws a rectangle; x,y,w,h are interpreted per the style's
    /// [`RectMode`].
    pub fn rect(&mut self, canvas: &mut dyn Canvas, x: f64, y: f64, w: f64, h: f64) {
        let (left, top, right, bottom) = match self.style.rect_mode {
            RectMode::Corner => (x.min(x + w), y.min(y + h), x.max(x + w), y.max(y + h)),
            RectMode::Corners => (x.min(w), y.min(h), x.max(w), y.max(h)),
            RectMode::Center => {
                let (hw, hh) = (w / 2.0, h / 2.0);
                (x - hw.abs(), y - hh.abs(), x + hw.abs(), y + hh.abs())
            }
            RectMode::Radius => (
                x - w.abs(),
                y - h.abs(),
                x + w.abs(),
                y + h.abs(),
            ),
        };

        let corners = [
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ];

        if !self.style.sketchy {
            if let Some(fill) = self.host_fill {
                canvas.fill_polygon(&corners, fill);
            }
            if self.is_stroking() {
                let mut outline = corners.to_vec();
                outline.push(corners[0]);
                canvas.stroke_polyline(&outline, self.stroke_pen());
            }
            return;
        }

        // Don't draw anything thinner than a quarter of the roughness
        // value.
        let threshold = self.style.roughness() / 4.0;
        if right - left < threshold || bottom - top < threshold {
            return;
        }

        let plan = self.fill_plan();
        if let Some(erase) = plan.erase {
            canvas.fill_polygon(&corners, erase);
        }

        match plan.mode {
            FillMode::None => {}
            FillMode::Solid(fill) => canvas.fill_polygon(&corners, fill),
            FillMode::Hachure { pen, gap } => {
                let trig = self.style.perturbed_trig(&mut self.jitter);
                let mut it = HachureIterator::new(top, bottom, left, right, gap, trig);

                if let Some(first) = it.next() {
                    let mut prev = first;
                    self.sketchy_line(canvas, first.x1, first.y1, first.x2, first.y2, 2.0, pen);
                    for coords in it.by_ref() {
                        if self.style.alternating {
                            self.sketchy_line(
                                canvas, prev.x2, prev.y2, coords.x1, coords.y1, 2.0, pen,
                            );
                        }
                        self.sketchy_line(
                            canvas, coords.x1, coords.y1, coords.x2, coords.y2, 2.0, pen,
                        );
                        prev = coords;
                    }
                }
            }
        }

        // Boundary of the rectangle.
        if self.is_stroking() {
            let pen = self.stroke_pen();
            self.sketchy_line(canvas, left, top, right, top, 2.0, pen);
            self.sketchy_line(canvas, right, top, right, bottom, 2.0, pen);
            self.sketchy_line(canvas, right, bottom, left, bottom, 2.0, pen);
            self.sketchy_line(canvas, left, bottom, left, top, 2.0, pen);
        }
    }

    // -------------------------------------------------------- triangles

    /// Draws a triangle through the three pairs of coordinates.
    #[allow(clippy::too_many_arguments)]
    pub fn triangle(
        &mut self,
        canvas: &mut dyn Canvas,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) {
        let corners = [
            Point::new(x1, y1),
            Point::new(x2, y2),
            Point::new(x3, y3),
        ];

        if !self.style.sketchy {
            if let Some(fill) = self.host_fill {
                canvas.fill_polygon(&corners, fill);
            }
            if self.is_stroking() {
                let outline = [corners[0], corners[1], corners[2], corners[0]];
                canvas.stroke_polyline(&outline, self.stroke_pen());
            }
            return;
        }

        let left = x1.min(x2).min(x3);
        let right = x1.max(x2).max(x3);
        let top = y1.min(y2).min(y3);
        let bottom = y1.max(y2).max(y3);

        let plan = self.fill_plan();
        if let Some(erase) = plan.erase {
            canvas.fill_polygon(&corners, erase);
        }

        match plan.mode {
            FillMode::None => {}
            FillMode::Solid(fill) => canvas.fill_polygon(&corners, fill),
            FillMode::Hachure { pen, gap } => {
                let trig = self.style.perturbed_trig(&mut self.jitter);
                let it = HachureIterator::new(top - 1.0, bottom + 1.0, left - 1.0, right + 1.0, gap, trig);

                let mut prev: Option<Point> = None;
                let alternating = self.style.alternating;
                let chords: Vec<Line> = it.collect();
                for chord in chords {
                    let hits = clip::triangle_crossings(chord, x1, y1, x2, y2, x3, y3, alternating);
                    if hits.len() == 2 {
                        if alternating {
                            if let Some(p) = prev {
                                self.sketchy_line(canvas, p.x, p.y, hits[0].x, hits[0].y, 2.0, pen);
                            }
                            prev = Some(hits[1]);
                        }
                        self.sketchy_line(
                            canvas, hits[0].x, hits[0].y, hits[1].x, hits[1].y, 2.0, pen,
                        );
                    }
                }
            }
        }

        // Boundary of the triangle.
        if self.is_stroking() {
            let pen = self.stroke_pen();
            self.sketchy_line(canvas, x1, y1, x2, y2, 2.0, pen);
            self.sketchy_line(canvas, x2, y2, x3, y3, 2.0, pen);
            self.sketchy_line(canvas, x3, y3, x1, y1, 2.0, pen);
        }
    }

    /// Draws a quadrilateral; vertices may proceed in either winding.
    #[allow(clippy::too_many_arguments)]
    pub fn quad(
        &mut self,
        canvas: &mut dyn Canvas,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
        x4: f64,
        y4: f64,
    ) {
        self.shape(canvas, &[x1, x2, x3, x4], &[y1, y2, y3, y4], true);
    }

    // --------------------------------------------------------- polygons

    /// Draws a 2D polygon from parallel coordinate arrays, optionally
    /// closing the boundary.
    pub fn shape(&mut self, canvas: &mut dyn Canvas, xs: &[f64], ys: &[f64], close_shape: bool) {
        if xs.is_empty() || ys.is_empty() {
            warn!("no coordinates provided to shape()");
            return;
        }

        let n = xs.len().min(ys.len());
        let points: Vec<Point> = (0..n).map(|i| Point::new(xs[i], ys[i])).collect();

        if !self.style.sketchy {
            if let Some(fill) = self.host_fill {
                canvas.fill_polygon(&points, fill);
            }
            if self.is_stroking() {
                let mut outline = points.clone();
                if close_shape {
                    outline.push(points[0]);
                }
                canvas.stroke_polyline(&outline, self.stroke_pen());
            }
            return;
        }

        let left = xs[..n].iter().copied().fold(f64::INFINITY, f64::min);
        let right = xs[..n].iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let top = ys[..n].iter().copied().fold(f64::INFINITY, f64::min);
        let bottom = ys[..n].iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let plan = self.fill_plan();
        if let Some(erase) = plan.erase {
            canvas.fill_polygon(&points, erase);
        }

        match plan.mode {
            FillMode::None => {}
            FillMode::Solid(fill) => canvas.fill_polygon(&points, fill),
            FillMode::Hachure { pen, gap } => {
                let trig = self.style.perturbed_trig(&mut self.jitter);
                let it =
                    HachureIterator::new(top - 1.0, bottom + 1.0, left - 1.0, right + 1.0, gap, trig);
                let alternating = self.style.alternating;

                // Chords crossing the boundary once on the way in and once
                // on the way out can be joined into a continuous zig-zag;
                // multi-span sweeps break the run.
                let mut prev_end: Option<Point> = None;
                let chords: Vec<Line> = it.collect();
                for chord in chords {
                    let spans = clip::interior_spans(chord, &xs[..n], &ys[..n]);
                    let single_span = spans.len() == 1;

                    for span in &spans {
                        if alternating && single_span {
                            if let Some(p) = prev_end {
                                self.sketchy_line(canvas, p.x, p.y, span.x1, span.y1, 2.0, pen);
                            }
                        }
                        self.sketchy_line(canvas, span.x1, span.y1, span.x2, span.y2, 2.0, pen);
                    }

                    prev_end = if alternating && single_span {
                        Some(spans[0].end())
                    } else {
                        None
                    };
                }
            }
        }

        // Boundary of the shape.
        if self.is_stroking() {
            let pen = self.stroke_pen();
            for i in 0..n - 1 {
                self.sketchy_line(canvas, xs[i], ys[i], xs[i + 1], ys[i + 1], 2.0, pen);
            }
            if close_shape {
                self.sketchy_line(canvas, xs[n - 1], ys[n - 1], xs[0], ys[0], 2.0, pen);
            }
        }
    }

    /// Draws a 3D polygon from parallel coordinate arrays.
    pub fn shape3(
        &mut self,
        canvas: &mut dyn Canvas,
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
        close_shape: bool,
    ) {
        if xs.is_empty() || ys.is_empty() || zs.is_empty() {
            warn!("no coordinates provided to shape3()");
            return;
        }

        let n = xs.len().min(ys.len()).min(zs.len());
        let face: Vec<Point3> = (0..n).map(|i| Point3::new(xs[i], ys[i], zs[i])).collect();

        if !self.style.sketchy {
            if let Some(fill) = self.host_fill {
                canvas.fill_polygon3(&face, fill);
            }
            if self.is_stroking() {
                let mut outline = face.clone();
                if close_shape {
                    outline.push(face[0]);
                }
                canvas.stroke_polyline3(&outline, self.stroke_pen());
            }
            return;
        }

        let plan = self.fill_plan();
        if let Some(erase) = plan.erase {
            canvas.fill_polygon3(&face, erase);
        }

        match plan.mode {
            FillMode::None => {}
            FillMode::Solid(fill) => canvas.fill_polygon3(&face, fill),
            FillMode::Hachure { pen, gap } => {
                let trig = self.style.perturbed_trig(&mut self.jitter);
                self.hachured_face(canvas, &face, gap, trig, pen);
            }
        }

        // Boundary of the shape.
        if self.is_stroking() {
            let pen = self.stroke_pen();
            for i in 0..n - 1 {
                self.sketchy_line3(canvas, face[i], face[i + 1], 2.0, pen);
            }
            if close_shape {
                self.sketchy_line3(canvas, face[n - 1], face[0], 2.0, pen);
            }
        }
    }

    // ---------------------------------------------------------- ellipse

    /// Draws an ellipse; x,y,w,h are interpreted per the style's
    /// [`EllipseMode`].
    pub fn ellipse(&mut self, canvas: &mut dyn Canvas, x: f64, y: f64, w: f64, h: f64) {
        let (cx, cy, mut rx, mut ry) = self.ellipse_bounds(x, y, w, h);

        if !self.style.sketchy {
            if let Some(fill) = self.host_fill {
                canvas.fill_ellipse(cx, cy, rx, ry, fill);
            }
            if self.is_stroking() {
                canvas.stroke_ellipse(cx, cy, rx, ry, self.stroke_pen());
            }
            return;
        }

        // Never draw circles of radius 0, nor anything with a radius less
        // than a quarter of the roughness value.
        if rx == 0.0 && ry == 0.0 {
            return;
        }
        let threshold = self.style.roughness() / 4.0;
        if rx < threshold || ry < threshold {
            return;
        }

        // Small proportionate perturbation of the ellipse's own
        // dimensions, independent of hachure jitter.
        let roughness = self.style.roughness();
        rx += self.jitter.offset(roughness, -rx * 0.05, rx * 0.05);
        ry += self.jitter.offset(roughness, -ry * 0.05, ry * 0.05);

        let plan = self.fill_plan();
        if let Some(erase) = plan.erase {
            canvas.fill_ellipse(cx, cy, rx, ry, erase);
        }

        match plan.mode {
            FillMode::None => {}
            FillMode::Solid(fill) => canvas.fill_ellipse(cx, cy, rx, ry, fill),
            FillMode::Hachure { pen, gap } => {
                let trig = self.style.perturbed_trig(&mut self.jitter);
                self.hachure_ellipse(canvas, cx, cy, rx, ry, gap, trig, pen);
            }
        }

        // Outline as two concentric perturbed rings.
        if self.is_stroking() {
            let pen = self.stroke_pen();
            if self.style.roughness() < MIN_ROUGHNESS {
                canvas.stroke_ellipse(cx, cy, rx, ry, pen);
                canvas.stroke_ellipse(cx, cy, rx, ry, pen);
            } else {
                let inner = self.jitter.offset(roughness, 0.4, 1.0);
                let overlap = ELLIPSE_INC * self.jitter.offset(roughness, 0.1, inner);
                self.build_ellipse(canvas, cx, cy, rx, ry, 1.0, overlap, pen);
                self.build_ellipse(canvas, cx, cy, rx, ry, 1.5, 0.0, pen);
            }
        }
    }

    /// Draws an arc along the outer edge of an ellipse between the given
    /// start and stop angles (radians).
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        canvas: &mut dyn Canvas,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        start: f64,
        stop: f64,
    ) {
        let (cx, cy, mut rx, mut ry) = self.ellipse_bounds(x, y, w, h);

        if rx == 0.0 && ry == 0.0 {
            return;
        }
        let threshold = self.style.roughness() / 4.0;
        if self.style.sketchy && (rx < threshold || ry < threshold) {
            return;
        }

        if self.style.sketchy {
            let roughness = self.style.roughness();
            rx += self.jitter.offset(roughness, -rx * 0.01, rx * 0.01);
            ry += self.jitter.offset(roughness, -ry * 0.01, ry * 0.01);
        }

        // Normalize the angular range.
        let mut strt = start;
        let mut stp = stop;
        while strt < 0.0 {
            strt += std::f64::consts::TAU;
            stp += std::f64::consts::TAU;
        }
        if stp - strt > std::f64::consts::TAU {
            strt = 0.0;
            stp = std::f64::consts::TAU;
        }

        let arc_inc = (ELLIPSE_INC / 2.0).min((stp - strt) / 2.0);
        let rim = |theta: f64| (cx + rx * theta.cos(), cy + ry * theta.sin());

        // Sector interior as a curved polygon with stroking suppressed.
        if self.host_fill.is_some() {
            let saved_pen = self.host_pen.take();
            let saved_override = std::mem::replace(&mut self.style.override_stroke, false);

            self.begin_shape();
            let (sx, sy) = rim(strt);
            self.curve_vertex(sx, sy);
            let mut theta = strt;
            while theta <= stp {
                let (px, py) = rim(theta);
                self.curve_vertex(px, py);
                theta += arc_inc;
            }
            // Last control point duplicates the end of the arc.
            let (ex, ey) = rim(stp);
            self.curve_vertex(ex, ey);
            self.curve_vertex(ex, ey);
            self.vertex(ex, ey);
            self.vertex(cx, cy);
            self.end_shape(canvas);

            self.host_pen = saved_pen;
            self.style.override_stroke = saved_override;
        }

        // Outside edge of the arc.
        if self.is_stroking() {
            let saved_fill = self.host_fill.take();
            let saved_override = std::mem::replace(&mut self.style.override_fill, false);

            self.begin_shape();
            let (sx, sy) = rim(strt);
            self.curve_vertex(sx, sy);
            let mut theta = strt;
            while theta <= stp {
                let (px, py) = rim(theta);
                self.curve_vertex(px, py);
                theta += arc_inc;
            }
            let (ex, ey) = rim(stp);
            self.curve_vertex(ex, ey);
            self.curve_vertex(ex, ey);
            self.end_shape(canvas);

            self.host_fill = saved_fill;
            self.style.override_fill = saved_override;
        }
    }

    // ------------------------------------------------------------ boxes

    /// Draws a 3D cube with the given unit dimension.
    pub fn box_size(&mut self, canvas: &mut dyn Canvas, size: f64) {
        self.box_dims(canvas, size, size, size);
    }

    /// Draws a 3D box with the given dimensions, centred on the origin.
    pub fn box_dims(&mut self, canvas: &mut dyn Canvas, width: f64, height: f64, depth: f64) {
        let bw = width / 2.0;
        let bh = height / 2.0;
        let bd = depth / 2.0;

        // Faces first, without strokes.
        let saved_pen = self.host_pen.take();
        let saved_override = std::mem::replace(&mut self.style.override_stroke, false);

        self.begin_shape_mode(ShapeMode::Quads);
        for &(x, y, z) in &[
            (-bw, bh, bd),
            (bw, bh, bd),
            (bw, -bh, bd),
            (-bw, -bh, bd),
            //
            (bw, bh, bd),
            (bw, bh, -bd),
            (bw, -bh, -bd),
            (bw, -bh, bd),
            //
            (bw, bh, -bd),
            (-bw, bh, -bd),
            (-bw, -bh, -bd),
            (bw, -bh, -bd),
            //
            (-bw, bh, -bd),
            (-bw, bh, bd),
            (-bw, -bh, bd),
            (-bw, -bh, -bd),
            //
            (-bw, bh, -bd),
            (bw, bh, -bd),
            (bw, bh, bd),
            (-bw, bh, bd),
            //
            (-bw, -bh, -bd),
            (bw, -bh, -bd),
            (bw, -bh, bd),
            (-bw, -bh, bd),
        ] {
            self.vertex3(x, y, z);
        }
        self.end_shape(canvas);

        self.host_pen = saved_pen;
        self.style.override_stroke = saved_override;

        // Lines along each of the box edges.
        let edges = [
            ((-bw, bh, bd), (bw, bh, bd)),
            ((bw, bh, bd), (bw, -bh, bd)),
            ((bw, -bh, bd), (-bw, -bh, bd)),
            ((-bw, -bh, bd), (-bw, bh, bd)),
            //
            ((bw, bh, bd), (bw, bh, -bd)),
            ((bw, bh, -bd), (bw, -bh, -bd)),
            ((bw, -bh, -bd), (bw, -bh, bd)),
            //
            ((bw, bh, -bd), (-bw, bh, -bd)),
            ((-bw, bh, -bd), (-bw, -bh, -bd)),
            ((-bw, -bh, -bd), (bw, -bh, -bd)),
            //
            ((-bw, bh, -bd), (-bw, bh, bd)),
            ((-bw, -bh, bd), (-bw, -bh, -bd)),
        ];
        for ((x1, y1, z1), (x2, y2, z2)) in edges {
            self.line3(canvas, x1, y1, z1, x2, y2, z2);
        }
    }

    // --------------------------------------------- shape assembly state

    /// Starts a new polygon shape. Pair with `end_shape`.
    pub fn begin_shape(&mut self) {
        self.begin_shape_mode(ShapeMode::Polygon);
    }

    /// Starts a new shape assembled per `mode`. Pair with `end_shape`.
    pub fn begin_shape_mode(&mut self, mode: ShapeMode) {
        self.shape_mode = mode;
        self.vertices.clear();
        self.curve_indices.clear();
        self.is_3d_shape = false;
    }

    /// Adds a 2D vertex to the shape being assembled.
    pub fn vertex(&mut self, x: f64, y: f64) {
        self.vertices.push(Point3::new(x, y, 0.0));
    }

    /// Adds a 3D vertex to the shape being assembled.
    pub fn vertex3(&mut self, x: f64, y: f64, z: f64) {
        self.is_3d_shape = true;
        self.vertices.push(Point3::new(x, y, z));
    }

    /// Adds a 2D curve vertex to the shape being assembled.
    pub fn curve_vertex(&mut self, x: f64, y: f64) {
        self.curve_indices.insert(self.vertices.len());
        self.vertices.push(Point3::new(x, y, 0.0));
    }

    /// Adds a 3D curve vertex to the shape being assembled.
    pub fn curve_vertex3(&mut self, x: f64, y: f64, z: f64) {
        self.is_3d_shape = true;
        self.curve_indices.insert(self.vertices.len());
        self.vertices.push(Point3::new(x, y, z));
    }

    /// Ends the shape without closing its boundary.
    pub fn end_shape(&mut self, canvas: &mut dyn Canvas) {
        self.finish_shape(canvas, false);
    }

    /// Ends the shape, closing the boundary back to the first vertex.
    pub fn end_shape_closed(&mut self, canvas: &mut dyn Canvas) {
        self.finish_shape(canvas, true);
    }

    fn finish_shape(&mut self, canvas: &mut dyn Canvas, close: bool) {
        if self.vertices.is_empty() {
            warn!("end_shape() called with no vertices");
            return;
        }
        if self.is_3d_shape {
            self.draw_shape_3d(canvas, close);
        } else {
            self.draw_shape_2d(canvas, close);
        }
        self.vertices.clear();
        self.curve_indices.clear();
        self.is_3d_shape = false;
    }

    fn draw_shape_2d(&mut self, canvas: &mut dyn Canvas, close: bool) {
        // Shapes with at least one curve vertex are a special case.
        if !self.curve_indices.is_empty() {
            self.curved_shape(canvas);
            return;
        }

        let xs: Vec<f64> = self.vertices.iter().map(|v| v.x).collect();
        let ys: Vec<f64> = self.vertices.iter().map(|v| v.y).collect();
        let n = xs.len();

        match self.shape_mode {
            ShapeMode::Polygon => self.shape(canvas, &xs, &ys, close),
            ShapeMode::Lines => {
                let mut i = 0;
                while i + 1 < n {
                    self.line(canvas, xs[i], ys[i], xs[i + 1], ys[i + 1]);
                    i += 2;
                }
            }
            ShapeMode::Points => {
                for i in 0..n {
                    self.point(canvas, xs[i], ys[i]);
                }
            }
            ShapeMode::Triangles => {
                let mut i = 0;
                while i + 2 < n {
                    self.triangle(canvas, xs[i], ys[i], xs[i + 1], ys[i + 1], xs[i + 2], ys[i + 2]);
                    i += 3;
                }
            }
            ShapeMode::TriangleStrip => {
                for i in 0..n.saturating_sub(2) {
                    self.triangle(canvas, xs[i], ys[i], xs[i + 1], ys[i + 1], xs[i + 2], ys[i + 2]);
                }
            }
            ShapeMode::TriangleFan => {
                for i in 1..n.saturating_sub(1) {
                    self.triangle(canvas, xs[0], ys[0], xs[i], ys[i], xs[i + 1], ys[i + 1]);
                }
            }
            ShapeMode::Quads => {
                let mut i = 0;
                while i + 3 < n {
                    let qx = [xs[i], xs[i + 1], xs[i + 2], xs[i + 3]];
                    let qy = [ys[i], ys[i + 1], ys[i + 2], ys[i + 3]];
                    self.shape(canvas, &qx, &qy, true);
                    i += 4;
                }
            }
            ShapeMode::QuadStrip => {
                let mut i = 0;
                while i + 3 < n {
                    let qx = [xs[i], xs[i + 1], xs[i + 3], xs[i + 2]];
                    let qy = [ys[i], ys[i + 1], ys[i + 3], ys[i + 2]];
                    self.shape(canvas, &qx, &qy, true);
                    i += 2;
                }
            }
        }
    }

    fn draw_shape_3d(&mut self, canvas: &mut dyn Canvas, close: bool) {
        if !self.curve_indices.is_empty() {
            // Curved 3D shapes fall back to their 2D projection.
            self.curved_shape(canvas);
            return;
        }

        let xs: Vec<f64> = self.vertices.iter().map(|v| v.x).collect();
        let ys: Vec<f64> = self.vertices.iter().map(|v| v.y).collect();
        let zs: Vec<f64> = self.vertices.iter().map(|v| v.z).collect();
        let n = xs.len();

        match self.shape_mode {
            ShapeMode::Polygon => self.shape3(canvas, &xs, &ys, &zs, close),
            ShapeMode::Lines => {
                let mut i = 0;
                while i + 1 < n {
                    self.line3(canvas, xs[i], ys[i], zs[i], xs[i + 1], ys[i + 1], zs[i + 1]);
                    i += 2;
                }
            }
            ShapeMode::Points => {
                for i in 0..n {
                    self.point3(canvas, xs[i], ys[i], zs[i]);
                }
            }
            ShapeMode::Triangles => {
                let mut i = 0;
                while i + 2 < n {
                    let tx = [xs[i], xs[i + 1], xs[i + 2]];
                    let ty = [ys[i], ys[i + 1], ys[i + 2]];
                    let tz = [zs[i], zs[i + 1], zs[i + 2]];
                    self.shape3(canvas, &tx, &ty, &tz, true);
                    i += 3;
                }
            }
            ShapeMode::TriangleStrip => {
                for i in 0..n.saturating_sub(2) {
                    let tx = [xs[i], xs[i + 1], xs[i + 2]];
                    let ty = [ys[i], ys[i + 1], ys[i + 2]];
                    let tz = [zs[i], zs[i + 1], zs[i + 2]];
                    self.shape3(canvas, &tx, &ty, &tz, true);
                }
            }
            ShapeMode::TriangleFan => {
                for i in 1..n.saturating_sub(1) {
                    let tx = [xs[0], xs[i], xs[i + 1]];
                    let ty = [ys[0], ys[i], ys[i + 1]];
                    let tz = [zs[0], zs[i], zs[i + 1]];
                    self.shape3(canvas, &tx, &ty, &tz, true);
                }
            }
            ShapeMode::Quads => {
                let mut i = 0;
                while i + 3 < n {
                    let qx = [xs[i], xs[i + 1], xs[i + 2], xs[i + 3]];
                    let qy = [ys[i], ys[i + 1], ys[i + 2], ys[i + 3]];
                    let qz = [zs[i], zs[i + 1], zs[i + 2], zs[i + 3]];
                    self.shape3(canvas, &qx, &qy, &qz, true);
                    i += 4;
                }
            }
            ShapeMode::QuadStrip => {
                let mut i = 0;
                while i + 3 < n {
                    let qx = [xs[i], xs[i + 1], xs[i + 3], xs[i + 2]];
                    let qy = [ys[i], ys[i + 1], ys[i + 3], ys[i + 2]];
                    let qz = [zs[i], zs[i + 1], zs[i + 3], zs[i + 2]];
                    self.shape3(canvas, &qx, &qy, &qz, true);
                    i += 2;
                }
            }
        }
    }

    // ---------------------------------------------------- curved shapes

    fn curved_shape(&mut self, canvas: &mut dyn Canvas) {
        let roughness = self.style.roughness();
        let flagged: Vec<(Point, bool)> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (Point::new(v.x, v.y), self.curve_indices.contains(&i)))
            .collect();

        if !self.style.sketchy {
            // Crisp pass-through: flatten the curve runs once, without
            // jitter, and emit the path as-is.
            let mut flat: Vec<Point> = Vec::with_capacity(flagged.len());
            for (i, &(vertex, is_curve)) in flagged.iter().enumerate() {
                if !is_curve {
                    flat.push(vertex);
                } else if i >= 3 {
                    curve::flatten_window(
                        flagged[i - 3].0,
                        flagged[i - 2].0,
                        flagged[i - 1].0,
                        flagged[i].0,
                        &mut flat,
                    );
                }
            }
            if flat.len() > 1 {
                if let Some(fill) = self.host_fill {
                    canvas.fill_polygon(&flat, fill);
                }
                if self.is_stroking() {
                    canvas.stroke_curve(&flat, self.stroke_pen());
                }
            }
            return;
        }

        if self.host_fill.is_some() {
            // Straight-line approximation of the interior, with stroking
            // suppressed while it is filled.
            let flat = curve::flatten_for_fill(&flagged, roughness, &mut self.jitter);
            if flat.len() > 1 {
                let xs: Vec<f64> = flat.iter().map(|p| p.x).collect();
                let ys: Vec<f64> = flat.iter().map(|p| p.y).collect();

                let saved_pen = self.host_pen.take();
                let saved_override = std::mem::replace(&mut self.style.override_stroke, false);
                self.shape(canvas, &xs, &ys, true);
                self.host_pen = saved_pen;
                self.style.override_stroke = saved_override;
            }
        }

        // Outline as curved lines, two passes with independent jitter.
        if self.is_stroking() {
            let pen = self.stroke_pen();

            let mut v: Vec<Point> = Vec::with_capacity(flagged.len());
            let mut vp: Vec<Point> = Vec::with_capacity(flagged.len());

            for (i, &(vertex, is_curve)) in flagged.iter().enumerate() {
                v.push(Point::new(
                    vertex.x + self.jitter.offset(roughness, -2.0, 2.0),
                    vertex.y + self.jitter.offset(roughness, -2.0, 2.0),
                ));
                vp.push(Point::new(
                    vertex.x + self.jitter.offset(roughness, -2.0, 2.0),
                    vertex.y + self.jitter.offset(roughness, -2.0, 2.0),
                ));

                if !is_curve {
                    if i > 0 {
                        let (a, b) = (v[i - 1], v[i]);
                        self.sketchy_line(canvas, a.x, a.y, b.x, b.y, EDGE_OFFSET, pen);
                    }
                } else if i >= 3 {
                    let mut points = Vec::new();
                    curve::flatten_window(v[i - 3], v[i - 2], v[i - 1], v[i], &mut points);
                    canvas.stroke_curve(&points, pen);

                    let mut points = Vec::new();
                    curve::flatten_window(vp[i - 3], vp[i - 2], vp[i - 1], vp[i], &mut points);
                    canvas.stroke_curve(&points, pen);
                }
            }
        }
    }

    // --------------------------------------------------------- internal

    /// Sketchy 2D line with an explicit maximum offset; the workhorse of
    /// every stroke and hachure line in the engine.
    #[allow(clippy::too_many_arguments)]
    fn sketchy_line(
        &mut self,
        canvas: &mut dyn Canvas,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        max_offset: f64,
        pen: Pen,
    ) {
        if !self.style.sketchy {
            canvas.stroke_polyline(&[Point::new(x1, y1), Point::new(x2, y2)], pen);
            return;
        }

        let strokes = sketch::sketch_line(
            x1,
            y1,
            x2,
            y2,
            max_offset,
            self.style.roughness(),
            self.style.bowing(),
            &mut self.jitter,
        );

        for stroke in strokes {
            let points = stroke.to_polyline();
            if self.style.use_secondary {
                canvas.fill_polygon(&points, Fill::new(self.style.secondary_color));
            }
            canvas.stroke_curve(&points, pen);
        }
    }

    /// Sketchy 3D line with an explicit maximum offset.
    fn sketchy_line3(
        &mut self,
        canvas: &mut dyn Canvas,
        p1: Point3,
        p2: Point3,
        max_offset: f64,
        pen: Pen,
    ) {
        if !self.style.sketchy {
            canvas.stroke_polyline3(&[p1, p2], pen);
            return;
        }

        let strokes = sketch::sketch_line3(
            p1,
            p2,
            max_offset,
            self.style.roughness(),
            self.style.bowing(),
            &mut self.jitter,
        );

        for stroke in strokes {
            let points = stroke.to_polyline();
            if self.style.use_secondary {
                canvas.fill_polygon3(&points, Fill::new(self.style.secondary_color));
            }
            canvas.stroke_polyline3(&points, pen);
        }
    }

    /// Resolves x,y,w,h into centre and radii per the ellipse mode.
    fn ellipse_bounds(&self, x: f64, y: f64, w: f64, h: f64) -> (f64, f64, f64, f64) {
        match self.style.ellipse_mode {
            EllipseMode::Center => (x, y, (w / 2.0).abs(), (h / 2.0).abs()),
            EllipseMode::Radius => (x, y, w.abs(), h.abs()),
            EllipseMode::Corner => {
                let left = x.min(x + w);
                let top = y.min(y + h);
                let right = x.max(x + w);
                let bottom = y.max(y + h);
                let rx = (right - left) / 2.0;
                let ry = (bottom - top) / 2.0;
                (left + rx, top + ry, rx, ry)
            }
            EllipseMode::Corners => {
                let left = x.min(w);
                let top = y.min(h);
                let right = x.max(w);
                let bottom = y.max(h);
                let rx = (right - left) / 2.0;
                let ry = (bottom - top) / 2.0;
                (left + rx, top + ry, rx, ry)
            }
        }
    }

    /// Hachures an ellipse interior by sweeping vertical chords in a
    /// normalized circle space and mapping them through the affine
    /// transform that accounts for the hachure angle and aspect ratio.
    #[allow(clippy::too_many_arguments)]
    fn hachure_ellipse(
        &mut self,
        canvas: &mut dyn Canvas,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        gap: f64,
        trig: HachureTrig,
        pen: Pen,
    ) {
        let aspect_ratio = ry / rx;
        let hyp = (aspect_ratio * trig.tan * aspect_ratio * trig.tan + 1.0).sqrt();
        let sin_prime = aspect_ratio * trig.tan / hyp;
        let cos_prime = 1.0 / hyp;
        let gap_prime = gap
            / ((rx * ry
                / ((ry * cos_prime) * (ry * cos_prime) + (rx * sin_prime) * (rx * sin_prime))
                    .sqrt())
                / rx);

        let alternating = self.style.alternating;
        let mut half_len = (rx * rx - (rx - gap_prime) * (rx - gap_prime)).max(0.0).sqrt();
        let mut prev_p2 = affine(
            cx - rx + gap_prime,
            cy + half_len,
            cx,
            cy,
            sin_prime,
            cos_prime,
            aspect_ratio,
        );

        let mut x_pos = cx - rx + gap_prime;
        while x_pos < cx + rx {
            half_len = (rx * rx - (cx - x_pos) * (cx - x_pos)).max(0.0).sqrt();
            let p1 = affine(x_pos, cy - half_len, cx, cy, sin_prime, cos_prime, aspect_ratio);
            let p2 = affine(x_pos, cy + half_len, cx, cy, sin_prime, cos_prime, aspect_ratio);

            if alternating {
                self.sketchy_line(canvas, prev_p2.x, prev_p2.y, p1.x, p1.y, 2.0, pen);
            }
            self.sketchy_line(canvas, p1.x, p1.y, p2.x, p2.y, 2.0, pen);

            prev_p2 = p2;
            x_pos += gap_prime;
        }
    }

    /// Emits one perturbed ring of an ellipse outline. `offset` scales
    /// the per-vertex jitter; `overlap` extends the ring past a full
    /// revolution so the join reads as hand-drawn.
    #[allow(clippy::too_many_arguments)]
    fn build_ellipse(
        &mut self,
        canvas: &mut dyn Canvas,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        offset: f64,
        overlap: f64,
        pen: Pen,
    ) {
        let roughness = self.style.roughness();
        let radial_offset =
            self.jitter.offset(roughness, -0.5, 0.5) - std::f64::consts::FRAC_PI_2;

        let mut jog = |jitter: &mut Jitter| jitter.offset(roughness, -offset, offset);
        let mut ctrl: Vec<Point> = Vec::with_capacity(12);

        // First control point is the penultimate point on the ellipse.
        ctrl.push(Point::new(
            jog(&mut self.jitter) + cx + 0.9 * rx * (radial_offset - ELLIPSE_INC).cos(),
            jog(&mut self.jitter) + cy + 0.9 * ry * (radial_offset - ELLIPSE_INC).sin(),
        ));

        let mut theta = radial_offset;
        while theta < std::f64::consts::TAU + radial_offset - 0.01 {
            ctrl.push(Point::new(
                jog(&mut self.jitter) + cx + rx * theta.cos(),
                jog(&mut self.jitter) + cy + ry * theta.sin(),
            ));
            theta += ELLIPSE_INC;
        }

        let t1 = radial_offset + std::f64::consts::TAU + overlap * 0.5;
        ctrl.push(Point::new(
            jog(&mut self.jitter) + cx + rx * t1.cos(),
            jog(&mut self.jitter) + cy + ry * t1.sin(),
        ));
        let t2 = radial_offset + overlap;
        ctrl.push(Point::new(
            jog(&mut self.jitter) + cx + 0.98 * rx * t2.cos(),
            jog(&mut self.jitter) + cy + 0.98 * ry * t2.sin(),
        ));
        let t3 = radial_offset + overlap * 0.5;
        ctrl.push(Point::new(
            jog(&mut self.jitter) + cx + 0.9 * rx * t3.cos(),
            jog(&mut self.jitter) + cy + 0.9 * ry * t3.sin(),
        ));

        let mut points = Vec::new();
        curve::flatten_chain(&ctrl, &mut points);
        canvas.stroke_curve(&points, pen);
    }

    /// Fills the face implied by the given 3D geometry with a hachured
    /// texture when the canvas supports it, or a flat fill when it does
    /// not.
    fn hachured_face(
        &mut self,
        canvas: &mut dyn Canvas,
        face: &[Point3],
        gap: f64,
        trig: HachureTrig,
        pen: Pen,
    ) {
        let Some(((min_x, max_x), (min_y, max_y), (min_z, max_z))) = bounding_box3(face) else {
            return;
        };

        let x_range = max_x - min_x;
        let y_range = max_y - min_y;
        let z_range = max_z - min_z;

        // The face must vary over at least two axes to carry a surface.
        if (x_range < 2.0 && y_range < 2.0)
            || (x_range < 2.0 && z_range < 2.0)
            || (y_range < 2.0 && z_range < 2.0)
        {
            return;
        }

        // Project onto the plane spanning the two largest ranges; the
        // smallest range becomes the dropped depth axis.
        let (plane, left, right, top, bottom) = if y_range < z_range && y_range < x_range {
            (Plane2d::Xz, min_x, max_x, max_z, min_z)
        } else if x_range < z_range && x_range < y_range {
            (Plane2d::Yz, min_y, max_y, max_z, min_z)
        } else {
            (Plane2d::Xy, min_x, max_x, max_y, min_y)
        };

        let w = right - left;
        let h = top - bottom;

        let uvs: Vec<Point> = face
            .iter()
            .map(|p| match plane {
                Plane2d::Xy => Point::new(
                    map_range(p.x, left, right, 0.0, w),
                    map_range(p.y, bottom, top, 0.0, h),
                ),
                Plane2d::Xz => Point::new(
                    map_range(p.x, left, right, w, 0.0),
                    map_range(p.z, bottom, top, 0.0, h),
                ),
                Plane2d::Yz => Point::new(
                    map_range(p.y, left, right, w, 0.0),
                    map_range(p.z, bottom, top, 0.0, h),
                ),
            })
            .collect();

        let alternating = self.style.alternating;
        let this = &mut *self;

        let accepted = canvas.hachure_texture(w, h, face, &uvs, &mut |offscreen| {
            let mut it = HachureIterator::new(0.0, h, 0.0, w, gap, trig);
            if let Some(first) = it.next() {
                let mut prev = first;
                this.sketchy_line(offscreen, first.x1, first.y1, first.x2, first.y2, 2.0, pen);
                for coords in it.by_ref() {
                    if alternating {
                        this.sketchy_line(
                            offscreen, prev.x2, prev.y2, coords.x1, coords.y1, 2.0, pen,
                        );
                    }
                    this.sketchy_line(
                        offscreen, coords.x1, coords.y1, coords.x2, coords.y2, 2.0, pen,
                    );
                    prev = coords;
                }
            }
        });

        if !accepted {
            canvas.fill_polygon3(face, Fill::new(pen.color));
        }
    }
}

/// Affine transform that translates (cx,cy) to the origin, rotates by the
/// modified angle, scales by the aspect ratio and translates back.
fn affine(
    x: f64,
    y: f64,
    cx: f64,
    cy: f64,
    sin_prime: f64,
    cos_prime: f64,
    r: f64,
) -> Point {
    let a = -cx * cos_prime - cy * sin_prime + cx;
    let b = r * (cx * sin_prime - cy * cos_prime) + cy;
    let c = cos_prime;
    let d = sin_prime;
    let e = -r * sin_prime;
    let f = r * cos_prime;
    Point::new(a + c * x + d * y, b + e * x + f * y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};

    fn renderer() -> SketchRenderer {
        let mut r = SketchRenderer::new();
        // A fill distinct from the background so interiors actually draw.
        r.set_host_fill(Some(Fill::new(Color::rgb(200, 40, 40))));
        r
    }

    fn count_fills(ops: &[DrawOp]) -> usize {
        ops.iter()
            .filter(|op| matches!(op, DrawOp::FillPolygon { .. } | DrawOp::FillEllipse { .. }))
            .count()
    }

    #[test]
    fn affine_identity_at_zero_angle() {
        // sin'=0, cos'=1, unit aspect: the transform is the identity.
        let p = affine(3.0, 4.0, 50.0, 50.0, 0.0, 1.0, 1.0);
        assert!((p.x - 3.0).abs() < 1e-12);
        assert!((p.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn line_emits_double_stroke() {
        let mut r = renderer();
        let mut canvas = RecordingCanvas::new();
        r.line(&mut canvas, 0.0, 0.0, 100.0, 0.0);
        let curves = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokeCurve { .. }))
            .count();
        assert_eq!(curves, 2);
    }

    #[test]
    fn no_stroke_no_line() {
        let mut r = renderer();
        r.set_host_pen(None);
        let mut canvas = RecordingCanvas::new();
        r.line(&mut canvas, 0.0, 0.0, 100.0, 0.0);
        assert!(canvas.is_empty());
    }

    #[test]
    fn crisp_mode_passes_through() {
        let mut r = renderer();
        r.style_mut().sketchy = false;
        let mut canvas = RecordingCanvas::new();
        r.rect(&mut canvas, 0.0, 0.0, 50.0, 20.0);
        assert_eq!(canvas.len(), 2);
        assert!(matches!(canvas.ops()[0], DrawOp::FillPolygon { .. }));
        assert!(matches!(canvas.ops()[1], DrawOp::StrokePolyline { .. }));
    }

    #[test]
    fn fill_matching_background_is_skipped() {
        let mut r = SketchRenderer::new();
        // Default host fill is white on a white background.
        let mut canvas = RecordingCanvas::new();
        r.rect(&mut canvas, 0.0, 0.0, 50.0, 20.0);
        assert_eq!(count_fills(canvas.ops()), 1, "only the erase pass fills");
    }

    #[test]
    fn rect_mode_changes_bounds() {
        let mut r = renderer();
        r.style_mut().sketchy = false;
        r.set_host_pen(None);
        r.style_mut().rect_mode = RectMode::Center;

        let mut canvas = RecordingCanvas::new();
        r.rect(&mut canvas, 50.0, 50.0, 20.0, 10.0);
        match &canvas.ops()[0] {
            DrawOp::FillPolygon { points, .. } => {
                assert_eq!(points[0], Point::new(40.0, 45.0));
                assert_eq!(points[2], Point::new(60.0, 55.0));
            }
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn degenerate_ellipse_skipped() {
        let mut r = renderer();
        r.style_mut().set_roughness(4.0);
        let mut canvas = RecordingCanvas::new();
        // Radius 0.4 < roughness/4 = 1.0.
        r.ellipse(&mut canvas, 50.0, 50.0, 0.8, 0.8);
        assert!(canvas.is_empty());
    }

    #[test]
    fn degenerate_rect_skipped() {
        let mut r = renderer();
        r.style_mut().set_roughness(4.0);
        let mut canvas = RecordingCanvas::new();
        r.rect(&mut canvas, 0.0, 0.0, 100.0, 0.5);
        assert!(canvas.is_empty());
    }

    #[test]
    fn quad_delegates_to_shape() {
        let mut r = renderer();
        r.set_host_fill(None);
        let mut canvas = RecordingCanvas::new();
        r.quad(&mut canvas, 0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0);
        // Four closed edges, two passes each.
        let curves = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokeCurve { .. }))
            .count();
        assert_eq!(curves, 8);
    }

    #[test]
    fn box_emits_twelve_edges() {
        let mut r = renderer();
        r.set_host_fill(None);
        let mut canvas = RecordingCanvas::new();
        r.box_size(&mut canvas, 10.0);
        let edges = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokePolyline3 { .. }))
            .count();
        // Twelve edges, double-stroked.
        assert_eq!(edges, 24);
    }

    #[test]
    fn face_without_texture_support_flat_fills() {
        let mut r = renderer();
        r.set_host_pen(None);
        let mut canvas = RecordingCanvas::new();
        r.shape3(
            &mut canvas,
            &[0.0, 10.0, 10.0, 0.0],
            &[0.0, 0.0, 10.0, 10.0],
            &[0.0, 0.0, 0.0, 0.0],
            true,
        );
        assert!(
            canvas
                .ops()
                .iter()
                .any(|op| matches!(op, DrawOp::FillPolygon3 { .. }))
        );
    }

    #[test]
    fn face_with_texture_support_maps_texture() {
        let mut r = renderer();
        r.set_host_pen(None);
        let mut canvas = RecordingCanvas::with_texture_support();
        r.shape3(
            &mut canvas,
            &[0.0, 10.0, 10.0, 0.0],
            &[0.0, 0.0, 10.0, 10.0],
            &[0.0, 0.0, 0.0, 0.0],
            true,
        );
        let textured = canvas.ops().iter().find_map(|op| match op {
            DrawOp::TexturedFace { uvs, ops, .. } => Some((uvs.clone(), ops.len())),
            _ => None,
        });
        let (uvs, op_count) = textured.expect("expected a textured face");
        assert_eq!(uvs.len(), 4);
        assert!(op_count > 0, "offscreen hachure ops expected");
        // UVs span the projected extent.
        assert!(uvs.iter().any(|p| p.x < 1e-9));
        assert!(uvs.iter().any(|p| (p.x - 10.0).abs() < 1e-9));
    }

    #[test]
    fn thin_face_is_skipped() {
        let mut r = renderer();
        r.set_host_pen(None);
        // Transparent background suppresses the erase pass, isolating the
        // hachure decision.
        r.style_mut().background = Color::gray_alpha(255, 0);
        let mut canvas = RecordingCanvas::new();
        // Varies meaningfully along only one axis.
        r.shape3(
            &mut canvas,
            &[0.0, 10.0, 10.0, 0.0],
            &[0.0, 0.0, 1.0, 1.0],
            &[0.0, 0.0, 1.0, 1.0],
            true,
        );
        assert!(
            !canvas
                .ops()
                .iter()
                .any(|op| matches!(op, DrawOp::FillPolygon3 { .. } | DrawOp::TexturedFace { .. }))
        );
    }

    #[test]
    fn empty_shape_is_noop() {
        let mut r = renderer();
        let mut canvas = RecordingCanvas::new();
        r.shape(&mut canvas, &[], &[], true);
        r.poly_line(&mut canvas, &[], &[]);
        assert!(canvas.is_empty());
    }

    #[test]
    fn vertex_buffer_cleared_after_end_shape() {
        let mut r = renderer();
        let mut canvas = RecordingCanvas::new();
        r.begin_shape();
        r.vertex(0.0, 0.0);
        r.vertex(10.0, 0.0);
        r.vertex(10.0, 10.0);
        r.end_shape_closed(&mut canvas);
        assert!(r.vertices.is_empty());
        assert!(r.curve_indices.is_empty());

        // A second empty end_shape is ignored.
        let before = canvas.len();
        r.end_shape(&mut canvas);
        assert_eq!(canvas.len(), before);
    }

    #[test]
    fn curved_shape_strokes_two_parallel_passes() {
        let mut r = renderer();
        r.set_host_fill(None);
        let mut canvas = RecordingCanvas::new();
        r.begin_shape();
        r.curve_vertex(0.0, 0.0);
        r.curve_vertex(0.0, 0.0);
        r.curve_vertex(30.0, 20.0);
        r.curve_vertex(60.0, 0.0);
        r.curve_vertex(90.0, 20.0);
        r.curve_vertex(90.0, 20.0);
        r.end_shape(&mut canvas);

        let curves = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokeCurve { .. }))
            .count();
        // Three drawable windows, two passes each.
        assert_eq!(curves, 6);
    }

    #[test]
    fn secondary_colour_tints_strokes() {
        let mut r = renderer();
        r.set_host_fill(None);
        let style = std::mem::take(r.style_mut()).with_secondary_color(Color::rgb(0, 0, 200));
        r.set_style(style);
        let mut canvas = RecordingCanvas::new();
        r.line(&mut canvas, 0.0, 0.0, 100.0, 0.0);
        let tinted = canvas
            .ops()
            .iter()
            .filter(|op| {
                matches!(op, DrawOp::FillPolygon { fill, .. } if fill.color == Color::rgb(0, 0, 200))
            })
            .count();
        assert_eq!(tinted, 2);
    }
}
