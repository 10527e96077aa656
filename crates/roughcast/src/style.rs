//! Sketchy style configuration.
//!
//! A [`Style`] is a plain value object: the renderer snapshots it at the
//! start of every draw call, so a draw sees exactly the configuration it
//! was given. Styles can be built with the `with_*` methods, mutated
//! through setters, or restored wholesale.

use serde::{Deserialize, Serialize};

use crate::hachure::HachureTrig;
use crate::rng::Jitter;

/// Roughness below this value is considered zero.
pub(crate) const MIN_ROUGHNESS: f64 = 0.1;

/// An RGBA colour with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque colour from RGB components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque grey level.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Grey level with alpha.
    #[inline]
    pub const fn gray_alpha(v: u8, a: u8) -> Self {
        Self::rgba(v, v, v, a)
    }

    /// Alpha component.
    #[inline]
    pub const fn alpha(&self) -> u8 {
        self.a
    }
}

/// How the x,y,w,h parameters of `rect` position the rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RectMode {
    /// x,y is the top-left corner; w,h are dimensions.
    #[default]
    Corner,
    /// The four parameters are two opposite corners.
    Corners,
    /// x,y is the centre; w,h are dimensions.
    Center,
    /// x,y is the centre; w,h are half-dimensions.
    Radius,
}

/// How the x,y,w,h parameters of `ellipse` and `arc` position the ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EllipseMode {
    /// x,y is the centre; w,h are the full width and height.
    #[default]
    Center,
    /// x,y is the centre; w,h are radii.
    Radius,
    /// x,y is the top-left corner of the bounding box.
    Corner,
    /// The four parameters are two opposite corners of the bounding box.
    Corners,
}

/// Configuration of the sketchy appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Hand-drawn rendering when true; crisp pass-through when false.
    pub sketchy: bool,
    /// Use `stroke_color` instead of the host's stroke colour.
    pub override_stroke: bool,
    pub stroke_color: Color,
    /// Use `fill_color` instead of the host's fill colour.
    pub override_fill: bool,
    pub fill_color: Color,
    /// Colour used to erase shape interiors before hachuring.
    pub background: Color,
    /// Secondary colour tinting the interior of sketchy strokes.
    pub use_secondary: bool,
    pub secondary_color: Color,
    /// Hachure angle in degrees: 0 is vertical, 45 NE-SW, 90 horizontal.
    hachure_angle: f64,
    /// Maximum random hachure-angle perturbation per shape, in degrees.
    pub angle_perturbation: f64,
    /// Width of hachure fill lines; non-positive derives from the host
    /// stroke weight.
    pub fill_weight: f64,
    /// Width of boundary strokes; non-positive derives from the host
    /// stroke weight.
    pub stroke_weight: f64,
    /// Gap between hachure lines. Zero means solid fill; negative derives
    /// the gap from the host stroke weight.
    pub fill_gap: f64,
    /// Scaling of all positional jitter, clamped to [0, 10].
    roughness: f64,
    /// Scaling of line midpoint displacement, clamped to [0, 10].
    bowing: f64,
    /// Fill with one continuous zig-zag stroke instead of parallel lines.
    pub alternating: bool,
    pub rect_mode: RectMode,
    pub ellipse_mode: EllipseMode,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            sketchy: true,
            override_stroke: false,
            stroke_color: Color::BLACK,
            override_fill: false,
            fill_color: Color::WHITE,
            background: Color::WHITE,
            use_secondary: false,
            secondary_color: Color::WHITE,
            hachure_angle: -41.0,
            angle_perturbation: 0.0,
            fill_weight: -1.0,
            stroke_weight: -1.0,
            fill_gap: -1.0,
            roughness: 1.0,
            bowing: 1.0,
            alternating: false,
            rect_mode: RectMode::Corner,
            ellipse_mode: EllipseMode::Center,
        }
    }
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hachure angle in degrees, normalized modulo 180.
    #[inline]
    pub fn hachure_angle(&self) -> f64 {
        self.hachure_angle
    }

    /// Sets the hachure angle in degrees (normalized modulo 180).
    pub fn set_hachure_angle(&mut self, degrees: f64) {
        self.hachure_angle = degrees % 180.0;
    }

    /// Roughness scalar in [0, 10].
    #[inline]
    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    /// Sets the roughness, clamped to [0, 10].
    pub fn set_roughness(&mut self, roughness: f64) {
        self.roughness = roughness.clamp(0.0, 10.0);
    }

    /// Bowing scalar in [0, 10].
    #[inline]
    pub fn bowing(&self) -> f64 {
        self.bowing
    }

    /// Sets the bowing, clamped to [0, 10].
    pub fn set_bowing(&mut self, bowing: f64) {
        self.bowing = bowing.clamp(0.0, 10.0);
    }

    /// Trig lookups for the configured hachure angle.
    pub fn hachure_trig(&self) -> HachureTrig {
        HachureTrig::from_degrees(self.hachure_angle)
    }

    /// Trig lookups with the per-shape random perturbation applied. Draws
    /// from the jitter stream only when a perturbation bound is set.
    pub(crate) fn perturbed_trig(&self, jitter: &mut Jitter) -> HachureTrig {
        if self.angle_perturbation > 0.0 {
            let delta = (2.0 * jitter.next_f64() - 1.0) * self.angle_perturbation;
            HachureTrig::from_degrees(self.hachure_angle + delta)
        } else {
            self.hachure_trig()
        }
    }

    // Builder-style variants for constructing styles in one expression.

    pub fn with_sketchy(mut self, sketchy: bool) -> Self {
        self.sketchy = sketchy;
        self
    }

    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.set_roughness(roughness);
        self
    }

    pub fn with_bowing(mut self, bowing: f64) -> Self {
        self.set_bowing(bowing);
        self
    }

    pub fn with_hachure_angle(mut self, degrees: f64) -> Self {
        self.set_hachure_angle(degrees);
        self
    }

    pub fn with_angle_perturbation(mut self, degrees: f64) -> Self {
        self.angle_perturbation = degrees;
        self
    }

    pub fn with_fill_gap(mut self, gap: f64) -> Self {
        self.fill_gap = gap;
        self
    }

    pub fn with_fill_weight(mut self, weight: f64) -> Self {
        self.fill_weight = weight;
        self
    }

    pub fn with_stroke_weight(mut self, weight: f64) -> Self {
        self.stroke_weight = weight;
        self
    }

    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.override_stroke = true;
        self.stroke_color = color;
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.override_fill = true;
        self.fill_color = color;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_secondary_color(mut self, color: Color) -> Self {
        self.use_secondary = true;
        self.secondary_color = color;
        self
    }

    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    pub fn with_rect_mode(mut self, mode: RectMode) -> Self {
        self.rect_mode = mode;
        self
    }

    pub fn with_ellipse_mode(mut self, mode: EllipseMode) -> Self {
        self.ellipse_mode = mode;
        self
    }

    // Preset styles.

    /// Pencil sketch: pale translucent strokes with tight hachuring.
    pub fn pencil() -> Self {
        Self::default()
            .with_stroke_color(Color::gray_alpha(120, 180))
            .with_fill_color(Color::gray_alpha(128, 220))
            .with_fill_weight(0.3)
            .with_fill_gap(0.8)
            .with_secondary_color(Color::gray_alpha(255, 100))
            .with_background(Color::gray_alpha(255, 50))
            .with_angle_perturbation(5.0)
    }

    /// Coloured pencil: host-coloured fills with an invisible outline.
    pub fn coloured_pencil() -> Self {
        Self::default()
            .with_fill_weight(1.5)
            .with_fill_gap(1.0)
            .with_stroke_color(Color::gray_alpha(255, 0))
            .with_angle_perturbation(5.0)
    }

    /// Watercolour and ink: solid fills under a rough black outline.
    pub fn water_and_ink() -> Self {
        Self::default()
            .with_stroke_color(Color::BLACK)
            .with_fill_gap(0.0)
            .with_roughness(3.0)
    }

    /// Felt-tip marker: thick translucent strokes and wide hachure gaps.
    pub fn marker() -> Self {
        Self::default()
            .with_stroke_color(Color::gray_alpha(0, 160))
            .with_fill_weight(5.0)
            .with_stroke_weight(3.0)
            .with_fill_gap(7.0)
            .with_angle_perturbation(5.0)
            .with_roughness(1.5)
    }
}
