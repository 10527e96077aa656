//! # roughcast
//!
//! A sketchy-rendering geometry engine: crisp 2D/3D primitives become
//! hand-drawn-looking double strokes, and solid fills become hachure line
//! fills, with all randomness drawn from a seeded stream for reproducible
//! redraws.
//!
//! The engine never rasterizes. Every drawing operation on
//! [`SketchRenderer`] resolves the current [`Style`] and emits computed
//! vertex sequences through the [`Canvas`] trait; a host adapter
//! implements that trait over its native drawing calls.
//!
//! ```
//! use roughcast::{RecordingCanvas, SketchRenderer};
//!
//! let mut renderer = SketchRenderer::new();
//! let mut canvas = RecordingCanvas::new();
//! renderer.set_seed(42);
//! renderer.rect(&mut canvas, 10.0, 10.0, 120.0, 80.0);
//! assert!(!canvas.ops().is_empty());
//! ```

pub mod canvas;
pub mod clip;
pub mod curve;
pub mod geometry;
pub mod hachure;
pub mod renderer;
pub mod rng;
pub mod segment;
pub mod simplify;
pub mod sketch;
pub mod style;

// Re-export the common surface at the crate root.
pub use canvas::{Canvas, DrawOp, Fill, Pen, RecordingCanvas};
pub use geometry::{Line, Point, Point3};
pub use hachure::{HachureIterator, HachureTrig};
pub use renderer::{ShapeMode, SketchRenderer};
pub use rng::Jitter;
pub use segment::{PointRelation, Segment, SegmentRelation};
pub use simplify::simplify;
pub use style::{Color, EllipseMode, RectMode, Style};
