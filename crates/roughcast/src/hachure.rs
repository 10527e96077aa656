//! Hachure sweep-line generation.
//!
//! [`HachureIterator`] lazily produces the sequence of parallel chords that
//! sweep a rectangular region at a given angle. Fill engines clip these
//! chords against their shape boundary (or, for ellipses, remap them
//! through an affine transform) to build the hachure fill.
//!
//! The iterator is finite and not restartable; create a fresh one per
//! shape.

use crate::geometry::Line;
use crate::segment::{Segment, SegmentRelation};

/// Precomputed trigonometry for a hachure angle.
///
/// The angle convention follows the renderer: 0 is vertical hachuring,
/// 45 runs NE-SW and 90 is horizontal.
#[derive(Debug, Clone, Copy)]
pub struct HachureTrig {
    pub sin: f64,
    pub cos: f64,
    pub tan: f64,
}

impl HachureTrig {
    /// Trig values for an angle given in degrees, normalized modulo 180.
    pub fn from_degrees(degrees: f64) -> Self {
        let radians = (degrees % 180.0).to_radians();
        Self {
            sin: radians.sin(),
            cos: radians.cos(),
            tan: radians.tan(),
        }
    }
}

#[derive(Clone, Copy)]
enum Sweep {
    /// |sin| < 1e-4: vertical lines swept left to right.
    Vertical,
    /// |sin| > 0.9999: horizontal lines swept top to bottom.
    Horizontal,
    /// General angled case; chords are clipped against the rectangle's
    /// vertical boundary segments.
    Angled {
        delta_x: f64,
        h_gap: f64,
        s_left: Segment,
        s_right: Segment,
    },
}

/// Produces a sequence of line chords that progress across a rectangular
/// area at a given angle.
pub struct HachureIterator {
    top: f64,
    bottom: f64,
    left: f64,
    right: f64,
    gap: f64,
    tan: f64,
    pos: f64,
    sweep: Sweep,
}

impl HachureIterator {
    /// Creates an iterator over the chords filling the given rectangle.
    /// `gap` is the perpendicular spacing between adjacent chords.
    pub fn new(top: f64, bottom: f64, left: f64, right: f64, gap: f64, trig: HachureTrig) -> Self {
        let (pos, sweep) = if trig.sin.abs() < 1e-4 {
            (left + gap, Sweep::Vertical)
        } else if trig.sin.abs() > 0.9999 {
            (top + gap, Sweep::Horizontal)
        } else {
            let delta_x = (bottom - top) * trig.tan.abs();
            (
                left - delta_x.abs(),
                Sweep::Angled {
                    delta_x,
                    // True along-sweep spacing that yields `gap`
                    // perpendicular spacing.
                    h_gap: (gap / trig.cos).abs(),
                    s_left: Segment::new(left, bottom, left, top),
                    s_right: Segment::new(right, bottom, right, top),
                },
            )
        };

        Self {
            top,
            bottom,
            left,
            right,
            gap,
            tan: trig.tan,
            pos,
            sweep,
        }
    }

    fn next_angled(&mut self) -> Option<Line> {
        let Sweep::Angled {
            delta_x,
            h_gap,
            s_left,
            s_right,
        } = self.sweep
        else {
            unreachable!()
        };

        if self.pos >= self.right + delta_x {
            return None;
        }

        let mut x_lower = self.pos - delta_x / 2.0;
        let mut x_upper = self.pos + delta_x / 2.0;
        let mut y_lower = self.bottom;
        let mut y_upper = self.top;

        // Skip sweep positions whose unclipped span falls entirely outside
        // the rectangle.
        while (x_lower < self.left && x_upper < self.left)
            || (x_lower > self.right && x_upper > self.right)
        {
            self.pos += h_gap;
            x_lower = self.pos - delta_x / 2.0;
            x_upper = self.pos + delta_x / 2.0;

            if self.pos > self.right + delta_x {
                return None;
            }
        }

        let s = Segment::new(x_lower, y_lower, x_upper, y_upper);
        if let SegmentRelation::Intersects { x, y } = s.relate(&s_left) {
            x_lower = x;
            y_lower = y;
        }
        if let SegmentRelation::Intersects { x, y } = s.relate(&s_right) {
            x_upper = x;
            y_upper = y;
        }

        // Mirror so the sweep direction stays consistent for both angle
        // signs.
        if self.tan > 0.0 {
            x_lower = self.right - (x_lower - self.left);
            x_upper = self.right - (x_upper - self.left);
        }

        let line = Line::new(x_lower, y_lower, x_upper, y_upper);
        self.pos += h_gap;
        Some(line)
    }
}

impl Iterator for HachureIterator {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        match self.sweep {
            Sweep::Vertical => {
                if self.pos < self.right {
                    let line = Line::new(self.pos, self.top, self.pos, self.bottom);
                    self.pos += self.gap;
                    Some(line)
                } else {
                    None
                }
            }
            Sweep::Horizontal => {
                if self.pos < self.bottom {
                    let line = Line::new(self.left, self.pos, self.right, self.pos);
                    self.pos += self.gap;
                    Some(line)
                } else {
                    None
                }
            }
            Sweep::Angled { .. } => self.next_angled(),
        }
    }
}
