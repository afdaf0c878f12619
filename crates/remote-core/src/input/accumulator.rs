//! Sub-pixel pointer accumulation.
//!
//! Touchpads on phones report pointer motion in fractional pixels: a slow
//! swipe may arrive as a stream of `0.3`, `0.4`, `0.2` deltas.  Operating
//! systems only move the cursor in whole pixels, so naively truncating each
//! delta would drop slow motion entirely.
//!
//! [`MouseAccumulator`] keeps the fractional remainder of every delta and
//! adds it to the next one.  Only the whole-pixel part is emitted; the rest
//! carries over.  Over any sequence of deltas the emitted pixels plus the
//! final residual equal the total motion received.
//!
//! Truncation is toward zero, so the residual always has the sign of the
//! running sum and `|residual| < 1` on each axis.  The one exception is a
//! sum beyond the `i32` range: the step saturates and the excess stays in the
//! residual, to be emitted by later calls.

/// Fractional motion not yet emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseResidual {
    pub x: f64,
    pub y: f64,
}

/// A whole-pixel move ready for a backend.  Never `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelStep {
    pub dx: i32,
    pub dy: i32,
}

/// Accumulates fractional deltas into whole-pixel steps.
///
/// One accumulator is shared by all connected controllers; callers wrap it
/// in a mutex.
#[derive(Debug, Default)]
pub struct MouseAccumulator {
    residual: MouseResidual,
}

impl MouseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a delta and returns the whole-pixel step to perform, if any.
    ///
    /// Non-finite components are treated as zero so a single bad frame
    /// cannot poison the residual.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use remote_core::{MouseAccumulator, PixelStep};
    ///
    /// let mut acc = MouseAccumulator::new();
    /// assert_eq!(acc.accumulate(0.6, 0.0), None);
    /// assert_eq!(acc.accumulate(0.6, 0.0), Some(PixelStep { dx: 1, dy: 0 }));
    /// ```
    pub fn accumulate(&mut self, dx: f64, dy: f64) -> Option<PixelStep> {
        let x = self.residual.x + finite_or_zero(dx);
        let y = self.residual.y + finite_or_zero(dy);

        let step = PixelStep {
            dx: saturate(x.trunc()),
            dy: saturate(y.trunc()),
        };
        self.residual = MouseResidual {
            x: x - f64::from(step.dx),
            y: y - f64::from(step.dy),
        };

        if step.dx == 0 && step.dy == 0 {
            None
        } else {
            Some(step)
        }
    }

    /// The motion carried over to the next delta.
    pub fn residual(&self) -> MouseResidual {
        self.residual
    }

    /// Drops any carried-over motion.
    pub fn reset(&mut self) {
        self.residual = MouseResidual::default();
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn saturate(v: f64) -> i32 {
    v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────
