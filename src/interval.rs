//! Closed numeric ranges used as constraint bounds.
//!
//! Every constraint key carries one [`Interval`]; the engine's narrow/widen
//! decision is a pure containment test between the stored interval and the
//! requested one.

use serde::{Deserialize, Serialize};

/// A closed numeric range `[lo, hi]`.
///
/// # Examples
///
/// ```
/// use electoscope::Interval;
///
/// let wide = Interval::new(0.0, 1.0);
/// let tight = Interval::new(0.4, 0.6);
///
/// assert!(tight.is_subinterval_of(&wide));
/// assert!(wide.contains(0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound (inclusive).
    pub lo: f64,
    /// Upper bound (inclusive).
    pub hi: f64,
}

impl Interval {
    /// Creates an interval from explicit bounds.
    #[must_use]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Check if a value falls within this range, both ends inclusive.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Check if this interval lies entirely inside `other`.
    ///
    /// Equal intervals count as contained. An interval that is wider on
    /// either side, or disjoint, is not a subinterval — for the engine that
    /// means previously excluded rows may need to come back.
    #[must_use]
    pub fn is_subinterval_of(&self, other: &Self) -> bool {
        other.lo <= self.lo && self.hi <= other.hi
    }

    /// Fills unspecified bounds from `current`.
    ///
    /// This implements the "absent bound leaves that side unchanged"
    /// protocol of the constraint-update call.
    #[must_use]
    pub fn resolve(lo: Option<f64>, hi: Option<f64>, current: Self) -> Self {
        Self {
            lo: lo.unwrap_or(current.lo),
            hi: hi.unwrap_or(current.hi),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}
