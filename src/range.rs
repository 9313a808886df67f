use crate::error::{DatasetError, Result};
use std::fmt;

/// An immutable closed interval `[lower, upper]` with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    lower: f64,
    upper: f64,
}

impl Range {
    /// Create a range, rejecting NaN bounds and `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if lower.is_nan() || upper.is_nan() {
            return Err(DatasetError::InvalidArgument(format!(
                "Range bounds must be numbers, got [{}, {}]",
                lower, upper
            )));
        }
        if lower > upper {
            return Err(DatasetError::InvalidArgument(format!(
                "Range requires lower ({}) <= upper ({})",
                lower, upper
            )));
        }
        Ok(Range { lower, upper })
    }

    /// Internal constructor for bounds that are already ordered.
    pub(crate) fn ordered(lower: f64, upper: f64) -> Self {
        debug_assert!(!(lower > upper));
        Range { lower, upper }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn central_value(&self) -> f64 {
        self.lower / 2.0 + self.upper / 2.0
    }

    /// Closed-interval membership.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn intersects(&self, b0: f64, b1: f64) -> bool {
        if b0 <= self.lower {
            b1 > self.lower
        } else {
            b0 < self.upper && b1 >= b0
        }
    }

    pub fn intersects_range(&self, other: &Range) -> bool {
        self.intersects(other.lower, other.upper)
    }

    /// Clamp `value` into the range.
    pub fn constrain(&self, value: f64) -> f64 {
        if value > self.upper {
            self.upper
        } else if value < self.lower {
            self.lower
        } else {
            value
        }
    }

    pub fn is_nan_range(&self) -> bool {
        self.lower.is_nan() && self.upper.is_nan()
    }

    /// Union of two optional ranges; `None` only if both are `None`.
    pub fn combine(a: Option<Range>, b: Option<Range>) -> Option<Range> {
        match (a, b) {
            (None, r) | (r, None) => r,
            (Some(a), Some(b)) => Some(Range::ordered(
                a.lower.min(b.lower),
                a.upper.max(b.upper),
            )),
        }
    }

    /// Like [`Range::combine`] but NaN bounds lose to real ones and all-NaN
    /// ranges collapse to `None`.
    pub fn combine_ignoring_nan(a: Option<Range>, b: Option<Range>) -> Option<Range> {
        match (a, b) {
            (None, None) => None,
            (None, Some(r)) | (Some(r), None) => {
                if r.is_nan_range() {
                    None
                } else {
                    Some(r)
                }
            }
            (Some(a), Some(b)) => {
                let l = nan_min(a.lower, b.lower);
                let u = nan_max(a.upper, b.upper);
                if l.is_nan() && u.is_nan() {
                    None
                } else {
                    Some(Range { lower: l, upper: u })
                }
            }
        }
    }

    pub fn expand_to_include(range: Option<Range>, value: f64) -> Range {
        match range {
            None => Range::ordered(value, value),
            Some(r) if value < r.lower => Range::ordered(value, r.upper),
            Some(r) if value > r.upper => Range::ordered(r.lower, value),
            Some(r) => r,
        }
    }

    /// Grow the range by fractions of its length on each side.
    pub fn expand(&self, lower_margin: f64, upper_margin: f64) -> Range {
        let length = self.length();
        let mut lower = self.lower - length * lower_margin;
        let mut upper = self.upper + length * upper_margin;
        if lower > upper {
            lower = lower / 2.0 + upper / 2.0;
            upper = lower;
        }
        Range::ordered(lower, upper)
    }

    /// Shift by `delta`. Without zero crossing, a bound that starts on one
    /// side of zero stops at zero.
    pub fn shift(&self, delta: f64, allow_zero_crossing: bool) -> Range {
        if allow_zero_crossing {
            Range::ordered(self.lower + delta, self.upper + delta)
        } else {
            Range::ordered(
                shift_no_zero_crossing(self.lower, delta),
                shift_no_zero_crossing(self.upper, delta),
            )
        }
    }

    pub fn scale(&self, factor: f64) -> Result<Range> {
        if factor < 0.0 {
            return Err(DatasetError::InvalidArgument(
                "Negative 'factor' argument".to_string(),
            ));
        }
        Ok(Range::ordered(self.lower * factor, self.upper * factor))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Range[{},{}]", self.lower, self.upper)
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.max(b)
    }
}

fn shift_no_zero_crossing(value: f64, delta: f64) -> f64 {
    if value > 0.0 {
        (value + delta).max(0.0)
    } else if value < 0.0 {
        (value + delta).min(0.0)
    } else {
        value + delta
    }
}
