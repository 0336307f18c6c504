//! Range Comparator
//!
//! Compares a measured value against an inclusive guideline range and
//! reports which side it fell on and by how much.

use serde::{Deserialize, Serialize};

use crate::parameters::Range;

/// Where a measured value sits relative to its guideline range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeFit {
    /// value < lo
    BelowRange,
    /// lo <= value <= hi
    WithinRange,
    /// value > hi
    AboveRange,
}

impl RangeFit {
    pub fn display_text(&self) -> &'static str {
        match self {
            RangeFit::BelowRange => "Below guideline",
            RangeFit::WithinRange => "Within guideline",
            RangeFit::AboveRange => "Above guideline",
        }
    }
}

/// Result of comparing one value to one range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeComparison {
    pub fit: RangeFit,
    pub value: f64,
    pub range: Range,
    /// Absolute distance from the nearest bound, 0 when within range
    pub distance_from_range: f64,
}

impl RangeComparison {
    pub fn is_within_range(&self) -> bool {
        self.fit == RangeFit::WithinRange
    }
}

/// Compare `value` to `range`, bounds inclusive.
///
/// NaN is never within range; it is reported as above with an infinite distance.
pub fn compare_to_range(value: f64, range: Range) -> RangeComparison {
    let (fit, distance) = if value < range.lo {
        (RangeFit::BelowRange, range.lo - value)
    } else if value > range.hi {
        (RangeFit::AboveRange, value - range.hi)
    } else if range.contains(value) {
        (RangeFit::WithinRange, 0.0)
    } else {
        (RangeFit::AboveRange, f64::INFINITY)
    };

    RangeComparison {
        fit,
        value,
        range,
        distance_from_range: distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_within_range() {
        let comp = compare_to_range(7.0, Range::new(6.5, 8.5));
        assert_eq!(comp.fit, RangeFit::WithinRange);
        assert_eq!(comp.distance_from_range, 0.0);
        assert!(comp.is_within_range());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(compare_to_range(6.5, Range::new(6.5, 8.5)).is_within_range());
        assert!(compare_to_range(8.5, Range::new(6.5, 8.5)).is_within_range());
        assert!(compare_to_range(0.0, Range::new(0.0, 0.0)).is_within_range());
    }

    #[test]
    fn test_below_range() {
        let comp = compare_to_range(5.5, Range::new(6.5, 8.5));
        assert_eq!(comp.fit, RangeFit::BelowRange);
        assert_relative_eq!(comp.distance_from_range, 1.0);
    }

    #[test]
    fn test_above_range() {
        let comp = compare_to_range(0.015, Range::new(0.0, 0.01));
        assert_eq!(comp.fit, RangeFit::AboveRange);
        assert_relative_eq!(comp.distance_from_range, 0.005, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_is_out_of_range() {
        let comp = compare_to_range(f64::NAN, Range::new(0.0, 5.0));
        assert!(!comp.is_within_range());
        assert!(comp.distance_from_range.is_infinite());
    }
}
