//! Semantic unit types for the quantities the simulation exchanges
//!
//! Newtype wrappers keep durations, percentages and compass angles from being
//! mixed up at API boundaries (a humidity passed where a wind direction is
//! expected, a delay passed as a probability).
//!
//! - All types are `f32` newtypes with `Deref` to the raw value
//! - Total ordering via `f32::total_cmp` so they can key ordered collections
//! - Serde support for configuration files
//!
//! # Usage
//! ```
//! use fire_spread_core::core_types::units::{Percent, Seconds};
//!
//! let delay = Seconds::new(1.3) - Seconds::new(1.0);
//! assert!((*delay - 0.3).abs() < 1e-6);
//!
//! let chance = Percent::new(100.0) - Percent::new(40.0);
//! assert_eq!(chance, Percent::new(60.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Sub};

/// Shared trait impls for every `f32` unit newtype.
macro_rules! f32_unit {
    ($name:ident) => {
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f32;
            #[inline]
            fn deref(&self) -> &f32 {
                &self.0
            }
        }

        impl From<f32> for $name {
            fn from(v: f32) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f32 {
            fn from(v: $name) -> f32 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }
    };
}

// ============================================================================
// TIME
// ============================================================================

/// Simulation time or duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f32);

f32_unit!(Seconds);

impl Seconds {
    /// Zero duration
    pub const ZERO: Seconds = Seconds(0.0);

    /// Create a new duration. Asserts the value is non-negative.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f32) -> Self {
        assert!(value >= 0.0, "Seconds::new: negative duration is invalid");
        Seconds(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Clamp to at least `min`
    #[inline]
    #[must_use]
    pub fn at_least(self, min: Seconds) -> Seconds {
        Seconds(self.0.max(min.0))
    }
}

impl AddAssign for Seconds {
    fn add_assign(&mut self, rhs: Seconds) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} s", self.0)
    }
}

// ============================================================================
// RATIOS
// ============================================================================

/// A percentage (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f32);

f32_unit!(Percent);

impl Percent {
    /// The full 100%
    pub const FULL: Percent = Percent(100.0);

    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Percent(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Clamp into the valid 0-100 range
    #[inline]
    #[must_use]
    pub fn clamped(self) -> Percent {
        Percent(self.0.clamp(0.0, 100.0))
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

// ============================================================================
// ANGLES
// ============================================================================

/// Compass angle in degrees (0 = north, 90 = east)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f32);

f32_unit!(Degrees);

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Degrees(value)
    }

    /// Get the raw f32 value
    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Clamp into 0-360 inclusive; 360 is kept distinct from 0
    #[inline]
    #[must_use]
    pub fn clamped_compass(self) -> Degrees {
        Degrees(self.0.clamp(0.0, 360.0))
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_ordering_and_arithmetic() {
        let a = Seconds::new(0.3);
        let b = Seconds::new(1.3);
        assert!(a < b);
        assert_eq!(a.max(b), b);

        let mut t = Seconds::ZERO;
        t += a;
        t += a;
        assert!((*t - 0.6).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "negative duration")]
    fn test_seconds_rejects_negative() {
        let _ = Seconds::new(-1.0);
    }

    #[test]
    fn test_seconds_at_least() {
        let d = Seconds::from(-0.2).at_least(Seconds::new(0.05));
        assert_eq!(d, Seconds::new(0.05));
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(Percent::new(140.0).clamped(), Percent::FULL);
        assert_eq!(Percent::new(-5.0).clamped(), Percent::new(0.0));
        assert_eq!(format!("{}", Percent::new(42.0)), "42.0%");
    }

    #[test]
    fn test_degrees_keeps_full_turn() {
        assert_eq!(Degrees::new(360.0).clamped_compass(), Degrees::new(360.0));
        assert_eq!(Degrees::new(400.0).clamped_compass(), Degrees::new(360.0));
        assert_eq!(Degrees::new(-10.0).clamped_compass(), Degrees::new(0.0));
    }
}
