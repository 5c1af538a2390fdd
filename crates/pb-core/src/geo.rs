//! Positions on the navigable surface.
//!
//! `Position` is a plain single-precision 3-vector.  The framework never
//! interprets the axes; navigators decide whether `y` is "up" or the surface
//! is planar.  Distances are Euclidean.

use std::fmt;

/// A point in world space stored as single-precision floats.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Squared distance, for comparisons.
    #[inline]
    pub fn distance_sq(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    ///
    /// `t` is not clamped.
    #[inline]
    pub fn lerp(self, other: Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Move from `self` towards `target` by at most `max_step` units.
    ///
    /// Returns `target` itself once it is within reach.
    pub fn step_towards(self, target: Position, max_step: f32) -> Position {
        let d = self.distance(target);
        if d <= max_step || d == 0.0 {
            target
        } else {
            self.lerp(target, max_step / d)
        }
    }

    /// `true` if every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Components as an array, the layout spatial indexes expect.
    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Position {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}
