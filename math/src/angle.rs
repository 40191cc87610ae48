use std::f32::consts::TAU;
use std::ops::{Add, AddAssign, Div, Sub};

use crate::TRIG_MAGNITUDE;

/// A view or facing angle in radians, always wrapped in to `0..TAU`.
///
/// Angles grow clockwise as seen on the map (the map y axis points "down"),
/// so turning right increases the angle.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Angle(f32);

impl Angle {
    /// Wraps any finite angle in to `0..TAU`
    pub const fn new(mut radians: f32) -> Self {
        radians %= TAU;
        if radians < 0.0 {
            radians += TAU;
        }
        Angle(radians)
    }

    #[inline]
    pub const fn from_degrees(degrees: f32) -> Self {
        Angle::new(degrees.to_radians())
    }

    #[inline]
    pub const fn rad(&self) -> f32 {
        self.0
    }

    #[inline]
    pub fn tan(&self) -> f32 {
        self.0.tan()
    }

    /// Cosine and sine scaled by `TRIG_MAGNITUDE` and rounded, for the
    /// integer view transform. Computed in `f64` so both components of a
    /// symmetric angle (e.g. 45 degrees) round to the same magnitude.
    #[inline]
    pub fn trig_magnitudes(&self) -> (i64, i64) {
        let (sin, cos) = (self.0 as f64).sin_cos();
        (
            (cos * TRIG_MAGNITUDE as f64).round() as i64,
            (sin * TRIG_MAGNITUDE as f64).round() as i64,
        )
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::new(self.0 + other.0)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, other: Angle) {
        *self = *self + other;
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::new(self.0 - other.0)
    }
}

impl Div<f32> for Angle {
    type Output = Angle;

    fn div(self, divisor: f32) -> Angle {
        Angle::new(self.0 / divisor)
    }
}
