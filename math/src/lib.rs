//! Integer and angle math shared by the map and visibility crates.
//!
//! World coordinates are `i32` but anything derived from them (vectors
//! between points, rotated points, cross products) is carried in wider
//! types so very large maps cannot overflow the projection arithmetic.

mod angle;

pub use angle::*;
use glam::{I64Vec2, IVec2};

/// Fractional bits of the fixed-point sine/cosine used by the view transform
pub const TRIG_SHIFT: u32 = 14;
pub const TRIG_MAGNITUDE: i64 = 1 << TRIG_SHIFT;

/// Widen a world point or vector
#[inline]
pub const fn to_long(v: IVec2) -> I64Vec2 {
    I64Vec2::new(v.x as i64, v.y as i64)
}

/// Vector from `origin` to `point`, widened so the subtraction cannot
/// overflow.
#[inline]
pub const fn long_vector(point: IVec2, origin: IVec2) -> I64Vec2 {
    I64Vec2::new(
        point.x as i64 - origin.x as i64,
        point.y as i64 - origin.y as i64,
    )
}

/// 2D cross product `a.x * b.y - a.y * b.x` in 128 bits.
///
/// With `a` the vector from a ray origin to a vertex and `b` the ray
/// direction, a positive result means the vertex is left of the ray (map y
/// axis pointing down), negative means right and zero is on the ray.
#[inline]
pub const fn cross_product(a: I64Vec2, b: I64Vec2) -> i128 {
    a.x as i128 * b.y as i128 - a.y as i128 * b.x as i128
}

/// Translate `point` by `-origin` then rotate by `-yaw` so the view looks
/// down +x. Positive y in the result is to the right of the view.
#[inline]
pub fn transform_point2d(point: IVec2, origin: IVec2, yaw: Angle) -> I64Vec2 {
    let d = long_vector(point, origin);
    let (cos, sin) = yaw.trig_magnitudes();
    I64Vec2::new(
        (d.x * cos + d.y * sin) >> TRIG_SHIFT,
        (d.y * cos - d.x * sin) >> TRIG_SHIFT,
    )
}

/// Direction of `angle` as a fixed-point vector of length `TRIG_MAGNITUDE`
#[inline]
pub fn angle_to_vector(angle: Angle) -> I64Vec2 {
    let (cos, sin) = angle.trig_magnitudes();
    I64Vec2::new(cos, sin)
}

/// Clamp in to `low..=high`
#[inline]
pub const fn pin(value: i64, low: i64, high: i64) -> i64 {
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

/// Next index around a ring of `count` items
#[inline]
pub const fn wrap_high(index: usize, count: usize) -> usize {
    if index + 1 >= count { 0 } else { index + 1 }
}

/// Previous index around a ring of `count` items
#[inline]
pub const fn wrap_low(index: usize, count: usize) -> usize {
    if index == 0 { count - 1 } else { index - 1 }
}
