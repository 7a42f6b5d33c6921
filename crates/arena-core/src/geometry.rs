//! 2D geometry in arena coordinates.
//!
//! Angles follow the arena convention: degrees, 0 = north (+y), increasing
//! clockwise. `Vector` is an immutable value type; every operation returns a
//! new value so that snapshots held by Ticks and waves never change.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::GEOMETRY_EPSILON;

/// A point or direction in the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector(DVec2);

impl Vector {
    pub const ZERO: Vector = Vector(DVec2::ZERO);

    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    /// Unit vector pointing along `angle` scaled to `length`.
    pub fn from_polar(angle: f64, length: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();
        Self::new(sin * length, cos * length)
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn length(&self) -> f64 {
        self.0.length()
    }

    pub fn length_sq(&self) -> f64 {
        self.0.length_squared()
    }

    pub fn distance(&self, other: Vector) -> f64 {
        self.0.distance(other.0)
    }

    pub fn scale(&self, factor: f64) -> Vector {
        Vector(self.0 * factor)
    }

    /// Component-wise division. A divisor closer to zero than
    /// `GEOMETRY_EPSILON` is replaced by the epsilon with the same sign.
    pub fn divide(&self, divisor: f64) -> Vector {
        let divisor = if divisor.abs() < GEOMETRY_EPSILON {
            GEOMETRY_EPSILON.copysign(divisor)
        } else {
            divisor
        };
        Vector(self.0 / divisor)
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    pub fn normalize(&self) -> Vector {
        Vector(self.0.normalize_or_zero())
    }

    /// Direction of this vector as an absolute angle in [0, 360).
    /// A zero-length vector reports 0.
    pub fn angle(&self) -> f64 {
        if self.length_sq() < GEOMETRY_EPSILON * GEOMETRY_EPSILON {
            return 0.0;
        }
        normal_absolute_angle(self.0.x.atan2(self.0.y).to_degrees())
    }

    /// Absolute bearing from this point to `other`.
    pub fn bearing_to(&self, other: Vector) -> f64 {
        (other - *self).angle()
    }

    /// The point `distance` away from this one along `angle`.
    pub fn project(&self, angle: f64, distance: f64) -> Vector {
        *self + Vector::from_polar(angle, distance)
    }

    /// Rotate clockwise by `angle` degrees about `origin`.
    pub fn rotate_around(&self, angle: f64, origin: Vector) -> Vector {
        let rotation = DVec2::from_angle(-angle.to_radians());
        Vector(origin.0 + rotation.rotate(self.0 - origin.0))
    }

    /// Clamp each coordinate into its range. Inverted ranges collapse to their midpoint.
    pub fn clamp_to_bounds(&self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Vector {
        Vector::new(
            clamp(self.0.x, x_min, x_max),
            clamp(self.0.y, y_min, y_max),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector(self.0 + other.0)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, other: Vector) -> Vector {
        Vector(self.0 - other.0)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, factor: f64) -> Vector {
        Vector(self.0 * factor)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector(-self.0)
    }
}

impl From<DVec2> for Vector {
    fn from(value: DVec2) -> Self {
        Self(value)
    }
}

impl From<Vector> for DVec2 {
    fn from(value: Vector) -> Self {
        value.0
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.0.x, self.0.y)
    }
}

/// Arena dimensions. The playable area spans `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Battlefield {
    pub width: f64,
    pub height: f64,
}

impl Default for Battlefield {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Battlefield {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Longest straight line inside the arena; never below `GEOMETRY_EPSILON`.
    pub fn diagonal(&self) -> f64 {
        (self.width * self.width + self.height * self.height)
            .sqrt()
            .max(GEOMETRY_EPSILON)
    }

    pub fn center(&self) -> Vector {
        Vector::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when `position` is closer than `margin` to any wall (or outside).
    pub fn is_out_of_bounds(&self, position: Vector, margin: f64) -> bool {
        position.x() + margin > self.width
            || position.x() - margin < 0.0
            || position.y() + margin > self.height
            || position.y() - margin < 0.0
    }

    /// Distance from `position` to the nearest wall.
    pub fn wall_distance(&self, position: Vector) -> f64 {
        position
            .x()
            .min(self.width - position.x())
            .min(position.y())
            .min(self.height - position.y())
    }

    /// Pull `position` inside the arena, keeping `margin` from every wall.
    pub fn clamp(&self, position: Vector, margin: f64) -> Vector {
        position.clamp_to_bounds(margin, self.width - margin, margin, self.height - margin)
    }
}

/// Normalize an angle into (-180, 180].
pub fn normal_relative_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Normalize an angle into [0, 360).
pub fn normal_absolute_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// The smaller of `angle` and `angle + 180`, both taken relative.
/// Useful for robots that can drive backwards.
pub fn headingless_angle(angle: f64) -> f64 {
    let forward = normal_relative_angle(angle);
    let reverse = normal_relative_angle(angle + 180.0);
    if forward.abs() < reverse.abs() {
        forward
    } else {
        reverse
    }
}

/// True when `angle` lies within `half_width` degrees of `center`.
pub fn angle_within(angle: f64, center: f64, half_width: f64) -> bool {
    normal_relative_angle(angle - center).abs() <= half_width
}

/// Non-negative modulo; `len == 0` yields 0.
pub fn modulo(index: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.rem_euclid(len as isize) as usize
}

/// Clamp without panicking on an inverted range (which collapses to its midpoint).
pub fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    if lower > upper {
        return (lower + upper) / 2.0;
    }
    value.max(lower).min(upper)
}

pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Round to one decimal place.
pub fn round_to_1(value: f64) -> f64 {
    round_to(value, 1)
}
