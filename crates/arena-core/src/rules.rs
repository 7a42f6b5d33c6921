//! Arena physics relations derived from the rule constants.

use crate::constants::*;

/// Speed of a bullet fired at `power` (linear in power).
pub fn bullet_speed(power: f64) -> f64 {
    BULLET_BASE_SPEED - BULLET_SPEED_PER_POWER * power
}

/// Inverse of [`bullet_speed`].
pub fn bullet_power(speed: f64) -> f64 {
    (BULLET_BASE_SPEED - speed) / BULLET_SPEED_PER_POWER
}

/// Maximum body turn rate at the given speed (degrees/turn).
pub fn max_turn_rate(speed: f64) -> f64 {
    MAX_TURN_RATE - TURN_RATE_SPEED_PENALTY * speed.abs()
}

/// Energy a bullet of `power` takes from the robot it hits.
pub fn bullet_damage(power: f64) -> f64 {
    let damage = 4.0 * power;
    if power > 1.0 {
        damage + 2.0 * (power - 1.0)
    } else {
        damage
    }
}

/// Heat a gun gains by firing at `power`.
pub fn gun_heat(power: f64) -> f64 {
    1.0 + power / 5.0
}

/// Widest angle (degrees) a target at full speed can cover before a bullet of
/// `power` arrives, measured from the firing line.
pub fn max_escape_angle(power: f64) -> f64 {
    let ratio = (MAX_VELOCITY / bullet_speed(power).max(GEOMETRY_EPSILON)).min(1.0);
    ratio.asin().to_degrees()
}

/// Clamp a requested power into the legal firing range.
pub fn clamp_power(power: f64) -> f64 {
    crate::geometry::clamp(power, MIN_BULLET_POWER, MAX_BULLET_POWER)
}
