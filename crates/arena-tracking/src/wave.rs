//! Expanding projectile waves.
//!
//! A wave is a circle growing at bullet speed from the point a shot was fired.
//! Threat waves come from inferred opponent shots; virtual waves are our own,
//! used to learn where opponents tend to be when a bullet would arrive.

use serde::{Deserialize, Serialize};

use arena_core::constants::{DEFAULT_WAVE_TTL, GEOMETRY_EPSILON, ROBOT_HALF_SIZE};
use arena_core::geometry::{angle_within, clamp, normal_absolute_angle, normal_relative_angle};
use arena_core::rules::{bullet_speed, max_escape_angle};
use arena_core::{Battlefield, Vector};

/// Lifecycle of a wave. `Expired` and `Matched` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveStatus {
    Active,
    /// Travelled past the arena or outlived its ttl.
    Expired,
    /// Attributed to an observed event (hit, or a recorded visit).
    Matched,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveBullet {
    origin: Vector,
    power: f64,
    fire_time: u64,
    direct_angle: f64,
    escape_angle: f64,
    lateral_direction: f64,
    confidence: f64,
    radius: f64,
    age: u64,
    max_travel: f64,
    ttl: u64,
    status: WaveStatus,
}

impl WaveBullet {
    /// A fresh wave of radius zero.
    ///
    /// Escape half-angle defaults to the maximum escape angle for the bullet
    /// speed; max travel to the arena diagonal.
    pub fn new(
        origin: Vector,
        power: f64,
        fire_time: u64,
        direct_angle: f64,
        battlefield: &Battlefield,
    ) -> Self {
        Self {
            origin,
            power,
            fire_time,
            direct_angle: normal_absolute_angle(direct_angle),
            escape_angle: max_escape_angle(power),
            lateral_direction: 1.0,
            confidence: 1.0,
            radius: 0.0,
            age: 0,
            max_travel: battlefield.diagonal(),
            ttl: DEFAULT_WAVE_TTL,
            status: WaveStatus::Active,
        }
    }

    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign of the target's motion across the line of fire; anything
    /// non-negative counts as clockwise.
    pub fn with_lateral_direction(mut self, direction: f64) -> Self {
        self.lateral_direction = if direction < 0.0 { -1.0 } else { 1.0 };
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp(confidence, 0.0, 1.0);
        self
    }

    pub fn with_escape_angle(mut self, escape_angle: f64) -> Self {
        self.escape_angle = escape_angle.abs().max(GEOMETRY_EPSILON);
        self
    }

    /// Grow by one turn of bullet travel.
    ///
    /// Returns `false` once the wave has run out of arena or time, at which
    /// point it is `Expired` and every later call is a no-op returning `false`.
    pub fn advance(&mut self) -> bool {
        if self.status != WaveStatus::Active {
            return false;
        }
        self.radius += self.speed();
        self.age += 1;
        if self.radius > self.max_travel || self.age > self.ttl {
            self.status = WaveStatus::Expired;
            return false;
        }
        true
    }

    /// Whether a robot centred at `position` currently overlaps the wave front
    /// inside the escape range.
    pub fn is_dangerous_at(&self, position: Vector) -> bool {
        self.status == WaveStatus::Active
            && (self.origin.distance(position) - self.radius).abs() <= ROBOT_HALF_SIZE
            && angle_within(
                self.origin.bearing_to(position),
                self.direct_angle,
                self.escape_angle,
            )
    }

    /// The front is entirely beyond a robot centred at `position`.
    pub fn has_passed(&self, position: Vector) -> bool {
        self.radius > self.origin.distance(position) + ROBOT_HALF_SIZE
    }

    /// Turns until the front reaches `position`; zero when already there.
    pub fn turns_until(&self, position: Vector) -> f64 {
        ((self.origin.distance(position) - self.radius) / self.speed()).max(0.0)
    }

    /// Normalised offset of `position` within the escape range, in [-1, 1].
    pub fn guess_factor(&self, position: Vector) -> f64 {
        let offset = normal_relative_angle(self.origin.bearing_to(position) - self.direct_angle);
        clamp(
            offset / self.escape_angle.max(GEOMETRY_EPSILON) * self.lateral_direction,
            -1.0,
            1.0,
        )
    }

    /// Absolute angle from the origin corresponding to `guess_factor`.
    pub fn angle_for_guess_factor(&self, guess_factor: f64) -> f64 {
        let offset = clamp(guess_factor, -1.0, 1.0) * self.escape_angle * self.lateral_direction;
        normal_absolute_angle(self.direct_angle + offset)
    }

    /// Active → Matched. Returns `false` when the wave was already terminal.
    pub fn mark_matched(&mut self) -> bool {
        if self.status != WaveStatus::Active {
            return false;
        }
        self.status = WaveStatus::Matched;
        true
    }

    pub fn speed(&self) -> f64 {
        bullet_speed(self.power)
    }

    pub fn origin(&self) -> Vector {
        self.origin
    }

    pub fn power(&self) -> f64 {
        self.power
    }

    pub fn fire_time(&self) -> u64 {
        self.fire_time
    }

    pub fn direct_angle(&self) -> f64 {
        self.direct_angle
    }

    pub fn escape_angle(&self) -> f64 {
        self.escape_angle
    }

    pub fn lateral_direction(&self) -> f64 {
        self.lateral_direction
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn status(&self) -> WaveStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == WaveStatus::Active
    }
}
