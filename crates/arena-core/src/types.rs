//! Host telemetry and observation types.

use serde::{Deserialize, Serialize};

use crate::geometry::Vector;

/// Own robot telemetry for the current turn, as reported by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vector,
    /// Body heading (degrees, 0 = north, clockwise).
    pub heading: f64,
    pub radar_heading: f64,
    pub gun_heading: f64,
    /// Signed body speed (units/turn); negative when reversing.
    pub velocity: f64,
    pub energy: f64,
    /// Current turn number.
    pub time: u64,
    /// Remaining gun heat; the gun can fire only at zero.
    pub gun_heat: f64,
}

impl Pose {
    /// Absolute direction of travel, accounting for reversing.
    pub fn travel_heading(&self) -> f64 {
        if self.velocity < 0.0 {
            crate::geometry::normal_absolute_angle(self.heading + 180.0)
        } else {
            self.heading
        }
    }
}

/// One radar contact, relative to the own robot at scan time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanObservation {
    pub name: String,
    /// Bearing relative to own body heading (degrees).
    pub bearing: f64,
    pub distance: f64,
    pub energy: f64,
}

/// Opaque host handle for one of our own bullets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletHandle {
    /// Host-assigned identity; hit/miss notifications are matched on it.
    pub id: u64,
    pub power: f64,
    pub origin: Vector,
    /// Absolute firing direction.
    pub heading: f64,
    /// Turn on which the bullet left the gun.
    pub fire_time: u64,
}

/// The own robot ran into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallCollision {
    /// Bearing of the wall relative to own body heading.
    pub bearing: f64,
}

/// The own robot collided with an opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotCollision {
    pub name: String,
    /// Bearing of the opponent relative to own body heading.
    pub bearing: f64,
    /// Opponent energy after the collision.
    pub energy: f64,
    /// Whether we were driving into them.
    pub at_fault: bool,
}
