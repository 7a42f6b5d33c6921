//! Radar, gun and movement capabilities.
//!
//! Each role is one trait. A component reads the shared `BattleState` during
//! its `step` and returns plain values; the turn loop turns those into host
//! commands. Components never see each other.

pub mod gun;
pub mod movement;
pub mod radar;

use serde::{Deserialize, Serialize};

use arena_core::constants::MAX_RADAR_TURN_RATE;
use arena_core::geometry::{clamp, normal_relative_angle};
use arena_core::types::{RobotCollision, WallCollision};

use crate::state::{BattleState, TrackedBullet};

pub use gun::{GuessFactorGun, HeadOnGun, PredictiveGun};
pub use movement::{
    AntiGravityMovement, OrbitMovement, RandomMovement, SpinMovement, WallsMovement,
    WaveSurfingMovement,
};
pub use radar::{PriorityRadar, RandomRadar, SpinRadar, TrackingRadar};

/// Output of one radar step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarStep {
    /// Degrees this turn, positive = clockwise.
    pub rotation: f64,
    /// Opponent the radar wants to be tracked.
    pub lock: Option<String>,
}

impl RadarStep {
    /// Full-speed clockwise sweep.
    pub fn sweep() -> Self {
        Self {
            rotation: MAX_RADAR_TURN_RATE,
            lock: None,
        }
    }
}

/// Output of one gun step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GunStep {
    pub rotation: f64,
    pub power: f64,
    pub fire: bool,
}

/// Output of one movement step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementStep {
    pub rotation: f64,
    /// Signed body speed.
    pub speed: f64,
}

/// Notifications every role may care about.
pub trait Component {
    fn name(&self) -> &'static str;

    fn on_hit_wall(&mut self, _collision: &WallCollision) {}

    fn on_hit_robot(&mut self, _collision: &RobotCollision) {}
}

pub trait Radar: Component {
    fn step(&mut self, state: &BattleState) -> RadarStep;
}

pub trait Gun: Component {
    fn step(&mut self, state: &BattleState) -> GunStep;

    fn fired_bullet(&mut self, _bullet: &TrackedBullet) {}

    fn bullet_hit(&mut self, _bullet: &TrackedBullet, _victim: &str) {}

    fn bullet_missed(&mut self, _bullet: &TrackedBullet) {}
}

pub trait Movement: Component {
    fn step(&mut self, state: &BattleState) -> MovementStep;
}

/// Shortest turn from `heading` to `target`, limited to `max_rate`.
pub(crate) fn turn_towards(heading: f64, target: f64, max_rate: f64) -> f64 {
    clamp(normal_relative_angle(target - heading), -max_rate, max_rate)
}
