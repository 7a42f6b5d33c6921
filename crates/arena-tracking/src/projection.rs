//! Forward simulation of a robot's motion under simple behaviour policies.

use serde::{Deserialize, Serialize};

use arena_core::constants::{ACCELERATION, DECELERATION, MAX_VELOCITY, ROBOT_HALF_SIZE};
use arena_core::geometry::{clamp, normal_absolute_angle};
use arena_core::rules::max_turn_rate;
use arena_core::types::Pose;
use arena_core::{Battlefield, Vector};

use crate::tick::Tick;

/// How the heading evolves each projected turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnBehaviour {
    Straight,
    /// Keep the last observed turn rate.
    KeepTurning,
    HardLeft,
    HardRight,
}

/// How the speed evolves each projected turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedBehaviour {
    Keep,
    Accelerate,
    Stop,
}

/// A disposable snapshot that is stepped forward in place.
///
/// Speed is signed: negative means driving backwards along `heading`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedBot {
    pub position: Vector,
    pub heading: f64,
    pub speed: f64,
    pub turn_rate: f64,
    pub time: u64,
}

impl ProjectedBot {
    pub fn new(position: Vector, heading: f64, speed: f64, turn_rate: f64, time: u64) -> Self {
        Self {
            position,
            heading: normal_absolute_angle(heading),
            speed,
            turn_rate,
            time,
        }
    }

    /// Heading and speed come from the observed velocity.
    pub fn from_tick(tick: &Tick) -> Self {
        Self::new(tick.position, tick.heading(), tick.speed(), tick.turn_rate, tick.time)
    }

    /// Our own robot as reported by the host.
    pub fn from_pose(pose: &Pose) -> Self {
        Self::new(pose.position, pose.heading, pose.velocity, 0.0, pose.time)
    }

    /// Advance one turn.
    pub fn step(&mut self, turn: TurnBehaviour, speed: SpeedBehaviour, battlefield: &Battlefield) {
        let direction = if self.speed < 0.0 { -1.0 } else { 1.0 };
        let magnitude = self.speed.abs();
        let magnitude = match speed {
            SpeedBehaviour::Keep => magnitude,
            SpeedBehaviour::Accelerate => (magnitude + ACCELERATION).min(MAX_VELOCITY),
            SpeedBehaviour::Stop => (magnitude - DECELERATION).max(0.0),
        };
        self.speed = direction * magnitude;

        let limit = max_turn_rate(self.speed);
        let rate = match turn {
            TurnBehaviour::Straight => 0.0,
            TurnBehaviour::KeepTurning => self.turn_rate,
            TurnBehaviour::HardLeft => -limit,
            TurnBehaviour::HardRight => limit,
        };
        self.turn_rate = clamp(rate, -limit, limit);
        self.heading = normal_absolute_angle(self.heading + self.turn_rate);

        let next = self.position.project(self.heading, self.speed);
        let clamped = battlefield.clamp(next, ROBOT_HALF_SIZE);
        if clamped != next {
            // wall contact stops the robot
            self.speed = 0.0;
        }
        self.position = clamped;
        self.time += 1;
    }

    /// Step `turns` times and return the final position.
    pub fn project(
        &mut self,
        turns: u32,
        turn: TurnBehaviour,
        speed: SpeedBehaviour,
        battlefield: &Battlefield,
    ) -> Vector {
        for _ in 0..turns {
            self.step(turn, speed, battlefield);
        }
        self.position
    }
}
