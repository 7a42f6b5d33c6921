//! Notifications delivered by the host between two turns.
//!
//! They are queued and drained once per turn so that every component sees the
//! same snapshot during its compute step.

use serde::{Deserialize, Serialize};

use crate::types::{BulletHandle, RobotCollision, ScanObservation, WallCollision};

/// All inbound host notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    /// Radar saw an opponent.
    Scanned(ScanObservation),
    /// An opponent left the battle.
    RobotDeath { name: String },
    /// One of our bullets hit `victim`.
    BulletHit { bullet: BulletHandle, victim: String },
    /// One of our bullets left the arena without hitting anything.
    BulletMissed { bullet: BulletHandle },
    /// We drove into a wall.
    HitWall(WallCollision),
    /// We collided with an opponent.
    HitRobot(RobotCollision),
}

impl HostEvent {
    /// Drain priority within one turn: energy-changing events first, then
    /// scans (which run shot inference against them), then deaths.
    pub fn drain_rank(&self) -> u8 {
        match self {
            HostEvent::BulletHit { .. }
            | HostEvent::BulletMissed { .. }
            | HostEvent::HitWall(_)
            | HostEvent::HitRobot(_) => 0,
            HostEvent::Scanned(_) => 1,
            HostEvent::RobotDeath { .. } => 2,
        }
    }
}

/// One of our bullets hitting an opponent, as buffered for the current turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletHit {
    pub victim: String,
    pub power: f64,
}
