//! Radar strategies.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_core::config::AgentConfig;
use arena_core::constants::{MAX_RADAR_TURN_RATE, RADAR_STALE_TURNS, TRACKING_RADAR_COEFFICIENT};
use arena_core::geometry::{clamp, normal_relative_angle};

use super::{Component, Radar, RadarStep};
use crate::state::BattleState;

const RANDOM_RADAR_SALT: u64 = 0x5241_4441;

/// Sweeps clockwise at full speed, forever.
#[derive(Debug, Default)]
pub struct SpinRadar;

impl SpinRadar {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Radar> {
        Box::new(Self)
    }
}

impl Component for SpinRadar {
    fn name(&self) -> &'static str {
        "spin_radar"
    }
}

impl Radar for SpinRadar {
    fn step(&mut self, _state: &BattleState) -> RadarStep {
        RadarStep::sweep()
    }
}

/// Keeps the beam on the tracked opponent, overshooting by `coefficient` so
/// that every turn's arc crosses it. Falls back to a sweep when the lock is lost.
#[derive(Debug)]
pub struct TrackingRadar {
    coefficient: f64,
}

impl TrackingRadar {
    pub fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }

    pub fn boxed(_config: &AgentConfig) -> Box<dyn Radar> {
        Box::new(Self::new(TRACKING_RADAR_COEFFICIENT))
    }
}

impl Component for TrackingRadar {
    fn name(&self) -> &'static str {
        "tracking_radar"
    }
}

impl Radar for TrackingRadar {
    fn step(&mut self, state: &BattleState) -> RadarStep {
        let Some(tick) = state.tracked().and_then(|robot| robot.latest()) else {
            return RadarStep::sweep();
        };
        if state.time().saturating_sub(tick.time) > RADAR_STALE_TURNS {
            return RadarStep::sweep();
        }
        let bearing = state.position().bearing_to(tick.position);
        let offset = normal_relative_angle(bearing - state.pose().radar_heading);
        RadarStep {
            rotation: clamp(
                offset * self.coefficient,
                -MAX_RADAR_TURN_RATE,
                MAX_RADAR_TURN_RATE,
            ),
            lock: None,
        }
    }
}

/// Melee radar: always turns toward the opponent seen longest ago and asks
/// for it to become the tracked target.
#[derive(Debug, Default)]
pub struct PriorityRadar;

impl PriorityRadar {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Radar> {
        Box::new(Self)
    }
}

impl Component for PriorityRadar {
    fn name(&self) -> &'static str {
        "priority_radar"
    }
}

impl Radar for PriorityRadar {
    fn step(&mut self, state: &BattleState) -> RadarStep {
        let stalest = state
            .opponents()
            .filter(|robot| robot.last_seen().is_some())
            .max_by(|a, b| a.cmp_recency(b));
        let Some((robot, tick)) = stalest.and_then(|r| r.latest().map(|t| (r, t))) else {
            return RadarStep::sweep();
        };
        let bearing = state.position().bearing_to(tick.position);
        let offset = normal_relative_angle(bearing - state.pose().radar_heading);
        RadarStep {
            rotation: MAX_RADAR_TURN_RATE.copysign(offset),
            lock: Some(robot.name().to_string()),
        }
    }
}

/// Points the radar somewhere random every turn.
#[derive(Debug)]
pub struct RandomRadar {
    rng: ChaCha8Rng,
}

impl RandomRadar {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn boxed(config: &AgentConfig) -> Box<dyn Radar> {
        Box::new(Self::new(config.component_seed(RANDOM_RADAR_SALT)))
    }
}

impl Component for RandomRadar {
    fn name(&self) -> &'static str {
        "random_radar"
    }
}

impl Radar for RandomRadar {
    fn step(&mut self, _state: &BattleState) -> RadarStep {
        RadarStep {
            rotation: self
                .rng
                .gen_range(-MAX_RADAR_TURN_RATE..=MAX_RADAR_TURN_RATE),
            lock: None,
        }
    }
}
