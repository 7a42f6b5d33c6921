//! Per-opponent model: observation history, inferred shots, motion prediction.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use arena_core::constants::{
    AMBIGUITY_CONFIDENCE_FACTOR, GEOMETRY_EPSILON, GUN_COOLING_RATE, MAX_BULLET_POWER,
    MIN_BULLET_POWER, ROBOT_HALF_SIZE, ROBOT_HIT_DAMAGE, WALL_HIT_ENERGY_ESTIMATE,
    WALL_HIT_SPEED_DROP, WALL_PROXIMITY_SLACK,
};
use arena_core::events::BulletHit;
use arena_core::geometry::{modulo, round_to_1};
use arena_core::rules::{bullet_damage, gun_heat};
use arena_core::types::{Pose, RobotCollision};
use arena_core::{Battlefield, Vector};

use crate::projection::{ProjectedBot, SpeedBehaviour, TurnBehaviour};
use crate::tick::{Tick, TickHistory};
use crate::wave::WaveBullet;

/// How much consecutive history ends at a given turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HistoryDepth {
    /// Not seen this turn.
    None,
    PositionOnly,
    PositionVelocity,
    PositionVelocityTurnRate,
}

/// What shot inference needs to know about the rest of the battle this turn.
#[derive(Debug, Clone, Copy)]
pub struct ShotContext<'a> {
    /// Our own robot; inferred shots are assumed to be aimed at it.
    pub owner: &'a Pose,
    pub battlefield: &'a Battlefield,
    /// Our bullet hits buffered this turn, for any victim.
    pub bullet_hits: &'a [BulletHit],
    /// Our collisions buffered this turn, with any opponent.
    pub robot_collisions: &'a [RobotCollision],
    pub wave_ttl: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherRobot {
    name: String,
    history: TickHistory,
    waves: Vec<WaveBullet>,
}

impl OtherRobot {
    pub fn new(name: impl Into<String>, history_capacity: usize) -> Self {
        Self {
            name: name.into(),
            history: TickHistory::new(history_capacity),
            waves: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a new observation, deriving its motion from the previous one.
    pub fn observe(&mut self, tick: Tick) {
        let tick = tick.with_motion_from(self.history.latest());
        self.history.push(tick);
    }

    pub fn history(&self) -> &TickHistory {
        &self.history
    }

    /// See [`TickHistory::get`].
    pub fn tick(&self, index: isize) -> Option<&Tick> {
        self.history.get(index)
    }

    pub fn latest(&self) -> Option<&Tick> {
        self.history.latest()
    }

    pub fn last_seen(&self) -> Option<u64> {
        self.history.latest().map(|tick| tick.time)
    }

    /// Most recently seen first; never-seen robots sort last.
    pub fn cmp_recency(&self, other: &OtherRobot) -> Ordering {
        match (self.last_seen(), other.last_seen()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    pub fn waves(&self) -> &[WaveBullet] {
        &self.waves
    }

    /// Wave by position, with the same wrapping convention as the history.
    pub fn wave(&self, index: isize) -> Option<&WaveBullet> {
        if self.waves.is_empty() {
            return None;
        }
        self.waves.get(modulo(index, self.waves.len()))
    }

    /// Age every wave by one turn and drop those that are no longer active.
    pub fn advance(&mut self) {
        self.waves.retain_mut(|wave| wave.advance());
    }

    /// Estimated gun heat at `time`, based on the last inferred shot.
    pub fn gun_heat(&self, time: u64) -> f64 {
        let Some(last) = self.waves.last() else {
            return 0.0;
        };
        let elapsed = time.saturating_sub(last.fire_time()) as f64;
        (gun_heat(last.power()) - GUN_COOLING_RATE * elapsed).max(0.0)
    }

    pub fn history_depth(&self, time: u64) -> HistoryDepth {
        let consecutive = |newer: isize, older: isize| {
            self.history.len() >= older.unsigned_abs()
                && matches!(
                    (self.history.get(newer), self.history.get(older)),
                    (Some(a), Some(b)) if a.time == b.time + 1
                )
        };
        match self.history.latest() {
            Some(latest) if latest.time == time => {}
            _ => return HistoryDepth::None,
        }
        if !consecutive(-1, -2) {
            HistoryDepth::PositionOnly
        } else if !consecutive(-2, -3) {
            HistoryDepth::PositionVelocity
        } else {
            HistoryDepth::PositionVelocityTurnRate
        }
    }

    /// Where this robot would be after `turns` under the given behaviour.
    pub fn predict_location(
        &self,
        turns: u32,
        turn: TurnBehaviour,
        speed: SpeedBehaviour,
        battlefield: &Battlefield,
    ) -> Option<Vector> {
        let latest = self.history.latest()?;
        Some(ProjectedBot::from_tick(latest).project(turns, turn, speed, battlefield))
    }

    /// Infer from the energy drop between the two latest Ticks whether this
    /// robot fired, and if so start a threat wave.
    pub fn predict_bullet_shot(&mut self, ctx: &ShotContext<'_>) -> bool {
        let (Some(current), Some(previous)) = (self.history.get(-1), self.history.get(-2)) else {
            return false;
        };
        if self.history.len() < 2 || current.time <= previous.time {
            return false;
        }

        let mut power = round_to_1(previous.energy - current.energy);
        let mut causes = 0;

        for hit in ctx.bullet_hits.iter().filter(|hit| hit.victim == self.name) {
            power -= bullet_damage(hit.power);
            causes += 1;
        }

        let near_wall = ctx
            .battlefield
            .is_out_of_bounds(previous.position, ROBOT_HALF_SIZE - WALL_PROXIMITY_SLACK);
        if near_wall && (previous.speed() - current.speed()).abs() >= WALL_HIT_SPEED_DROP {
            power -= WALL_HIT_ENERGY_ESTIMATE;
            causes += 1;
        }

        for _ in ctx.robot_collisions.iter().filter(|c| c.name == self.name) {
            power -= ROBOT_HIT_DAMAGE;
            causes += 1;
        }

        if power < MIN_BULLET_POWER {
            return false;
        }
        let power = power.min(MAX_BULLET_POWER);

        let mut confidence = AMBIGUITY_CONFIDENCE_FACTOR.powi(causes);
        if self.gun_heat(current.time) > GEOMETRY_EPSILON {
            confidence *= AMBIGUITY_CONFIDENCE_FACTOR;
        }

        let origin = previous.position;
        let fire_time = current.time;
        let direct_angle = origin.bearing_to(ctx.owner.position);
        let lateral = ctx.owner.velocity.abs()
            * (ctx.owner.travel_heading() - direct_angle).to_radians().sin();

        let wave = WaveBullet::new(origin, power, fire_time, direct_angle, ctx.battlefield)
            .with_ttl(ctx.wave_ttl)
            .with_lateral_direction(lateral)
            .with_confidence(confidence);
        log::debug!(
            "{}: inferred shot at t={} power {:.1} confidence {:.2}",
            self.name,
            fire_time,
            power,
            confidence
        );
        self.waves.push(wave);
        true
    }
}
