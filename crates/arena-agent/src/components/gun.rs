//! Gun strategies.

use arena_core::config::AgentConfig;
use arena_core::constants::{
    AIMED_POWER, AIM_TOLERANCE, HEAD_ON_POWER, MAX_GUN_TURN_RATE, PREDICTION_ITERATIONS,
};
use arena_core::geometry::normal_relative_angle;
use arena_core::rules::bullet_speed;
use arena_core::Vector;
use arena_tracking::{
    GuessFactorTable, Segment, SpeedBehaviour, Tick, TurnBehaviour, WaveBullet,
};

use super::{turn_towards, Component, Gun, GunStep};
use crate::state::BattleState;

/// Turn the gun toward `angle` and fire once it is already close enough.
fn aim_at(state: &BattleState, angle: f64, power: f64) -> GunStep {
    let gun_heading = state.pose().gun_heading;
    GunStep {
        rotation: turn_towards(gun_heading, angle, MAX_GUN_TURN_RATE),
        power,
        fire: normal_relative_angle(angle - gun_heading).abs() < AIM_TOLERANCE,
    }
}

/// Fires straight at the last known position of the tracked opponent.
#[derive(Debug, Default)]
pub struct HeadOnGun;

impl HeadOnGun {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Gun> {
        Box::new(Self)
    }
}

impl Component for HeadOnGun {
    fn name(&self) -> &'static str {
        "head_on_gun"
    }
}

impl Gun for HeadOnGun {
    fn step(&mut self, state: &BattleState) -> GunStep {
        let Some(tick) = state.tracked().and_then(|robot| robot.latest()) else {
            return GunStep::default();
        };
        let angle = state.position().bearing_to(tick.position);
        aim_at(state, angle, HEAD_ON_POWER)
    }
}

/// Assumes the target keeps its speed and turn rate, and solves for the
/// bullet flight time by fixed-point iteration.
#[derive(Debug, Default)]
pub struct PredictiveGun;

impl PredictiveGun {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Gun> {
        Box::new(Self)
    }

    fn intercept(state: &BattleState) -> Option<Vector> {
        let robot = state.tracked()?;
        let tick = robot.latest()?;
        let own = state.position();
        let speed = bullet_speed(AIMED_POWER);
        let elapsed = state.time().saturating_sub(tick.time) as u32;

        let mut predicted = tick.position;
        for _ in 0..PREDICTION_ITERATIONS {
            let flight = (own.distance(predicted) / speed).ceil() as u32;
            let next = robot.predict_location(
                elapsed + flight,
                TurnBehaviour::KeepTurning,
                SpeedBehaviour::Keep,
                state.battlefield(),
            )?;
            if next == predicted {
                break;
            }
            predicted = next;
        }
        Some(predicted)
    }
}

impl Component for PredictiveGun {
    fn name(&self) -> &'static str {
        "predictive_gun"
    }
}

impl Gun for PredictiveGun {
    fn step(&mut self, state: &BattleState) -> GunStep {
        match Self::intercept(state) {
            Some(target) => aim_at(state, state.position().bearing_to(target), AIMED_POWER),
            None => GunStep::default(),
        }
    }
}

#[derive(Debug)]
struct VirtualWave {
    wave: WaveBullet,
    target: String,
    segment: Segment,
}

/// Learns where the target tends to be when a bullet would arrive.
///
/// Every fresh scan of the tracked opponent launches a virtual wave from our
/// position. When a wave reaches the target its guess factor is recorded in
/// the segment the target was in at launch. The gun aims at the best bin of
/// the current segment.
#[derive(Debug)]
pub struct GuessFactorGun {
    table: GuessFactorTable,
    waves: Vec<VirtualWave>,
}

impl GuessFactorGun {
    pub fn new(table: GuessFactorTable) -> Self {
        Self {
            table,
            waves: Vec::new(),
        }
    }

    pub fn boxed(config: &AgentConfig) -> Box<dyn Gun> {
        Box::new(Self::new(GuessFactorTable::new(config.odd_bins())))
    }

    pub fn table(&self) -> &GuessFactorTable {
        &self.table
    }

    pub fn virtual_waves(&self) -> usize {
        self.waves.len()
    }

    /// Grow every virtual wave and score those that reached their target.
    fn update_waves(&mut self, state: &BattleState) {
        let table = &mut self.table;
        self.waves.retain_mut(|virtual_wave| {
            if !virtual_wave.wave.advance() {
                return false;
            }
            let Some(tick) = state
                .opponent(&virtual_wave.target)
                .and_then(|robot| robot.latest())
            else {
                return false;
            };
            let reach = virtual_wave.wave.origin().distance(tick.position);
            if virtual_wave.wave.radius() < reach {
                return true;
            }
            table.record(
                virtual_wave.segment,
                virtual_wave.wave.guess_factor(tick.position),
                1.0,
            );
            virtual_wave.wave.mark_matched();
            false
        });
    }

    fn launch(state: &BattleState, tick: &Tick) -> (WaveBullet, Segment) {
        let own = state.position();
        let bearing = own.bearing_to(tick.position);
        let lateral = tick.speed() * (tick.heading() - bearing).to_radians().sin();
        let wave = WaveBullet::new(own, AIMED_POWER, state.time(), bearing, state.battlefield())
            .with_ttl(state.config().wave_ttl)
            .with_lateral_direction(lateral);
        (wave, Segment::classify(lateral, tick.distance))
    }
}

impl Component for GuessFactorGun {
    fn name(&self) -> &'static str {
        "guess_factor_gun"
    }
}

impl Gun for GuessFactorGun {
    fn step(&mut self, state: &BattleState) -> GunStep {
        self.update_waves(state);

        let Some(robot) = state.tracked() else {
            return GunStep::default();
        };
        let Some(tick) = robot.latest() else {
            return GunStep::default();
        };

        let (wave, segment) = Self::launch(state, tick);
        let angle = wave.angle_for_guess_factor(self.table.best_guess_factor(segment));
        if tick.time == state.time() {
            self.waves.push(VirtualWave {
                wave,
                target: robot.name().to_string(),
                segment,
            });
        }
        aim_at(state, angle, AIMED_POWER)
    }
}
