//! Shared battle state.
//!
//! One `BattleState` per agent. The turn loop is its only writer; components
//! receive it by shared reference during their compute step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use arena_core::config::AgentConfig;
use arena_core::events::BulletHit;
use arena_core::types::{BulletHandle, Pose, RobotCollision, ScanObservation, WallCollision};
use arena_core::{Battlefield, Vector};
use arena_tracking::{OtherRobot, ShotContext, Tick, WaveBullet};

/// One of our bullets still in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedBullet {
    pub handle: BulletHandle,
    /// Opponent tracked when the bullet was fired.
    pub target: Option<String>,
    pub fired_at: u64,
}

impl TrackedBullet {
    fn untracked(handle: &BulletHandle) -> Self {
        Self {
            handle: *handle,
            target: None,
            fired_at: handle.fire_time,
        }
    }
}

#[derive(Debug)]
pub struct BattleState {
    config: AgentConfig,
    battlefield: Battlefield,
    pose: Pose,
    opponents: BTreeMap<String, OtherRobot>,
    tracked: Option<String>,
    latest_scanned: Option<String>,
    bullets: Vec<TrackedBullet>,

    // --- This turn only ---
    bullet_hits: Vec<BulletHit>,
    robot_collisions: Vec<RobotCollision>,
    wall_collisions: Vec<WallCollision>,
    deaths: Vec<String>,
}

impl BattleState {
    pub fn new(config: AgentConfig, battlefield: Battlefield) -> Self {
        Self {
            config,
            battlefield,
            pose: Pose::default(),
            opponents: BTreeMap::new(),
            tracked: None,
            latest_scanned: None,
            bullets: Vec::new(),
            bullet_hits: Vec::new(),
            robot_collisions: Vec::new(),
            wall_collisions: Vec::new(),
            deaths: Vec::new(),
        }
    }

    /// Start a new turn: take the host's telemetry, age every opponent's
    /// waves and forget last turn's events.
    pub fn advance(&mut self, pose: Pose) {
        self.pose = pose;
        for robot in self.opponents.values_mut() {
            robot.advance();
        }
        self.bullet_hits.clear();
        self.robot_collisions.clear();
        self.wall_collisions.clear();
        self.deaths.clear();
    }

    /// Take the arena size reported by the host.
    pub fn set_battlefield(&mut self, battlefield: Battlefield) {
        if self.battlefield != battlefield {
            log::debug!(
                "battlefield is {}x{}",
                battlefield.width,
                battlefield.height
            );
            self.battlefield = battlefield;
        }
    }

    /// Record a radar contact and run shot inference for it.
    pub fn on_scanned(&mut self, scan: &ScanObservation) {
        let position = self
            .pose
            .position
            .project(self.pose.heading + scan.bearing, scan.distance);
        let tick = Tick::new(self.pose.time, scan.bearing, scan.distance, scan.energy, position);

        let capacity = self.config.history_capacity;
        let robot = self.opponents.entry(scan.name.clone()).or_insert_with(|| {
            log::info!("new opponent {}", scan.name);
            OtherRobot::new(scan.name.clone(), capacity)
        });
        robot.observe(tick);

        let ctx = ShotContext {
            owner: &self.pose,
            battlefield: &self.battlefield,
            bullet_hits: &self.bullet_hits,
            robot_collisions: &self.robot_collisions,
            wave_ttl: self.config.wave_ttl,
        };
        robot.predict_bullet_shot(&ctx);

        self.latest_scanned = Some(scan.name.clone());
        if self.tracked.is_none() {
            log::debug!("tracking {}", scan.name);
            self.tracked = Some(scan.name.clone());
        }
    }

    /// Forget a dead opponent, including its waves.
    pub fn on_death(&mut self, name: &str) {
        if self.opponents.remove(name).is_some() {
            log::info!("opponent {name} died");
        }
        if self.tracked.as_deref() == Some(name) {
            self.tracked = None;
        }
        if self.latest_scanned.as_deref() == Some(name) {
            self.latest_scanned = None;
        }
        self.deaths.push(name.to_string());
    }

    /// Buffer a hit for shot inference and stop tracking the bullet.
    pub fn on_bullet_hit(&mut self, handle: &BulletHandle, victim: &str) -> TrackedBullet {
        self.bullet_hits.push(BulletHit {
            victim: victim.to_string(),
            power: handle.power,
        });
        self.take_bullet(handle)
    }

    pub fn on_bullet_missed(&mut self, handle: &BulletHandle) -> TrackedBullet {
        self.take_bullet(handle)
    }

    pub fn on_hit_wall(&mut self, collision: WallCollision) {
        self.wall_collisions.push(collision);
    }

    pub fn on_hit_robot(&mut self, collision: RobotCollision) {
        self.robot_collisions.push(collision);
    }

    pub fn register_bullet(&mut self, bullet: TrackedBullet) {
        self.bullets.push(bullet);
    }

    fn take_bullet(&mut self, handle: &BulletHandle) -> TrackedBullet {
        match self.bullets.iter().position(|b| b.handle.id == handle.id) {
            Some(index) => self.bullets.swap_remove(index),
            None => {
                log::debug!("result for untracked bullet {}", handle.id);
                TrackedBullet::untracked(handle)
            }
        }
    }

    /// Point the tracked reference at `name`. Returns `false` (and leaves the
    /// current target alone) when no live opponent has that name.
    pub fn set_tracked(&mut self, name: &str) -> bool {
        if !self.opponents.contains_key(name) {
            log::debug!("ignoring lock on unknown opponent {name}");
            return false;
        }
        if self.tracked.as_deref() != Some(name) {
            self.tracked = Some(name.to_string());
        }
        true
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.battlefield
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn time(&self) -> u64 {
        self.pose.time
    }

    pub fn position(&self) -> Vector {
        self.pose.position
    }

    pub fn opponents(&self) -> impl Iterator<Item = &OtherRobot> {
        self.opponents.values()
    }

    pub fn opponent(&self, name: &str) -> Option<&OtherRobot> {
        self.opponents.get(name)
    }

    pub fn opponent_count(&self) -> usize {
        self.opponents.len()
    }

    pub fn tracked_name(&self) -> Option<&str> {
        self.tracked.as_deref()
    }

    /// The tracked opponent, resolved through the map every time.
    pub fn tracked(&self) -> Option<&OtherRobot> {
        self.tracked.as_deref().and_then(|name| self.opponents.get(name))
    }

    pub fn latest_scanned(&self) -> Option<&OtherRobot> {
        self.latest_scanned
            .as_deref()
            .and_then(|name| self.opponents.get(name))
    }

    pub fn bullets(&self) -> &[TrackedBullet] {
        &self.bullets
    }

    pub fn bullet_hits(&self) -> &[BulletHit] {
        &self.bullet_hits
    }

    pub fn robot_collisions(&self) -> &[RobotCollision] {
        &self.robot_collisions
    }

    pub fn wall_collisions(&self) -> &[WallCollision] {
        &self.wall_collisions
    }

    pub fn deaths(&self) -> &[String] {
        &self.deaths
    }

    /// Every active threat wave, across all opponents.
    pub fn threat_waves(&self) -> impl Iterator<Item = &WaveBullet> {
        self.opponents
            .values()
            .flat_map(|robot| robot.waves().iter())
            .filter(|wave| wave.is_active())
    }

    /// The threat wave that will reach `position` first, ignoring waves that
    /// have already passed it.
    pub fn nearest_threat(&self, position: Vector) -> Option<&WaveBullet> {
        self.threat_waves()
            .filter(|wave| !wave.has_passed(position))
            .min_by(|a, b| a.turns_until(position).total_cmp(&b.turns_until(position)))
    }
}
