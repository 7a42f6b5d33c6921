//! The turn loop.
//!
//! `Agent` owns the battle state, the active components and the inbound event
//! queue. Each turn runs in a fixed order so that every component sees the
//! same, fully updated state.

use std::collections::VecDeque;

use arena_core::commands::TurnCommands;
use arena_core::config::AgentConfig;
use arena_core::events::HostEvent;
use arena_core::rules::clamp_power;
use arena_core::{ArenaError, Battlefield};

use crate::components::{Component, Gun, GunStep, Movement, MovementStep, Radar, RadarStep};
use crate::host::Host;
use crate::registry::StrategyRegistry;
use crate::state::{BattleState, TrackedBullet};

pub struct Agent {
    registry: StrategyRegistry,
    state: BattleState,
    radar: Option<Box<dyn Radar>>,
    gun: Option<Box<dyn Gun>>,
    movement: Option<Box<dyn Movement>>,
    event_queue: VecDeque<HostEvent>,
}

impl Agent {
    /// An agent with the built-in bundles, running `config.default_strategy`.
    pub fn new(config: AgentConfig, battlefield: Battlefield) -> Self {
        Self::with_registry(config, battlefield, StrategyRegistry::builtin())
    }

    pub fn with_registry(
        config: AgentConfig,
        battlefield: Battlefield,
        registry: StrategyRegistry,
    ) -> Self {
        let default_strategy = config.default_strategy.clone();
        let mut agent = Self {
            registry,
            state: BattleState::new(config, battlefield),
            radar: None,
            gun: None,
            movement: None,
            event_queue: VecDeque::new(),
        };
        // Unknown default leaves every slot empty; already logged.
        let _ = agent.apply_strategy(&default_strategy);
        agent
    }

    /// Instantiate the roles supplied by bundle `name`, keeping the others.
    pub fn apply_strategy(&mut self, name: &str) -> Result<(), ArenaError> {
        let Some(bundle) = self.registry.get(name).copied() else {
            log::warn!("unknown strategy '{name}', keeping current components");
            return Err(ArenaError::UnknownStrategy(name.to_string()));
        };
        let config = self.state.config();
        if let Some(factory) = bundle.radar {
            self.radar = Some(factory(config));
        }
        if let Some(factory) = bundle.gun {
            self.gun = Some(factory(config));
        }
        if let Some(factory) = bundle.movement {
            self.movement = Some(factory(config));
        }
        log::info!(
            "applied strategy '{name}': radar={} gun={} movement={}",
            self.radar.as_ref().map_or("none", |c| c.name()),
            self.gun.as_ref().map_or("none", |c| c.name()),
            self.movement.as_ref().map_or("none", |c| c.name()),
        );
        Ok(())
    }

    /// Queue a host event for the next turn.
    pub fn queue_event(&mut self, event: HostEvent) {
        self.event_queue.push_back(event);
    }

    pub fn queue_events(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        self.event_queue.extend(events);
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn registry_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.registry
    }

    pub fn radar(&self) -> Option<&dyn Radar> {
        self.radar.as_deref()
    }

    pub fn gun(&self) -> Option<&dyn Gun> {
        self.gun.as_deref()
    }

    pub fn movement(&self) -> Option<&dyn Movement> {
        self.movement.as_deref()
    }

    /// Play one turn and return what was sent to the host.
    pub fn turn(&mut self, host: &mut impl Host) -> TurnCommands {
        // 1. New turn
        self.state.set_battlefield(host.battlefield());
        self.state.advance(host.telemetry());

        // 2. Inbound events
        self.process_events();

        // 3. Components
        let radar = match self.radar.as_mut() {
            Some(radar) => radar.step(&self.state),
            None => RadarStep::sweep(),
        };
        if let Some(name) = &radar.lock {
            self.state.set_tracked(name);
        }
        let gun = match self.gun.as_mut() {
            Some(gun) => gun.step(&self.state),
            None => GunStep::default(),
        };
        let movement = match self.movement.as_mut() {
            Some(movement) => movement.step(&self.state),
            None => MovementStep::default(),
        };

        // 4. Commands
        let mut commands = TurnCommands {
            radar_rotation: finite_or_zero(radar.rotation, "radar rotation"),
            gun_rotation: finite_or_zero(gun.rotation, "gun rotation"),
            body_rotation: finite_or_zero(movement.rotation, "body rotation"),
            velocity: finite_or_zero(movement.speed, "velocity"),
            fire: None,
        };

        // 5. Fire
        if gun.fire && self.state.pose().gun_heat <= 0.0 {
            let power = clamp_power(finite_or_zero(gun.power, "bullet power"));
            if let Some(handle) = host.fire(power) {
                commands.fire = Some(power);
                let bullet = TrackedBullet {
                    handle,
                    target: self.state.tracked_name().map(str::to_string),
                    fired_at: self.state.time(),
                };
                if let Some(gun) = self.gun.as_mut() {
                    gun.fired_bullet(&bullet);
                }
                self.state.register_bullet(bullet);
            }
        }

        host.apply(&commands);
        commands
    }

    /// Play turns until the host reports the end of the battle.
    pub fn run(&mut self, host: &mut impl Host) -> Result<(), ArenaError> {
        loop {
            self.turn(host);
            match host.execute() {
                Ok(events) => self.queue_events(events),
                Err(ArenaError::BattleOver) => {
                    log::info!("battle over at turn {}", self.state.time());
                    return Ok(());
                }
                Err(err) => {
                    log::warn!("host failed: {err}");
                    return Err(err);
                }
            }
        }
    }

    /// Drain the queue: energy events first so that shot inference during
    /// scans can account for them, deaths last.
    fn process_events(&mut self) {
        let mut events: Vec<HostEvent> = self.event_queue.drain(..).collect();
        events.sort_by_key(HostEvent::drain_rank);

        for event in events {
            match event {
                HostEvent::BulletHit { bullet, victim } => {
                    let tracked = self.state.on_bullet_hit(&bullet, &victim);
                    if let Some(gun) = self.gun.as_mut() {
                        gun.bullet_hit(&tracked, &victim);
                    }
                }
                HostEvent::BulletMissed { bullet } => {
                    let tracked = self.state.on_bullet_missed(&bullet);
                    if let Some(gun) = self.gun.as_mut() {
                        gun.bullet_missed(&tracked);
                    }
                }
                HostEvent::HitWall(collision) => {
                    if let Some(radar) = self.radar.as_mut() {
                        radar.on_hit_wall(&collision);
                    }
                    if let Some(gun) = self.gun.as_mut() {
                        gun.on_hit_wall(&collision);
                    }
                    if let Some(movement) = self.movement.as_mut() {
                        movement.on_hit_wall(&collision);
                    }
                    self.state.on_hit_wall(collision);
                }
                HostEvent::HitRobot(collision) => {
                    if let Some(radar) = self.radar.as_mut() {
                        radar.on_hit_robot(&collision);
                    }
                    if let Some(gun) = self.gun.as_mut() {
                        gun.on_hit_robot(&collision);
                    }
                    if let Some(movement) = self.movement.as_mut() {
                        movement.on_hit_robot(&collision);
                    }
                    self.state.on_hit_robot(collision);
                }
                HostEvent::Scanned(scan) => self.state.on_scanned(&scan),
                HostEvent::RobotDeath { name } => self.state.on_death(&name),
            }
        }
    }
}

fn finite_or_zero(value: f64, what: &str) -> f64 {
    if value.is_finite() {
        value
    } else {
        log::warn!("non-finite {what} ({value}) replaced by 0");
        0.0
    }
}
