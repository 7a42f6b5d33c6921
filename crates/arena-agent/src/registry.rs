//! Named strategy bundles.
//!
//! A bundle holds at most one factory per role. Applying it to an agent
//! replaces only the roles it supplies.

use std::collections::BTreeMap;

use arena_core::config::AgentConfig;

use crate::components::{
    AntiGravityMovement, GuessFactorGun, Gun, HeadOnGun, Movement, OrbitMovement, PredictiveGun,
    PriorityRadar, Radar, RandomMovement, RandomRadar, SpinMovement, SpinRadar, TrackingRadar,
    WallsMovement, WaveSurfingMovement,
};

pub type RadarFactory = fn(&AgentConfig) -> Box<dyn Radar>;
pub type GunFactory = fn(&AgentConfig) -> Box<dyn Gun>;
pub type MovementFactory = fn(&AgentConfig) -> Box<dyn Movement>;

#[derive(Clone, Copy, Default)]
pub struct StrategyBundle {
    pub radar: Option<RadarFactory>,
    pub gun: Option<GunFactory>,
    pub movement: Option<MovementFactory>,
}

impl StrategyBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radar(mut self, factory: RadarFactory) -> Self {
        self.radar = Some(factory);
        self
    }

    pub fn with_gun(mut self, factory: GunFactory) -> Self {
        self.gun = Some(factory);
        self
    }

    pub fn with_movement(mut self, factory: MovementFactory) -> Self {
        self.movement = Some(factory);
        self
    }
}

#[derive(Clone, Default)]
pub struct StrategyRegistry {
    bundles: BTreeMap<String, StrategyBundle>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundles shipped with the agent.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            "simple",
            StrategyBundle::new()
                .with_radar(TrackingRadar::boxed)
                .with_gun(HeadOnGun::boxed)
                .with_movement(OrbitMovement::boxed),
        );
        registry.register(
            "head_on",
            StrategyBundle::new()
                .with_radar(TrackingRadar::boxed)
                .with_gun(HeadOnGun::boxed),
        );
        registry.register(
            "predictive",
            StrategyBundle::new()
                .with_radar(TrackingRadar::boxed)
                .with_gun(PredictiveGun::boxed),
        );
        registry.register(
            "guess_factor",
            StrategyBundle::new()
                .with_radar(TrackingRadar::boxed)
                .with_gun(GuessFactorGun::boxed),
        );
        registry.register(
            "wave_surfing",
            StrategyBundle::new().with_movement(WaveSurfingMovement::boxed),
        );
        registry.register(
            "anti_gravity",
            StrategyBundle::new().with_movement(AntiGravityMovement::boxed),
        );
        registry.register("walls", StrategyBundle::new().with_movement(WallsMovement::boxed));
        registry.register(
            "spin",
            StrategyBundle::new()
                .with_radar(SpinRadar::boxed)
                .with_movement(SpinMovement::boxed),
        );
        registry.register(
            "random",
            StrategyBundle::new()
                .with_radar(RandomRadar::boxed)
                .with_movement(RandomMovement::boxed),
        );
        registry.register(
            "priority",
            StrategyBundle::new()
                .with_radar(PriorityRadar::boxed)
                .with_movement(AntiGravityMovement::boxed),
        );
        registry
    }

    /// Add or replace a bundle.
    pub fn register(&mut self, name: impl Into<String>, bundle: StrategyBundle) {
        self.bundles.insert(name.into(), bundle);
    }

    pub fn get(&self, name: &str) -> Option<&StrategyBundle> {
        self.bundles.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }
}
