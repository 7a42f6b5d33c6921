//! Turn loop and strategies for the arena agent.
//!
//! `Agent` owns the shared `BattleState`, drains host events once per turn,
//! runs the active radar, gun and movement against the state and hands the
//! resulting commands back to the `Host`.

pub mod agent;
pub mod components;
pub mod host;
pub mod registry;
pub mod state;

pub use agent::Agent;
pub use arena_core as core;
pub use arena_tracking as tracking;
pub use host::Host;
pub use registry::{StrategyBundle, StrategyRegistry};
pub use state::{BattleState, TrackedBullet};
