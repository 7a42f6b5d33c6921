//! The boundary to the simulator that runs the battle.

use arena_core::commands::TurnCommands;
use arena_core::events::HostEvent;
use arena_core::types::{BulletHandle, Pose};
use arena_core::{ArenaError, Battlefield};

/// What the agent needs from the simulator.
///
/// `execute` is the only call that may block: it ends our turn and returns the
/// events delivered before the next one.
pub trait Host {
    /// Own telemetry for the current turn.
    fn telemetry(&self) -> Pose;

    fn battlefield(&self) -> Battlefield;

    /// Set rotations and velocity for this turn.
    fn apply(&mut self, commands: &TurnCommands);

    /// Fire at `power`. `None` when the host refused (gun still hot).
    fn fire(&mut self, power: f64) -> Option<BulletHandle>;

    /// End the turn. `Err(ArenaError::BattleOver)` once the battle is done.
    fn execute(&mut self) -> Result<Vec<HostEvent>, ArenaError>;
}
