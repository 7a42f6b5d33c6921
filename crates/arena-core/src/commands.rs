//! Commands sent from the agent to the host at the end of each turn.

use serde::{Deserialize, Serialize};

/// Everything the agent asks of the host for one turn.
///
/// Rotation rates are degrees per turn, positive = clockwise. The host clamps
/// them to its physical limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnCommands {
    pub radar_rotation: f64,
    pub gun_rotation: f64,
    pub body_rotation: f64,
    /// Signed body speed (units/turn).
    pub velocity: f64,
    /// Bullet power, present only when a shot was actually requested and allowed.
    pub fire: Option<f64>,
}

impl TurnCommands {
    /// True when the turn asks for no motion and no shot.
    pub fn is_idle(&self) -> bool {
        self.gun_rotation == 0.0
            && self.body_rotation == 0.0
            && self.velocity == 0.0
            && self.fire.is_none()
    }
}
