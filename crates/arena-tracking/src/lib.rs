//! Opponent tracking and prediction for the arena agent.
//!
//! Per-opponent observation history, shot inference, expanding projectile
//! waves, forward motion projection and guess-factor statistics.
//! Pure data models: nothing here talks to the host.

pub mod guess_factor;
pub mod opponent;
pub mod projection;
pub mod tick;
pub mod wave;

pub use arena_core as core;
pub use guess_factor::{GuessFactorTable, Segment};
pub use opponent::{HistoryDepth, OtherRobot, ShotContext};
pub use projection::{ProjectedBot, SpeedBehaviour, TurnBehaviour};
pub use tick::{Tick, TickHistory};
pub use wave::{WaveBullet, WaveStatus};

#[cfg(test)]
mod tests;
