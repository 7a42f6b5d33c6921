//! Error type shared by the arena crates.
//!
//! Most per-turn problems are recovered locally (zero derivatives, idle
//! output); this type covers the few seams where a caller has a decision to make.

#[derive(thiserror::Error, Debug)]
pub enum ArenaError {
    /// A strategy bundle was requested by a name nobody registered.
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
    /// Persisted statistics do not match the expected dimensions.
    #[error("statistics table has {found} cells, expected {expected}")]
    InvalidStats { expected: usize, found: usize },
    /// Persisted statistics could not be (de)serialized.
    #[error("statistics serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The host ended the battle; the turn loop stops normally.
    #[error("battle over")]
    BattleOver,
    /// The host stopped answering.
    #[error("host disconnected: {0}")]
    HostDisconnected(String),
}
