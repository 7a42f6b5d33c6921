//! Core types and definitions for the arena agent.
//!
//! This crate defines the vocabulary shared across the other crates:
//! geometry, arena rules, host-boundary events and commands, configuration
//! and the error type. It has no dependency on any host engine.

pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod geometry;
pub mod rules;
pub mod types;

pub use error::ArenaError;
pub use geometry::{Battlefield, Vector};

#[cfg(test)]
mod tests;
