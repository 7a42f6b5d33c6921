//! Single opponent observations and the bounded history that holds them.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use arena_core::geometry::{modulo, normal_relative_angle, Vector};

/// One observation of one opponent.
///
/// Built once per scan and never changed afterwards; the history only hands
/// out shared references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub time: u64,
    /// Bearing relative to our heading at scan time (degrees).
    pub bearing: f64,
    pub distance: f64,
    pub energy: f64,
    /// Absolute arena position.
    pub position: Vector,
    /// Displacement per turn since the previous Tick; zero when unknown.
    pub velocity: Vector,
    /// Change of travel direction per turn (degrees); zero when unknown.
    pub turn_rate: f64,
}

impl Tick {
    /// A Tick with no motion derivatives.
    pub fn new(time: u64, bearing: f64, distance: f64, energy: f64, position: Vector) -> Self {
        Self {
            time,
            bearing,
            distance,
            energy,
            position,
            velocity: Vector::ZERO,
            turn_rate: 0.0,
        }
    }

    /// Derive velocity and turn rate from `previous`.
    ///
    /// Derivatives are only trusted when `previous` is exactly one turn older.
    /// Turn rate additionally needs both velocities to be non-zero.
    pub fn with_motion_from(mut self, previous: Option<&Tick>) -> Self {
        let Some(previous) = previous else {
            return self;
        };
        if self.time <= previous.time || self.time - previous.time != 1 {
            return self;
        }

        let dt = (self.time - previous.time) as f64;
        self.velocity = (self.position - previous.position).divide(dt);

        if self.velocity.length_sq() > 0.0 && previous.velocity.length_sq() > 0.0 {
            self.turn_rate =
                normal_relative_angle(self.velocity.angle() - previous.velocity.angle()) / dt;
        }
        self
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    /// Direction of travel; 0 when standing still.
    pub fn heading(&self) -> f64 {
        self.velocity.angle()
    }
}

/// Fixed-capacity ring of Ticks, oldest first.
///
/// Indexing follows the "negative from the end" convention: `-1` is the latest
/// Tick, `-2` the one before. Any index wraps by non-negative modulo over the
/// retained length, so positive indices count from the oldest retained Tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickHistory {
    ticks: VecDeque<Tick>,
    capacity: usize,
}

impl TickHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ticks: VecDeque::with_capacity(capacity.min(256)),
            capacity,
        }
    }

    /// Append a Tick, evicting the oldest once at capacity.
    pub fn push(&mut self, tick: Tick) {
        if self.ticks.len() == self.capacity {
            self.ticks.pop_front();
        }
        self.ticks.push_back(tick);
    }

    pub fn get(&self, index: isize) -> Option<&Tick> {
        if self.ticks.is_empty() {
            return None;
        }
        self.ticks.get(modulo(index, self.ticks.len()))
    }

    pub fn latest(&self) -> Option<&Tick> {
        self.ticks.back()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent first.
    pub fn iter_recent(&self) -> impl Iterator<Item = &Tick> {
        self.ticks.iter().rev()
    }
}
