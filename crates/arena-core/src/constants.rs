//! Arena rules and tuning parameters.
//!
//! Angles are degrees (0 = north, clockwise), distances are arena units and
//! time is counted in whole turns.

// --- Robot body ---

/// Side length of a robot's square hit box.
pub const ROBOT_SIZE: f64 = 48.0;

/// Half the hit box; used as the wall margin and the wave hit tolerance.
pub const ROBOT_HALF_SIZE: f64 = ROBOT_SIZE / 2.0;

// --- Motion ---

/// Maximum body speed (units/turn).
pub const MAX_VELOCITY: f64 = 8.0;

/// Speed gained per turn when accelerating.
pub const ACCELERATION: f64 = 1.0;

/// Speed lost per turn when braking.
pub const DECELERATION: f64 = 2.0;

/// Body turn rate at standstill (degrees/turn).
pub const MAX_TURN_RATE: f64 = 10.0;

/// Body turn rate lost per unit of speed.
pub const TURN_RATE_SPEED_PENALTY: f64 = 0.75;

/// Gun turn rate limit (degrees/turn).
pub const MAX_GUN_TURN_RATE: f64 = 20.0;

/// Radar turn rate limit (degrees/turn).
pub const MAX_RADAR_TURN_RATE: f64 = 45.0;

// --- Firing ---

/// Weakest bullet the rules allow.
pub const MIN_BULLET_POWER: f64 = 0.1;

/// Strongest bullet the rules allow.
pub const MAX_BULLET_POWER: f64 = 3.0;

/// Bullet speed at zero power; every unit of power costs `BULLET_SPEED_PER_POWER`.
pub const BULLET_BASE_SPEED: f64 = 20.0;

/// Bullet speed lost per unit of power.
pub const BULLET_SPEED_PER_POWER: f64 = 3.0;

/// Gun heat dissipated per turn.
pub const GUN_COOLING_RATE: f64 = 0.1;

/// Energy both robots lose when they ram each other.
pub const ROBOT_HIT_DAMAGE: f64 = 0.6;

// --- Shot inference ---

/// Energy attributed to a suspected wall collision. A rough guess, not a rule.
pub const WALL_HIT_ENERGY_ESTIMATE: f64 = 0.1;

/// Speed magnitude change between two scans that counts as a wall collision.
pub const WALL_HIT_SPEED_DROP: f64 = 2.0;

/// Slack subtracted from the half hit box when testing wall proximity.
pub const WALL_PROXIMITY_SLACK: f64 = 2.0;

/// Confidence multiplier applied per ambiguous energy-loss cause.
pub const AMBIGUITY_CONFIDENCE_FACTOR: f64 = 0.5;

// --- Tracking ---

/// Default number of Ticks retained per opponent.
pub const DEFAULT_HISTORY_CAPACITY: usize = 2048;

/// Default number of turns a wave may live before it is expired.
pub const DEFAULT_WAVE_TTL: u64 = 150;

/// A radar lock is considered lost when the target was not seen for this many turns.
pub const RADAR_STALE_TURNS: u64 = 2;

// --- Guess factor statistics ---

/// Default number of escape-factor bins (odd, so that bin centre 0 exists).
pub const DEFAULT_GUESS_FACTOR_BINS: usize = 31;

/// Upper edges of the lateral-speed buckets; a final bucket catches the rest.
pub const LATERAL_SPEED_EDGES: [f64; 4] = [1.0, 3.0, 5.0, 7.0];

/// Width of one distance bucket.
pub const DISTANCE_BUCKET_SIZE: f64 = 150.0;

/// Number of distance buckets; the last one is open-ended.
pub const DISTANCE_BUCKETS: usize = 5;

// --- Strategies ---

/// Gun and radar count as "on target" within this many degrees.
pub const AIM_TOLERANCE: f64 = 5.0;

/// Overshoot applied by the tracking radar so the beam sweeps across the target.
pub const TRACKING_RADAR_COEFFICIENT: f64 = 2.0;

/// Power used by the head-on gun.
pub const HEAD_ON_POWER: f64 = 1.0;

/// Power used by the predictive and guess-factor guns.
pub const AIMED_POWER: f64 = 2.0;

/// Iterations of the time-of-flight refinement in the predictive gun.
pub const PREDICTION_ITERATIONS: usize = 10;

/// Repulsion strength of one opponent in anti-gravity movement.
pub const ANTI_GRAVITY_ROBOT_FORCE: f64 = 50_000.0;

/// Repulsion strength of a wall at zero distance.
pub const ANTI_GRAVITY_WALL_FORCE: f64 = 1_000.0;

/// Walls start pushing inside this distance.
pub const ANTI_GRAVITY_WALL_BUFFER: f64 = 50.0;

/// Body speed per unit of net anti-gravity force.
pub const ANTI_GRAVITY_SPEED_FACTOR: f64 = 0.1;

/// Orbiting robots reverse when this far ahead would leave the arena.
pub const ORBIT_WALL_LOOKAHEAD: f64 = 120.0;

/// Wall followers turn when this far ahead would leave the arena.
pub const WALLS_LOOKAHEAD: f64 = 60.0;

/// Random movement picks a new course every this many turns.
pub const RANDOM_MOVEMENT_PERIOD: u64 = 20;

/// Turns simulated at most when surfing a wave.
pub const SURF_HORIZON: u32 = 100;

// --- Geometry ---

/// Smallest magnitude used as a divisor or a length.
pub const GEOMETRY_EPSILON: f64 = 1e-9;
