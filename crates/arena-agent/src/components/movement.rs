//! Movement strategies.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena_core::config::AgentConfig;
use arena_core::constants::{
    ANTI_GRAVITY_ROBOT_FORCE, ANTI_GRAVITY_SPEED_FACTOR, ANTI_GRAVITY_WALL_BUFFER,
    ANTI_GRAVITY_WALL_FORCE, GEOMETRY_EPSILON, MAX_TURN_RATE, MAX_VELOCITY,
    ORBIT_WALL_LOOKAHEAD, RANDOM_MOVEMENT_PERIOD, ROBOT_HALF_SIZE, ROBOT_SIZE, SURF_HORIZON,
    WALLS_LOOKAHEAD,
};
use arena_core::geometry::{clamp, headingless_angle, normal_relative_angle};
use arena_core::rules::max_turn_rate;
use arena_core::types::{RobotCollision, WallCollision};
use arena_core::Vector;
use arena_tracking::{ProjectedBot, SpeedBehaviour, TurnBehaviour, WaveBullet};

use super::{turn_towards, Component, Movement, MovementStep};
use crate::state::BattleState;

const RANDOM_MOVEMENT_SALT: u64 = 0x4d4f_5645;

/// Circles the tracked opponent, reversing near walls and after collisions.
#[derive(Debug)]
pub struct OrbitMovement {
    direction: f64,
}

impl Default for OrbitMovement {
    fn default() -> Self {
        Self { direction: 1.0 }
    }
}

impl OrbitMovement {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Movement> {
        Box::new(Self::default())
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

impl Component for OrbitMovement {
    fn name(&self) -> &'static str {
        "orbit_movement"
    }

    fn on_hit_wall(&mut self, _collision: &WallCollision) {
        self.reverse();
    }

    fn on_hit_robot(&mut self, _collision: &RobotCollision) {
        self.reverse();
    }
}

impl Movement for OrbitMovement {
    fn step(&mut self, state: &BattleState) -> MovementStep {
        let Some(tick) = state.tracked().and_then(|robot| robot.latest()) else {
            return MovementStep::default();
        };
        let pose = state.pose();
        // Body stays perpendicular to the target; the sign of the speed picks the side.
        let perpendicular = pose.position.bearing_to(tick.position) + 90.0;
        let travel = if self.direction > 0.0 {
            perpendicular
        } else {
            perpendicular + 180.0
        };
        let field = state.battlefield();
        let blocked = |heading: f64| {
            field.is_out_of_bounds(
                pose.position.project(heading, ORBIT_WALL_LOOKAHEAD),
                ROBOT_HALF_SIZE,
            )
        };
        // Cornered both ways: keep going rather than flip every turn.
        if blocked(travel) && !blocked(travel + 180.0) {
            self.reverse();
        }
        MovementStep {
            rotation: turn_towards(pose.heading, perpendicular, max_turn_rate(pose.velocity)),
            speed: MAX_VELOCITY * self.direction,
        }
    }
}

/// Drives in tight circles.
#[derive(Debug, Default)]
pub struct SpinMovement;

impl SpinMovement {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Movement> {
        Box::new(Self)
    }
}

impl Component for SpinMovement {
    fn name(&self) -> &'static str {
        "spin_movement"
    }
}

impl Movement for SpinMovement {
    fn step(&mut self, _state: &BattleState) -> MovementStep {
        MovementStep {
            rotation: MAX_TURN_RATE,
            speed: MAX_VELOCITY,
        }
    }
}

/// Runs along the walls clockwise, keeping to the four axis headings.
#[derive(Debug, Default)]
pub struct WallsMovement;

impl WallsMovement {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Movement> {
        Box::new(Self)
    }

    /// Axis heading to drive on from `position` while facing `heading`.
    pub fn course(state: &BattleState, position: Vector, heading: f64) -> f64 {
        let mut course = (heading / 90.0).round() * 90.0;
        for _ in 0..4 {
            let ahead = position.project(course, WALLS_LOOKAHEAD);
            if !state.battlefield().is_out_of_bounds(ahead, ROBOT_HALF_SIZE) {
                break;
            }
            course += 90.0;
        }
        course
    }
}

impl Component for WallsMovement {
    fn name(&self) -> &'static str {
        "walls_movement"
    }
}

impl Movement for WallsMovement {
    fn step(&mut self, state: &BattleState) -> MovementStep {
        let pose = state.pose();
        let course = Self::course(state, pose.position, pose.heading);
        MovementStep {
            rotation: turn_towards(pose.heading, course, max_turn_rate(pose.velocity)),
            speed: MAX_VELOCITY,
        }
    }
}

/// Holds a random course for a while, then picks another.
#[derive(Debug)]
pub struct RandomMovement {
    rng: ChaCha8Rng,
    course: MovementStep,
    next_change: u64,
}

impl RandomMovement {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            course: MovementStep::default(),
            next_change: 0,
        }
    }

    pub fn boxed(config: &AgentConfig) -> Box<dyn Movement> {
        Box::new(Self::new(config.component_seed(RANDOM_MOVEMENT_SALT)))
    }
}

impl Component for RandomMovement {
    fn name(&self) -> &'static str {
        "random_movement"
    }

    fn on_hit_wall(&mut self, _collision: &WallCollision) {
        self.course.speed = -self.course.speed;
    }
}

impl Movement for RandomMovement {
    fn step(&mut self, state: &BattleState) -> MovementStep {
        if state.time() >= self.next_change {
            self.course = MovementStep {
                rotation: self.rng.gen_range(-MAX_TURN_RATE..=MAX_TURN_RATE),
                speed: self.rng.gen_range(-MAX_VELOCITY..=MAX_VELOCITY),
            };
            self.next_change = state.time() + RANDOM_MOVEMENT_PERIOD;
        }
        self.course
    }
}

/// Melee movement: every opponent and every nearby wall pushes us away.
#[derive(Debug, Default)]
pub struct AntiGravityMovement;

impl AntiGravityMovement {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Movement> {
        Box::new(Self)
    }

    /// Net repulsion at our position.
    pub fn force(state: &BattleState) -> Vector {
        let own = state.position();
        let mut force = Vector::ZERO;

        for tick in state.opponents().filter_map(|robot| robot.latest()) {
            let distance = own.distance(tick.position).max(0.1);
            let magnitude = ANTI_GRAVITY_ROBOT_FORCE / (distance * distance);
            force = force + (own - tick.position).normalize() * magnitude;
        }

        let field = state.battlefield();
        let push = |gap: f64| {
            if gap < ANTI_GRAVITY_WALL_BUFFER {
                (ANTI_GRAVITY_WALL_BUFFER - gap) / ANTI_GRAVITY_WALL_BUFFER * ANTI_GRAVITY_WALL_FORCE
            } else {
                0.0
            }
        };
        force
            + Vector::new(
                push(own.x()) - push(field.width - own.x()),
                push(own.y()) - push(field.height - own.y()),
            )
    }
}

impl Component for AntiGravityMovement {
    fn name(&self) -> &'static str {
        "anti_gravity_movement"
    }
}

impl Movement for AntiGravityMovement {
    fn step(&mut self, state: &BattleState) -> MovementStep {
        let force = Self::force(state);
        if force.length() < GEOMETRY_EPSILON {
            return MovementStep::default();
        }
        let pose = state.pose();
        let forward = normal_relative_angle(force.angle() - pose.heading);
        let mut speed = (force.length() * ANTI_GRAVITY_SPEED_FACTOR).min(MAX_VELOCITY);
        if forward.abs() >= 90.0 {
            speed = -speed;
        }
        let rotation = headingless_angle(forward);
        let limit = max_turn_rate(pose.velocity);
        MovementStep {
            rotation: clamp(rotation, -limit, limit),
            speed,
        }
    }
}

/// Dodges the nearest threat wave.
///
/// Both orbit directions around the wave origin are simulated until the wave
/// would arrive, and the one ending at the lower danger wins. Without a
/// threat wave it orbits the tracked opponent.
#[derive(Debug, Default)]
pub struct WaveSurfingMovement {
    orbit: OrbitMovement,
}

impl WaveSurfingMovement {
    pub fn boxed(_config: &AgentConfig) -> Box<dyn Movement> {
        Box::new(Self::default())
    }

    /// Where we would be when `wave` reaches us, orbiting its origin in
    /// `direction`, together with the wave as it will be at that moment.
    pub fn project_arrival(
        state: &BattleState,
        wave: &WaveBullet,
        direction: f64,
    ) -> (Vector, WaveBullet) {
        let pose = state.pose();
        let mut bot = ProjectedBot::new(
            pose.position,
            pose.travel_heading(),
            pose.velocity.abs(),
            0.0,
            pose.time,
        );
        let mut arriving = wave.clone();
        for _ in 0..SURF_HORIZON {
            let desired = wave.origin().bearing_to(bot.position) + 90.0 * direction;
            let offset = normal_relative_angle(desired - bot.heading);
            let turn = if offset > 0.0 {
                TurnBehaviour::HardRight
            } else if offset < 0.0 {
                TurnBehaviour::HardLeft
            } else {
                TurnBehaviour::Straight
            };
            bot.step(turn, SpeedBehaviour::Accelerate, state.battlefield());

            if !arriving.advance() {
                break;
            }
            // Front touches the near edge of the robot.
            if arriving.radius() + ROBOT_HALF_SIZE >= arriving.origin().distance(bot.position) {
                break;
            }
        }
        (bot.position, arriving)
    }

    /// Danger of standing at `position` when `arriving` gets there. A front
    /// that misses the position, or a bearing outside the escape range, only
    /// leaves the wall term.
    pub fn danger(state: &BattleState, arriving: &WaveBullet, position: Vector) -> f64 {
        let wall = 0.1 * ROBOT_SIZE / state.battlefield().wall_distance(position).max(1.0);
        if !arriving.is_dangerous_at(position) {
            return wall;
        }
        arriving.confidence() * (1.0 - arriving.guess_factor(position).abs()) + wall
    }
}

impl Component for WaveSurfingMovement {
    fn name(&self) -> &'static str {
        "wave_surfing_movement"
    }

    fn on_hit_wall(&mut self, collision: &WallCollision) {
        self.orbit.on_hit_wall(collision);
    }

    fn on_hit_robot(&mut self, collision: &RobotCollision) {
        self.orbit.on_hit_robot(collision);
    }
}

impl Movement for WaveSurfingMovement {
    fn step(&mut self, state: &BattleState) -> MovementStep {
        let pose = state.pose();
        let Some(wave) = state.nearest_threat(pose.position) else {
            return self.orbit.step(state);
        };

        let (position, arriving) = Self::project_arrival(state, wave, 1.0);
        let clockwise = Self::danger(state, &arriving, position);
        let (position, arriving) = Self::project_arrival(state, wave, -1.0);
        let counter = Self::danger(state, &arriving, position);
        let direction = if clockwise <= counter { 1.0 } else { -1.0 };

        // Perpendicular to the wave origin; the speed sign selects the direction.
        let perpendicular = wave.origin().bearing_to(pose.position) + 90.0;
        MovementStep {
            rotation: turn_towards(pose.heading, perpendicular, max_turn_rate(pose.velocity)),
            speed: MAX_VELOCITY * direction,
        }
    }
}
