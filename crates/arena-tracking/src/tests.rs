//! Tests for opponent history, shot inference, waves, projection and statistics.

use approx::assert_abs_diff_eq;
use test_log::test;

use arena_core::constants::*;
use arena_core::events::BulletHit;
use arena_core::types::{Pose, RobotCollision};
use arena_core::{ArenaError, Battlefield, Vector};

use crate::guess_factor::{GuessFactorTable, Segment};
use crate::opponent::{HistoryDepth, OtherRobot, ShotContext};
use crate::projection::{ProjectedBot, SpeedBehaviour, TurnBehaviour};
use crate::tick::{Tick, TickHistory};
use crate::wave::{WaveBullet, WaveStatus};

fn tick_at(time: u64, x: f64, y: f64, energy: f64) -> Tick {
    Tick::new(time, 0.0, 100.0, energy, Vector::new(x, y))
}

fn owner_at(x: f64, y: f64) -> Pose {
    Pose {
        position: Vector::new(x, y),
        energy: 100.0,
        ..Default::default()
    }
}

fn shot_context<'a>(
    owner: &'a Pose,
    battlefield: &'a Battlefield,
    bullet_hits: &'a [BulletHit],
    robot_collisions: &'a [RobotCollision],
) -> ShotContext<'a> {
    ShotContext {
        owner,
        battlefield,
        bullet_hits,
        robot_collisions,
        wave_ttl: DEFAULT_WAVE_TTL,
    }
}

// ---- Tick derivation ----

#[test]
fn test_velocity_from_consecutive_ticks() {
    let first = tick_at(10, 100.0, 100.0, 100.0);
    let second = tick_at(11, 103.0, 104.0, 100.0).with_motion_from(Some(&first));
    assert_abs_diff_eq!(second.velocity.x(), 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(second.velocity.y(), 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(second.speed(), 5.0, epsilon = 1e-9);
}

#[test]
fn test_turn_rate_from_velocity_angles() {
    let a = tick_at(10, 100.0, 100.0, 100.0);
    let b = tick_at(11, 100.0, 108.0, 100.0).with_motion_from(Some(&a));
    // heading 0 -> heading 90
    let c = tick_at(12, 108.0, 108.0, 100.0).with_motion_from(Some(&b));
    assert_eq!(b.turn_rate, 0.0, "first derivative has no prior velocity");
    assert_abs_diff_eq!(c.turn_rate, 90.0, epsilon = 1e-9);
}

#[test]
fn test_turn_rate_zero_when_stationary() {
    let a = tick_at(10, 100.0, 100.0, 100.0);
    let b = tick_at(11, 100.0, 100.0, 100.0).with_motion_from(Some(&a));
    let c = tick_at(12, 100.0, 108.0, 100.0).with_motion_from(Some(&b));
    assert_eq!(b.velocity, Vector::ZERO);
    assert_eq!(c.turn_rate, 0.0);
}

#[test]
fn test_gap_gives_zero_derivatives() {
    let first = tick_at(10, 100.0, 100.0, 100.0);
    let gapped = tick_at(12, 120.0, 100.0, 100.0).with_motion_from(Some(&first));
    assert_eq!(gapped.velocity, Vector::ZERO);
    assert_eq!(gapped.turn_rate, 0.0);

    let stale = tick_at(9, 120.0, 100.0, 100.0).with_motion_from(Some(&first));
    assert_eq!(stale.velocity, Vector::ZERO, "out-of-order tick is tolerated");
}

// ---- TickHistory ----

#[test]
fn test_history_negative_indexing() {
    let mut history = TickHistory::new(8);
    for t in 0..5 {
        history.push(tick_at(t, t as f64, 0.0, 100.0));
    }
    assert_eq!(history.get(-1).map(|t| t.time), Some(4));
    assert_eq!(history.get(-2).map(|t| t.time), Some(3));
    assert_eq!(history.get(0).map(|t| t.time), Some(0));
    assert_eq!(history.get(-6).map(|t| t.time), Some(4), "wraps by modulo");
    assert_eq!(history.get(7).map(|t| t.time), Some(2));
}

#[test]
fn test_history_evicts_oldest_at_capacity() {
    let mut history = TickHistory::new(3);
    for t in 0..5 {
        history.push(tick_at(t, 0.0, 0.0, 100.0));
    }
    assert_eq!(history.len(), 3);
    assert_eq!(history.get(0).map(|t| t.time), Some(2));
    let recent: Vec<u64> = history.iter_recent().map(|t| t.time).collect();
    assert_eq!(recent, vec![4, 3, 2]);
}

#[test]
fn test_empty_history_returns_none() {
    let history = TickHistory::new(4);
    assert!(history.get(-1).is_none());
    assert!(history.latest().is_none());
}

// ---- OtherRobot ----

#[test]
fn test_history_depth_levels() {
    let mut robot = OtherRobot::new("A", 16);
    assert_eq!(robot.history_depth(10), HistoryDepth::None);
    robot.observe(tick_at(10, 100.0, 100.0, 100.0));
    assert_eq!(robot.history_depth(10), HistoryDepth::PositionOnly);
    assert_eq!(robot.history_depth(11), HistoryDepth::None);
    robot.observe(tick_at(11, 100.0, 104.0, 100.0));
    assert_eq!(robot.history_depth(11), HistoryDepth::PositionVelocity);
    robot.observe(tick_at(12, 100.0, 108.0, 100.0));
    assert_eq!(robot.history_depth(12), HistoryDepth::PositionVelocityTurnRate);
    robot.observe(tick_at(14, 100.0, 108.0, 100.0));
    assert_eq!(robot.history_depth(14), HistoryDepth::PositionOnly);
}

#[test]
fn test_recency_order_puts_fresh_first() {
    let mut old = OtherRobot::new("old", 4);
    let mut fresh = OtherRobot::new("fresh", 4);
    let unseen = OtherRobot::new("unseen", 4);
    old.observe(tick_at(3, 0.0, 0.0, 100.0));
    fresh.observe(tick_at(9, 0.0, 0.0, 100.0));

    let mut robots = vec![&unseen, &old, &fresh];
    robots.sort_by(|a, b| a.cmp_recency(b));
    let names: Vec<&str> = robots.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["fresh", "old", "unseen"]);
}

#[test]
fn test_predict_location_uses_latest_motion() {
    let mut robot = OtherRobot::new("A", 8);
    assert!(robot
        .predict_location(5, TurnBehaviour::Straight, SpeedBehaviour::Keep, &Battlefield::default())
        .is_none());
    robot.observe(tick_at(1, 400.0, 300.0, 100.0));
    robot.observe(tick_at(2, 404.0, 300.0, 100.0));
    let predicted = robot
        .predict_location(10, TurnBehaviour::Straight, SpeedBehaviour::Keep, &Battlefield::default())
        .unwrap();
    assert_abs_diff_eq!(predicted.x(), 444.0, epsilon = 1e-9);
    assert_abs_diff_eq!(predicted.y(), 300.0, epsilon = 1e-9);
}

// ---- Shot inference ----

#[test]
fn test_energy_drop_creates_wave() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 97.0));

    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
    let wave = robot.wave(-1).unwrap();
    assert_abs_diff_eq!(wave.power(), 3.0, epsilon = 1e-9);
    assert_eq!(wave.fire_time(), 11);
    assert_abs_diff_eq!(wave.direct_angle(), 180.0, epsilon = 1e-9);
    assert_abs_diff_eq!(wave.confidence(), 1.0, epsilon = 1e-12);
    assert_eq!(wave.origin(), Vector::new(400.0, 400.0));
}

#[test]
fn test_large_drop_is_clamped_to_max_power() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 90.0));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
    assert_abs_diff_eq!(robot.waves()[0].power(), MAX_BULLET_POWER, epsilon = 1e-12);
}

#[test]
fn test_our_bullet_hit_explains_drop() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let hits = [BulletHit {
        victim: "A".into(),
        power: 1.0,
    }];
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 96.0));
    assert!(!robot.predict_bullet_shot(&shot_context(&owner, &field, &hits, &[])));
    assert!(robot.waves().is_empty());
}

#[test]
fn test_hits_on_other_robots_are_ignored() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let hits = [BulletHit {
        victim: "B".into(),
        power: 3.0,
    }];
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 98.0));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &hits, &[])));
}

#[test]
fn test_collision_lowers_power_and_confidence() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let collisions = [RobotCollision {
        name: "A".into(),
        bearing: 0.0,
        energy: 98.4,
        at_fault: false,
    }];
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 98.4));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &collisions)));
    let wave = robot.wave(-1).unwrap();
    assert_abs_diff_eq!(wave.power(), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(wave.confidence(), AMBIGUITY_CONFIDENCE_FACTOR, epsilon = 1e-12);
}

#[test]
fn test_wall_heuristic_only_near_walls() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();

    // Moving at 4/turn along the wall, then stopped dead: -0.1.
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(9, 20.0, 296.0, 100.0));
    robot.observe(tick_at(10, 20.0, 300.0, 100.0));
    robot.observe(tick_at(11, 20.0, 300.0, 99.7));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
    let wave = robot.wave(-1).unwrap();
    assert_abs_diff_eq!(wave.power(), 0.2, epsilon = 1e-9);
    assert_abs_diff_eq!(wave.confidence(), 0.5, epsilon = 1e-12);

    // Same motion in open space: the whole drop is a shot.
    let mut robot = OtherRobot::new("B", 16);
    robot.observe(tick_at(9, 400.0, 396.0, 100.0));
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 99.7));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
    assert_abs_diff_eq!(robot.wave(-1).unwrap().power(), 0.3, epsilon = 1e-9);
}

#[test]
fn test_small_drop_is_not_a_shot() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 99.96));
    assert!(!robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
}

#[test]
fn test_single_tick_cannot_infer() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 50.0));
    assert!(!robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
}

#[test]
fn test_hot_gun_halves_confidence() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::default();
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 400.0, 400.0, 100.0));
    robot.observe(tick_at(11, 400.0, 400.0, 97.0));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
    assert_abs_diff_eq!(robot.gun_heat(11), 1.6, epsilon = 1e-9);
    assert_abs_diff_eq!(robot.gun_heat(16), 1.1, epsilon = 1e-9);

    robot.observe(tick_at(12, 400.0, 400.0, 94.0));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
    assert_abs_diff_eq!(robot.wave(-1).unwrap().confidence(), 0.5, epsilon = 1e-12);
}

#[test]
fn test_gun_heat_without_shots_is_cold() {
    let robot = OtherRobot::new("A", 4);
    assert_eq!(robot.gun_heat(100), 0.0);
}

// ---- WaveBullet ----

fn wave_at_origin(power: f64) -> WaveBullet {
    WaveBullet::new(Vector::new(400.0, 300.0), power, 0, 0.0, &Battlefield::default())
}

#[test]
fn test_wave_radius_grows_by_bullet_speed() {
    let mut wave = wave_at_origin(2.0);
    assert!(wave.advance());
    assert!(wave.advance());
    assert_abs_diff_eq!(wave.radius(), 28.0, epsilon = 1e-9);
    assert_eq!(wave.age(), 2);
}

#[test]
fn test_wave_expires_exactly_once() {
    let mut wave = wave_at_origin(0.1);
    let mut falses = 0;
    let mut steps = 0;
    while steps < 200 {
        if !wave.advance() {
            falses += 1;
            break;
        }
        steps += 1;
    }
    assert_eq!(falses, 1);
    assert!(wave.radius() > Battlefield::default().diagonal());
    assert_eq!(wave.status(), WaveStatus::Expired);
    let radius = wave.radius();
    assert!(!wave.advance());
    assert_eq!(wave.radius(), radius, "terminal wave never changes");
}

#[test]
fn test_wave_ttl_expiry() {
    let mut wave = wave_at_origin(3.0).with_ttl(2);
    assert!(wave.advance());
    assert!(wave.advance());
    assert!(!wave.advance());
    assert_eq!(wave.status(), WaveStatus::Expired);
}

#[test]
fn test_wave_danger_and_passing() {
    let mut wave = wave_at_origin(3.0);
    for _ in 0..9 {
        wave.advance();
    }
    // radius 99, escape angle about 46.7 degrees
    assert!(wave.is_dangerous_at(Vector::new(400.0, 400.0)));
    assert!(!wave.is_dangerous_at(Vector::new(400.0, 200.0)), "behind the wave");
    assert!(!wave.is_dangerous_at(Vector::new(400.0, 500.0)), "not reached yet");
    assert!(wave.has_passed(Vector::new(400.0, 340.0)));
    assert!(!wave.has_passed(Vector::new(400.0, 400.0)));
    assert_abs_diff_eq!(wave.turns_until(Vector::new(400.0, 410.0)), 1.0, epsilon = 1e-9);
}

#[test]
fn test_guess_factor_round_trip() {
    let wave = wave_at_origin(2.0).with_lateral_direction(-1.0);
    for gf in [-1.0, -0.4, 0.0, 0.7, 1.0] {
        let target = wave.origin().project(wave.angle_for_guess_factor(gf), 200.0);
        assert_abs_diff_eq!(wave.guess_factor(target), gf, epsilon = 1e-9);
    }
    let far_side = wave.origin().project(120.0, 200.0);
    assert_eq!(wave.guess_factor(far_side), -1.0, "clamped");
}

#[test]
fn test_mark_matched_is_terminal() {
    let mut wave = wave_at_origin(1.0);
    assert!(wave.mark_matched());
    assert!(!wave.mark_matched());
    assert!(!wave.advance());
    assert_eq!(wave.status(), WaveStatus::Matched);
}

#[test]
fn test_robot_advance_drops_dead_waves() {
    let owner = owner_at(400.0, 300.0);
    let field = Battlefield::new(200.0, 200.0);
    let mut robot = OtherRobot::new("A", 16);
    robot.observe(tick_at(10, 100.0, 100.0, 100.0));
    robot.observe(tick_at(11, 100.0, 100.0, 97.0));
    assert!(robot.predict_bullet_shot(&shot_context(&owner, &field, &[], &[])));
    for _ in 0..30 {
        robot.advance();
    }
    assert!(robot.waves().is_empty());
}

// ---- ProjectedBot ----

#[test]
fn test_projection_straight_line() {
    let mut bot = ProjectedBot::new(Vector::new(400.0, 300.0), 90.0, 8.0, 0.0, 0);
    let end = bot.project(5, TurnBehaviour::Straight, SpeedBehaviour::Keep, &Battlefield::default());
    assert_abs_diff_eq!(end.x(), 440.0, epsilon = 1e-9);
    assert_abs_diff_eq!(end.y(), 300.0, epsilon = 1e-9);
    assert_eq!(bot.time, 5);
}

#[test]
fn test_projection_speed_policies() {
    let field = Battlefield::default();
    let mut accel = ProjectedBot::new(Vector::new(400.0, 100.0), 0.0, 6.0, 0.0, 0);
    accel.project(5, TurnBehaviour::Straight, SpeedBehaviour::Accelerate, &field);
    assert_eq!(accel.speed, MAX_VELOCITY);

    let mut stop = ProjectedBot::new(Vector::new(400.0, 100.0), 0.0, -5.0, 0.0, 0);
    stop.project(1, TurnBehaviour::Straight, SpeedBehaviour::Stop, &field);
    assert_eq!(stop.speed, -3.0, "decelerates toward zero keeping direction");
    stop.project(3, TurnBehaviour::Straight, SpeedBehaviour::Stop, &field);
    assert_eq!(stop.speed, 0.0);
}

#[test]
fn test_projection_turn_is_bounded_by_speed() {
    let field = Battlefield::default();
    let mut bot = ProjectedBot::new(Vector::new(400.0, 300.0), 0.0, 8.0, 0.0, 0);
    bot.step(TurnBehaviour::HardRight, SpeedBehaviour::Keep, &field);
    assert_abs_diff_eq!(bot.heading, 4.0, epsilon = 1e-9);
    bot.step(TurnBehaviour::HardLeft, SpeedBehaviour::Keep, &field);
    assert_abs_diff_eq!(bot.heading, 0.0, epsilon = 1e-9);

    let mut spinner = ProjectedBot::new(Vector::new(400.0, 300.0), 0.0, 0.0, 30.0, 0);
    spinner.step(TurnBehaviour::KeepTurning, SpeedBehaviour::Keep, &field);
    assert_abs_diff_eq!(spinner.heading, MAX_TURN_RATE, epsilon = 1e-9);
}

#[test]
fn test_projection_stays_inside_arena() {
    let field = Battlefield::default();
    let mut bot = ProjectedBot::new(Vector::new(400.0, 560.0), 0.0, 8.0, 0.0, 0);
    let end = bot.project(20, TurnBehaviour::Straight, SpeedBehaviour::Keep, &field);
    assert!(!field.is_out_of_bounds(end, ROBOT_HALF_SIZE - 1e-9));
    assert_abs_diff_eq!(end.y(), 600.0 - ROBOT_HALF_SIZE, epsilon = 1e-9);
    assert_eq!(bot.speed, 0.0, "wall contact stops the robot");
}

#[test]
fn test_projection_from_pose_reverses() {
    let pose = Pose {
        position: Vector::new(400.0, 300.0),
        heading: 0.0,
        velocity: -8.0,
        ..Default::default()
    };
    let end = ProjectedBot::from_pose(&pose).project(
        2,
        TurnBehaviour::Straight,
        SpeedBehaviour::Keep,
        &Battlefield::default(),
    );
    assert_abs_diff_eq!(end.y(), 284.0, epsilon = 1e-9);
}

// ---- GuessFactorTable ----

#[test]
fn test_segment_classification() {
    assert_eq!(Segment::classify(0.5, 100.0), Segment { lateral: 0, distance: 0 });
    assert_eq!(Segment::classify(-4.0, 400.0), Segment { lateral: 2, distance: 2 });
    assert_eq!(Segment::classify(8.0, 5000.0), Segment { lateral: 4, distance: 4 });
}

#[test]
fn test_empty_segment_aims_straight() {
    let table = GuessFactorTable::new(31);
    assert_eq!(table.best_guess_factor(Segment::classify(4.0, 300.0)), 0.0);
}

#[test]
fn test_best_bin_follows_records() {
    let mut table = GuessFactorTable::new(30);
    assert_eq!(table.bins(), 31);
    let segment = Segment::classify(6.0, 250.0);
    table.record(segment, 0.6, 1.0);
    table.record(segment, 0.6, 1.0);
    table.record(segment, -0.8, 1.0);
    assert_abs_diff_eq!(table.best_guess_factor(segment), 0.6, epsilon = 1e-9);
    assert_eq!(
        table.best_guess_factor(Segment::classify(0.0, 250.0)),
        0.0,
        "other segments untouched"
    );
}

#[test]
fn test_bin_centres() {
    let table = GuessFactorTable::new(5);
    assert_eq!(table.bin_for(-1.0), 0);
    assert_eq!(table.bin_for(0.0), 2);
    assert_eq!(table.bin_for(1.0), 4);
    assert_abs_diff_eq!(table.guess_factor_for(3), 0.5, epsilon = 1e-12);
}

#[test]
fn test_table_json_persistence() {
    let mut table = GuessFactorTable::new(7);
    table.record(Segment::classify(2.0, 100.0), -0.3, 1.0);
    let json = table.to_json().unwrap();
    let loaded = GuessFactorTable::from_json(&json).unwrap();
    let segment = Segment::classify(2.0, 100.0);
    assert_eq!(loaded.bins(), 7);
    assert_abs_diff_eq!(loaded.best_guess_factor(segment), table.best_guess_factor(segment));
    for (a, b) in loaded.histogram(segment).iter().zip(table.histogram(segment)) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_table_json_dimension_check() {
    let result = GuessFactorTable::from_json(r#"{"bins": 7, "stats": [0.0, 1.0]}"#);
    assert!(matches!(
        result,
        Err(ArenaError::InvalidStats { expected: 175, found: 2 })
    ));
    let result = GuessFactorTable::from_json("not json");
    assert!(matches!(result, Err(ArenaError::Serialization(_))));
}

#[test]
fn test_table_json_rejects_oversized_bins() {
    let result =
        GuessFactorTable::from_json(r#"{"bins": 18446744073709551615, "stats": []}"#);
    assert!(matches!(
        result,
        Err(ArenaError::InvalidStats { found: 0, .. })
    ));
    let result = GuessFactorTable::from_json(r#"{"bins": 4, "stats": []}"#);
    assert!(matches!(
        result,
        Err(ArenaError::InvalidStats { expected: 100, found: 0 })
    ));
}
