//! Tests for geometry, arena rules, configuration and host-boundary types.

use approx::assert_abs_diff_eq;

use crate::commands::TurnCommands;
use crate::config::AgentConfig;
use crate::constants::*;
use crate::error::ArenaError;
use crate::events::HostEvent;
use crate::geometry::*;
use crate::rules::*;
use crate::types::{Pose, ScanObservation, WallCollision};

// ---- Vector ----

#[test]
fn test_angle_convention_north_is_zero_clockwise() {
    assert_abs_diff_eq!(Vector::new(0.0, 1.0).angle(), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(Vector::new(1.0, 0.0).angle(), 90.0, epsilon = 1e-9);
    assert_abs_diff_eq!(Vector::new(0.0, -1.0).angle(), 180.0, epsilon = 1e-9);
    assert_abs_diff_eq!(Vector::new(-1.0, 0.0).angle(), 270.0, epsilon = 1e-9);
    assert_eq!(Vector::ZERO.angle(), 0.0, "zero vector has no direction");
}

#[test]
fn test_from_polar_matches_angle() {
    let v = Vector::from_polar(135.0, 10.0);
    assert_abs_diff_eq!(v.length(), 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(v.angle(), 135.0, epsilon = 1e-9);
}

#[test]
fn test_rotate_around_round_trip() {
    let origin = Vector::new(400.0, 300.0);
    let start = Vector::new(123.4, 567.8);
    for theta in [-725.0, -90.0, 0.0, 13.7, 90.0, 179.9, 360.0, 1000.0] {
        let back = start.rotate_around(theta, origin).rotate_around(-theta, origin);
        assert_abs_diff_eq!(back.x(), start.x(), epsilon = 1e-9);
        assert_abs_diff_eq!(back.y(), start.y(), epsilon = 1e-9);
    }
}

#[test]
fn test_rotate_around_is_clockwise() {
    let rotated = Vector::new(0.0, 1.0).rotate_around(90.0, Vector::ZERO);
    assert_abs_diff_eq!(rotated.x(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(rotated.y(), 0.0, epsilon = 1e-12);
}

#[test]
fn test_operations_return_new_values() {
    let a = Vector::new(3.0, 4.0);
    let b = a + Vector::new(1.0, 1.0);
    let c = a.scale(2.0);
    assert_eq!(a, Vector::new(3.0, 4.0), "original must be untouched");
    assert_eq!(b, Vector::new(4.0, 5.0));
    assert_eq!(c, Vector::new(6.0, 8.0));
    assert_eq!(a - a, Vector::ZERO);
}

#[test]
fn test_divide_by_zero_is_guarded() {
    let v = Vector::new(1.0, -1.0).divide(0.0);
    assert!(v.is_finite(), "division by zero must not produce inf/NaN");
    assert!(v.x() > 0.0 && v.y() < 0.0);
}

#[test]
fn test_project_and_bearing_agree() {
    let from = Vector::new(100.0, 100.0);
    let to = from.project(30.0, 50.0);
    assert_abs_diff_eq!(from.bearing_to(to), 30.0, epsilon = 1e-9);
    assert_abs_diff_eq!(from.distance(to), 50.0, epsilon = 1e-9);
}

#[test]
fn test_clamp_to_bounds_and_inverted_range() {
    let v = Vector::new(-5.0, 900.0).clamp_to_bounds(0.0, 100.0, 0.0, 600.0);
    assert_eq!(v, Vector::new(0.0, 600.0));
    // A battlefield smaller than the margin collapses to the centre line.
    let tiny = Battlefield::new(10.0, 10.0);
    let clamped = tiny.clamp(Vector::new(0.0, 0.0), ROBOT_HALF_SIZE);
    assert_eq!(clamped, Vector::new(5.0, 5.0));
}

// ---- Angle helpers ----

#[test]
fn test_normal_angles() {
    assert_abs_diff_eq!(normal_relative_angle(190.0), -170.0, epsilon = 1e-9);
    assert_abs_diff_eq!(normal_relative_angle(-190.0), 170.0, epsilon = 1e-9);
    assert_abs_diff_eq!(normal_relative_angle(180.0), 180.0, epsilon = 1e-9);
    assert_abs_diff_eq!(normal_absolute_angle(-10.0), 350.0, epsilon = 1e-9);
    assert_abs_diff_eq!(normal_absolute_angle(720.0), 0.0, epsilon = 1e-9);
}

#[test]
fn test_headingless_angle_prefers_reverse() {
    assert_abs_diff_eq!(headingless_angle(170.0), -10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(headingless_angle(20.0), 20.0, epsilon = 1e-9);
}

#[test]
fn test_angle_within_wraps() {
    assert!(angle_within(355.0, 5.0, 10.0));
    assert!(!angle_within(340.0, 5.0, 10.0));
}

#[test]
fn test_modulo_negative_indices() {
    assert_eq!(modulo(-1, 5), 4);
    assert_eq!(modulo(-2, 5), 3);
    assert_eq!(modulo(-6, 5), 4);
    assert_eq!(modulo(7, 5), 2);
    assert_eq!(modulo(-1, 0), 0);
}

#[test]
fn test_round_to_1() {
    assert_abs_diff_eq!(round_to_1(2.96), 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(round_to_1(0.14), 0.1, epsilon = 1e-12);
}

// ---- Battlefield ----

#[test]
fn test_battlefield_bounds() {
    let field = Battlefield::new(800.0, 600.0);
    assert!(!field.is_out_of_bounds(Vector::new(400.0, 300.0), ROBOT_HALF_SIZE));
    assert!(field.is_out_of_bounds(Vector::new(10.0, 300.0), ROBOT_HALF_SIZE));
    assert!(field.is_out_of_bounds(Vector::new(400.0, 590.0), ROBOT_HALF_SIZE));
    assert_abs_diff_eq!(field.diagonal(), 1000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(field.wall_distance(Vector::new(30.0, 300.0)), 30.0, epsilon = 1e-9);
}

#[test]
fn test_zero_battlefield_diagonal_is_guarded() {
    let field = Battlefield::new(0.0, 0.0);
    assert!(field.diagonal() > 0.0);
}

// ---- Rules ----

#[test]
fn test_power_speed_inverse() {
    let mut power = MIN_BULLET_POWER;
    while power <= MAX_BULLET_POWER {
        assert_abs_diff_eq!(bullet_power(bullet_speed(power)), power, epsilon = 1e-12);
        power += 0.1;
    }
    assert_abs_diff_eq!(bullet_speed(3.0), 11.0, epsilon = 1e-12);
}

#[test]
fn test_max_turn_rate_drops_with_speed() {
    assert_abs_diff_eq!(max_turn_rate(0.0), 10.0, epsilon = 1e-12);
    assert_abs_diff_eq!(max_turn_rate(-8.0), 4.0, epsilon = 1e-12);
}

#[test]
fn test_bullet_damage() {
    assert_abs_diff_eq!(bullet_damage(1.0), 4.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bullet_damage(3.0), 16.0, epsilon = 1e-12);
}

#[test]
fn test_max_escape_angle_shrinks_with_slow_bullets() {
    assert!(max_escape_angle(3.0) > max_escape_angle(0.1));
    assert_abs_diff_eq!(max_escape_angle(3.0), (8.0f64 / 11.0).asin().to_degrees(), epsilon = 1e-9);
}

#[test]
fn test_clamp_power() {
    assert_eq!(clamp_power(5.0), MAX_BULLET_POWER);
    assert_eq!(clamp_power(0.0), MIN_BULLET_POWER);
}

// ---- Boundary types ----

#[test]
fn test_travel_heading_when_reversing() {
    let pose = Pose {
        heading: 10.0,
        velocity: -4.0,
        ..Default::default()
    };
    assert_abs_diff_eq!(pose.travel_heading(), 190.0, epsilon = 1e-9);
}

#[test]
fn test_host_event_drain_rank() {
    let scan = HostEvent::Scanned(ScanObservation {
        name: "A".into(),
        bearing: 0.0,
        distance: 100.0,
        energy: 100.0,
    });
    let wall = HostEvent::HitWall(WallCollision { bearing: 90.0 });
    let death = HostEvent::RobotDeath { name: "A".into() };
    assert!(wall.drain_rank() < scan.drain_rank());
    assert!(scan.drain_rank() < death.drain_rank());
}

#[test]
fn test_host_event_json_is_tagged() {
    let event = HostEvent::RobotDeath { name: "A".into() };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"RobotDeath\""), "got {json}");
}

#[test]
fn test_idle_commands() {
    assert!(TurnCommands::default().is_idle());
    let firing = TurnCommands {
        fire: Some(1.0),
        ..Default::default()
    };
    assert!(!firing.is_idle());
}

// ---- Config & errors ----

#[test]
fn test_config_partial_json_uses_defaults() {
    let config: AgentConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    assert_eq!(config.default_strategy, "simple");
}

#[test]
fn test_config_odd_bins() {
    let config = AgentConfig {
        guess_factor_bins: 30,
        ..Default::default()
    };
    assert_eq!(config.odd_bins(), 31);
    assert_ne!(config.component_seed(1), config.component_seed(2));
}

#[test]
fn test_error_display() {
    let err = ArenaError::UnknownStrategy("nope".into());
    assert_eq!(err.to_string(), "unknown strategy 'nope'");
    let err: ArenaError = serde_json::from_str::<u32>("x").unwrap_err().into();
    assert!(matches!(err, ArenaError::Serialization(_)));
    assert!(std::error::Error::source(&err).is_some());
    let err = ArenaError::InvalidStats { expected: 175, found: 3 };
    assert_eq!(err.to_string(), "statistics table has 3 cells, expected 175");
}
