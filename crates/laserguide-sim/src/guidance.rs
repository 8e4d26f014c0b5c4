//! Homing math for laser-guided projectiles.
//!
//! Everything here is pure: no world access, no side effects. The projectile
//! system gathers inputs from the ECS and applies the results.

use glam::DVec3;
use hecs::Entity;

use laserguide_core::constants::{ALTERNATE_TICK_HOMING_FACTOR, DEGENERATE_BLEND_EPSILON};
use laserguide_core::enums::GuidanceProfile;
use laserguide_core::types::Position;

use crate::config::GuidanceTuning;

/// A designator as seen by the seeker.
#[derive(Debug, Clone, Copy)]
pub struct DesignatorCandidate {
    pub entity: Entity,
    pub position: Position,
    pub on: bool,
    pub owner: Option<Entity>,
}

/// Pick the closest designator that is on and shares `owner`.
///
/// Candidates farther than `max_range` are ignored. On an exact distance tie
/// the first candidate in iteration order wins.
pub fn select_best_designator(
    projectile_pos: &Position,
    owner: Option<Entity>,
    max_range: f64,
    candidates: impl IntoIterator<Item = DesignatorCandidate>,
) -> Option<(Entity, f64)> {
    let mut best: Option<Entity> = None;
    let mut best_dist = max_range;

    for candidate in candidates {
        if !candidate.on || candidate.owner != owner {
            continue;
        }
        let dist = projectile_pos.range_to(&candidate.position);
        if dist < best_dist {
            best = Some(candidate.entity);
            best_dist = dist;
        }
    }

    best.map(|entity| (entity, best_dist))
}

/// Where the projectile should actually steer this tick.
///
/// With a locked target (or the `DirectChase` profile) that is the chase
/// position itself. Otherwise, when the projectile is nearer the laser's
/// origin than the laser is long, or already close to the dot, it rides the
/// laser: the nearest point on the origin-to-chase segment, pushed a fixed
/// lead distance toward the dot. This keeps a projectile from orbiting a dot
/// that a moving holder drags around.
pub fn compute_aim_point(
    profile: GuidanceProfile,
    projectile_pos: &Position,
    chase: &Position,
    laser_start: &Position,
    has_locked_target: bool,
    tuning: &GuidanceTuning,
) -> Position {
    if has_locked_target || profile == GuidanceProfile::DirectChase {
        return *chase;
    }

    let start = laser_start.as_dvec3();
    let laser = chase.as_dvec3() - start;
    let laser_length = laser.length();
    let laser_dir = if laser_length > 0.0 {
        laser / laser_length
    } else {
        DVec3::ZERO
    };

    let missile_length = projectile_pos.range_to(laser_start);
    let target_length = projectile_pos.range_to(chase);

    if missile_length < laser_length || target_length <= tuning.segment_chase_proximity {
        let nearest = nearest_point_on_segment(start, chase.as_dvec3(), projectile_pos.as_dvec3());
        (nearest + laser_dir * tuning.segment_lead_distance).into()
    } else {
        *chase
    }
}

/// Closest point to `point` on the segment `a..b`.
pub fn nearest_point_on_segment(a: DVec3, b: DVec3, point: DVec3) -> DVec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Inputs that scale the base homing factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomingModifiers {
    /// Thinking on alternate ticks: half as many corrections per second.
    pub alternate_ticks: bool,
    /// Locked onto a walker-class target within close range.
    pub close_walker: bool,
}

/// Blend factor for this tick, capped at 1.
pub fn homing_speed(tuning: &GuidanceTuning, modifiers: HomingModifiers) -> f64 {
    let mut speed = tuning.homing_speed;
    if modifiers.alternate_ticks {
        speed *= ALTERNATE_TICK_HOMING_FACTOR;
    }
    if modifiers.close_walker {
        speed *= tuning.close_target_homing_factor;
    }
    speed.min(1.0)
}

/// Unit direction and distance from `from` to `to`. Zero distance gives a
/// zero direction.
pub fn direction_to(from: &Position, to: &Position) -> (DVec3, f64) {
    let delta = to.as_dvec3() - from.as_dvec3();
    let dist = delta.length();
    if dist > 0.0 {
        (delta / dist, dist)
    } else {
        (DVec3::ZERO, 0.0)
    }
}

/// Steer `velocity` toward `target_dir` by `homing`, keeping its speed.
///
/// A blend that cancels out falls back to `target_dir`, or to the current
/// heading when the target is exactly here. A stationary input stays
/// stationary; the caller treats a zero result as a stalled projectile.
pub fn blend_velocity(velocity: DVec3, target_dir: DVec3, target_dist: f64, homing: f64) -> DVec3 {
    let speed = velocity.length();
    if speed == 0.0 {
        return DVec3::ZERO;
    }
    let dir = velocity / speed;

    let blended = homing * target_dir + (1.0 - homing) * dir;
    let len = blended.length();
    let new_dir = if len < DEGENERATE_BLEND_EPSILON {
        if target_dist != 0.0 {
            target_dir
        } else {
            dir
        }
    } else {
        blended / len
    };

    new_dir * speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use laserguide_core::constants::SEGMENT_LEAD_DISTANCE;

    fn tuning() -> GuidanceTuning {
        GuidanceTuning::default()
    }

    #[test]
    fn test_blend_exact_vector() {
        let v = blend_velocity(DVec3::new(1500.0, 0.0, 0.0), DVec3::Y, 100.0, 0.125);
        let expected = (0.125 * DVec3::Y + 0.875 * DVec3::X).normalize() * 1500.0;
        assert!((v - expected).length() < 1e-9);
        assert!((v.length() - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_blend_degenerate_falls_back_to_target() {
        // Half-and-half blend of opposite directions cancels exactly.
        let v = blend_velocity(DVec3::new(10.0, 0.0, 0.0), DVec3::NEG_X, 50.0, 0.5);
        assert!((v - DVec3::new(-10.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_blend_degenerate_at_target_keeps_heading() {
        let v = blend_velocity(DVec3::new(10.0, 0.0, 0.0), DVec3::ZERO, 0.0, 1.0);
        assert!((v - DVec3::new(10.0, 0.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_blend_stationary_stays_stationary() {
        assert_eq!(blend_velocity(DVec3::ZERO, DVec3::X, 10.0, 0.125), DVec3::ZERO);
    }

    #[test]
    fn test_segment_nearest_point_clamped() {
        let a = DVec3::ZERO;
        let b = DVec3::new(100.0, 0.0, 0.0);
        let mid = nearest_point_on_segment(a, b, DVec3::new(40.0, 30.0, 0.0));
        assert!((mid - DVec3::new(40.0, 0.0, 0.0)).length() < 1e-12);
        let past = nearest_point_on_segment(a, b, DVec3::new(150.0, 10.0, 0.0));
        assert_eq!(past, b);
        let before = nearest_point_on_segment(a, b, DVec3::new(-20.0, 5.0, 0.0));
        assert_eq!(before, a);
    }

    #[test]
    fn test_aim_point_locked_target_chases_dot() {
        let chase = Position::new(2000.0, 0.0, 0.0);
        let aim = compute_aim_point(
            GuidanceProfile::Standard,
            &Position::new(100.0, 50.0, 0.0),
            &chase,
            &Position::default(),
            true,
            &tuning(),
        );
        assert_eq!(aim, chase);
    }

    #[test]
    fn test_aim_point_rides_laser_near_origin() {
        // Projectile 100 units from the holder, laser 2000 long: ride the beam.
        let aim = compute_aim_point(
            GuidanceProfile::Standard,
            &Position::new(100.0, 50.0, 0.0),
            &Position::new(2000.0, 0.0, 0.0),
            &Position::default(),
            false,
            &tuning(),
        );
        let expected = Position::new(100.0 + SEGMENT_LEAD_DISTANCE, 0.0, 0.0);
        assert!(aim.range_to(&expected) < 1e-9);
    }

    #[test]
    fn test_aim_point_far_from_both_chases_dot() {
        // Farther from the holder than the laser is long, and far from the dot.
        let chase = Position::new(1000.0, 0.0, 0.0);
        let aim = compute_aim_point(
            GuidanceProfile::Standard,
            &Position::new(0.0, 3000.0, 0.0),
            &chase,
            &Position::default(),
            false,
            &tuning(),
        );
        assert_eq!(aim, chase);
    }

    #[test]
    fn test_aim_point_direct_chase_profile() {
        let chase = Position::new(2000.0, 0.0, 0.0);
        let aim = compute_aim_point(
            GuidanceProfile::DirectChase,
            &Position::new(100.0, 50.0, 0.0),
            &chase,
            &Position::default(),
            false,
            &tuning(),
        );
        assert_eq!(aim, chase);
    }

    #[test]
    fn test_homing_speed_modifiers() {
        let t = tuning();
        let base = homing_speed(&t, HomingModifiers::default());
        assert!((base - 0.125).abs() < 1e-12);
        let doubled = homing_speed(
            &t,
            HomingModifiers {
                alternate_ticks: true,
                close_walker: false,
            },
        );
        assert!((doubled - 0.25).abs() < 1e-12);
        let both = homing_speed(
            &t,
            HomingModifiers {
                alternate_ticks: true,
                close_walker: true,
            },
        );
        assert!((both - 0.4375).abs() < 1e-12);
    }

    #[test]
    fn test_homing_speed_capped() {
        let t = GuidanceTuning {
            homing_speed: 0.9,
            ..GuidanceTuning::default()
        };
        let capped = homing_speed(
            &t,
            HomingModifiers {
                alternate_ticks: true,
                close_walker: true,
            },
        );
        assert_eq!(capped, 1.0);
    }

    #[test]
    fn test_direction_to_zero_distance() {
        let p = Position::new(1.0, 2.0, 3.0);
        assert_eq!(direction_to(&p, &p), (DVec3::ZERO, 0.0));
    }
}
