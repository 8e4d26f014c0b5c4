#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::LauncherCommand;
    use crate::components::{Projectile, TargetDesignator, ThinkSchedule};
    use crate::constants::*;
    use crate::enums::*;
    use crate::events::WorldEvent;
    use crate::state::SimSnapshot;
    use crate::types::{Orientation, Position, SimTime, Velocity};

    /// Verify the tagged projectile state survives serde, deadlines included.
    #[test]
    fn test_projectile_state_serde() {
        let states = vec![
            ProjectileState::Igniting,
            ProjectileState::Seeking,
            ProjectileState::Auguring {
                explode_at: 2.5,
                dying_at: 1.75,
            },
            ProjectileState::DumbFire,
            ProjectileState::Exploded,
        ];
        for s in states {
            let json = serde_json::to_string(&s).unwrap();
            let back: ProjectileState = serde_json::from_str(&json).unwrap();
            assert_eq!(s, back);
        }
    }

    #[test]
    fn test_launcher_command_serde() {
        let commands = vec![
            LauncherCommand::Fire {
                launcher: 7,
                aim: DVec3::X,
            },
            LauncherCommand::ToggleGuiding { launcher: 7 },
            LauncherCommand::SuppressGuiding {
                launcher: 9,
                suppressed: true,
            },
            LauncherCommand::AimAt {
                launcher: 9,
                target: Position::new(10.0, 20.0, 30.0),
            },
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: LauncherCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(json, serde_json::to_string(&back).unwrap());
            assert_eq!(cmd.launcher(), back.launcher());
        }
    }

    #[test]
    fn test_world_event_tagged() {
        let event = WorldEvent::DangerSound {
            position: Position::new(1.0, 2.0, 3.0),
            radius: EXPLOSION_RADIUS,
            duration_secs: DANGER_SOUND_DURATION,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"DangerSound\""));
        let back: WorldEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = SimSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SimSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.time.tick, back.time.tick);
        assert!(back.projectiles.is_empty());
    }

    #[test]
    fn test_orientation_forward_axes() {
        let ahead = Orientation::new(0.0, 0.0, 0.0).forward();
        assert!((ahead - DVec3::X).length() < 1e-12);

        let left = Orientation::new(0.0, 90.0, 0.0).forward();
        assert!((left - DVec3::Y).length() < 1e-12);

        // Positive pitch looks down.
        let down = Orientation::new(90.0, 0.0, 0.0).forward();
        assert!((down - DVec3::NEG_Z).length() < 1e-12);
    }

    #[test]
    fn test_orientation_from_direction_inverts_forward() {
        let dir = DVec3::new(3.0, -4.0, 2.0).normalize();
        let back = Orientation::from_direction(dir).forward();
        assert!((back - dir).length() < 1e-12);
        assert_eq!(Orientation::from_direction(DVec3::ZERO), Orientation::default());
    }

    #[test]
    fn test_position_ranges() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert!((a.range_to(&b) - 13.0).abs() < 1e-10);
        assert!((a.range_sq_to(&b) - 169.0).abs() < 1e-10);
        assert!((a.horizontal_range_sq_to(&b) - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_velocity_speed() {
        let v = Velocity::new(3.0, 4.0, 0.0);
        assert!((v.speed() - 5.0).abs() < 1e-10);
        assert!(!v.is_zero());
        assert!(Velocity::default().is_zero());
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..TICK_RATE {
            time.advance(DT);
        }
        assert_eq!(time.tick, TICK_RATE as u64);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_think_schedule_due() {
        assert!(!ThinkSchedule::default().is_due(100.0));
        let slot = ThinkSchedule::at(1.0);
        assert!(!slot.is_due(0.99));
        assert!(slot.is_due(1.0));
        assert!(slot.is_due(1.5));
    }

    #[test]
    fn test_chase_position_backs_off_surface() {
        let mut dot = TargetDesignator::new(None, true);
        dot.surface_normal = DVec3::new(0.0, 0.0, 1.0);
        let chase = dot.chase_position(&Position::new(10.0, 0.0, 0.0));
        assert_eq!(chase, Position::new(10.0, 0.0, -CHASE_STANDOFF));
    }

    #[test]
    fn test_designator_toggle_idempotent() {
        let mut dot = TargetDesignator::new(None, true);
        dot.turn_off();
        let once = (dot.on, dot.rendered);
        dot.turn_off();
        assert_eq!(once, (dot.on, dot.rendered));
        assert_eq!(once, (false, false));

        // Invisible dots toggle eligibility without ever rendering.
        let mut hidden = TargetDesignator::new(None, false);
        hidden.turn_off();
        hidden.turn_on();
        assert!(hidden.on);
        assert!(!hidden.rendered);
    }

    #[test]
    fn test_auger_health_by_profile() {
        let standard = Projectile::new(None, GuidanceProfile::Standard);
        assert_eq!(standard.auger_health(), PROJECTILE_HEALTH - AUGER_HEALTH_MARGIN);
        let direct = Projectile::new(None, GuidanceProfile::DirectChase);
        assert_eq!(
            direct.auger_health(),
            PROJECTILE_HEALTH - DIRECT_CHASE_AUGER_HEALTH_MARGIN
        );
        assert!(!standard.is_damaged());
    }

    #[test]
    fn test_damage_kind_filter() {
        assert!(DamageKind::MissileDefense.hurts_projectiles());
        assert!(DamageKind::Vehicle.hurts_projectiles());
        assert!(!DamageKind::Bullet.hurts_projectiles());
        assert!(!DamageKind::Blast.hurts_projectiles());
    }

    #[test]
    fn test_scenario_names_round_trip() {
        for id in ScenarioId::ALL {
            assert_eq!(ScenarioId::from_name(id.name()), Some(id));
        }
        assert_eq!(ScenarioId::from_name("no-such-scenario"), None);
        assert_eq!(ScenarioId::default(), ScenarioId::PlayerOpenField);
    }
}
