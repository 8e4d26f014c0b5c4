//! Scenario definitions: hardcoded engagements for the runner and tests.
//!
//! Each scenario places a holder, a launcher and a target on flat ground,
//! and scripts the holder's launcher commands tick by tick. Player lasers
//! follow the holder's last aim on their own, so scripts only aim when the
//! holder turns.

use glam::DVec3;
use hecs::Entity;

use laserguide_core::commands::LauncherCommand;
use laserguide_core::constants::TICK_RATE;
use laserguide_core::enums::{ControllerKind, GuidanceProfile, ScenarioId, TargetClass};
use laserguide_core::types::Position;

use crate::engine::SimulationEngine;
use crate::error::SimError;
use crate::systems::bits;
use crate::trace::{FlatGround, Tracer};
use crate::world_setup::eye_position;

/// Height of the sky ceiling over every scenario.
const SKY_HEIGHT: f64 = 8192.0;

/// A launcher command issued at a given tick.
#[derive(Debug, Clone)]
pub struct ScriptedCommand {
    pub tick: u64,
    pub command: LauncherCommand,
}

/// A populated scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub id: ScenarioId,
    pub holder: Entity,
    pub launcher: Entity,
    pub target: Entity,
    /// Entity anchoring the forced-detonation zone, when there is one.
    pub zone_anchor: Option<Entity>,
    pub script: Vec<ScriptedCommand>,
}

impl Scenario {
    /// Commands scheduled for `tick`, in script order.
    pub fn commands_at(&self, tick: u64) -> impl Iterator<Item = LauncherCommand> + '_ {
        self.script
            .iter()
            .filter(move |c| c.tick == tick)
            .map(|c| c.command.clone())
    }
}

/// The world geometry every scenario is played on.
pub fn tracer(_scenario: ScenarioId) -> Box<dyn Tracer> {
    Box::new(FlatGround::new(0.0).with_sky(SKY_HEIGHT))
}

/// Populate `engine` for `scenario`.
pub fn setup(engine: &mut SimulationEngine, scenario: ScenarioId) -> Result<Scenario, SimError> {
    match scenario {
        ScenarioId::PlayerOpenField => setup_player_open_field(engine),
        ScenarioId::NpcAmbush => setup_npc_ambush(engine),
        ScenarioId::ZoneBarrier => setup_zone_barrier(engine),
    }
}

/// "Open Field"
/// Player at the origin, a target 2 km out and off-axis. The shot leaves
/// along the x axis and the laser drags it onto the target.
fn setup_player_open_field(engine: &mut SimulationEngine) -> Result<Scenario, SimError> {
    let holder = engine.spawn_actor(Position::new(0.0, 0.0, 0.0));
    let target = engine.spawn_target(
        Position::new(2000.0, 400.0, 48.0),
        TargetClass::Generic,
        48.0,
    );
    let launcher = engine.spawn_launcher(
        Some(holder),
        ControllerKind::Player,
        GuidanceProfile::Standard,
    );

    let aim = aim_from_eye(engine, holder, target)?;
    let fire_tick = secs_to_ticks(0.1);
    // Look along the x axis to fire, then straight back at the target.
    let script = vec![
        scripted(
            0,
            LauncherCommand::StartGuiding {
                launcher: bits(launcher),
            },
        ),
        scripted(
            0,
            LauncherCommand::Aim {
                launcher: bits(launcher),
                aim,
            },
        ),
        scripted(
            fire_tick,
            LauncherCommand::Fire {
                launcher: bits(launcher),
                aim: DVec3::new(1.0, 0.0, 0.05),
            },
        ),
        scripted(
            fire_tick + 1,
            LauncherCommand::Aim {
                launcher: bits(launcher),
                aim,
            },
        ),
    ];

    Ok(Scenario {
        id: ScenarioId::PlayerOpenField,
        holder,
        launcher,
        target,
        zone_anchor: None,
        script,
    })
}

/// "Ambush"
/// An NPC fires a direct-chase shot at a walker, then paints it again.
fn setup_npc_ambush(engine: &mut SimulationEngine) -> Result<Scenario, SimError> {
    let holder = engine.spawn_actor(Position::new(0.0, 0.0, 0.0));
    let target = engine.spawn_target(
        Position::new(1500.0, -400.0, 120.0),
        TargetClass::Walker,
        96.0,
    );
    let launcher = engine.spawn_launcher(
        Some(holder),
        ControllerKind::Npc,
        GuidanceProfile::DirectChase,
    );

    let target_pos = target_position(engine, target)?;
    let aim = aim_from_eye(engine, holder, target)?;
    let fire_tick = secs_to_ticks(0.05);
    let paint = LauncherCommand::AimAt {
        launcher: bits(launcher),
        target: target_pos,
    };

    // Firing switches the NPC laser off; painting again switches it back on.
    let script = vec![
        scripted(0, paint.clone()),
        scripted(
            fire_tick,
            LauncherCommand::FireNpc {
                launcher: bits(launcher),
                aim,
            },
        ),
        scripted(fire_tick + 1, paint),
    ];

    Ok(Scenario {
        id: ScenarioId::NpcAmbush,
        holder,
        launcher,
        target,
        zone_anchor: None,
        script,
    })
}

/// "Barrier"
/// Same shot as the open field, but a scripted barrier 1.2 km out forces
/// every projectile that enters it to detonate.
fn setup_zone_barrier(engine: &mut SimulationEngine) -> Result<Scenario, SimError> {
    let holder = engine.spawn_actor(Position::new(0.0, 0.0, 0.0));
    let target = engine.spawn_target(
        Position::new(3000.0, 0.0, 48.0),
        TargetClass::Generic,
        48.0,
    );
    let launcher = engine.spawn_launcher(
        Some(holder),
        ControllerKind::Player,
        GuidanceProfile::Standard,
    );
    let anchor = engine.world_mut().spawn((Position::new(1200.0, 0.0, 40.0),));
    engine.register_forced_zone(anchor, 300.0, 600.0)?;

    let aim = aim_from_eye(engine, holder, target)?;
    let script = vec![
        scripted(
            0,
            LauncherCommand::StartGuiding {
                launcher: bits(launcher),
            },
        ),
        scripted(
            0,
            LauncherCommand::Aim {
                launcher: bits(launcher),
                aim,
            },
        ),
        scripted(
            secs_to_ticks(0.1),
            LauncherCommand::Fire {
                launcher: bits(launcher),
                aim,
            },
        ),
    ];

    Ok(Scenario {
        id: ScenarioId::ZoneBarrier,
        holder,
        launcher,
        target,
        zone_anchor: Some(anchor),
        script,
    })
}

fn scripted(tick: u64, command: LauncherCommand) -> ScriptedCommand {
    ScriptedCommand { tick, command }
}

fn target_position(engine: &SimulationEngine, target: Entity) -> Result<Position, SimError> {
    engine
        .world()
        .get::<&Position>(target)
        .map(|p| *p)
        .map_err(|_| SimError::UnknownEntity(target))
}

/// Unit direction from the holder's eye to the target.
fn aim_from_eye(
    engine: &SimulationEngine,
    holder: Entity,
    target: Entity,
) -> Result<DVec3, SimError> {
    let eye = eye_position(engine.world(), holder).ok_or(SimError::UnknownEntity(holder))?;
    let target = target_position(engine, target)?;
    Ok((target.as_dvec3() - eye.as_dvec3()).normalize_or_zero())
}

/// Convert seconds to ticks at the default rate.
fn secs_to_ticks(secs: f64) -> u64 {
    (secs * TICK_RATE as f64) as u64
}
