//! Launcher glue: guidance toggling, laser updates and firing.
//!
//! A launcher owns at most one designator and one projectile in flight. The
//! launcher remembers where its holder is looking, and `run` re-traces the
//! laser along that direction every tick while a player is guiding. Firing
//! links the new projectile back to the launcher, which is cleared again when
//! the projectile terminates.

use glam::DVec3;
use hecs::{Entity, World};
use tracing::{debug, info, warn};

use laserguide_core::components::*;
use laserguide_core::constants::*;
use laserguide_core::enums::*;
use laserguide_core::events::WorldEvent;
use laserguide_core::types::{Orientation, Position};

use super::{bits, designator, projectile, TickContext};
use crate::error::SimError;
use crate::world_setup::{self, eye_position, muzzle_position};

fn launcher_ref(world: &World, launcher: Entity) -> Result<Launcher, SimError> {
    world
        .get::<&Launcher>(launcher)
        .map(|l| (*l).clone())
        .map_err(|_| SimError::UnknownLauncher(launcher))
}

fn update<R>(
    world: &mut World,
    launcher: Entity,
    f: impl FnOnce(&mut Launcher) -> R,
) -> Result<R, SimError> {
    let mut l = world
        .get::<&mut Launcher>(launcher)
        .map_err(|_| SimError::UnknownLauncher(launcher))?;
    Ok(f(&mut *l))
}

/// Re-trace the laser of every guiding player launcher.
///
/// NPC lasers only move when their holder calls `npc_aim_at`.
pub fn run(world: &mut World, ctx: &mut TickContext) {
    let mut guiding: Vec<Entity> = world
        .query::<&Launcher>()
        .iter()
        .filter(|(_, l)| {
            l.guiding && l.controller_kind == ControllerKind::Player && l.designator.is_some()
        })
        .map(|(entity, _)| entity)
        .collect();
    guiding.sort_by_key(|e| e.id());

    for launcher in guiding {
        if let Err(e) = retrace(world, ctx, launcher) {
            warn!(launcher = ?launcher, error = %e, "laser update failed");
        }
    }
}

/// Trace the laser from the holder's eye along the launcher's stored aim.
fn retrace(world: &mut World, ctx: &mut TickContext, launcher: Entity) -> Result<(), SimError> {
    let state = launcher_ref(world, launcher)?;
    let Some(eye) = state.controller.and_then(|c| eye_position(world, c)) else {
        return Ok(());
    };
    let end = eye.offset(state.aim * MAX_TRACE_LENGTH);
    update_designator(world, ctx, launcher, eye, end)
}

/// Designator of `launcher`, created on first use, traced onto whatever the
/// holder is aiming at. New designators start off.
fn ensure_designator(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
) -> Result<Entity, SimError> {
    let state = launcher_ref(world, launcher)?;
    let dot = match state.designator.filter(|d| world.contains(*d)) {
        Some(dot) => dot,
        None => {
            let origin = state
                .controller
                .and_then(|c| eye_position(world, c))
                .unwrap_or_default();
            let dot = designator::create(world, ctx, origin, state.controller, true);
            designator::set_on(world, dot, false)?;
            update(world, launcher, |l| l.designator = Some(dot))?;
            dot
        }
    };
    retrace(world, ctx, launcher)?;
    Ok(dot)
}

/// Turn the laser on. Does nothing while guidance is suppressed.
pub fn start_guiding(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
) -> Result<(), SimError> {
    if launcher_ref(world, launcher)?.guidance_suppressed {
        debug!(launcher = ?launcher, "guidance suppressed, not starting");
        return Ok(());
    }
    update(world, launcher, |l| l.guiding = true)?;
    ctx.emit(WorldEvent::PlaySound {
        cue: SoundCue::GuidanceOn,
        entity: bits(launcher),
    });
    let dot = ensure_designator(world, ctx, launcher)?;
    designator::set_on(world, dot, true)?;
    debug!(launcher = ?launcher, designator = ?dot, "guidance started");
    Ok(())
}

/// Turn the laser off and destroy its designator.
pub fn stop_guiding(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
) -> Result<(), SimError> {
    let dot = update(world, launcher, |l| {
        l.guiding = false;
        l.designator.take()
    })?;
    ctx.emit(WorldEvent::PlaySound {
        cue: SoundCue::GuidanceOff,
        entity: bits(launcher),
    });
    if let Some(dot) = dot.filter(|d| world.contains(*d)) {
        designator::set_on(world, dot, false)?;
        designator::destroy(world, ctx, dot)?;
    }
    debug!(launcher = ?launcher, "guidance stopped");
    Ok(())
}

pub fn toggle_guiding(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
) -> Result<(), SimError> {
    if launcher_ref(world, launcher)?.guiding {
        stop_guiding(world, ctx, launcher)
    } else {
        start_guiding(world, ctx, launcher)
    }
}

/// Override the holder's guidance without destroying the designator.
pub fn suppress_guiding(
    world: &mut World,
    launcher: Entity,
    suppressed: bool,
) -> Result<(), SimError> {
    let dot = update(world, launcher, |l| {
        l.guidance_suppressed = suppressed;
        l.designator
    })?;
    if let Some(dot) = dot.filter(|d| world.contains(*d)) {
        designator::set_on(world, dot, !suppressed)?;
    }
    Ok(())
}

/// The holder let go of the launcher.
pub fn drop_launcher(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
) -> Result<(), SimError> {
    stop_guiding(world, ctx, launcher)
}

/// Remove the launcher and its designator. A projectile still in flight
/// keeps flying; its termination notice finds no launcher and is dropped.
pub fn destroy_launcher(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
) -> Result<(), SimError> {
    let state = launcher_ref(world, launcher)?;
    if let Some(dot) = state.designator.filter(|d| world.contains(*d)) {
        designator::destroy(world, ctx, dot)?;
    }
    let _ = world.despawn(launcher);
    info!(launcher = ?launcher, "launcher destroyed");
    Ok(())
}

/// Trace the laser from `muzzle` toward `end` and move the designator onto
/// whatever it hits. Locks onto the hit entity when it can take damage.
pub fn update_designator(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
    muzzle: Position,
    end: Position,
) -> Result<(), SimError> {
    let state = launcher_ref(world, launcher)?;
    let Some(dot) = state.designator.filter(|d| world.contains(*d)) else {
        return Ok(());
    };
    let hit = ctx.tracer.trace_line(world, &muzzle, &end, state.controller);
    let target = hit.entity.filter(|e| world.get::<&Damageable>(*e).is_ok());
    designator::set_position(world, dot, hit.end, hit.normal)?;
    designator::set_target(world, dot, target)
}

/// The holder now looks along `aim`. Moves the laser straight away. A zero
/// direction is ignored.
pub fn aim(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
    aim: DVec3,
) -> Result<(), SimError> {
    let dir = aim.normalize_or_zero();
    if dir == DVec3::ZERO {
        debug!(launcher = ?launcher, "zero aim direction ignored");
        return Ok(());
    }
    update(world, launcher, |l| l.aim = dir)?;
    retrace(world, ctx, launcher)
}

/// NPC holders point the laser straight through `target`.
pub fn npc_aim_at(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
    target: Position,
) -> Result<(), SimError> {
    let state = launcher_ref(world, launcher)?;
    let dir = state
        .controller
        .and_then(|c| eye_position(world, c))
        .map(|eye| (target.as_dvec3() - eye.as_dvec3()).normalize_or_zero())
        .unwrap_or(DVec3::ZERO);
    update(world, launcher, |l| {
        if dir != DVec3::ZERO {
            l.aim = dir;
        }
        l.npc_aim_point = target;
        l.guiding = true;
    })?;
    let dot = ensure_designator(world, ctx, launcher)?;
    designator::set_on(world, dot, true)
}

/// Whether the launcher still has a live projectile in flight.
fn missile_in_flight(world: &World, state: &Launcher) -> bool {
    state.missile.is_some_and(|m| world.contains(m))
}

/// Player fire along `aim_dir`. Returns the new projectile, or `None` when
/// the launcher cannot fire yet.
pub fn fire_player(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
    aim_dir: DVec3,
) -> Result<Option<Entity>, SimError> {
    let state = launcher_ref(world, launcher)?;
    if missile_in_flight(world, &state) {
        debug!(launcher = ?launcher, "fire refused, projectile still in flight");
        return Ok(None);
    }
    let Some(controller) = state.controller else {
        warn!(launcher = ?launcher, "fire refused, launcher has no holder");
        return Ok(None);
    };
    let Some(eye) = eye_position(world, controller) else {
        warn!(launcher = ?launcher, "fire refused, holder is gone");
        return Ok(None);
    };

    let forward = aim_dir.normalize_or_zero();
    let muzzle = muzzle_position(&eye, forward);
    let missile =
        launch(world, ctx, launcher, controller, muzzle, forward, state.profile)?;

    let clearance = eye.offset(forward * GRACE_CLEARANCE_DISTANCE);
    if ctx.tracer.line_of_sight(world, &eye, &clearance, Some(controller)) {
        let grace = ctx.config.tuning.player_grace_period;
        projectile::set_grace_period(world, ctx.now, missile, grace)?;
    }

    ctx.emit(WorldEvent::PlaySound {
        cue: SoundCue::LauncherFire,
        entity: bits(launcher),
    });
    announce_launch(world, ctx, launcher, controller, missile);
    Ok(Some(missile))
}

/// NPC fire along `aim_dir`. NPC shots always get a grace period and fly
/// with the laser switched off.
pub fn fire_npc(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
    aim_dir: DVec3,
) -> Result<Option<Entity>, SimError> {
    let state = launcher_ref(world, launcher)?;
    if missile_in_flight(world, &state) {
        return Ok(None);
    }
    let Some(controller) = state.controller else {
        return Ok(None);
    };
    let Some(muzzle) = eye_position(world, controller) else {
        return Ok(None);
    };

    let forward = aim_dir.normalize_or_zero();
    let missile =
        launch(world, ctx, launcher, controller, muzzle, forward, state.profile)?;
    let grace = ctx.config.tuning.npc_grace_period;
    projectile::set_grace_period(world, ctx.now, missile, grace)?;

    update(world, launcher, |l| l.guiding = false)?;
    if let Some(dot) = state.designator.filter(|d| world.contains(*d)) {
        designator::set_on(world, dot, false)?;
    }

    ctx.emit(WorldEvent::PlaySound {
        cue: SoundCue::LauncherFireNpc,
        entity: bits(launcher),
    });
    announce_launch(world, ctx, launcher, controller, missile);
    Ok(Some(missile))
}

fn launch(
    world: &mut World,
    ctx: &mut TickContext,
    launcher: Entity,
    controller: Entity,
    muzzle: Position,
    forward: DVec3,
    profile: GuidanceProfile,
) -> Result<Entity, SimError> {
    let missile = world_setup::spawn_projectile(
        world,
        ctx.now,
        muzzle,
        Orientation::from_direction(forward),
        Some(controller),
        profile,
        &ctx.config.tuning,
    );
    if let Ok(mut p) = world.get::<&mut Projectile>(missile) {
        p.launcher = Some(launcher);
    }
    update(world, launcher, |l| {
        l.missile = Some(missile);
        if forward != DVec3::ZERO {
            l.aim = forward;
        }
    })?;
    info!(launcher = ?launcher, projectile = ?missile, ?profile, "projectile launched");
    Ok(missile)
}

fn announce_launch(
    world: &World,
    ctx: &mut TickContext,
    launcher: Entity,
    controller: Entity,
    missile: Entity,
) {
    ctx.emit(WorldEvent::LauncherFired {
        launcher: bits(launcher),
        projectile: bits(missile),
    });
    if let Ok(pos) = world.get::<&Position>(controller) {
        ctx.emit(WorldEvent::CombatSound {
            position: *pos,
            radius: LAUNCH_SOUND_RADIUS,
            duration_secs: DANGER_SOUND_DURATION,
        });
    }
}

/// Clear the launcher's in-flight handle if it still names `projectile`.
/// Returns whether the launcher was notified.
pub fn notify_projectile_terminated(
    world: &mut World,
    launcher: Entity,
    projectile: Entity,
) -> bool {
    let Ok(mut l) = world.get::<&mut Launcher>(launcher) else {
        return false;
    };
    if l.missile != Some(projectile) {
        return false;
    }
    l.missile = None;
    debug!(launcher = ?launcher, projectile = ?projectile, "launcher may fire again");
    true
}
