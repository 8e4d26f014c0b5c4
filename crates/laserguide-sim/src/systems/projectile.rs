//! Guided projectile state machine.
//!
//! ```text
//! Igniting -> Seeking -> Exploded
//!     |          |          ^
//!     +----------+-> Auguring
//! DumbFire --(touch)--------^
//! ```
//!
//! Each state's think is a plain function. A think either reschedules itself,
//! moves the projectile to another state, or detonates it. Detonation never
//! despawns directly: the cleanup system removes `Exploded` projectiles at the
//! end of the tick so that other systems never see a half-removed entity.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, info, trace, warn};

use laserguide_core::components::*;
use laserguide_core::constants::*;
use laserguide_core::enums::*;
use laserguide_core::events::WorldEvent;
use laserguide_core::types::{Orientation, Position, Velocity};

use super::{bits, due_thinkers, schedule, TickContext};
use crate::error::SimError;
use crate::guidance::{self, DesignatorCandidate, HomingModifiers};
use crate::world_setup::world_space_center;

/// Run every due projectile think, then expire grace periods of projectiles
/// that no longer think.
pub fn run(world: &mut World, ctx: &mut TickContext) {
    ctx.registry.prune_dead(world);
    for entity in due_thinkers::<Projectile>(world, ctx.now) {
        think(world, ctx, entity);
    }

    let now = ctx.now;
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        if projectile.state == ProjectileState::DumbFire {
            expire_grace(projectile, now);
        }
    }
}

fn think(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let Ok(state) = world.get::<&Projectile>(entity).map(|p| p.state) else {
        return;
    };
    match state {
        ProjectileState::Igniting => ignite(world, ctx, entity),
        ProjectileState::Seeking => seek(world, ctx, entity),
        ProjectileState::Auguring {
            explode_at,
            dying_at,
        } => auger(world, ctx, entity, explode_at, dying_at),
        ProjectileState::DumbFire | ProjectileState::Exploded => schedule(world, entity, None),
    }
}

/// Clear an elapsed grace period and go solid.
pub fn expire_grace(projectile: &mut Projectile, now: f64) {
    if let Some(ends_at) = projectile.grace_ends_at {
        if ends_at < now {
            projectile.grace_ends_at = None;
            projectile.solid = true;
        }
    }
}

/// Make the projectile non-solid for `secs` from now.
pub fn set_grace_period(
    world: &mut World,
    now: f64,
    entity: Entity,
    secs: f64,
) -> Result<(), SimError> {
    if !(secs.is_finite() && secs >= 0.0) {
        return Err(SimError::InvalidGracePeriod { secs });
    }
    let mut projectile = world
        .get::<&mut Projectile>(entity)
        .map_err(|_| SimError::UnknownProjectile(entity))?;
    projectile.grace_ends_at = Some(now + secs);
    projectile.solid = false;
    debug!(projectile = ?entity, secs, "grace period set");
    Ok(())
}

fn ignite(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let speed = ctx.config.tuning.projectile_speed;
    let now = ctx.now;

    let launcher = {
        let Ok((projectile, orientation, velocity, move_type)) = world
            .query_one_mut::<(&mut Projectile, &Orientation, &mut Velocity, &mut MoveType)>(entity)
        else {
            return;
        };
        expire_grace(projectile, now);
        projectile.state = ProjectileState::Seeking;
        projectile.solid = projectile.grace_ends_at.is_none();
        *move_type = MoveType::Fly;
        *velocity = Velocity::from(orientation.forward() * speed);
        projectile.launcher
    };

    ctx.emit(WorldEvent::PlaySound {
        cue: SoundCue::MissileIgnite,
        entity: bits(entity),
    });

    if let Some(controller) = launcher.and_then(|l| player_controller(world, l)) {
        ctx.emit(WorldEvent::ScreenFlash {
            controller: bits(controller),
        });
        ctx.emit(WorldEvent::Rumble {
            controller: bits(controller),
        });
    }

    create_trail(world, ctx, entity);
    schedule(world, entity, Some(now));
    info!(projectile = ?entity, speed, "projectile ignited");
}

/// The live player holding `launcher`, if any.
fn player_controller(world: &World, launcher: Entity) -> Option<Entity> {
    let launcher = world.get::<&Launcher>(launcher).ok()?;
    if launcher.controller_kind != ControllerKind::Player {
        return None;
    }
    launcher.controller.filter(|c| world.contains(*c))
}

fn seek(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let now = ctx.now;
    let Ok((pos, vel, owner, profile)) = world
        .query_one_mut::<(&Position, &Velocity, &mut Projectile)>(entity)
        .map(|(pos, vel, projectile)| {
            expire_grace(projectile, now);
            (*pos, *vel, projectile.owner, projectile.profile)
        })
    else {
        return;
    };

    let candidates: Vec<DesignatorCandidate> = ctx
        .registry
        .all_live()
        .filter_map(|designator| designator_candidate(world, designator))
        .collect();
    let best = guidance::select_best_designator(&pos, owner, MAX_TRACE_LENGTH, candidates);

    if ctx.config.warn_near_designator {
        if let Some((designator, dist)) = best {
            warn_near_designator(world, ctx, entity, &pos, &vel, designator, dist);
        }
    }

    if ctx.config.forced_detonation_zones && ctx.zones.test_point(world, &pos) {
        debug!(projectile = ?entity, "inside forced detonation zone");
        explode(world, ctx, entity);
        return;
    }

    let Some((designator, _)) = best else {
        trace!(projectile = ?entity, "no eligible designator, coasting");
        schedule(world, entity, Some(now));
        return;
    };

    let Some(aim_point) = aim_point(world, ctx, profile, &pos, designator) else {
        schedule(world, entity, Some(now));
        return;
    };
    let (target_dir, dist) = guidance::direction_to(&pos, &aim_point.point);

    let modifiers = HomingModifiers {
        alternate_ticks: ctx.config.simulate_alternate_ticks,
        close_walker: ctx.config.close_target_boost
            && dist <= ctx.config.tuning.close_target_range
            && aim_point
                .locked_target
                .is_some_and(|t| is_walker(world, t)),
    };
    let homing = guidance::homing_speed(&ctx.config.tuning, modifiers);
    let new_velocity = guidance::blend_velocity(vel.as_dvec3(), target_dir, dist, homing);

    if new_velocity == DVec3::ZERO {
        warn!(projectile = ?entity, "projectile stalled, detonating");
        explode(world, ctx, entity);
        return;
    }

    if let Ok((velocity, orientation)) =
        world.query_one_mut::<(&mut Velocity, &mut Orientation)>(entity)
    {
        *velocity = Velocity::from(new_velocity);
        *orientation = Orientation::from_direction(new_velocity);
    }
    trace!(projectile = ?entity, designator = ?designator, dist, homing, "steered");

    schedule(world, entity, Some(now));

    let danger_sounds = world
        .get::<&Projectile>(entity)
        .map(|p| p.create_danger_sounds)
        .unwrap_or(false);
    if danger_sounds {
        let ahead = pos.offset(new_velocity * LEAD_DANGER_LOOKAHEAD);
        let hit = ctx.tracer.trace_line(world, &pos, &ahead, Some(entity));
        ctx.emit(WorldEvent::DangerSound {
            position: hit.end,
            radius: LEAD_DANGER_RADIUS,
            duration_secs: DANGER_SOUND_DURATION,
        });
    }
}

fn designator_candidate(world: &World, designator: Entity) -> Option<DesignatorCandidate> {
    let position = *world.get::<&Position>(designator).ok()?;
    let dot = world.get::<&TargetDesignator>(designator).ok()?;
    Some(DesignatorCandidate {
        entity: designator,
        position,
        on: dot.on,
        owner: dot.owner,
    })
}

/// Let anything near the dot know a projectile is about to arrive.
fn warn_near_designator(
    world: &World,
    ctx: &mut TickContext,
    projectile: Entity,
    pos: &Position,
    vel: &Velocity,
    designator: Entity,
    dist: f64,
) {
    if dist > vel.speed() * ctx.config.tuning.danger_speed_factor {
        return;
    }
    let Ok(dot_pos) = world.get::<&Position>(designator).map(|p| *p) else {
        return;
    };
    if ctx.tracer.line_of_sight(world, pos, &dot_pos, Some(projectile)) {
        ctx.emit(WorldEvent::DangerSound {
            position: dot_pos,
            radius: EXPLOSION_RADIUS,
            duration_secs: DANGER_SOUND_DURATION,
        });
    }
}

struct AimPoint {
    point: Position,
    locked_target: Option<Entity>,
}

fn aim_point(
    world: &World,
    ctx: &TickContext,
    profile: GuidanceProfile,
    pos: &Position,
    designator: Entity,
) -> Option<AimPoint> {
    let dot_pos = *world.get::<&Position>(designator).ok()?;
    let dot = world.get::<&TargetDesignator>(designator).ok()?;

    let chase = dot.chase_position(&dot_pos);
    let locked_target = dot.target.filter(|t| world.contains(*t));
    let laser_start = dot
        .owner
        .and_then(|owner| world_space_center(world, owner))
        .unwrap_or(chase);

    let point = guidance::compute_aim_point(
        profile,
        pos,
        &chase,
        &laser_start,
        locked_target.is_some(),
        &ctx.config.tuning,
    );
    Some(AimPoint {
        point,
        locked_target,
    })
}

fn is_walker(world: &World, target: Entity) -> bool {
    world
        .get::<&TargetProfile>(target)
        .map(|p| p.class == TargetClass::Walker)
        .unwrap_or(false)
}

fn auger(world: &mut World, ctx: &mut TickContext, entity: Entity, explode_at: f64, dying_at: f64) {
    let now = ctx.now;
    if explode_at < now {
        explode(world, ctx, entity);
        return;
    }

    let yaw_offset = ctx.rng.gen_range(-AUGER_YAW_DEVIANCE..=AUGER_YAW_DEVIANCE);
    let pitch_offset = ctx
        .rng
        .gen_range(-AUGER_PITCH_DEVIANCE_UP..=AUGER_PITCH_DEVIANCE_DOWN);
    let auger_speed = ctx.config.tuning.auger_speed;

    let Ok((projectile, orientation, velocity)) =
        world.query_one_mut::<(&mut Projectile, &mut Orientation, &mut Velocity)>(entity)
    else {
        return;
    };
    expire_grace(projectile, now);
    if dying_at < now && projectile.life == LifeState::Alive {
        projectile.life = LifeState::Dying;
        debug!(projectile = ?entity, "auguring projectile marked dying");
    }

    orientation.yaw += yaw_offset;
    orientation.pitch += pitch_offset;
    *velocity = Velocity::from(orientation.forward() * auger_speed);

    schedule(world, entity, Some(now + AUGER_THINK_INTERVAL));
}

/// Apply `amount` damage of `kind`. Returns whether the damage was taken.
pub fn apply_damage(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    amount: i32,
    kind: DamageKind,
) -> Result<bool, SimError> {
    if amount < 0 {
        return Err(SimError::InvalidDamage { amount });
    }
    let (was_damaged, now_damaged, killed) = {
        let mut projectile = world
            .get::<&mut Projectile>(entity)
            .map_err(|_| SimError::UnknownProjectile(entity))?;
        if !kind.hurts_projectiles() || !projectile.takes_damage {
            return Ok(false);
        }
        let was_damaged = projectile.is_damaged();
        projectile.health = projectile.health.saturating_sub(amount);
        let killed = projectile.health <= 0;
        if killed {
            projectile.takes_damage = false;
        }
        (was_damaged, projectile.is_damaged(), killed)
    };

    debug!(projectile = ?entity, amount, ?kind, killed, "projectile damaged");
    if !was_damaged && now_damaged {
        shot_down(world, ctx, entity);
    }
    Ok(true)
}

/// Knock the projectile out of guidance into an uncontrolled spiral.
fn shot_down(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let now = ctx.now;
    let explode_at = now + ctx.config.tuning.auger_duration;
    let dying_at = now + ctx.config.tuning.auger_dying_after;

    let Ok((pos, trail)) = world
        .query_one_mut::<(&Position, &mut Projectile)>(entity)
        .map(|(pos, projectile)| {
            projectile.state = ProjectileState::Auguring {
                explode_at,
                dying_at,
            };
            if let Some(trail) = projectile.trail.as_mut() {
                trail.damaged = true;
            }
            (*pos, projectile.trail)
        })
    else {
        return;
    };

    ctx.emit(WorldEvent::ShotDown { position: pos });
    if let Some(trail) = trail {
        ctx.emit(WorldEvent::TrailDamaged { trail: trail.id });
    }

    // The launcher may reload while this one spirals down.
    notify_launcher(world, ctx, entity);
    schedule(world, entity, Some(now));
    info!(projectile = ?entity, explode_at, "projectile shot down");
}

/// Detonate. Terminal: the projectile is despawned by the cleanup system.
pub fn explode(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let Ok((pos, forward, damage, trail)) = world
        .query_one_mut::<(&Position, &Orientation, &mut Projectile)>(entity)
        .map(|(pos, orientation, projectile)| {
            projectile.takes_damage = false;
            projectile.solid = false;
            projectile.grace_ends_at = None;
            projectile.state = ProjectileState::Exploded;
            projectile.life = LifeState::Dead;
            (*pos, orientation.forward(), projectile.damage, projectile.trail.take())
        })
    else {
        return;
    };

    notify_launcher(world, ctx, entity);

    let probe_end = pos.offset(forward * SKY_PROBE_DISTANCE);
    let probe = ctx.tracer.trace_line(world, &pos, &probe_end, Some(entity));
    let against_sky = !probe.is_clear() && probe.hit_sky;
    if !against_sky {
        ctx.emit(WorldEvent::Explosion {
            position: pos,
            damage,
            radius: EXPLOSION_RADIUS,
        });
    }

    if let Some(trail) = trail {
        ctx.emit(WorldEvent::TrailExpiring {
            trail: trail.id,
            lifetime_secs: TRAIL_FADE_SECS,
        });
    }
    ctx.emit(WorldEvent::StopSound {
        cue: SoundCue::MissileIgnite,
        entity: bits(entity),
    });
    schedule(world, entity, None);
    info!(projectile = ?entity, against_sky, "projectile exploded");
}

/// Tell the launcher its projectile is gone. Happens at most once per
/// projectile because the back-reference is taken.
fn notify_launcher(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let Some(launcher) = world
        .get::<&mut Projectile>(entity)
        .ok()
        .and_then(|mut p| p.launcher.take())
    else {
        return;
    };
    if super::launcher::notify_projectile_terminated(world, launcher, entity) {
        ctx.emit(WorldEvent::ProjectileTerminated {
            launcher: bits(launcher),
        });
    }
}

/// Contact with `other`, or with terrain when `None`. Returns whether the
/// projectile detonated.
pub fn touch(
    world: &mut World,
    ctx: &mut TickContext,
    entity: Entity,
    other: Option<Entity>,
) -> Result<bool, SimError> {
    let (solid, state) = world
        .get::<&Projectile>(entity)
        .map(|p| (p.solid, p.state))
        .map_err(|_| SimError::UnknownProjectile(entity))?;
    if !solid || state.is_terminal() {
        return Ok(false);
    }
    let passes_through = other.is_some_and(|o| {
        world.get::<&TriggerVolume>(o).is_ok() && world.get::<&Damageable>(o).is_err()
    });
    if passes_through {
        return Ok(false);
    }
    explode(world, ctx, entity);
    Ok(true)
}

/// Cancel guidance and fly straight from here on.
pub fn dumb_fire(world: &mut World, ctx: &mut TickContext, entity: Entity) -> Result<(), SimError> {
    {
        let (projectile, move_type) = world
            .query_one_mut::<(&mut Projectile, &mut MoveType)>(entity)
            .map_err(|_| SimError::UnknownProjectile(entity))?;
        if projectile.state.is_terminal() {
            return Ok(());
        }
        projectile.state = ProjectileState::DumbFire;
        *move_type = MoveType::Fly;
    }
    schedule(world, entity, None);
    ctx.emit(WorldEvent::PlaySound {
        cue: SoundCue::MissileIgnite,
        entity: bits(entity),
    });
    create_trail(world, ctx, entity);
    info!(projectile = ?entity, "projectile dumb-fired");
    Ok(())
}

/// Attach a smoke trail unless one already exists.
fn create_trail(world: &mut World, ctx: &mut TickContext, entity: Entity) {
    let Ok(mut projectile) = world.get::<&mut Projectile>(entity) else {
        return;
    };
    if projectile.trail.is_some() {
        return;
    }
    let id = *ctx.next_trail_id;
    *ctx.next_trail_id += 1;
    projectile.trail = Some(RocketTrail { id, damaged: false });
    ctx.emit(WorldEvent::TrailSpawned {
        trail: id,
        projectile: bits(entity),
    });
}
