//! Simulation engine: the core of the subsystem.
//!
//! `SimulationEngine` owns the hecs ECS world, the designator registry, the
//! forced-detonation zone table and the seeded RNG. It processes launcher
//! commands, runs every due think, and produces `SimSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use laserguide_core::commands::LauncherCommand;
use laserguide_core::components::{Launcher, Projectile};
use laserguide_core::enums::{ControllerKind, DamageKind, GuidanceProfile, TargetClass};
use laserguide_core::events::WorldEvent;
use laserguide_core::state::SimSnapshot;
use laserguide_core::types::{Orientation, Position, SimTime};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::registry::DesignatorRegistry;
use crate::systems::{self, TickContext};
use crate::trace::{OpenSky, Tracer};
use crate::world_setup;
use crate::zones::ForcedDetonationZones;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    config: SimConfig,
    rng: ChaCha8Rng,
    registry: DesignatorRegistry,
    zones: ForcedDetonationZones,
    tracer: Box<dyn Tracer>,
    command_queue: VecDeque<LauncherCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<WorldEvent>,
    next_trail_id: u32,
}

impl SimulationEngine {
    /// Create a new engine over open sky.
    pub fn new(config: SimConfig) -> Self {
        Self::with_tracer(config, Box::new(OpenSky))
    }

    /// Create a new engine that traces against `tracer`.
    pub fn with_tracer(config: SimConfig, tracer: Box<dyn Tracer>) -> Self {
        info!(seed = config.seed, tick_rate = config.tick_rate, "simulation engine created");
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            registry: DesignatorRegistry::new(),
            zones: ForcedDetonationZones::new(),
            tracer,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            next_trail_id: 0,
        }
    }

    /// Queue a launcher command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: LauncherCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = LauncherCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        self.process_commands();

        let dt = self.config.dt();
        let gravity = self.config.tuning.gravity;
        self.time.advance(dt);

        let (world, mut ctx) = self.split();
        // 1. Lasers follow their holders' aim
        systems::launcher::run(world, &mut ctx);
        // 2. Designator self-updates (cosmetic scale)
        systems::designator::run(world, &mut ctx);
        // 3. Projectile state machine
        systems::projectile::run(world, &mut ctx);
        // 4. Movement integration
        let contacts = systems::movement::run(world, dt, gravity, ctx.tracer);
        // 5. Contacts
        for contact in contacts {
            let result =
                systems::projectile::touch(world, &mut ctx, contact.projectile, contact.other);
            if let Err(e) = result {
                warn!(error = %e, "contact with a vanished projectile");
            }
        }
        // 6. Cleanup (detonated projectiles)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, self.zones.len(), events)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for hosts that move actors and targets.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn registry(&self) -> &DesignatorRegistry {
        &self.registry
    }

    pub fn zones(&self) -> &ForcedDetonationZones {
        &self.zones
    }

    /// Copy of a projectile's state, if it is still alive.
    pub fn projectile(&self, entity: Entity) -> Option<Projectile> {
        self.world.get::<&Projectile>(entity).ok().map(|p| (*p).clone())
    }

    /// Copy of a launcher's state, if it still exists.
    pub fn launcher(&self, entity: Entity) -> Option<Launcher> {
        self.world.get::<&Launcher>(entity).ok().map(|l| (*l).clone())
    }

    // --- World population ---

    pub fn spawn_actor(&mut self, feet: Position) -> Entity {
        world_setup::spawn_actor(&mut self.world, feet)
    }

    pub fn spawn_target(&mut self, position: Position, class: TargetClass, radius: f64) -> Entity {
        world_setup::spawn_target(&mut self.world, position, class, radius)
    }

    pub fn spawn_launcher(
        &mut self,
        controller: Option<Entity>,
        kind: ControllerKind,
        profile: GuidanceProfile,
    ) -> Entity {
        world_setup::spawn_launcher(&mut self.world, controller, kind, profile)
    }

    // --- Projectiles ---

    /// Spawn a standard projectile, ignition pending.
    pub fn create_projectile(
        &mut self,
        origin: Position,
        orientation: Orientation,
        owner: Option<Entity>,
    ) -> Entity {
        self.create_projectile_with_profile(origin, orientation, owner, GuidanceProfile::Standard)
    }

    pub fn create_projectile_with_profile(
        &mut self,
        origin: Position,
        orientation: Orientation,
        owner: Option<Entity>,
        profile: GuidanceProfile,
    ) -> Entity {
        let entity = world_setup::spawn_projectile(
            &mut self.world,
            self.time.elapsed_secs,
            origin,
            orientation,
            owner,
            profile,
            &self.config.tuning,
        );
        debug!(projectile = ?entity, ?profile, "projectile created");
        entity
    }

    pub fn set_grace_period(&mut self, projectile: Entity, secs: f64) -> Result<(), SimError> {
        let now = self.time.elapsed_secs;
        systems::projectile::set_grace_period(&mut self.world, now, projectile, secs)
    }

    /// Emit a danger sound ahead of the projectile on every seeking tick.
    pub fn set_create_danger_sounds(
        &mut self,
        projectile: Entity,
        enabled: bool,
    ) -> Result<(), SimError> {
        let mut p = self
            .world
            .get::<&mut Projectile>(projectile)
            .map_err(|_| SimError::UnknownProjectile(projectile))?;
        p.create_danger_sounds = enabled;
        Ok(())
    }

    /// Negative amounts are rejected with `SimError::InvalidDamage`.
    pub fn apply_damage(
        &mut self,
        projectile: Entity,
        amount: i32,
        kind: DamageKind,
    ) -> Result<bool, SimError> {
        let (world, mut ctx) = self.split();
        systems::projectile::apply_damage(world, &mut ctx, projectile, amount, kind)
    }

    /// Report contact between a projectile and `other`.
    pub fn touch(&mut self, projectile: Entity, other: Entity) -> Result<bool, SimError> {
        let (world, mut ctx) = self.split();
        systems::projectile::touch(world, &mut ctx, projectile, Some(other))
    }

    pub fn dumb_fire(&mut self, projectile: Entity) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::projectile::dumb_fire(world, &mut ctx, projectile)
    }

    // --- Designators ---

    pub fn create_designator(
        &mut self,
        origin: Position,
        owner: Option<Entity>,
        visible: bool,
    ) -> Entity {
        let (world, mut ctx) = self.split();
        systems::designator::create(world, &mut ctx, origin, owner, visible)
    }

    pub fn destroy_designator(&mut self, designator: Entity) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::designator::destroy(world, &mut ctx, designator)
    }

    pub fn toggle_designator(&mut self, designator: Entity, on: bool) -> Result<(), SimError> {
        systems::designator::set_on(&mut self.world, designator, on)
    }

    pub fn set_designator_position(
        &mut self,
        designator: Entity,
        point: Position,
        surface_normal: DVec3,
    ) -> Result<(), SimError> {
        systems::designator::set_position(&mut self.world, designator, point, surface_normal)
    }

    pub fn set_designator_target(
        &mut self,
        designator: Entity,
        target: Option<Entity>,
    ) -> Result<(), SimError> {
        systems::designator::set_target(&mut self.world, designator, target)
    }

    // --- Forced-detonation zones ---

    pub fn register_forced_zone(
        &mut self,
        owner: Entity,
        radius: f64,
        height: f64,
    ) -> Result<(), SimError> {
        if !self.world.contains(owner) {
            return Err(SimError::UnknownEntity(owner));
        }
        self.zones.add_zone(owner, radius, height)
    }

    /// Returns how many zones were removed.
    pub fn unregister_forced_zone(&mut self, owner: Entity) -> usize {
        self.zones.remove_zone(owner)
    }

    // --- Launchers ---

    pub fn start_guiding(&mut self, launcher: Entity) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::start_guiding(world, &mut ctx, launcher)
    }

    pub fn stop_guiding(&mut self, launcher: Entity) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::stop_guiding(world, &mut ctx, launcher)
    }

    pub fn toggle_guiding(&mut self, launcher: Entity) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::toggle_guiding(world, &mut ctx, launcher)
    }

    pub fn suppress_guiding(&mut self, launcher: Entity, suppressed: bool) -> Result<(), SimError> {
        systems::launcher::suppress_guiding(&mut self.world, launcher, suppressed)
    }

    pub fn drop_launcher(&mut self, launcher: Entity) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::drop_launcher(world, &mut ctx, launcher)
    }

    pub fn destroy_launcher(&mut self, launcher: Entity) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::destroy_launcher(world, &mut ctx, launcher)
    }

    pub fn update_designator(
        &mut self,
        launcher: Entity,
        muzzle: Position,
        end: Position,
    ) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::update_designator(world, &mut ctx, launcher, muzzle, end)
    }

    pub fn aim_launcher(&mut self, launcher: Entity, aim: DVec3) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::aim(world, &mut ctx, launcher, aim)
    }

    pub fn npc_aim_at(&mut self, launcher: Entity, target: Position) -> Result<(), SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::npc_aim_at(world, &mut ctx, launcher, target)
    }

    pub fn fire_player(
        &mut self,
        launcher: Entity,
        aim: DVec3,
    ) -> Result<Option<Entity>, SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::fire_player(world, &mut ctx, launcher, aim)
    }

    pub fn fire_npc(&mut self, launcher: Entity, aim: DVec3) -> Result<Option<Entity>, SimError> {
        let (world, mut ctx) = self.split();
        systems::launcher::fire_npc(world, &mut ctx, launcher, aim)
    }

    /// Lend the world and the rest of the engine state to a system.
    fn split(&mut self) -> (&mut World, TickContext<'_>) {
        let ctx = TickContext {
            now: self.time.elapsed_secs,
            config: &self.config,
            rng: &mut self.rng,
            registry: &mut self.registry,
            zones: &mut self.zones,
            tracer: self.tracer.as_ref(),
            events: &mut self.events,
            next_trail_id: &mut self.next_trail_id,
        };
        (&mut self.world, ctx)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(e) = self.handle_command(&command) {
                warn!(?command, error = %e, "launcher command failed");
            }
        }
    }

    /// Handle a single launcher command.
    fn handle_command(&mut self, command: &LauncherCommand) -> Result<(), SimError> {
        let bits = command.launcher();
        let Some(launcher) = Entity::from_bits(bits) else {
            warn!(launcher = bits, "command names an invalid entity");
            return Ok(());
        };
        match command {
            LauncherCommand::Fire { aim, .. } => {
                self.fire_player(launcher, *aim)?;
            }
            LauncherCommand::FireNpc { aim, .. } => {
                self.fire_npc(launcher, *aim)?;
            }
            LauncherCommand::StartGuiding { .. } => self.start_guiding(launcher)?,
            LauncherCommand::StopGuiding { .. } => self.stop_guiding(launcher)?,
            LauncherCommand::ToggleGuiding { .. } => self.toggle_guiding(launcher)?,
            LauncherCommand::SuppressGuiding { suppressed, .. } => {
                self.suppress_guiding(launcher, *suppressed)?
            }
            LauncherCommand::Aim { aim, .. } => self.aim_launcher(launcher, *aim)?,
            LauncherCommand::AimAt { target, .. } => self.npc_aim_at(launcher, *target)?,
        }
        Ok(())
    }
}
