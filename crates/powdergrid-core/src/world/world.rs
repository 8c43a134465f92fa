//! World - owns the grid and advances it one tick at a time

use powdergrid_simulation::{MaterialClass, Particle, ParticleType, PropertyTable};

use super::ca_update::{CellularAutomataUpdater, MoveOutcome};
use super::chemistry_system::ChemistrySystem;
use super::command::{BrushCache, Command, CommandBuffer, CommandKind, brush_covers, grid_reach};
use super::grid_config::GridConfig;
use super::particle_store::ParticleStore;
use super::row_scheduler::{RowOrder, RowScheduler};
use super::sim_context::SimContext;
use super::spatial_index::{GridCell, SpatialIndex};
use super::{NoopStats, SimStats, WorldRng};
use crate::error::WorldError;
use crate::simulation::TemperatureSimulator;

/// What a read-only lookup of one cell found
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellInfo<'a> {
    pub legal: bool,
    pub occupied: bool,
    pub particle: Option<&'a Particle>,
}

/// The simulated grid
pub struct World {
    config: GridConfig,

    /// Material definitions
    table: PropertyTable,

    ambient_temperature: i32,

    /// Cell -> slot lookup
    index: SpatialIndex,

    /// Particle records, addressed by slot
    store: ParticleStore,

    /// Solids that spread heat, powders and liquids; walked floor first
    falling: RowScheduler,

    /// Gases; walked ceiling first after the falling pass
    rising: RowScheduler,

    commands: CommandBuffer,
    brushes: BrushCache,

    /// Particles were placed outside a step, so the worklists are out of date
    schedule_stale: bool,

    /// Kills applied this tick that still wait for their record to be removed
    pending_kills: usize,

    tick: u64,
}

impl World {
    /// Create an empty grid
    pub fn new(config: GridConfig, table: PropertyTable) -> Result<Self, WorldError> {
        let (width, height) = (config.width, config.height);
        let max = i32::MAX as u32;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(WorldError::InvalidDimensions { width, height });
        }

        log::info!(
            "Creating {}x{} grid at ambient {}",
            width,
            height,
            config.ambient_temperature
        );

        Ok(Self {
            ambient_temperature: config.ambient_temperature,
            index: SpatialIndex::new(width, height),
            store: ParticleStore::with_capacity((width as usize).saturating_mul(height as usize)),
            falling: RowScheduler::new(height, RowOrder::BottomUp),
            rising: RowScheduler::new(height, RowOrder::TopDown),
            commands: CommandBuffer::default(),
            brushes: BrushCache::new(),
            schedule_stale: false,
            pending_kills: 0,
            tick: 0,
            config,
            table,
        })
    }

    /// Create a grid whose property table is read from RON source
    pub fn with_table_source(config: GridConfig, source: &str) -> Result<Self, WorldError> {
        let table = PropertyTable::from_ron_str(source)?;
        Self::new(config, table)
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn table(&self) -> &PropertyTable {
        &self.table
    }

    pub fn ambient_temperature(&self) -> i32 {
        self.ambient_temperature
    }

    /// Change the temperature particles spawn at and drift toward
    pub fn set_ambient_temperature(&mut self, temperature: i32) {
        self.ambient_temperature = temperature;
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn live_particle_count(&self) -> usize {
        self.store.live_count()
    }

    /// Particle records; after a step these are exactly the live particles
    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    /// Occupancy of every cell, row-major from the floor up
    pub fn occupancy(&self) -> &[GridCell] {
        self.index.cells()
    }

    pub fn particle_at(&self, x: i32, y: i32) -> CellInfo<'_> {
        let cell = self.index.occupant(x, y);
        CellInfo {
            legal: self.index.is_legal(x, y),
            occupied: cell.slot().is_some(),
            particle: cell
                .slot()
                .and_then(|slot| self.store.get(slot))
                .filter(|p| !p.is_tombstone()),
        }
    }

    /// Queue an interaction for the start of the next tick
    ///
    /// Replaces any command that has not been consumed yet.
    pub fn enqueue_command(&mut self, command: Command) {
        self.commands.enqueue(command);
    }

    pub fn pending_command(&self) -> &Command {
        self.commands.peek()
    }

    /// Put a particle straight into an empty cell, outside of a step
    pub fn place<R: WorldRng>(
        &mut self,
        particle_type: ParticleType,
        x: i32,
        y: i32,
        rng: &mut R,
    ) -> Option<usize> {
        let mut stats = NoopStats;
        let mut ctx = SimContext {
            index: &mut self.index,
            store: &mut self.store,
            table: &self.table,
            rules: &self.config.rules,
            ambient: self.ambient_temperature,
            stats: &mut stats,
        };
        let slot = ctx.spawn(particle_type, x, y, rng)?;
        self.schedule_stale = true;
        Some(slot)
    }

    /// Advance the grid by one tick
    pub fn step<R: WorldRng>(
        &mut self,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> Result<(), WorldError> {
        // 1. Clear per-tick flags
        for particle in self.store.iter_mut() {
            particle.swap_locked = false;
            particle.temperature_changed = false;
        }

        // 2. External interaction
        self.apply_command(stats, rng);
        if self.schedule_stale {
            self.rebuild_schedule();
        }

        // 3. Rule passes; an aborted tick forces a rebuild next time
        self.schedule_stale = true;
        self.run_pass(RowOrder::BottomUp, stats, rng)?;
        self.run_pass(RowOrder::TopDown, stats, rng)?;

        // 4. Killed particles nobody visited
        if self.pending_kills > 0 {
            self.sweep_pending_kills(stats);
        }

        // 5. Compact the store and prepare next tick's worklists
        if self.store.is_dirty() {
            let removed = self.store.compact(&mut self.index);
            log::debug!(
                "Tick {}: compacted {} records, {} live",
                self.tick,
                removed,
                self.store.live_count()
            );
        }
        self.rebuild_schedule();

        if cfg!(debug_assertions) {
            self.validate()?;
        }

        self.tick += 1;
        Ok(())
    }

    fn apply_command<R: WorldRng>(&mut self, stats: &mut dyn SimStats, rng: &mut R) {
        let command = self.commands.take();
        if command.is_none() {
            return;
        }

        log::debug!(
            "Applying {:?} at ({}, {}) with radius {}",
            command.kind,
            command.coordinate.x,
            command.coordinate.y,
            command.radius
        );

        let (width, height) = (self.config.width, self.config.height);
        let center = command.coordinate;
        let mut ctx = SimContext {
            index: &mut self.index,
            store: &mut self.store,
            table: &self.table,
            rules: &self.config.rules,
            ambient: self.ambient_temperature,
            stats,
        };
        let mut deferred = 0;

        if command.radius <= grid_reach(width, height) {
            for offset in self.brushes.offsets(command.radius) {
                let x = i32::try_from(i64::from(center.x) + i64::from(offset.x));
                let y = i32::try_from(i64::from(center.y) + i64::from(offset.y));
                if let (Ok(x), Ok(y)) = (x, y) {
                    deferred += Self::apply_at(&mut ctx, command.kind, x, y, rng);
                }
            }
        } else {
            // Brush is larger than the grid; test the cells instead
            log::debug!("Brush radius {} clipped to the grid", command.radius);
            for y in 0..height as i32 {
                for x in 0..width as i32 {
                    let dx = i64::from(x) - i64::from(center.x);
                    let dy = i64::from(y) - i64::from(center.y);
                    if brush_covers(command.radius, dx, dy) {
                        deferred += Self::apply_at(&mut ctx, command.kind, x, y, rng);
                    }
                }
            }
        }

        self.pending_kills += deferred;
    }

    /// Apply a command to one cell; returns the number of deferred kills
    fn apply_at<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        kind: CommandKind,
        x: i32,
        y: i32,
        rng: &mut R,
    ) -> usize {
        if !ctx.index.is_legal(x, y) {
            return 0;
        }
        match kind {
            CommandKind::None => 0,
            CommandKind::Spawn(particle_type) => {
                ctx.spawn(particle_type, x, y, rng);
                0
            }
            CommandKind::Kill => usize::from(Self::kill_at(ctx, x, y)),
        }
    }

    /// Kill whatever occupies `(x, y)`; returns true if removal is deferred
    ///
    /// Solids and sleeping particles go at once. Anything else gives up its
    /// cell now and is removed when the rule passes reach it.
    fn kill_at(ctx: &mut SimContext<'_>, x: i32, y: i32) -> bool {
        let Some(slot) = ctx.index.occupant(x, y).slot() else {
            log::trace!("Kill at ({x}, {y}) hit an empty cell");
            return false;
        };
        let Some(particle) = ctx.particle(slot) else {
            return false;
        };

        if particle.asleep || !particle.material.is_movable() {
            ctx.remove(slot);
            return false;
        }

        ctx.index.clear(x, y);
        ctx.wake_neighbors(x, y);
        if let Some(particle) = ctx.particle_mut(slot) {
            particle.kill_next_tick = true;
        }
        true
    }

    fn run_pass<R: WorldRng>(
        &mut self,
        order: RowOrder,
        stats: &mut dyn SimStats,
        rng: &mut R,
    ) -> Result<(), WorldError> {
        let scheduler = match order {
            RowOrder::BottomUp => &self.falling,
            RowOrder::TopDown => &self.rising,
        };
        let mut ctx = SimContext {
            index: &mut self.index,
            store: &mut self.store,
            table: &self.table,
            rules: &self.config.rules,
            ambient: self.ambient_temperature,
            stats,
        };

        for y in scheduler.row_indices() {
            let row = scheduler.row(y);
            // Alternate direction each row for symmetry
            if y % 2 == 0 {
                row.iter()
                    .try_for_each(|&slot| Self::update_particle(&mut ctx, slot, rng))?;
            } else {
                row.iter()
                    .rev()
                    .try_for_each(|&slot| Self::update_particle(&mut ctx, slot, rng))?;
            }
        }
        Ok(())
    }

    fn update_particle<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        rng: &mut R,
    ) -> Result<(), WorldError> {
        let Some(particle) = ctx.particle(slot) else {
            return Ok(());
        };
        if particle.asleep {
            return Ok(());
        }
        if particle.kill_next_tick {
            ctx.remove(slot);
            return Ok(());
        }

        let outcome = match particle.material {
            MaterialClass::Solid => MoveOutcome::Blocked,
            MaterialClass::Powder => CellularAutomataUpdater::update_powder(ctx, slot, rng),
            MaterialClass::Liquid => CellularAutomataUpdater::update_liquid(ctx, slot, rng),
            MaterialClass::Gas => CellularAutomataUpdater::update_gas(ctx, slot, rng),
            MaterialClass::None => {
                return Err(WorldError::UnknownMaterial {
                    slot,
                    particle_type: particle.particle_type,
                });
            }
        };

        TemperatureSimulator::update(ctx, slot, rng);

        let Some(particle) = ctx.particle(slot) else {
            return Ok(());
        };
        if particle.particle_type == ParticleType::Acid {
            ChemistrySystem::update_acid(ctx, slot, rng);
        }
        if !ChemistrySystem::update_lifetime(ctx, slot, rng) {
            return Ok(());
        }

        Self::update_sleep(ctx, slot, outcome.succeeded());
        Ok(())
    }

    /// Particles that stay put with nothing going on eventually fall asleep
    fn update_sleep(ctx: &mut SimContext<'_>, slot: usize, moved: bool) {
        let (rules, ambient) = (ctx.rules, ctx.ambient);
        let Some(particle) = ctx.particle_mut(slot) else {
            return;
        };

        if moved {
            particle.sleep_counter = 0;
            return;
        }
        if !rules.sleep_enabled
            || particle.has_lifetime
            || particle.spreads_heat
            || particle.particle_type == ParticleType::Acid
            || particle.temperature != ambient
        {
            return;
        }

        particle.sleep_counter += 1;
        if particle.sleep_counter > rules.sleep_threshold {
            particle.asleep = true;
        }
    }

    fn sweep_pending_kills(&mut self, stats: &mut dyn SimStats) {
        for slot in 0..self.store.len() {
            let pending = self
                .store
                .get(slot)
                .is_some_and(|p| p.kill_next_tick && !p.is_tombstone());
            if pending && self.store.kill(slot) {
                stats.record_removal();
            }
        }
        self.pending_kills = 0;
    }

    /// Rebuild both worklists from the store
    ///
    /// Sleeping particles and solids that do not spread heat are left out.
    fn rebuild_schedule(&mut self) {
        self.falling.clear_all();
        self.rising.clear_all();

        for particle in self.store.as_slice() {
            if particle.is_tombstone() || particle.asleep || particle.kill_next_tick {
                continue;
            }
            match particle.material {
                MaterialClass::Solid if !particle.spreads_heat => {}
                MaterialClass::Gas => self.rising.queue(particle.y, particle.slot),
                _ => self.falling.queue(particle.y, particle.slot),
            }
        }

        let store = &self.store;
        let x_of = |slot: usize| store.get(slot).map_or(0, |p| p.x);
        self.falling.sort_rows_by_key(x_of);
        self.rising.sort_rows_by_key(x_of);

        self.schedule_stale = false;
    }

    /// Check the grid/store bookkeeping, reporting the first inconsistency
    pub fn validate(&self) -> Result<(), WorldError> {
        let violation = |message: String| Err(WorldError::InvariantViolation(message));
        let mut referenced = vec![false; self.store.len()];

        for (i, cell) in self.index.cells().iter().enumerate() {
            let Some(slot) = cell.slot else {
                continue;
            };
            let (x, y) = self.index.coords_of(i);

            let Some(particle) = self.store.get(slot).filter(|p| !p.is_tombstone()) else {
                return violation(format!("cell ({x}, {y}) points at dead slot {slot}"));
            };
            if particle.position() != (x, y) {
                return violation(format!(
                    "cell ({x}, {y}) holds slot {slot} positioned at ({}, {})",
                    particle.x, particle.y
                ));
            }
            if particle.slot != slot {
                return violation(format!(
                    "cell ({x}, {y}) holds slot {slot} whose record says {}",
                    particle.slot
                ));
            }
            if std::mem::replace(&mut referenced[slot], true) {
                return violation(format!("slot {slot} is referenced by two cells"));
            }
        }

        let live = self
            .store
            .as_slice()
            .iter()
            .filter(|p| !p.is_tombstone())
            .count();
        if live != self.store.live_count() {
            return violation(format!(
                "live count is {} but {live} records are alive",
                self.store.live_count()
            ));
        }

        for (slot, particle) in self.store.as_slice().iter().enumerate() {
            if particle.is_tombstone() {
                if !self.store.is_dirty() {
                    return violation(format!("tombstone in slot {slot} survived compaction"));
                }
            } else if !particle.kill_next_tick && !referenced[slot] {
                return violation(format!(
                    "slot {slot} at ({}, {}) is missing from the grid",
                    particle.x, particle.y
                ));
            }
        }

        Ok(())
    }
}
