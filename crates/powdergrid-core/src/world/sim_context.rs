//! Mutable view of the grid handed to the rule systems during a step

use powdergrid_simulation::{Particle, ParticleType, PropertyTable};

use super::factory::ParticleFactory;
use super::grid_config::RuleConfig;
use super::neighbor_queries::Neighborhood;
use super::particle_store::ParticleStore;
use super::spatial_index::{CellQuery, SpatialIndex};
use super::{SimStats, WorldRng};

/// Borrowed state shared by the rule systems for the length of a step
pub struct SimContext<'a> {
    pub index: &'a mut SpatialIndex,
    pub store: &'a mut ParticleStore,
    pub table: &'a PropertyTable,
    pub rules: &'a RuleConfig,
    pub ambient: i32,
    pub stats: &'a mut dyn SimStats,
}

impl SimContext<'_> {
    /// Copy of the record in `slot`, if it exists and is alive
    pub fn particle(&self, slot: usize) -> Option<Particle> {
        self.store
            .get(slot)
            .filter(|p| !p.is_tombstone())
            .copied()
    }

    pub fn particle_mut(&mut self, slot: usize) -> Option<&mut Particle> {
        self.store.get_mut(slot).filter(|p| !p.is_tombstone())
    }

    pub fn is_alive(&self, slot: usize) -> bool {
        self.particle(slot).is_some()
    }

    pub fn neighborhood(&self, x: i32, y: i32) -> Neighborhood {
        Neighborhood::around(&*self.index, x, y)
    }

    /// Wake sleeping particles around a cell whose contents changed
    pub fn wake_neighbors(&mut self, x: i32, y: i32) {
        let hood = self.neighborhood(x, y);
        for slot in hood.occupied_slots() {
            if let Some(particle) = self.store.get_mut(slot) {
                particle.wake();
            }
        }
    }

    /// Spawn into an empty legal cell
    pub fn spawn<R: WorldRng>(
        &mut self,
        particle_type: ParticleType,
        x: i32,
        y: i32,
        rng: &mut R,
    ) -> Option<usize> {
        if particle_type.is_none() {
            return None;
        }
        match self.index.occupant(x, y) {
            CellQuery::Empty => {}
            CellQuery::Occupied(slot) => {
                log::trace!("Spawn of {particle_type:?} at ({x}, {y}) blocked by slot {slot}");
                return None;
            }
            CellQuery::Illegal => return None,
        }

        let particle = ParticleFactory::create(self.table, particle_type, x, y, self.ambient, rng);
        let slot = self.store.push(particle);
        self.index.set(x, y, slot);
        self.stats.record_spawn();
        Some(slot)
    }

    /// Delete a particle now, freeing its cell if it still holds it
    pub fn remove(&mut self, slot: usize) {
        let Some(particle) = self.particle(slot) else {
            return;
        };

        if self.index.occupant(particle.x, particle.y) == CellQuery::Occupied(slot) {
            self.index.clear(particle.x, particle.y);
            self.wake_neighbors(particle.x, particle.y);
        }
        self.store.kill(slot);
        self.stats.record_removal();
    }

    pub fn convert<R: WorldRng>(
        &mut self,
        slot: usize,
        to: ParticleType,
        keep_temperature: bool,
        rng: &mut R,
    ) {
        let (table, ambient) = (self.table, self.ambient);
        if let Some(particle) = self.particle_mut(slot) {
            ParticleFactory::convert(table, particle, to, keep_temperature, ambient, rng);
            self.stats.record_state_change();
        }
    }
}
