//! Shared fixtures for the rule system unit tests

use powdergrid_simulation::{Particle, ParticleType, PropertyTable};

use super::factory::ParticleFactory;
use super::grid_config::RuleConfig;
use super::particle_store::ParticleStore;
use super::sim_context::SimContext;
use super::spatial_index::SpatialIndex;
use super::{NoopStats, WorldRng};

/// Test RNG that returns deterministic values
pub struct TestRng {
    pub f32_value: f32,
    pub probability_result: bool,
}

impl TestRng {
    pub fn new(probability_result: bool) -> Self {
        Self {
            f32_value: 0.5,
            probability_result,
        }
    }
}

impl WorldRng for TestRng {
    fn gen_f32(&mut self) -> f32 {
        self.f32_value
    }

    fn check_probability(&mut self, _probability: f32) -> bool {
        self.probability_result
    }
}

/// Owned grid state that can lend out a `SimContext`
pub struct Harness {
    pub index: SpatialIndex,
    pub store: ParticleStore,
    pub table: PropertyTable,
    pub rules: RuleConfig,
    pub ambient: i32,
    pub stats: NoopStats,
}

impl Harness {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            index: SpatialIndex::new(width, height),
            store: ParticleStore::new(),
            table: PropertyTable::default(),
            rules: RuleConfig::default(),
            ambient: 20,
            stats: NoopStats,
        }
    }

    pub fn ctx(&mut self) -> SimContext<'_> {
        SimContext {
            index: &mut self.index,
            store: &mut self.store,
            table: &self.table,
            rules: &self.rules,
            ambient: self.ambient,
            stats: &mut self.stats,
        }
    }

    pub fn place(&mut self, particle_type: ParticleType, x: i32, y: i32) -> usize {
        let mut rng = TestRng::new(true);
        let particle =
            ParticleFactory::create(&self.table, particle_type, x, y, self.ambient, &mut rng);
        let slot = self.store.push(particle);
        self.index.set(x, y, slot);
        slot
    }

    pub fn particle(&self, slot: usize) -> Particle {
        self.store.get(slot).copied().unwrap_or_default()
    }

    pub fn type_at(&self, x: i32, y: i32) -> ParticleType {
        self.index
            .occupant(x, y)
            .slot()
            .map(|slot| self.particle(slot).particle_type)
            .unwrap_or(ParticleType::None)
    }
}
