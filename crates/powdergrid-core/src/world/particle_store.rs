//! Particle arena with soft deletion and compaction

use powdergrid_simulation::Particle;

use super::spatial_index::{CellQuery, SpatialIndex};

/// Dense particle arena; a particle's slot is its identity within a tick
///
/// Kills leave tombstones behind. `compact` squeezes them out and re-points
/// the spatial index at every record that moved.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    live: usize,
    dirty: bool,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Append a record, assigning its slot
    pub fn push(&mut self, mut particle: Particle) -> usize {
        let slot = self.particles.len();
        particle.slot = slot;
        self.particles.push(particle);
        self.live += 1;
        slot
    }

    pub fn get(&self, slot: usize) -> Option<&Particle> {
        self.particles.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Particle> {
        self.particles.get_mut(slot)
    }

    /// Tombstone a record; returns false if it was already dead
    pub fn kill(&mut self, slot: usize) -> bool {
        match self.particles.get_mut(slot) {
            Some(particle) if !particle.is_tombstone() => {
                *particle = Particle {
                    slot,
                    ..Particle::TOMBSTONE
                };
                self.live -= 1;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Whether a kill happened since the last compaction
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Number of records including tombstones
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Remove tombstones, returning how many were dropped
    ///
    /// Starts at the first tombstone so the untouched prefix costs nothing.
    /// Records pending removal are not in the index and are left unmapped.
    pub fn compact(&mut self, index: &mut SpatialIndex) -> usize {
        if !self.dirty {
            return 0;
        }
        self.dirty = false;

        let Some(first_dead) = self.particles.iter().position(|p| p.is_tombstone()) else {
            return 0;
        };

        let before = self.particles.len();
        let mut write = first_dead;

        for read in first_dead..before {
            let particle = self.particles[read];
            if particle.is_tombstone() {
                continue;
            }

            if index.occupant(particle.x, particle.y) == CellQuery::Occupied(read) {
                index.set(particle.x, particle.y, write);
            }
            self.particles[write] = Particle {
                slot: write,
                ..particle
            };
            write += 1;
        }

        self.particles.truncate(write);
        before - write
    }
}
