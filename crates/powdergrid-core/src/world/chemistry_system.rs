//! Chemistry system for acid and expiring particles

use powdergrid_simulation::{MaterialClass, ParticleType};

use super::factory::ParticleFactory;
use super::sim_context::SimContext;
use super::WorldRng;

/// Handles acid dissolving its surroundings and lifetime expiry
pub struct ChemistrySystem;

impl ChemistrySystem {
    /// Acid turns nearby solids and powders into short-lived acid, venting
    /// smoke into a free neighbor when anything dissolved
    ///
    /// Returns the number of dissolved neighbors.
    pub fn update_acid<R: WorldRng>(ctx: &mut SimContext<'_>, slot: usize, rng: &mut R) -> usize {
        let Some(acid) = ctx.particle(slot) else {
            return 0;
        };

        let hood = ctx.neighborhood(acid.x, acid.y);
        let chance = ctx.rules.acid_conversion_chance;
        let multiplier = 1.0 / ctx.rules.acid_lifetime_divisor.max(1) as f32;
        let mut dissolved = 0;

        for neighbor in hood.occupied_slots() {
            let Some(target) = ctx.particle(neighbor) else {
                continue;
            };
            if !matches!(target.material, MaterialClass::Solid | MaterialClass::Powder)
                || target.particle_type == ParticleType::Acid
            {
                continue;
            }
            if !rng.check_probability(chance) {
                continue;
            }

            let (table, ambient) = (ctx.table, ctx.ambient);
            if let Some(particle) = ctx.particle_mut(neighbor) {
                ParticleFactory::convert_with_lifetime(
                    table,
                    particle,
                    ParticleType::Acid,
                    multiplier,
                    true,
                    ambient,
                    rng,
                );
                particle.wake();
            }
            ctx.stats.record_reaction();
            dissolved += 1;
        }

        if dissolved > 0
            && let Some((x, y)) = hood.first_empty()
        {
            ctx.spawn(ParticleType::Smoke, x, y, rng);
        }

        dissolved
    }

    /// Count down a particle's lifetime
    ///
    /// Expired fire and acid turn to smoke, anything else disappears. Returns
    /// false when the particle was removed.
    pub fn update_lifetime<R: WorldRng>(ctx: &mut SimContext<'_>, slot: usize, rng: &mut R) -> bool {
        let Some(particle) = ctx.particle_mut(slot) else {
            return false;
        };
        if !particle.has_lifetime {
            return true;
        }

        particle.remaining_lifetime = particle.remaining_lifetime.saturating_sub(1);
        if particle.remaining_lifetime > 0 {
            return true;
        }

        let particle_type = particle.particle_type;
        match particle_type {
            ParticleType::Fire | ParticleType::Acid => {
                ctx.convert(slot, ParticleType::Smoke, true, rng);
                true
            }
            _ => {
                ctx.remove(slot);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::spatial_index::CellQuery;
    use crate::world::test_support::{Harness, TestRng};

    #[test]
    fn test_acid_dissolves_solids_and_powders() {
        let mut h = Harness::new(3, 3);
        let acid = h.place(ParticleType::Acid, 1, 1);
        let stone = h.place(ParticleType::Stone, 0, 0);
        let sand = h.place(ParticleType::Sand, 1, 0);
        let water = h.place(ParticleType::Water, 2, 0);
        let other_acid = h.place(ParticleType::Acid, 2, 1);

        let dissolved = ChemistrySystem::update_acid(&mut h.ctx(), acid, &mut TestRng::new(true));

        assert_eq!(dissolved, 2);
        assert_eq!(h.particle(stone).particle_type, ParticleType::Acid);
        assert_eq!(h.particle(sand).particle_type, ParticleType::Acid);
        assert_eq!(h.particle(water).particle_type, ParticleType::Water);
        assert_eq!(h.particle(other_acid).particle_type, ParticleType::Acid);

        // Shortened lifetime: the roll is scaled down by the divisor
        let dissolved_lifetime = h.particle(stone).remaining_lifetime;
        assert!((66..=134).contains(&dissolved_lifetime));
    }

    #[test]
    fn test_acid_vents_smoke_into_first_empty_cell() {
        let mut h = Harness::new(3, 3);
        let acid = h.place(ParticleType::Acid, 1, 1);
        h.place(ParticleType::Sand, 1, 0);

        ChemistrySystem::update_acid(&mut h.ctx(), acid, &mut TestRng::new(true));

        // Top-left is the first cell in neighborhood order
        assert_eq!(h.type_at(0, 2), ParticleType::Smoke);
        assert_eq!(h.store.live_count(), 3);
    }

    #[test]
    fn test_acid_without_reaction_vents_nothing() {
        let mut h = Harness::new(3, 3);
        let acid = h.place(ParticleType::Acid, 1, 1);
        h.place(ParticleType::Sand, 1, 0);

        let dissolved = ChemistrySystem::update_acid(&mut h.ctx(), acid, &mut TestRng::new(false));

        assert_eq!(dissolved, 0);
        assert_eq!(h.store.live_count(), 2);
    }

    #[test]
    fn test_expired_fire_turns_to_smoke() {
        let mut h = Harness::new(3, 3);
        let fire = h.place(ParticleType::Fire, 1, 1);
        h.store.get_mut(fire).unwrap().remaining_lifetime = 1;

        let alive = ChemistrySystem::update_lifetime(&mut h.ctx(), fire, &mut TestRng::new(true));

        assert!(alive);
        let smoke = h.particle(fire);
        assert_eq!(smoke.particle_type, ParticleType::Smoke);
        assert_eq!(smoke.material, MaterialClass::Gas);
        assert!(smoke.remaining_lifetime > 0);
    }

    #[test]
    fn test_expired_smoke_is_removed() {
        let mut h = Harness::new(3, 3);
        let smoke = h.place(ParticleType::Smoke, 1, 1);
        h.store.get_mut(smoke).unwrap().remaining_lifetime = 1;

        let alive = ChemistrySystem::update_lifetime(&mut h.ctx(), smoke, &mut TestRng::new(true));

        assert!(!alive);
        assert_eq!(h.index.occupant(1, 1), CellQuery::Empty);
        assert_eq!(h.store.live_count(), 0);
    }

    #[test]
    fn test_lifetime_counts_down() {
        let mut h = Harness::new(3, 3);
        let steam = h.place(ParticleType::Steam, 1, 1);
        let before = h.particle(steam).remaining_lifetime;

        ChemistrySystem::update_lifetime(&mut h.ctx(), steam, &mut TestRng::new(true));

        assert_eq!(h.particle(steam).remaining_lifetime, before - 1);
    }
}
