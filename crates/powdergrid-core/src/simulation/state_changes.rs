//! State change system
//!
//! Handles particle type transitions driven by temperature:
//! - Melting (ice → water, stone → molten stone, metal → molten metal)
//! - Boiling (water → steam)
//! - Combustion (wood, oil → fire, only with air nearby)
//! - Condensing and solidifying on the way back down

use powdergrid_simulation::ParticleType;

use crate::world::{ParticleFactory, SimContext, WorldRng};

/// What a state change check did to the particle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    Unchanged,
    Converted,
    Removed,
}

/// System for checking and applying state changes
pub struct StateChangeSystem;

impl StateChangeSystem {
    /// Compare a particle's temperature with its combustion temperature and
    /// transition it if a rule applies
    pub fn check_state_change<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        rng: &mut R,
    ) -> StateChange {
        let Some(particle) = ctx.particle(slot) else {
            return StateChange::Unchanged;
        };

        if particle.temperature >= particle.combustion_temperature {
            if !particle.can_burn {
                return StateChange::Unchanged;
            }

            match particle.particle_type {
                ParticleType::Ice => {
                    ctx.convert(slot, ParticleType::Water, true, rng);
                    StateChange::Converted
                }
                ParticleType::Water => {
                    ctx.convert(slot, ParticleType::Steam, true, rng);
                    StateChange::Converted
                }
                ParticleType::Stone => Self::melt(ctx, slot, ParticleType::MoltenStone, rng),
                ParticleType::Metal => Self::melt(ctx, slot, ParticleType::MoltenMetal, rng),
                ParticleType::Wood | ParticleType::Oil => {
                    // Fire eats in from open faces
                    if !ctx.neighborhood(particle.x, particle.y).has_air() {
                        return StateChange::Unchanged;
                    }
                    let table = ctx.table;
                    if let Some(burning) = ctx.particle_mut(slot) {
                        ParticleFactory::ignite(table, burning, rng);
                    }
                    ctx.stats.record_state_change();
                    StateChange::Converted
                }
                _ => StateChange::Unchanged,
            }
        } else {
            match particle.particle_type {
                ParticleType::Steam => {
                    if rng.check_probability(ctx.rules.steam_condense_chance) {
                        ctx.convert(slot, ParticleType::Water, true, rng);
                        StateChange::Converted
                    } else {
                        ctx.remove(slot);
                        StateChange::Removed
                    }
                }
                ParticleType::MoltenStone => Self::solidify(ctx, slot, ParticleType::Stone, rng),
                ParticleType::MoltenMetal => Self::solidify(ctx, slot, ParticleType::Metal, rng),
                _ => StateChange::Unchanged,
            }
        }
    }

    fn melt<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        to: ParticleType,
        rng: &mut R,
    ) -> StateChange {
        ctx.convert(slot, to, true, rng);
        if let Some(particle) = ctx.particle_mut(slot) {
            particle.swap_locked = true;
            particle.temperature_changed = true;
        }
        StateChange::Converted
    }

    /// Molten material sets back into its solid form, losing some heat
    pub fn solidify<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        to: ParticleType,
        rng: &mut R,
    ) -> StateChange {
        let penalty = ctx.rules.solidify_temperature_penalty;
        ctx.convert(slot, to, true, rng);
        if let Some(particle) = ctx.particle_mut(slot) {
            particle.temperature -= penalty;
            particle.swap_locked = true;
            particle.temperature_changed = true;
        }
        StateChange::Converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::test_support::{Harness, TestRng};
    use powdergrid_simulation::MaterialClass;

    fn heat(h: &mut Harness, slot: usize, temperature: i32) {
        h.store.get_mut(slot).unwrap().temperature = temperature;
    }

    #[test]
    fn test_melting() {
        let mut h = Harness::new(3, 3);
        let ice = h.place(ParticleType::Ice, 1, 1);
        let mut rng = TestRng::new(true);

        // Below melting point - no change
        assert_eq!(
            StateChangeSystem::check_state_change(&mut h.ctx(), ice, &mut rng),
            StateChange::Unchanged
        );

        heat(&mut h, ice, 0);
        assert_eq!(
            StateChangeSystem::check_state_change(&mut h.ctx(), ice, &mut rng),
            StateChange::Converted
        );
        assert_eq!(h.particle(ice).particle_type, ParticleType::Water);
        assert_eq!(h.particle(ice).temperature, 0);
    }

    #[test]
    fn test_boiling() {
        let mut h = Harness::new(3, 3);
        let water = h.place(ParticleType::Water, 1, 1);
        let mut rng = TestRng::new(true);

        heat(&mut h, water, 99);
        StateChangeSystem::check_state_change(&mut h.ctx(), water, &mut rng);
        assert_eq!(h.particle(water).particle_type, ParticleType::Water);

        heat(&mut h, water, 100);
        StateChangeSystem::check_state_change(&mut h.ctx(), water, &mut rng);
        assert_eq!(h.particle(water).particle_type, ParticleType::Steam);
        assert_eq!(h.particle(water).material, MaterialClass::Gas);
    }

    #[test]
    fn test_stone_melts_and_locks() {
        let mut h = Harness::new(3, 3);
        let stone = h.place(ParticleType::Stone, 1, 1);
        let mut rng = TestRng::new(true);

        heat(&mut h, stone, 900);
        StateChangeSystem::check_state_change(&mut h.ctx(), stone, &mut rng);

        let lava = h.particle(stone);
        assert_eq!(lava.particle_type, ParticleType::MoltenStone);
        assert!(lava.swap_locked);
        assert!(lava.temperature_changed);
        assert!(lava.spreads_heat);
    }

    #[test]
    fn test_molten_metal_solidifies_with_penalty() {
        let mut h = Harness::new(3, 3);
        let molten = h.place(ParticleType::MoltenMetal, 1, 1);
        let mut rng = TestRng::new(true);

        heat(&mut h, molten, 999);
        StateChangeSystem::check_state_change(&mut h.ctx(), molten, &mut rng);

        let metal = h.particle(molten);
        assert_eq!(metal.particle_type, ParticleType::Metal);
        assert_eq!(metal.temperature, 949);
        assert!(metal.swap_locked);
    }

    #[test]
    fn test_wood_needs_air_to_ignite() {
        let mut h = Harness::new(3, 3);
        let wood = h.place(ParticleType::Wood, 1, 1);
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (1, 1) {
                    h.place(ParticleType::Stone, x, y);
                }
            }
        }
        let mut rng = TestRng::new(true);

        heat(&mut h, wood, 500);
        assert_eq!(
            StateChangeSystem::check_state_change(&mut h.ctx(), wood, &mut rng),
            StateChange::Unchanged
        );
        assert_eq!(h.particle(wood).particle_type, ParticleType::Wood);

        // Open one face
        let corner = h.index.occupant(0, 0).slot().unwrap();
        h.ctx().remove(corner);
        StateChangeSystem::check_state_change(&mut h.ctx(), wood, &mut rng);

        let fire = h.particle(wood);
        assert_eq!(fire.particle_type, ParticleType::Fire);
        assert_eq!(fire.material, MaterialClass::Solid);
        assert!(!fire.can_burn);
    }

    #[test]
    fn test_cool_steam_condenses_or_vanishes() {
        let mut h = Harness::new(3, 3);
        let condensing = h.place(ParticleType::Steam, 0, 0);
        let vanishing = h.place(ParticleType::Steam, 2, 2);

        heat(&mut h, condensing, 79);
        StateChangeSystem::check_state_change(&mut h.ctx(), condensing, &mut TestRng::new(true));
        assert_eq!(h.particle(condensing).particle_type, ParticleType::Water);

        heat(&mut h, vanishing, 79);
        let result =
            StateChangeSystem::check_state_change(&mut h.ctx(), vanishing, &mut TestRng::new(false));
        assert_eq!(result, StateChange::Removed);
        assert!(h.particle(vanishing).is_tombstone());
        assert_eq!(h.type_at(2, 2), ParticleType::None);
    }

    #[test]
    fn test_non_burning_types_ignore_heat() {
        let mut h = Harness::new(3, 3);
        let sand = h.place(ParticleType::Sand, 1, 1);
        heat(&mut h, sand, 5000);

        let result =
            StateChangeSystem::check_state_change(&mut h.ctx(), sand, &mut TestRng::new(true));
        assert_eq!(result, StateChange::Unchanged);
    }
}
