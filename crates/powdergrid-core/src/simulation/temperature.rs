//! Heat exchange between particles
//!
//! Heat sources warm the flammable particles around them; everything else
//! drifts one step per tick back toward the ambient temperature.

use crate::simulation::StateChangeSystem;
use crate::world::{Neighborhood, SimContext, WorldRng};

/// Per-particle heat step
pub struct TemperatureSimulator;

impl TemperatureSimulator {
    /// Run the heat step for one visited particle
    pub fn update<R: WorldRng>(ctx: &mut SimContext<'_>, slot: usize, rng: &mut R) {
        let Some(particle) = ctx.particle(slot) else {
            return;
        };

        if particle.spreads_heat {
            let hood = ctx.neighborhood(particle.x, particle.y);
            Self::heat_neighbors(ctx, &hood, rng);

            let Some(particle) = ctx.particle(slot) else {
                return;
            };
            if !particle.can_cool || particle.temperature_changed {
                return;
            }

            let hot_neighbors = hood
                .cardinal_slots()
                .filter(|&n| ctx.particle(n).is_some_and(|p| p.spreads_heat))
                .count();
            if hot_neighbors < ctx.rules.cooling_neighbor_threshold {
                Self::cool_toward_ambient(ctx, slot, rng);
            }
        } else if particle.temperature != ctx.ambient && !particle.temperature_changed {
            Self::cool_toward_ambient(ctx, slot, rng);
        }
    }

    fn heat_neighbors<R: WorldRng>(ctx: &mut SimContext<'_>, hood: &Neighborhood, rng: &mut R) {
        let increment = ctx.rules.heat_increment;

        for neighbor in hood.occupied_slots() {
            let Some(target) = ctx.particle_mut(neighbor) else {
                continue;
            };
            if !target.can_burn {
                continue;
            }

            target.temperature += increment;
            target.temperature_changed = true;
            target.wake();
            StateChangeSystem::check_state_change(ctx, neighbor, rng);
        }
    }

    /// Move one cooling step toward ambient, then re-check the state
    fn cool_toward_ambient<R: WorldRng>(ctx: &mut SimContext<'_>, slot: usize, rng: &mut R) {
        let (ambient, step) = (ctx.ambient, ctx.rules.cooling_step);
        let Some(particle) = ctx.particle_mut(slot) else {
            return;
        };

        let before = particle.temperature;
        particle.temperature = if before > ambient {
            (before - step).max(ambient)
        } else {
            (before + step).min(ambient)
        };
        if particle.temperature == before {
            return;
        }

        StateChangeSystem::check_state_change(ctx, slot, rng);
    }
}
