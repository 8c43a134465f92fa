//! Cellular automata update logic - particle movement

use powdergrid_simulation::{MaterialClass, Particle, ParticleType};

use super::WorldRng;
use super::sim_context::SimContext;
use super::spatial_index::CellQuery;
use crate::simulation::StateChangeSystem;

/// Result of a single directional attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Blocked,
    /// Relocated into an empty cell
    Moved,
    /// Exchanged cells with a particle of different density
    Swapped,
    /// Water put out the heat source it ran into
    Extinguished,
}

impl MoveOutcome {
    pub fn succeeded(self) -> bool {
        self != MoveOutcome::Blocked
    }
}

/// What an occupied target cell may be displaced for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapRule {
    /// Only empty cells
    None,
    /// Sink through lighter particles
    Falling,
    /// Rise through heavier particles
    Rising,
}

/// Cellular automata updater - handles particle movement
pub struct CellularAutomataUpdater;

impl CellularAutomataUpdater {
    /// Powder falls straight down, then down-left, then down-right
    pub fn update_powder<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        rng: &mut R,
    ) -> MoveOutcome {
        Self::first_success(
            ctx,
            slot,
            &[
                (0, -1, SwapRule::Falling),
                (-1, -1, SwapRule::Falling),
                (1, -1, SwapRule::Falling),
            ],
            rng,
        )
    }

    /// Liquid falls like powder, then flows left or right into empty cells
    pub fn update_liquid<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        rng: &mut R,
    ) -> MoveOutcome {
        Self::first_success(
            ctx,
            slot,
            &[
                (0, -1, SwapRule::Falling),
                (-1, -1, SwapRule::Falling),
                (1, -1, SwapRule::Falling),
                (-1, 0, SwapRule::None),
                (1, 0, SwapRule::None),
            ],
            rng,
        )
    }

    /// Gas mirrors liquid vertically
    pub fn update_gas<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        rng: &mut R,
    ) -> MoveOutcome {
        Self::first_success(
            ctx,
            slot,
            &[
                (0, 1, SwapRule::Rising),
                (-1, 1, SwapRule::Rising),
                (1, 1, SwapRule::Rising),
                (-1, 0, SwapRule::None),
                (1, 0, SwapRule::None),
            ],
            rng,
        )
    }

    fn first_success<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        attempts: &[(i32, i32, SwapRule)],
        rng: &mut R,
    ) -> MoveOutcome {
        for &(dx, dy, rule) in attempts {
            let outcome = Self::try_move(ctx, slot, dx, dy, rule, rng);
            if outcome.succeeded() {
                return outcome;
            }
        }
        MoveOutcome::Blocked
    }

    /// Try to move the particle in `slot` by `(dx, dy)`
    pub fn try_move<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        slot: usize,
        dx: i32,
        dy: i32,
        rule: SwapRule,
        rng: &mut R,
    ) -> MoveOutcome {
        let Some(mover) = ctx.particle(slot) else {
            return MoveOutcome::Blocked;
        };
        if mover.swap_locked {
            return MoveOutcome::Blocked;
        }

        let (to_x, to_y) = (mover.x + dx, mover.y + dy);
        match ctx.index.occupant(to_x, to_y) {
            CellQuery::Illegal => MoveOutcome::Blocked,
            CellQuery::Empty => {
                ctx.index.clear(mover.x, mover.y);
                ctx.index.set(to_x, to_y, slot);
                if let Some(particle) = ctx.particle_mut(slot) {
                    particle.x = to_x;
                    particle.y = to_y;
                }
                ctx.wake_neighbors(mover.x, mover.y);
                ctx.stats.record_particle_moved();
                MoveOutcome::Moved
            }
            CellQuery::Occupied(other) => {
                let Some(target) = ctx.particle(other) else {
                    return MoveOutcome::Blocked;
                };

                // Water never swaps into a heat source
                if mover.particle_type == ParticleType::Water && target.spreads_heat {
                    Self::extinguish(ctx, slot, other, rng);
                    return MoveOutcome::Extinguished;
                }

                if !Self::can_swap(&mover, &target, rule) {
                    return MoveOutcome::Blocked;
                }

                ctx.index.swap((mover.x, mover.y), (to_x, to_y));
                if let Some(particle) = ctx.particle_mut(slot) {
                    particle.x = to_x;
                    particle.y = to_y;
                    particle.swap_locked = true;
                }
                if let Some(particle) = ctx.particle_mut(other) {
                    particle.x = mover.x;
                    particle.y = mover.y;
                    particle.swap_locked = true;
                    particle.wake();
                }
                ctx.stats.record_swap();
                MoveOutcome::Swapped
            }
        }
    }

    fn can_swap(mover: &Particle, target: &Particle, rule: SwapRule) -> bool {
        if target.material == MaterialClass::Solid
            || mover.swap_locked
            || target.swap_locked
            || !mover.has_density
            || !target.has_density
            || mover.particle_type == target.particle_type
        {
            return false;
        }

        match rule {
            SwapRule::None => false,
            SwapRule::Falling => target.density < mover.density,
            SwapRule::Rising => target.density > mover.density,
        }
    }

    /// Water hitting a heat source: fire goes out, molten material sets, the
    /// water boils off
    fn extinguish<R: WorldRng>(
        ctx: &mut SimContext<'_>,
        water: usize,
        source: usize,
        rng: &mut R,
    ) {
        match ctx.particle(source).map(|p| p.particle_type) {
            Some(ParticleType::MoltenStone) => {
                StateChangeSystem::solidify(ctx, source, ParticleType::Stone, rng);
            }
            Some(ParticleType::MoltenMetal) => {
                StateChangeSystem::solidify(ctx, source, ParticleType::Metal, rng);
            }
            _ => ctx.remove(source),
        }

        ctx.convert(water, ParticleType::Steam, true, rng);
        ctx.stats.record_reaction();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::test_support::{Harness, TestRng};

    #[test]
    fn test_update_powder_falls_down() {
        let mut h = Harness::new(5, 5);
        let sand = h.place(ParticleType::Sand, 2, 3);
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_powder(&mut h.ctx(), sand, &mut rng);

        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(h.particle(sand).position(), (2, 2));
        assert_eq!(h.index.occupant(2, 2), CellQuery::Occupied(sand));
        assert_eq!(h.index.occupant(2, 3), CellQuery::Empty);
    }

    #[test]
    fn test_update_powder_stops_on_solid() {
        let mut h = Harness::new(5, 5);
        let sand = h.place(ParticleType::Sand, 2, 3);
        h.place(ParticleType::Stone, 1, 2);
        h.place(ParticleType::Stone, 2, 2);
        h.place(ParticleType::Stone, 3, 2);
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_powder(&mut h.ctx(), sand, &mut rng);

        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(h.particle(sand).position(), (2, 3));
    }

    #[test]
    fn test_update_powder_slides_down_left_first() {
        let mut h = Harness::new(5, 5);
        let sand = h.place(ParticleType::Sand, 2, 3);
        h.place(ParticleType::Stone, 2, 2);
        let mut rng = TestRng::new(true);

        CellularAutomataUpdater::update_powder(&mut h.ctx(), sand, &mut rng);

        assert_eq!(h.particle(sand).position(), (1, 2));
    }

    #[test]
    fn test_powder_on_floor_is_blocked() {
        let mut h = Harness::new(1, 3);
        let sand = h.place(ParticleType::Sand, 0, 0);
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_powder(&mut h.ctx(), sand, &mut rng);
        assert_eq!(outcome, MoveOutcome::Blocked);
    }

    #[test]
    fn test_update_liquid_flows_horizontally() {
        let mut h = Harness::new(5, 5);
        let water = h.place(ParticleType::Water, 2, 1);
        h.place(ParticleType::Stone, 1, 0);
        h.place(ParticleType::Stone, 2, 0);
        h.place(ParticleType::Stone, 3, 0);
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_liquid(&mut h.ctx(), water, &mut rng);

        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(h.particle(water).position(), (1, 1));
    }

    #[test]
    fn test_liquid_does_not_swap_sideways() {
        let mut h = Harness::new(3, 2);
        let water = h.place(ParticleType::Water, 1, 1);
        for x in 0..3 {
            h.place(ParticleType::Stone, x, 0);
        }
        let oil_left = h.place(ParticleType::Oil, 0, 1);
        h.place(ParticleType::Oil, 2, 1);
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_liquid(&mut h.ctx(), water, &mut rng);

        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(h.particle(oil_left).position(), (0, 1));
    }

    #[test]
    fn test_update_gas_rises_up() {
        let mut h = Harness::new(5, 5);
        let smoke = h.place(ParticleType::Smoke, 2, 2);
        let mut rng = TestRng::new(true);

        CellularAutomataUpdater::update_gas(&mut h.ctx(), smoke, &mut rng);

        assert_eq!(h.particle(smoke).position(), (2, 3));
    }

    #[test]
    fn test_update_gas_disperses_horizontally() {
        let mut h = Harness::new(5, 5);
        let smoke = h.place(ParticleType::Smoke, 2, 2);
        h.place(ParticleType::Stone, 1, 3);
        h.place(ParticleType::Stone, 2, 3);
        h.place(ParticleType::Stone, 3, 3);
        let mut rng = TestRng::new(true);

        CellularAutomataUpdater::update_gas(&mut h.ctx(), smoke, &mut rng);

        assert_eq!(h.particle(smoke).position(), (1, 2));
    }

    #[test]
    fn test_denser_particle_sinks_through_lighter() {
        let mut h = Harness::new(3, 3);
        let sand = h.place(ParticleType::Sand, 1, 2);
        let water = h.place(ParticleType::Water, 1, 1);
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_powder(&mut h.ctx(), sand, &mut rng);

        assert_eq!(outcome, MoveOutcome::Swapped);
        assert_eq!(h.particle(sand).position(), (1, 1));
        assert_eq!(h.particle(water).position(), (1, 2));
        assert!(h.particle(sand).swap_locked);
        assert!(h.particle(water).swap_locked);
        assert_eq!(h.index.occupant(1, 2), CellQuery::Occupied(water));
    }

    #[test]
    fn test_swap_locked_particle_does_not_move() {
        let mut h = Harness::new(3, 3);
        let sand = h.place(ParticleType::Sand, 1, 2);
        h.store.get_mut(sand).unwrap().swap_locked = true;
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_powder(&mut h.ctx(), sand, &mut rng);
        assert_eq!(outcome, MoveOutcome::Blocked);
    }

    #[test]
    fn test_lighter_particle_does_not_sink() {
        let mut h = Harness::new(3, 3);
        let oil = h.place(ParticleType::Oil, 1, 1);
        h.place(ParticleType::Water, 1, 0);
        let mut rng = TestRng::new(true);

        let outcome =
            CellularAutomataUpdater::try_move(&mut h.ctx(), oil, 0, -1, SwapRule::Falling, &mut rng);
        assert_eq!(outcome, MoveOutcome::Blocked);
    }

    #[test]
    fn test_light_gas_rises_through_heavier_gas() {
        let mut h = Harness::new(3, 3);
        let smoke = h.place(ParticleType::Smoke, 1, 0);
        let steam = h.place(ParticleType::Steam, 1, 1);
        let mut rng = TestRng::new(true);

        let outcome =
            CellularAutomataUpdater::try_move(&mut h.ctx(), smoke, 0, 1, SwapRule::Rising, &mut rng);

        assert_eq!(outcome, MoveOutcome::Swapped);
        assert_eq!(h.particle(smoke).position(), (1, 1));
        assert_eq!(h.particle(steam).position(), (1, 0));
    }

    #[test]
    fn test_water_extinguishes_fire() {
        let mut h = Harness::new(3, 3);
        let water = h.place(ParticleType::Water, 1, 1);
        let fire = h.place(ParticleType::Fire, 1, 0);
        let mut rng = TestRng::new(true);

        let outcome = CellularAutomataUpdater::update_liquid(&mut h.ctx(), water, &mut rng);

        assert_eq!(outcome, MoveOutcome::Extinguished);
        assert!(h.particle(fire).is_tombstone());
        assert_eq!(h.index.occupant(1, 0), CellQuery::Empty);
        assert_eq!(h.particle(water).particle_type, ParticleType::Steam);
        assert_eq!(h.particle(water).position(), (1, 1));
    }

    #[test]
    fn test_water_sets_molten_stone() {
        let mut h = Harness::new(3, 3);
        let water = h.place(ParticleType::Water, 1, 1);
        let lava = h.place(ParticleType::MoltenStone, 1, 0);
        let mut rng = TestRng::new(true);

        CellularAutomataUpdater::update_liquid(&mut h.ctx(), water, &mut rng);

        let stone = h.particle(lava);
        assert_eq!(stone.particle_type, ParticleType::Stone);
        assert_eq!(stone.temperature, 1200 - 50);
        assert!(stone.swap_locked);
        assert_eq!(h.particle(water).particle_type, ParticleType::Steam);
    }
}
