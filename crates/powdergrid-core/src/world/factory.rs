//! Stamping particles from templates

use powdergrid_simulation::{Particle, ParticleTemplate, ParticleType, PropertyTable};

use super::WorldRng;

/// Builds and re-templates particles, rolling color and lifetime
pub struct ParticleFactory;

impl ParticleFactory {
    /// New particle at `(x, y)`; the slot is assigned by the store
    pub fn create<R: WorldRng>(
        table: &PropertyTable,
        particle_type: ParticleType,
        x: i32,
        y: i32,
        ambient: i32,
        rng: &mut R,
    ) -> Particle {
        let template = table.get(particle_type);
        let color = template.color_at(rng.gen_f32());
        let lifetime = Self::roll_lifetime(template, 1.0, rng);
        Particle::from_template(
            template,
            0,
            x,
            y,
            color,
            lifetime,
            template.initial_temperature(ambient),
        )
    }

    /// Re-template a particle in place
    ///
    /// With `keep_temperature` unset the particle takes the new template's
    /// starting temperature.
    pub fn convert<R: WorldRng>(
        table: &PropertyTable,
        particle: &mut Particle,
        to: ParticleType,
        keep_temperature: bool,
        ambient: i32,
        rng: &mut R,
    ) {
        Self::convert_with_lifetime(table, particle, to, 1.0, keep_temperature, ambient, rng);
    }

    /// Like `convert`, scaling the rolled lifetime
    pub fn convert_with_lifetime<R: WorldRng>(
        table: &PropertyTable,
        particle: &mut Particle,
        to: ParticleType,
        lifetime_multiplier: f32,
        keep_temperature: bool,
        ambient: i32,
        rng: &mut R,
    ) {
        let template = table.get(to);
        let color = template.color_at(rng.gen_f32());
        let lifetime = Self::roll_lifetime(template, lifetime_multiplier, rng);
        particle.apply_template(template, color, lifetime);
        if !keep_temperature {
            particle.temperature = template.initial_temperature(ambient);
        }
    }

    /// Set a burnable particle on fire
    ///
    /// The material class, density and temperature stay, so burning wood is
    /// a fire that does not move and burning oil still flows.
    pub fn ignite<R: WorldRng>(table: &PropertyTable, particle: &mut Particle, rng: &mut R) {
        let fire = table.get(ParticleType::Fire);
        let multiplier = table.get(particle.particle_type).burn_life_multiplier;

        particle.particle_type = ParticleType::Fire;
        particle.color = fire.color_at(rng.gen_f32());
        particle.can_burn = false;
        particle.spreads_heat = fire.spreads_heat;
        particle.can_cool = fire.can_cool;
        particle.has_lifetime = fire.has_lifetime;
        particle.remaining_lifetime = Self::roll_lifetime(fire, multiplier, rng);
    }

    fn roll_lifetime<R: WorldRng>(template: &ParticleTemplate, multiplier: f32, rng: &mut R) -> u32 {
        match template.lifetime_range() {
            Some(range) => {
                let roll = rng.gen_range_u32(*range.start(), *range.end());
                template.lifetime_from_roll(roll, multiplier)
            }
            None => 0,
        }
    }
}
