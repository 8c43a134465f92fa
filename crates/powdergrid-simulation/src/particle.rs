//! The particle record

use serde::{Deserialize, Serialize};

use crate::{MaterialClass, ParticleTemplate, ParticleType};

/// RGBA render hint, opaque to the engine
pub type Color = [u8; 4];

/// A single particle in the store
///
/// `slot` must always equal the record's position in the store, and `x`/`y`
/// the cell that references it (unless the particle is pending removal).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub particle_type: ParticleType,
    pub material: MaterialClass,
    pub color: Color,
    pub slot: usize,
    pub x: i32,
    pub y: i32,

    pub asleep: bool,
    pub sleep_counter: u32,
    pub kill_next_tick: bool,

    pub has_density: bool,
    /// Template density scaled by 10
    pub density: u32,

    pub has_lifetime: bool,
    pub remaining_lifetime: u32,

    pub can_burn: bool,
    pub combustion_temperature: i32,
    pub temperature: i32,
    pub spreads_heat: bool,
    pub can_cool: bool,

    // Per-tick flags, cleared at the start of every step
    pub swap_locked: bool,
    pub temperature_changed: bool,
}

impl Particle {
    /// Dead record awaiting compaction
    pub const TOMBSTONE: Particle = Particle {
        particle_type: ParticleType::None,
        material: MaterialClass::None,
        color: [0, 0, 0, 0],
        slot: 0,
        x: 0,
        y: 0,
        asleep: false,
        sleep_counter: 0,
        kill_next_tick: false,
        has_density: false,
        density: 0,
        has_lifetime: false,
        remaining_lifetime: 0,
        can_burn: false,
        combustion_temperature: 0,
        temperature: 0,
        spreads_heat: false,
        can_cool: false,
        swap_locked: false,
        temperature_changed: false,
    };

    /// Stamp a new particle from a template
    pub fn from_template(
        template: &ParticleTemplate,
        slot: usize,
        x: i32,
        y: i32,
        color: Color,
        lifetime: u32,
        temperature: i32,
    ) -> Self {
        let mut particle = Particle {
            slot,
            x,
            y,
            temperature,
            ..Particle::TOMBSTONE
        };
        particle.apply_template(template, color, lifetime);
        particle
    }

    /// Re-template in place, keeping position, slot and temperature
    pub fn apply_template(&mut self, template: &ParticleTemplate, color: Color, lifetime: u32) {
        self.particle_type = template.particle_type;
        self.material = template.material;
        self.color = color;
        self.has_density = template.has_density;
        self.density = template.density_value();
        self.has_lifetime = template.has_lifetime;
        self.remaining_lifetime = lifetime;
        self.can_burn = template.can_burn;
        self.combustion_temperature = template.combustion_temperature;
        self.spreads_heat = template.spreads_heat;
        self.can_cool = template.can_cool;
    }

    pub fn is_tombstone(&self) -> bool {
        self.particle_type.is_none()
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn wake(&mut self) {
        self.asleep = false;
        self.sleep_counter = 0;
    }
}

impl Default for Particle {
    fn default() -> Self {
        Particle::TOMBSTONE
    }
}
