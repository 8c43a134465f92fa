//! Particle types, material classes and the property table

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{Color, TableError};

/// Every kind of particle the engine knows about
///
/// `None` marks an empty store slot (a tombstone) and never has a template
/// of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleType {
    #[default]
    None,
    Sand,
    Water,
    Wood,
    Steam,
    Fire,
    Oil,
    Stone,
    MoltenStone,
    Metal,
    MoltenMetal,
    Ice,
    Acid,
    Smoke,
}

impl ParticleType {
    /// All types that require a template, in table order
    pub const SPAWNABLE: [ParticleType; 13] = [
        ParticleType::Sand,
        ParticleType::Water,
        ParticleType::Wood,
        ParticleType::Steam,
        ParticleType::Fire,
        ParticleType::Oil,
        ParticleType::Stone,
        ParticleType::MoltenStone,
        ParticleType::Metal,
        ParticleType::MoltenMetal,
        ParticleType::Ice,
        ParticleType::Acid,
        ParticleType::Smoke,
    ];

    /// Number of variants including `None`
    pub const COUNT: usize = Self::SPAWNABLE.len() + 1;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_none(self) -> bool {
        self == ParticleType::None
    }
}

/// How a particle moves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialClass {
    /// Tombstones and uninitialised records
    #[default]
    None,
    /// Never moves (stone, wood, metal)
    Solid,
    /// Falls, piles up (sand)
    Powder,
    /// Falls and flows sideways (water, oil)
    Liquid,
    /// Rises and flows sideways (steam, smoke)
    Gas,
}

impl MaterialClass {
    /// Powder, liquid and gas particles can be displaced by a density swap
    pub fn is_movable(self) -> bool {
        matches!(
            self,
            MaterialClass::Powder | MaterialClass::Liquid | MaterialClass::Gas
        )
    }
}

/// Physical template a particle is stamped from when it spawns or converts
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTemplate {
    pub particle_type: ParticleType,
    pub name: String,
    pub material: MaterialClass,

    /// Evenly spaced RGBA stops; a particle picks a random point along it
    pub gradient: Vec<Color>,

    pub has_density: bool,
    /// Specific gravity, 0.0 - 2.0
    pub density: f32,

    pub has_lifetime: bool,
    /// Lifetime range in ticks
    pub lifetime_min: u32,
    pub lifetime_max: u32,

    /// Whether reaching `combustion_temperature` triggers a state change
    pub can_burn: bool,
    pub combustion_temperature: i32,
    /// Scales the fire lifetime when this material ignites
    pub burn_life_multiplier: f32,

    // Heat flags
    pub spreads_heat: bool,
    pub can_cool: bool,

    pub has_start_temperature: bool,
    pub start_temperature: i32,
}

impl Default for ParticleTemplate {
    fn default() -> Self {
        Self {
            particle_type: ParticleType::None,
            name: "none".to_string(),
            material: MaterialClass::None,
            gradient: vec![[255, 0, 255, 255]], // Magenta for missing templates
            has_density: false,
            density: 0.0,
            has_lifetime: false,
            lifetime_min: 0,
            lifetime_max: 0,
            can_burn: false,
            combustion_temperature: 0,
            burn_life_multiplier: 1.0,
            spreads_heat: false,
            can_cool: false,
            has_start_temperature: false,
            start_temperature: 0,
        }
    }
}

impl ParticleTemplate {
    /// Sample the gradient at `t` in [0.0, 1.0]
    pub fn color_at(&self, t: f32) -> Color {
        let stops = self.gradient.len();
        match stops {
            0 => [255, 0, 255, 255],
            1 => self.gradient[0],
            _ => {
                let position = t.clamp(0.0, 1.0) * (stops - 1) as f32;
                let lower = (position.floor() as usize).min(stops - 2);
                let frac = position - lower as f32;
                let (a, b) = (self.gradient[lower], self.gradient[lower + 1]);

                let mut color = [0u8; 4];
                for channel in 0..4 {
                    let value = a[channel] as f32 + (b[channel] as f32 - a[channel] as f32) * frac;
                    color[channel] = value.round().clamp(0.0, 255.0) as u8;
                }
                color
            }
        }
    }

    /// Range a lifetime roll is drawn from, if this type expires at all
    pub fn lifetime_range(&self) -> Option<RangeInclusive<u32>> {
        self.has_lifetime
            .then_some(self.lifetime_min..=self.lifetime_max)
    }

    /// Turn a roll from `lifetime_range` into a lifetime in ticks
    pub fn lifetime_from_roll(&self, roll: u32, multiplier: f32) -> u32 {
        if !self.has_lifetime {
            return 0;
        }
        (roll as f32 * multiplier).round().max(0.0) as u32
    }

    /// Integer density used for swap comparisons (0 if the type has none)
    pub fn density_value(&self) -> u32 {
        if !self.has_density {
            return 0;
        }
        (self.density * 10.0).round() as u32
    }

    pub fn initial_temperature(&self, ambient: i32) -> i32 {
        if self.has_start_temperature {
            self.start_temperature
        } else {
            ambient
        }
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.particle_type.is_none() {
            return Err(TableError::TemplateForNone);
        }
        if self.gradient.is_empty() {
            return Err(TableError::EmptyGradient(self.particle_type));
        }
        if self.has_lifetime && self.lifetime_min > self.lifetime_max {
            return Err(TableError::InvertedLifetime {
                particle_type: self.particle_type,
                min: self.lifetime_min,
                max: self.lifetime_max,
            });
        }
        if self.has_density && !(0.0..=2.0).contains(&self.density) {
            return Err(TableError::DensityOutOfRange {
                particle_type: self.particle_type,
                density: self.density,
            });
        }
        Ok(())
    }
}

/// Validated lookup from particle type to template
///
/// Every spawnable type has exactly one template. Index 0 holds the
/// placeholder template for `ParticleType::None`.
#[derive(Clone, Debug)]
pub struct PropertyTable {
    templates: Vec<ParticleTemplate>,
}

impl PropertyTable {
    /// Build a table from a complete template list
    pub fn new(templates: Vec<ParticleTemplate>) -> Result<Self, TableError> {
        let mut slots: Vec<Option<ParticleTemplate>> = vec![None; ParticleType::COUNT];

        for template in templates {
            template.validate()?;
            let index = template.particle_type.index();
            if slots[index].is_some() {
                return Err(TableError::DuplicateTemplate(template.particle_type));
            }
            slots[index] = Some(template);
        }

        let mut ordered = Vec::with_capacity(ParticleType::COUNT);
        ordered.push(ParticleTemplate::default());
        for particle_type in ParticleType::SPAWNABLE {
            match slots[particle_type.index()].take() {
                Some(template) => ordered.push(template),
                None => return Err(TableError::MissingTemplate(particle_type)),
            }
        }

        Ok(Self { templates: ordered })
    }

    /// Parse a complete table from a RON list of templates
    pub fn from_ron_str(source: &str) -> Result<Self, TableError> {
        let templates: Vec<ParticleTemplate> = ron::from_str(source)?;
        Self::new(templates)
    }

    /// Replace individual templates with the ones listed in `source`
    ///
    /// Returns how many templates were replaced.
    pub fn overlay_ron_str(&mut self, source: &str) -> Result<usize, TableError> {
        let overrides: Vec<ParticleTemplate> = ron::from_str(source)?;
        let mut seen = [false; ParticleType::COUNT];

        for template in &overrides {
            template.validate()?;
            let index = template.particle_type.index();
            if seen[index] {
                return Err(TableError::DuplicateTemplate(template.particle_type));
            }
            seen[index] = true;
        }

        let replaced = overrides.len();
        for template in overrides {
            log::debug!("Overriding template for {:?}", template.particle_type);
            let index = template.particle_type.index();
            self.templates[index] = template;
        }
        Ok(replaced)
    }

    /// Get the template for a type (`None` maps to the placeholder)
    pub fn get(&self, particle_type: ParticleType) -> &ParticleTemplate {
        self.templates
            .get(particle_type.index())
            .unwrap_or(&self.templates[0])
    }

    /// Replace one template, keeping the table complete
    pub fn set(&mut self, template: ParticleTemplate) -> Result<(), TableError> {
        template.validate()?;
        let index = template.particle_type.index();
        self.templates[index] = template;
        Ok(())
    }

    /// Iterate over all spawnable templates
    pub fn iter(&self) -> impl Iterator<Item = &ParticleTemplate> {
        self.templates.iter().skip(1)
    }

    fn default_templates() -> Vec<ParticleTemplate> {
        vec![
            ParticleTemplate {
                particle_type: ParticleType::Sand,
                name: "sand".to_string(),
                material: MaterialClass::Powder,
                gradient: vec![[194, 178, 128, 255], [214, 196, 146, 255]],
                has_density: true,
                density: 1.6,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Water,
                name: "water".to_string(),
                material: MaterialClass::Liquid,
                gradient: vec![[40, 120, 220, 255], [64, 164, 223, 255]],
                has_density: true,
                density: 1.0,
                can_burn: true,
                combustion_temperature: 100, // Boils
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Wood,
                name: "wood".to_string(),
                material: MaterialClass::Solid,
                gradient: vec![[120, 78, 38, 255], [139, 90, 43, 255]],
                has_density: true,
                density: 0.7,
                can_burn: true,
                combustion_temperature: 150,
                burn_life_multiplier: 2.0,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Steam,
                name: "steam".to_string(),
                material: MaterialClass::Gas,
                gradient: vec![[200, 200, 210, 255], [230, 230, 235, 255]],
                has_density: true,
                density: 0.3,
                has_lifetime: true,
                lifetime_min: 300,
                lifetime_max: 600,
                combustion_temperature: 80, // Condenses below this
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Fire,
                name: "fire".to_string(),
                // Stays where it was lit; scheduled because it spreads heat
                material: MaterialClass::Solid,
                gradient: vec![[255, 60, 0, 255], [255, 160, 0, 255], [255, 220, 80, 255]],
                has_lifetime: true,
                lifetime_min: 30,
                lifetime_max: 60,
                spreads_heat: true,
                can_cool: true,
                has_start_temperature: true,
                start_temperature: 600,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Oil,
                name: "oil".to_string(),
                material: MaterialClass::Liquid,
                gradient: vec![[50, 40, 30, 255], [70, 55, 35, 255]],
                has_density: true,
                density: 0.8, // Floats on water
                can_burn: true,
                combustion_temperature: 120,
                burn_life_multiplier: 1.5,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Stone,
                name: "stone".to_string(),
                material: MaterialClass::Solid,
                gradient: vec![[110, 110, 110, 255], [140, 140, 140, 255]],
                has_density: true,
                density: 2.0,
                can_burn: true,
                combustion_temperature: 900, // Melts
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::MoltenStone,
                name: "molten_stone".to_string(),
                material: MaterialClass::Liquid,
                gradient: vec![[255, 80, 0, 255], [200, 40, 0, 255]],
                has_density: true,
                density: 1.9,
                combustion_temperature: 800, // Solidifies below this
                spreads_heat: true,
                can_cool: true,
                has_start_temperature: true,
                start_temperature: 1200,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Metal,
                name: "metal".to_string(),
                material: MaterialClass::Solid,
                gradient: vec![[170, 170, 180, 255], [190, 190, 200, 255]],
                has_density: true,
                density: 2.0,
                can_burn: true,
                combustion_temperature: 1100,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::MoltenMetal,
                name: "molten_metal".to_string(),
                material: MaterialClass::Liquid,
                gradient: vec![[255, 200, 120, 255], [255, 140, 60, 255]],
                has_density: true,
                density: 2.0,
                combustion_temperature: 1000,
                spreads_heat: true,
                can_cool: true,
                has_start_temperature: true,
                start_temperature: 1400,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Ice,
                name: "ice".to_string(),
                material: MaterialClass::Solid,
                gradient: vec![[200, 230, 255, 255], [170, 210, 245, 255]],
                has_density: true,
                density: 0.9,
                can_burn: true,
                combustion_temperature: 0, // Melts
                has_start_temperature: true,
                start_temperature: -10,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Acid,
                name: "acid".to_string(),
                material: MaterialClass::Liquid,
                gradient: vec![[0, 255, 0, 255], [90, 230, 60, 255]],
                has_density: true,
                density: 1.2,
                has_lifetime: true,
                lifetime_min: 200,
                lifetime_max: 400,
                ..Default::default()
            },
            ParticleTemplate {
                particle_type: ParticleType::Smoke,
                name: "smoke".to_string(),
                material: MaterialClass::Gas,
                gradient: vec![[60, 60, 60, 255], [90, 90, 90, 255]],
                has_density: true,
                density: 0.1,
                has_lifetime: true,
                lifetime_min: 60,
                lifetime_max: 120,
                ..Default::default()
            },
        ]
    }
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self {
            templates: std::iter::once(ParticleTemplate::default())
                .chain(Self::default_templates())
                .collect(),
        }
    }
}
