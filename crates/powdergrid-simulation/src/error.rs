//! Property table errors

use crate::ParticleType;
use thiserror::Error;

/// Reasons a property table is rejected at load time
#[derive(Debug, Error)]
pub enum TableError {
    #[error("no template registered for particle type {0:?}")]
    MissingTemplate(ParticleType),

    #[error("particle type {0:?} has more than one template")]
    DuplicateTemplate(ParticleType),

    #[error("the `none` particle type cannot carry a template")]
    TemplateForNone,

    #[error("template {0:?} has an empty color gradient")]
    EmptyGradient(ParticleType),

    #[error("template {particle_type:?} lifetime range {min}..={max} is inverted")]
    InvertedLifetime {
        particle_type: ParticleType,
        min: u32,
        max: u32,
    },

    #[error("template {particle_type:?} density {density} is outside 0.0..=2.0")]
    DensityOutOfRange {
        particle_type: ParticleType,
        density: f32,
    },

    #[error("failed to parse property table: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
